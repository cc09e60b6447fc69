use crate::core::errors::ExchangeError;
use crate::core::kernel::{Callback, ReconnectWs, TungsteniteWs, WsClient, WsSession};
use crate::core::types::{AccountChangeMode, CandleInterval, DepthLevel, TradeDetailMode};
use crate::exchanges::huobi::codec::{AccountCodec, MarketCodec};
use crate::exchanges::huobi::topics;
use crate::exchanges::huobi::types::StreamMessage;

/// Public market data stream
pub type MarketStream<S = ReconnectWs<TungsteniteWs>> = WsClient<MarketCodec, S>;

/// Authenticated order and balance stream
pub type AccountStream<S = ReconnectWs<TungsteniteWs>> = WsClient<AccountCodec, S>;

pub type StreamCallback = Callback<StreamMessage>;

impl<S: WsSession> WsClient<MarketCodec, S> {
    pub async fn subscribe_candles(
        &mut self,
        symbol: &str,
        interval: CandleInterval,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::candles(symbol, interval)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_ticker(
        &mut self,
        symbol: &str,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::ticker(symbol)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_depth(
        &mut self,
        symbol: &str,
        level: DepthLevel,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::depth(symbol, level)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_bbo(
        &mut self,
        symbol: &str,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::bbo(symbol)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_trades(
        &mut self,
        symbol: &str,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::trade_detail(symbol)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_market_detail(
        &mut self,
        symbol: &str,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::market_detail(symbol)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_etp(
        &mut self,
        symbol: &str,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::etp(symbol)?;
        self.subscribe(&topic, callback).await
    }
}

impl<S: WsSession> WsClient<AccountCodec, S> {
    pub async fn subscribe_orders(
        &mut self,
        symbol: &str,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::orders(symbol)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_trade_clearing(
        &mut self,
        symbol: &str,
        mode: TradeDetailMode,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        let topic = topics::trade_clearing(symbol, mode)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_account_updates(
        &mut self,
        mode: AccountChangeMode,
        callback: Option<StreamCallback>,
    ) -> Result<(), ExchangeError> {
        self.subscribe(&topics::account_updates(mode), callback)
            .await
    }
}
