use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::{CandleInterval, DepthLevel, MarketDepth};
use crate::exchanges::huobi::rest::{HuobiRest, Params};
use crate::exchanges::huobi::types::{
    Candle, MarketSummary, MergedTicker, OrderBookSnapshot, Ticker, TradeBatch,
};
use crate::exchanges::huobi::validation::{ensure_range, ensure_symbol};
use serde_json::Value;
use tracing::instrument;

const DEFAULT_CANDLES: u32 = 150;
const MAX_HISTORY: u32 = 2000;

/// Public market data endpoints
pub struct Market<R: RestClient> {
    rest: HuobiRest<R>,
}

impl<R: RestClient> Market<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
        }
    }

    /// Latest candles, newest first. `size` defaults to 150.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        size: Option<u32>,
    ) -> Result<Vec<Candle>, ExchangeError> {
        ensure_symbol(symbol)?;
        let size = size.unwrap_or(DEFAULT_CANDLES);
        ensure_range("size", size, 1..=MAX_HISTORY)?;

        let params = Params::new()
            .push("symbol", symbol)
            .push("period", interval)
            .push("size", size);
        self.rest.get("/market/history/kline", &params, false).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn merged_ticker(&self, symbol: &str) -> Result<MergedTicker, ExchangeError> {
        ensure_symbol(symbol)?;
        self.rest
            .get_tick("/market/detail/merged", &Params::new().push("symbol", symbol))
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn tickers(&self) -> Result<Vec<Ticker>, ExchangeError> {
        self.rest.get("/market/tickers", &Params::new(), false).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn depth(
        &self,
        symbol: &str,
        depth: MarketDepth,
        level: DepthLevel,
    ) -> Result<OrderBookSnapshot, ExchangeError> {
        ensure_symbol(symbol)?;
        let params = Params::new()
            .push("symbol", symbol)
            .push("depth", depth.value())
            .push("type", level);
        self.rest.get_tick("/market/depth", &params).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn last_trade(&self, symbol: &str) -> Result<TradeBatch, ExchangeError> {
        ensure_symbol(symbol)?;
        self.rest
            .get_tick("/market/trade", &Params::new().push("symbol", symbol))
            .await
    }

    /// Most recent trade batches; `size` defaults to 1.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn recent_trades(
        &self,
        symbol: &str,
        size: Option<u32>,
    ) -> Result<Vec<TradeBatch>, ExchangeError> {
        ensure_symbol(symbol)?;
        let size = size.unwrap_or(1);
        ensure_range("size", size, 1..=MAX_HISTORY)?;

        let params = Params::new().push("symbol", symbol).push("size", size);
        self.rest.get("/market/history/trade", &params, false).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn summary(&self, symbol: &str) -> Result<MarketSummary, ExchangeError> {
        ensure_symbol(symbol)?;
        self.rest
            .get_tick("/market/detail", &Params::new().push("symbol", symbol))
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn etp_nav(&self, symbol: &str) -> Result<Value, ExchangeError> {
        ensure_symbol(symbol)?;
        self.rest
            .get_tick("/market/etp", &Params::new().push("symbol", symbol))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::huobi::connector::mock::MockRest;
    use serde_json::json;

    #[tokio::test]
    async fn test_candles_default_size() {
        let rest = MockRest::new().respond(json!({
            "ch": "market.btcusdt.kline.1min",
            "status": "ok",
            "ts": 1629769247172_u64,
            "data": [{"id": 1629769200, "open": 49056.37, "close": 49025.51, "low": 49022.86,
                      "high": 49056.38, "amount": 3.946281917950917, "vol": 193489.67,
                      "count": 196}]
        }));
        let candles = Market::new(&rest)
            .candles("btcusdt", CandleInterval::Min1, None)
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].count, 196);

        let call = rest.last_call();
        assert_eq!(call.endpoint, "/market/history/kline");
        assert_eq!(call.param("period"), Some("1min"));
        assert_eq!(call.param("size"), Some("150"));
    }

    #[tokio::test]
    async fn test_size_checked_before_request() {
        let rest = MockRest::new();
        let market = Market::new(&rest);
        let err = market
            .candles("btcusdt", CandleInterval::Day1, Some(2001))
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::ValidationError(_)));
        assert!(market.recent_trades("btcusdt", Some(0)).await.is_err());
        assert!(market.merged_ticker("").await.is_err());
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn test_depth_reads_tick() {
        let rest = MockRest::new().respond(json!({
            "ch": "market.btcusdt.depth.step0",
            "status": "ok",
            "tick": {"ts": 1, "version": 2, "bids": [[1.0, 2.0]], "asks": [[3.0, 4.0]]}
        }));
        let book = Market::new(&rest)
            .depth("btcusdt", MarketDepth::Depth5, DepthLevel::Step0)
            .await
            .unwrap();
        assert_eq!(book.asks[0], [3.0, 4.0]);
        let call = rest.last_call();
        assert_eq!(call.param("depth"), Some("5"));
        assert_eq!(call.param("type"), Some("step0"));
    }

    #[tokio::test]
    async fn test_error_envelope_is_api_error() {
        let rest = MockRest::new().respond(json!({
            "status": "error",
            "err-code": "invalid-parameter",
            "err-msg": "invalid symbol"
        }));
        let err = Market::new(&rest).summary("nope").await.unwrap_err();
        assert!(matches!(err, ExchangeError::ApiError { ref code, .. } if code == "invalid-parameter"));
    }
}
