//! Topic names of the market and account streams.

use crate::core::errors::ExchangeError;
use crate::core::types::{AccountChangeMode, CandleInterval, DepthLevel, TradeDetailMode};
use crate::exchanges::huobi::validation::ensure_symbol;

pub fn candles(symbol: &str, interval: CandleInterval) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("market.{}.kline.{}", symbol, interval))
}

pub fn ticker(symbol: &str) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("market.{}.ticker", symbol))
}

pub fn depth(symbol: &str, level: DepthLevel) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("market.{}.depth.{}", symbol, level))
}

/// Best bid and offer
pub fn bbo(symbol: &str) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("market.{}.bbo", symbol))
}

pub fn trade_detail(symbol: &str) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("market.{}.trade.detail", symbol))
}

/// Rolling 24h summary
pub fn market_detail(symbol: &str) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("market.{}.detail", symbol))
}

/// Net asset value of an ETP
pub fn etp(symbol: &str) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("market.{}.etp", symbol))
}

/// Order updates; `*` follows every symbol.
pub fn orders(symbol: &str) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("orders#{}", symbol))
}

pub fn trade_clearing(symbol: &str, mode: TradeDetailMode) -> Result<String, ExchangeError> {
    ensure_symbol(symbol)?;
    Ok(format!("trade.clearing#{}#{}", symbol, mode as u8))
}

pub fn account_updates(mode: AccountChangeMode) -> String {
    format!("accounts.update#{}", mode as u8)
}
