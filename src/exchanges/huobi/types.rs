use crate::core::types::OrderSide;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trading status of the whole market, `/v2/market-status`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatus {
    /// 1 normal, 2 halted, 3 cancel-only
    pub market_status: u8,
    pub halt_start_time: Option<i64>,
    pub halt_end_time: Option<i64>,
    pub halt_reason: Option<u8>,
    pub affected_symbols: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Candle {
    /// Open time in unix seconds
    pub id: i64,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub amount: f64,
    pub vol: f64,
    pub count: u64,
}

/// Aggregated ticker with best bid and ask as `[price, size]`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MergedTicker {
    pub id: Option<i64>,
    pub version: Option<i64>,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub amount: f64,
    pub vol: f64,
    pub count: u64,
    pub bid: Vec<f64>,
    pub ask: Vec<f64>,
}

/// One row of `/market/tickers`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: String,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub amount: f64,
    pub vol: f64,
    pub count: u64,
    pub bid: f64,
    pub bid_size: f64,
    pub ask: f64,
    pub ask_size: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderBookSnapshot {
    pub ts: i64,
    pub version: i64,
    /// `[price, size]`, best first
    pub bids: Vec<[f64; 2]>,
    pub asks: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradeTick {
    #[serde(rename = "trade-id")]
    pub trade_id: u64,
    pub price: f64,
    pub amount: f64,
    pub direction: OrderSide,
    pub ts: i64,
}

/// Trades sharing one match, as returned by `/market/trade` and `/market/history/trade`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradeBatch {
    pub ts: i64,
    pub data: Vec<TradeTick>,
}

/// Rolling 24h summary, `/market/detail`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketSummary {
    pub id: Option<i64>,
    pub version: Option<i64>,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub amount: f64,
    pub vol: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    pub id: u64,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub subtype: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BalanceEntry {
    pub currency: String,
    /// `trade` or `frozen`
    #[serde(rename = "type")]
    pub balance_type: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccountBalance {
    pub id: u64,
    #[serde(rename = "type")]
    pub account_type: String,
    pub state: String,
    pub list: Vec<BalanceEntry>,
}

impl AccountBalance {
    /// Sum of every entry of `currency`, tradable and frozen.
    pub fn total(&self, currency: &str) -> Decimal {
        self.list
            .iter()
            .filter(|entry| entry.currency == currency)
            .map(|entry| entry.balance)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    pub currency: String,
    pub address: String,
    #[serde(default)]
    pub address_tag: String,
    pub chain: String,
}

/// One page of a v2 listing with the cursor of the next page
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: T,
    pub next_id: Option<u64>,
}

/// Decoded data frame of either stream
///
/// Market frames carry `ch`, `ts` and `tick`; account frames carry `ch` and
/// `data`. Both end up with the payload in `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamMessage {
    pub topic: String,
    pub ts: Option<u64>,
    pub data: Value,
}

impl StreamMessage {
    /// Decode the payload into a typed struct.
    pub fn parse<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, crate::core::errors::ExchangeError> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            crate::core::errors::ExchangeError::DeserializationError(format!(
                "Failed to decode payload of {}: {}",
                self.topic, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_balance_amounts_are_decimal_strings() {
        let balance: AccountBalance = serde_json::from_value(json!({
            "id": 100009,
            "type": "spot",
            "state": "working",
            "list": [
                {"currency": "usdt", "type": "trade", "balance": "91.850043797676510303"},
                {"currency": "usdt", "type": "frozen", "balance": "5.160000000000000015"},
                {"currency": "btc", "type": "trade", "balance": "0"}
            ]
        }))
        .unwrap();
        assert_eq!(
            balance.total("usdt"),
            "97.010043797676510318".parse::<Decimal>().unwrap()
        );
        assert_eq!(balance.total("eth"), Decimal::ZERO);
    }

    #[test]
    fn test_trade_batch_ignores_wide_ids() {
        let batch: TradeBatch = serde_json::from_value(json!({
            "id": 136107114900u64,
            "ts": 1629716356236i64,
            "data": [{
                "id": 1.3610711490038e+26,
                "ts": 1629716356236i64,
                "trade-id": 102517381182u64,
                "amount": 0.01,
                "price": 48750.01,
                "direction": "buy"
            }]
        }))
        .unwrap();
        assert_eq!(batch.data[0].trade_id, 102_517_381_182);
        assert_eq!(batch.data[0].direction, OrderSide::Buy);
    }

    #[test]
    fn test_stream_message_parse() {
        let message = StreamMessage {
            topic: "market.btcusdt.kline.1min".to_string(),
            ts: Some(1),
            data: json!({"id": 1, "open": 1.0, "close": 2.0, "low": 0.5, "high": 2.5,
                          "amount": 3.0, "vol": 4.0, "count": 5}),
        };
        let candle: Candle = message.parse().unwrap();
        assert_eq!(candle.count, 5);
        assert!(message.parse::<Account>().is_err());
    }
}
