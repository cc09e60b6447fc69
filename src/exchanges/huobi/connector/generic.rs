use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::huobi::rest::{HuobiRest, Params};
use crate::exchanges::huobi::types::MarketStatus;
use serde_json::Value;
use tracing::instrument;

/// Status page of the exchange, served outside the API host
pub const SYSTEM_STATUS_URL: &str = "https://status.huobigroup.com/api/v2/summary.json";

/// Public reference data: status, symbols, currencies, chains, server time
pub struct Generic<R: RestClient> {
    rest: HuobiRest<R>,
}

impl<R: RestClient> Generic<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
        }
    }

    /// Incident and maintenance summary of every Huobi service
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn system_status(&self) -> Result<Value, ExchangeError> {
        self.rest
            .get_raw(SYSTEM_STATUS_URL, &Params::new(), false)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn market_status(&self) -> Result<MarketStatus, ExchangeError> {
        self.rest
            .get("/v2/market-status", &Params::new(), false)
            .await
    }

    /// `ts` asks only for entries changed after that unix time in milliseconds.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn symbols(&self, ts: Option<i64>) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v2/settings/common/symbols",
                &Params::new().push_opt("ts", ts),
                false,
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn currencies(&self, ts: Option<i64>) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v2/settings/common/currencies",
                &Params::new().push_opt("ts", ts),
                false,
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn currency_settings(&self, ts: Option<i64>) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v1/settings/common/currencys",
                &Params::new().push_opt("ts", ts),
                false,
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn symbol_settings(&self, ts: Option<i64>) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v1/settings/common/symbols",
                &Params::new().push_opt("ts", ts),
                false,
            )
            .await
    }

    /// Settings of the given symbols, or of all of them when `symbols` is empty
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn market_symbol_settings(
        &self,
        symbols: &[&str],
        ts: Option<i64>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new().push_opt("ts", ts).push_list("symbols", symbols);
        self.rest
            .get("/v1/settings/common/market-symbols", &params, false)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn chains(
        &self,
        currency: Option<&str>,
        show_desc: Option<u8>,
        ts: Option<i64>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .push_opt("show-desc", show_desc)
            .push_opt("ts", ts)
            .push_opt("currency", currency);
        self.rest
            .get("/v1/settings/common/chains", &params, false)
            .await
    }

    /// Deposit and withdraw reference per currency and chain
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn chains_v2(
        &self,
        currency: Option<&str>,
        authorized_user: bool,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .push("authorizedUser", authorized_user)
            .push_opt("currency", currency.map(str::to_lowercase));
        self.rest
            .get("/v2/reference/currencies", &params, false)
            .await
    }

    /// Server time in unix milliseconds
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn timestamp(&self) -> Result<u64, ExchangeError> {
        self.rest
            .get("/v1/common/timestamp", &Params::new(), false)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::huobi::connector::mock::MockRest;
    use serde_json::json;

    #[tokio::test]
    async fn test_timestamp_is_public() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": 1629715504949_u64}));
        let generic = Generic::new(&rest);
        assert_eq!(generic.timestamp().await.unwrap(), 1_629_715_504_949);

        let call = rest.last_call();
        assert_eq!(call.endpoint, "/v1/common/timestamp");
        assert!(!call.authenticated);
    }

    #[tokio::test]
    async fn test_chains_v2_lowercases_currency() {
        let rest = MockRest::new().respond(json!({"code": 200, "data": []}));
        Generic::new(&rest).chains_v2(Some("USDT"), true).await.unwrap();
        let call = rest.last_call();
        assert_eq!(call.param("currency"), Some("usdt"));
        assert_eq!(call.param("authorizedUser"), Some("true"));
    }

    #[tokio::test]
    async fn test_market_symbols_are_joined() {
        let rest = MockRest::new();
        Generic::new(&rest)
            .market_symbol_settings(&["btcusdt", "ethusdt"], None)
            .await
            .unwrap();
        let call = rest.last_call();
        assert_eq!(call.param("symbols"), Some("btcusdt,ethusdt"));
        assert_eq!(call.param("ts"), None);
    }

    #[tokio::test]
    async fn test_status_page_has_no_envelope() {
        let rest = MockRest::new().respond(json!({"page": {"id": "p0qjfl24znv5"}, "status": {"indicator": "none"}}));
        let status = Generic::new(&rest).system_status().await.unwrap();
        assert_eq!(status["page"]["id"], "p0qjfl24znv5");
        assert_eq!(rest.last_call().endpoint, SYSTEM_STATUS_URL);
    }
}
