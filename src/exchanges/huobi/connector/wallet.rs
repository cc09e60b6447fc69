use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::huobi::requests::{
    DepositWithdrawQuery, WithdrawAddressQuery, WithdrawRequest,
};
use crate::exchanges::huobi::rest::{to_body, HuobiRest, Params};
use crate::exchanges::huobi::types::{DepositAddress, Page};
use crate::exchanges::huobi::validation::ensure_not_empty;
use serde_json::{json, Value};
use tracing::instrument;

/// Deposits and withdrawals
pub struct Wallet<R: RestClient> {
    rest: HuobiRest<R>,
}

impl<R: RestClient> Wallet<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
        }
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn deposit_address(&self, currency: &str) -> Result<Vec<DepositAddress>, ExchangeError> {
        ensure_not_empty("currency", currency)?;
        self.rest
            .get(
                "/v2/account/deposit/address",
                &Params::new().push("currency", currency),
                true,
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn withdraw_quota(&self, currency: &str) -> Result<Value, ExchangeError> {
        ensure_not_empty("currency", currency)?;
        self.rest
            .get(
                "/v2/account/withdraw/quota",
                &Params::new().push("currency", currency),
                true,
            )
            .await
    }

    /// Addresses on the withdraw whitelist
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn withdraw_addresses(
        &self,
        query: &WithdrawAddressQuery,
    ) -> Result<Page<Value>, ExchangeError> {
        query.validate()?;
        self.rest
            .get_page("/v2/account/withdraw/address", &query.to_params())
            .await
    }

    /// Create a withdraw; returns the withdraw id.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn withdraw(&self, request: &WithdrawRequest) -> Result<u64, ExchangeError> {
        request.validate()?;
        self.rest
            .post("/v1/dw/withdraw/api/create", &to_body(request)?)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn withdraw_by_client_order_id(
        &self,
        client_order_id: &str,
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("clientOrderId", client_order_id)?;
        self.rest
            .get(
                "/v1/query/withdraw/client-order-id",
                &Params::new().push("clientOrderId", client_order_id),
                true,
            )
            .await
    }

    /// Cancel a pending withdraw; returns the id of the cancelled withdraw.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cancel_withdraw(&self, withdraw_id: u64) -> Result<u64, ExchangeError> {
        let endpoint = format!("/v1/dw/withdraw-virtual/{}/cancel", withdraw_id);
        self.rest.post(&endpoint, &json!({})).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn deposit_withdraw_history(
        &self,
        query: &DepositWithdrawQuery,
    ) -> Result<Value, ExchangeError> {
        query.validate()?;
        self.rest
            .get("/v1/query/deposit-withdraw", &query.to_params(), true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DepositWithdrawType;
    use crate::exchanges::huobi::connector::mock::MockRest;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[tokio::test]
    async fn test_withdraw_body_and_id() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": 101_123_262}));
        let request = WithdrawRequest::new("0xde709f", "usdt", Decimal::new(5, 0))
            .with_chain("trc20usdt")
            .with_fee(Decimal::new(1, 0));
        let id = Wallet::new(&rest).withdraw(&request).await.unwrap();
        assert_eq!(id, 101_123_262);

        let call = rest.last_call();
        assert_eq!(call.endpoint, "/v1/dw/withdraw/api/create");
        let body = call.body.unwrap();
        assert_eq!(body["amount"], "5");
        assert_eq!(body["chain"], "trc20usdt");
        assert!(body.get("addr-tag").is_none());
    }

    #[tokio::test]
    async fn test_deposit_withdraw_defaults() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": []}));
        Wallet::new(&rest)
            .deposit_withdraw_history(&DepositWithdrawQuery::new(DepositWithdrawType::Deposit))
            .await
            .unwrap();
        let call = rest.last_call();
        assert_eq!(call.param("type"), Some("deposit"));
        assert_eq!(call.param("size"), Some("100"));
        assert_eq!(call.param("direct"), Some("prev"));
    }

    #[tokio::test]
    async fn test_cancel_withdraw_path() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": 700}));
        assert_eq!(Wallet::new(&rest).cancel_withdraw(700).await.unwrap(), 700);
        assert_eq!(
            rest.last_call().endpoint,
            "/v1/dw/withdraw-virtual/700/cancel"
        );
    }

    #[tokio::test]
    async fn test_empty_currency_rejected() {
        let rest = MockRest::new();
        assert!(Wallet::new(&rest).deposit_address("").await.is_err());
        assert!(rest.calls().is_empty());
    }
}
