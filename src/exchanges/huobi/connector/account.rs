use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::{AccountTypeCode, FuturesTransferType};
use crate::exchanges::huobi::requests::{AccountHistoryQuery, AssetTransfer, LedgerQuery};
use crate::exchanges::huobi::rest::{to_body, HuobiRest, Params};
use crate::exchanges::huobi::types::{Account as SpotAccount, AccountBalance, Page};
use crate::exchanges::huobi::validation::{ensure_not_empty, ensure_positive};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::instrument;

/// Accounts, balances, valuations and transfers
pub struct Account<R: RestClient> {
    rest: HuobiRest<R>,
}

impl<R: RestClient> Account<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
        }
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn accounts(&self) -> Result<Vec<SpotAccount>, ExchangeError> {
        self.rest
            .get("/v1/account/accounts", &Params::new(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn balance(&self, account_id: u64) -> Result<AccountBalance, ExchangeError> {
        let endpoint = format!("/v1/account/accounts/{}/balance", account_id);
        self.rest.get(&endpoint, &Params::new(), true).await
    }

    /// Total valuation across accounts; `valuation_currency` defaults to BTC.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn platform_valuation(
        &self,
        account_type: Option<AccountTypeCode>,
        valuation_currency: Option<&str>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .push_opt("accountType", account_type.map(AccountTypeCode::code))
            .push(
                "valuationCurrency",
                valuation_currency.unwrap_or("BTC").to_uppercase(),
            );
        self.rest.get("/v2/account/valuation", &params, true).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn asset_valuation(
        &self,
        account_type: &str,
        valuation_currency: Option<&str>,
        sub_uid: Option<u64>,
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("accountType", account_type)?;
        let params = Params::new()
            .push("accountType", account_type)
            .push_opt("valuationCurrency", valuation_currency.map(str::to_uppercase))
            .push_opt("subUid", sub_uid);
        self.rest
            .get("/v2/account/asset-valuation", &params, true)
            .await
    }

    /// Move assets between accounts of one user or across users
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn transfer(&self, request: &AssetTransfer) -> Result<Value, ExchangeError> {
        request.validate()?;
        self.rest
            .post("/v1/account/transfer", &to_body(request)?)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn history(&self, query: &AccountHistoryQuery) -> Result<Value, ExchangeError> {
        query.validate()?;
        self.rest
            .get("/v1/account/history", &query.to_params(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn ledger(&self, query: &LedgerQuery) -> Result<Page<Value>, ExchangeError> {
        query.validate()?;
        self.rest
            .get_page("/v2/account/ledger", &query.to_params())
            .await
    }

    /// Transfer between the spot and futures accounts; returns the transfer id.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn futures_transfer(
        &self,
        currency: &str,
        amount: Decimal,
        transfer_type: FuturesTransferType,
    ) -> Result<u64, ExchangeError> {
        ensure_not_empty("currency", currency)?;
        ensure_positive("amount", amount)?;
        let body = json!({
            "currency": currency,
            "amount": amount.to_string(),
            "type": transfer_type,
        });
        self.rest.post("/v1/futures/transfer", &body).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn point_balance(&self, sub_uid: Option<u64>) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v2/point/account",
                &Params::new().push_opt("subUid", sub_uid),
                true,
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn point_transfer(
        &self,
        from_uid: u64,
        to_uid: u64,
        group_id: u64,
        amount: Decimal,
    ) -> Result<Value, ExchangeError> {
        ensure_positive("amount", amount)?;
        let body = json!({
            "fromUid": from_uid.to_string(),
            "toUid": to_uid.to_string(),
            "groupId": group_id,
            "amount": amount.to_string(),
        });
        self.rest.post("/v2/point/transfer", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::huobi::connector::mock::MockRest;
    use serde_json::json;

    #[tokio::test]
    async fn test_accounts_are_signed() {
        let rest = MockRest::new().respond(json!({
            "status": "ok",
            "data": [{"id": 10000001, "type": "spot", "subtype": "", "state": "working"}]
        }));
        let accounts = Account::new(&rest).accounts().await.unwrap();
        assert_eq!(accounts[0].id, 10_000_001);
        assert_eq!(accounts[0].account_type, "spot");
        assert!(rest.last_call().authenticated);
    }

    #[tokio::test]
    async fn test_balance_path() {
        let rest = MockRest::new().respond(json!({
            "status": "ok",
            "data": {"id": 7, "type": "spot", "state": "working", "list": []}
        }));
        Account::new(&rest).balance(7).await.unwrap();
        assert_eq!(rest.last_call().endpoint, "/v1/account/accounts/7/balance");
    }

    #[tokio::test]
    async fn test_valuation_defaults_to_btc() {
        let rest = MockRest::new().respond(json!({"code": 200, "data": {}}));
        Account::new(&rest)
            .platform_valuation(Some(AccountTypeCode::Spot), None)
            .await
            .unwrap();
        let call = rest.last_call();
        assert_eq!(call.param("accountType"), Some("1"));
        assert_eq!(call.param("valuationCurrency"), Some("BTC"));
    }

    #[tokio::test]
    async fn test_transfer_body() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": {"transact-id": 1}}));
        let request = AssetTransfer {
            from_user: 1,
            from_account_type: "spot".to_string(),
            from_account: 11,
            to_user: 2,
            to_account_type: "spot".to_string(),
            to_account: 22,
            currency: "usdt".to_string(),
            amount: Decimal::new(125, 1),
        };
        Account::new(&rest).transfer(&request).await.unwrap();
        let body = rest.last_call().body.unwrap();
        assert_eq!(body["from-account-type"], "spot");
        assert_eq!(body["amount"], "12.5");
    }

    #[tokio::test]
    async fn test_ledger_keeps_cursor() {
        let rest = MockRest::new().respond(json!({
            "code": 200,
            "message": "success",
            "data": [{"transactId": 1}],
            "nextId": 1_000_001
        }));
        let page = Account::new(&rest)
            .ledger(&LedgerQuery::new(5))
            .await
            .unwrap();
        assert_eq!(page.next_id, Some(1_000_001));
        let call = rest.last_call();
        assert_eq!(call.param("accountId"), Some("5"));
        assert_eq!(call.param("limit"), Some("100"));
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected_locally() {
        let rest = MockRest::new();
        let err = Account::new(&rest)
            .futures_transfer("usdt", Decimal::ZERO, FuturesTransferType::ProToFutures)
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::ValidationError(_)));
        assert!(rest.calls().is_empty());
    }
}
