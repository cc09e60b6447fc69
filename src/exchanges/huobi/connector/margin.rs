use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::huobi::requests::{
    CrossLoanOrdersQuery, IsolatedLoanOrdersQuery, RepaymentQuery,
};
use crate::exchanges::huobi::rest::{HuobiRest, Params};
use crate::exchanges::huobi::types::Page;
use crate::exchanges::huobi::validation::{ensure_not_empty, ensure_positive, ensure_symbol};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::instrument;

/// Isolated and cross margin loans
pub struct Margin<R: RestClient> {
    rest: HuobiRest<R>,
}

impl<R: RestClient> Margin<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
        }
    }

    /// Repay a loan of either margin mode
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn repay(
        &self,
        account_id: u64,
        currency: &str,
        amount: Decimal,
        transact_id: Option<&str>,
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("currency", currency)?;
        ensure_positive("amount", amount)?;
        let mut body = json!({
            "accountid": account_id.to_string(),
            "currency": currency,
            "amount": amount.to_string(),
        });
        if let Some(transact_id) = transact_id {
            body["transactId"] = Value::from(transact_id);
        }
        self.rest.post("/v2/account/repayment", &body).await
    }

    /// Spot to isolated margin; returns the transfer id.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn isolated_transfer_in(
        &self,
        symbol: &str,
        currency: &str,
        amount: Decimal,
    ) -> Result<u64, ExchangeError> {
        let body = isolated_body(symbol, currency, amount)?;
        self.rest.post("/v1/dw/transfer-in/margin", &body).await
    }

    /// Isolated margin to spot; returns the transfer id.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn isolated_transfer_out(
        &self,
        symbol: &str,
        currency: &str,
        amount: Decimal,
    ) -> Result<u64, ExchangeError> {
        let body = isolated_body(symbol, currency, amount)?;
        self.rest.post("/v1/dw/transfer-out/margin", &body).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn isolated_loan_info(&self, symbols: &[&str]) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v1/margin/loan-info",
                &Params::new().push_list("symbols", symbols),
                true,
            )
            .await
    }

    /// Borrow on an isolated margin account; returns the loan order id.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn isolated_loan(
        &self,
        symbol: &str,
        currency: &str,
        amount: Decimal,
    ) -> Result<u64, ExchangeError> {
        let body = isolated_body(symbol, currency, amount)?;
        self.rest.post("/v1/margin/orders", &body).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn isolated_repay(
        &self,
        order_id: u64,
        amount: Decimal,
    ) -> Result<u64, ExchangeError> {
        ensure_positive("amount", amount)?;
        let endpoint = format!("/v1/margin/orders/{}/repay", order_id);
        self.rest
            .post(&endpoint, &json!({ "amount": amount.to_string() }))
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn isolated_loan_orders(
        &self,
        query: &IsolatedLoanOrdersQuery,
    ) -> Result<Value, ExchangeError> {
        query.validate()?;
        self.rest
            .get("/v1/margin/loan-orders", &query.to_params(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn isolated_balance(
        &self,
        symbol: Option<&str>,
        sub_uid: Option<u64>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .push_opt("symbol", symbol)
            .push_opt("sub-uid", sub_uid);
        self.rest
            .get("/v1/margin/accounts/balance", &params, true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cross_transfer_in(
        &self,
        currency: &str,
        amount: Decimal,
    ) -> Result<u64, ExchangeError> {
        let body = cross_body(currency, amount)?;
        self.rest
            .post("/v1/cross-margin/transfer-in", &body)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cross_transfer_out(
        &self,
        currency: &str,
        amount: Decimal,
    ) -> Result<u64, ExchangeError> {
        let body = cross_body(currency, amount)?;
        self.rest
            .post("/v1/cross-margin/transfer-out", &body)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cross_loan_info(&self) -> Result<Value, ExchangeError> {
        self.rest
            .get("/v1/cross-margin/loan-info", &Params::new(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cross_loan(&self, currency: &str, amount: Decimal) -> Result<u64, ExchangeError> {
        let body = cross_body(currency, amount)?;
        self.rest.post("/v1/cross-margin/orders", &body).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cross_repay(&self, order_id: u64, amount: Decimal) -> Result<Value, ExchangeError> {
        ensure_positive("amount", amount)?;
        let endpoint = format!("/v1/cross-margin/orders/{}/repay", order_id);
        self.rest
            .post(&endpoint, &json!({ "amount": amount.to_string() }))
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cross_loan_orders(
        &self,
        query: &CrossLoanOrdersQuery,
    ) -> Result<Value, ExchangeError> {
        query.validate()?;
        self.rest
            .get("/v1/cross-margin/loan-orders", &query.to_params(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cross_balance(&self, sub_uid: Option<u64>) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v1/cross-margin/accounts/balance",
                &Params::new().push_opt("sub-uid", sub_uid),
                true,
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn repayments(&self, query: &RepaymentQuery) -> Result<Page<Value>, ExchangeError> {
        query.validate()?;
        self.rest
            .get_page("/v2/account/repayment", &query.to_params())
            .await
    }
}

fn isolated_body(symbol: &str, currency: &str, amount: Decimal) -> Result<Value, ExchangeError> {
    ensure_symbol(symbol)?;
    let mut body = cross_body(currency, amount)?;
    body["symbol"] = Value::from(symbol);
    Ok(body)
}

fn cross_body(currency: &str, amount: Decimal) -> Result<Value, ExchangeError> {
    ensure_not_empty("currency", currency)?;
    ensure_positive("amount", amount)?;
    Ok(json!({ "currency": currency, "amount": amount.to_string() }))
}
