use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::huobi::requests::{
    ConditionalOrder, ConditionalOrderHistoryQuery, OpenConditionalOrdersQuery,
};
use crate::exchanges::huobi::rest::{to_body, HuobiRest, Params};
use crate::exchanges::huobi::types::Page;
use crate::exchanges::huobi::validation::{ensure_not_empty, ensure_range};
use serde_json::{json, Value};
use tracing::instrument;

const MAX_CANCEL_IDS: usize = 50;

/// Conditional (algo) orders
pub struct Algo<R: RestClient> {
    rest: HuobiRest<R>,
}

impl<R: RestClient> Algo<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
        }
    }

    /// Place a conditional order; the exchange answers with its client order id.
    #[instrument(skip(self, order), fields(exchange = "huobi", symbol = %order.symbol))]
    pub async fn place(&self, order: &ConditionalOrder) -> Result<Value, ExchangeError> {
        order.validate()?;
        self.rest.post("/v2/algo-orders", &to_body(order)?).await
    }

    /// Cancel conditional orders that have not triggered yet
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cancel(&self, client_order_ids: &[&str]) -> Result<Value, ExchangeError> {
        ensure_range("clientOrderIds", client_order_ids.len(), 1..=MAX_CANCEL_IDS)?;
        self.rest
            .post(
                "/v2/algo-orders/cancellation",
                &json!({ "clientOrderIds": client_order_ids }),
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn open_orders(
        &self,
        query: &OpenConditionalOrdersQuery,
    ) -> Result<Page<Value>, ExchangeError> {
        query.validate()?;
        self.rest
            .get_page("/v2/algo-orders/opening", &query.to_params())
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn history(
        &self,
        query: &ConditionalOrderHistoryQuery,
    ) -> Result<Page<Value>, ExchangeError> {
        query.validate()?;
        self.rest
            .get_page("/v2/algo-orders/history", &query.to_params())
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn specific(&self, client_order_id: &str) -> Result<Value, ExchangeError> {
        ensure_not_empty("clientOrderId", client_order_id)?;
        self.rest
            .get(
                "/v2/algo-orders/specific",
                &Params::new().push("clientOrderId", client_order_id),
                true,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ConditionalOrderStatus, ConditionalOrderType, OrderSide};
    use crate::exchanges::huobi::connector::mock::MockRest;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_place_conditional_order() {
        let rest = MockRest::new().respond(json!({"code": 200, "data": {"clientOrderId": "a1"}}));
        let order = ConditionalOrder::new(
            1,
            "btcusdt",
            OrderSide::Sell,
            ConditionalOrderType::Market,
            "a1",
            Decimal::new(40_000, 0),
        )
        .with_order_size(Decimal::ONE);
        let data = Algo::new(&rest).place(&order).await.unwrap();
        assert_eq!(data["clientOrderId"], "a1");

        let body = rest.last_call().body.unwrap();
        assert_eq!(body["orderSide"], "sell");
        assert_eq!(body["orderSize"], "1");
    }

    #[tokio::test]
    async fn test_history_sends_status_and_limit() {
        let rest = MockRest::new().respond(json!({"code": 200, "data": []}));
        let query = ConditionalOrderHistoryQuery::new("btcusdt", ConditionalOrderStatus::Triggered);
        Algo::new(&rest).history(&query).await.unwrap();
        let call = rest.last_call();
        assert_eq!(call.endpoint, "/v2/algo-orders/history");
        assert_eq!(call.param("orderStatus"), Some("triggered"));
        assert_eq!(call.param("limit"), Some("100"));
        assert_eq!(call.param("sort"), Some("desc"));
    }

    #[tokio::test]
    async fn test_cancel_needs_ids() {
        let rest = MockRest::new();
        assert!(Algo::new(&rest).cancel(&[]).await.is_err());
        assert!(rest.calls().is_empty());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "canceled".parse::<ConditionalOrderStatus>().unwrap(),
            ConditionalOrderStatus::Canceled
        );
        assert!("open".parse::<ConditionalOrderStatus>().is_err());
    }
}
