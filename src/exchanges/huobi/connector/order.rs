use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::huobi::requests::{
    BatchCancelOpenOrders, MatchResultsQuery, NewOrder, OpenOrdersQuery, PastOrdersQuery,
    RecentHistoryQuery,
};
use crate::exchanges::huobi::rest::{to_body, HuobiRest, Params};
use crate::exchanges::huobi::validation::{ensure_not_empty, ensure_range};
use serde_json::{json, Map, Value};
use tracing::instrument;

const MAX_BATCH_ORDERS: usize = 10;
const MAX_CANCEL_IDS: usize = 50;
const MAX_FEE_SYMBOLS: usize = 10;

/// Spot order placement, cancellation and queries
pub struct Order<R: RestClient> {
    rest: HuobiRest<R>,
}

impl<R: RestClient> Order<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
        }
    }

    /// Place one order; returns the exchange order id.
    #[instrument(skip(self, order), fields(exchange = "huobi", symbol = %order.symbol))]
    pub async fn place_order(&self, order: &NewOrder) -> Result<String, ExchangeError> {
        order.validate()?;
        self.rest
            .post("/v1/order/orders/place", &to_body(order)?)
            .await
    }

    /// Place up to 10 orders in one request; each entry reports its own outcome.
    #[instrument(skip(self, orders), fields(exchange = "huobi", count = orders.len()))]
    pub async fn place_batch_orders(&self, orders: &[NewOrder]) -> Result<Value, ExchangeError> {
        ensure_range("orders", orders.len(), 1..=MAX_BATCH_ORDERS)?;
        for order in orders {
            order.validate()?;
        }
        self.rest
            .post("/v1/order/batch-orders", &to_body(&orders)?)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cancel_order(
        &self,
        order_id: u64,
        symbol: Option<&str>,
    ) -> Result<String, ExchangeError> {
        let mut body = json!({ "order-id": order_id.to_string() });
        if let Some(symbol) = symbol {
            body["symbol"] = Value::from(symbol);
        }
        let endpoint = format!("/v1/order/orders/{}/submitcancel", order_id);
        self.rest.post(&endpoint, &body).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cancel_order_by_client_order_id(
        &self,
        client_order_id: &str,
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("client-order-id", client_order_id)?;
        self.rest
            .post(
                "/v1/order/orders/submitCancelClientOrder",
                &json!({ "client-order-id": client_order_id }),
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn open_orders(&self, query: &OpenOrdersQuery) -> Result<Value, ExchangeError> {
        query.validate()?;
        self.rest
            .get("/v1/order/openOrders", &query.to_params(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn batch_cancel_open_orders(
        &self,
        request: &BatchCancelOpenOrders,
    ) -> Result<Value, ExchangeError> {
        request.validate()?;
        self.rest
            .post(
                "/v1/order/orders/batchCancelOpenOrders",
                &to_body(request)?,
            )
            .await
    }

    /// Cancel up to 50 orders by exchange id and/or client order id
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cancel_orders(
        &self,
        order_ids: &[u64],
        client_order_ids: &[&str],
    ) -> Result<Value, ExchangeError> {
        if order_ids.is_empty() && client_order_ids.is_empty() {
            return Err(ExchangeError::validation(
                "order-ids and client-order-ids can not both be empty",
            ));
        }
        ensure_range("order-ids", order_ids.len(), 0..=MAX_CANCEL_IDS)?;
        ensure_range("client-order-ids", client_order_ids.len(), 0..=MAX_CANCEL_IDS)?;

        let mut body = Map::new();
        if !order_ids.is_empty() {
            let ids: Vec<String> = order_ids.iter().map(ToString::to_string).collect();
            body.insert("order-ids".to_string(), json!(ids));
        }
        if !client_order_ids.is_empty() {
            body.insert("client-order-ids".to_string(), json!(client_order_ids));
        }
        self.rest
            .post("/v1/order/orders/batchcancel", &Value::Object(body))
            .await
    }

    /// Dead man's switch: cancel every order unless called again within
    /// `timeout` seconds. A timeout of 0 disarms it.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn cancel_all_after(&self, timeout: u32) -> Result<Value, ExchangeError> {
        self.rest
            .post(
                "/v2/algo-orders/cancel-all-after",
                &json!({ "timeout": timeout }),
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn order(&self, order_id: u64) -> Result<Value, ExchangeError> {
        let endpoint = format!("/v1/order/orders/{}", order_id);
        self.rest.get(&endpoint, &Params::new(), true).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn order_by_client_order_id(
        &self,
        client_order_id: &str,
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("clientOrderId", client_order_id)?;
        self.rest
            .get(
                "/v1/order/orders/getClientOrder",
                &Params::new().push("clientOrderId", client_order_id),
                true,
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn order_match_results(&self, order_id: u64) -> Result<Value, ExchangeError> {
        let endpoint = format!("/v1/order/orders/{}/matchresults", order_id);
        self.rest.get(&endpoint, &Params::new(), true).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn past_orders(&self, query: &PastOrdersQuery) -> Result<Value, ExchangeError> {
        query.validate()?;
        self.rest
            .get("/v1/order/orders", &query.to_params(), true)
            .await
    }

    /// Orders of the last 48 hours
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn recent_history(&self, query: &RecentHistoryQuery) -> Result<Value, ExchangeError> {
        query.validate()?;
        self.rest
            .get("/v1/order/history", &query.to_params(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn match_results(&self, query: &MatchResultsQuery) -> Result<Value, ExchangeError> {
        query.validate()?;
        self.rest
            .get("/v1/order/matchresults", &query.to_params(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn fee_rates(&self, symbols: &[&str]) -> Result<Value, ExchangeError> {
        ensure_range("symbols", symbols.len(), 1..=MAX_FEE_SYMBOLS)?;
        self.rest
            .get(
                "/v2/reference/transact-fee-rate",
                &Params::new().push_list("symbols", symbols),
                true,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{OrderSide, OrderType};
    use crate::exchanges::huobi::connector::mock::MockRest;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_place_order_returns_id() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": "356501383558845"}));
        let order = NewOrder::limit(
            100_009,
            "btcusdt",
            OrderSide::Buy,
            Decimal::new(1, 2),
            Decimal::new(30_000, 0),
        );
        let id = Order::new(&rest).place_order(&order).await.unwrap();
        assert_eq!(id, "356501383558845");

        let call = rest.last_call();
        assert_eq!(call.endpoint, "/v1/order/orders/place");
        assert!(call.authenticated);
        let body = call.body.unwrap();
        assert_eq!(body["type"], "buy-limit");
        assert_eq!(body["source"], "spot-api");
    }

    #[tokio::test]
    async fn test_invalid_order_never_sent() {
        let rest = MockRest::new();
        let order = NewOrder::new(1, "btcusdt", OrderType::SellLimit, Decimal::ONE);
        let err = Order::new(&rest).place_order(&order).await.unwrap_err();
        assert!(matches!(err, ExchangeError::ValidationError(_)));
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_limits() {
        let rest = MockRest::new();
        let order = Order::new(&rest);
        assert!(order.place_batch_orders(&[]).await.is_err());
        let many = vec![NewOrder::market(1, "btcusdt", OrderSide::Buy, Decimal::ONE); 11];
        assert!(order.place_batch_orders(&many).await.is_err());
        assert!(order.cancel_orders(&[], &[]).await.is_err());
        assert!(order.fee_rates(&[]).await.is_err());
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_orders_body() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": {"success": ["5"], "failed": []}}));
        Order::new(&rest).cancel_orders(&[5, 6], &[]).await.unwrap();
        let body = rest.last_call().body.unwrap();
        assert_eq!(body, json!({"order-ids": ["5", "6"]}));
    }

    #[tokio::test]
    async fn test_cancel_order_path() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": "59378"}));
        let id = Order::new(&rest).cancel_order(59378, Some("btcusdt")).await.unwrap();
        assert_eq!(id, "59378");
        let call = rest.last_call();
        assert_eq!(call.endpoint, "/v1/order/orders/59378/submitcancel");
        assert_eq!(call.body.unwrap()["symbol"], "btcusdt");
    }

    #[tokio::test]
    async fn test_past_orders_joins_states() {
        let rest = MockRest::new().respond(json!({"status": "ok", "data": []}));
        let query = PastOrdersQuery::new("btcusdt", &["filled", "canceled"]);
        Order::new(&rest).past_orders(&query).await.unwrap();
        let call = rest.last_call();
        assert_eq!(call.param("states"), Some("filled,canceled"));
        assert_eq!(call.param("types"), None);
    }
}
