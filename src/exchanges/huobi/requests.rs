use crate::core::errors::ExchangeError;
use crate::core::types::{
    ConditionalOrderStatus, ConditionalOrderType, DepositWithdrawType, Direct, OrderSide,
    OrderSource, OrderType, Sort, StopPriceOperator,
};
use crate::exchanges::huobi::rest::Params;
use crate::exchanges::huobi::validation::{
    ensure_non_empty_list, ensure_not_empty, ensure_positive, ensure_range, ensure_symbol,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spot order accepted by `/v1/order/orders/place` and `/v1/order/batch-orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(rename = "account-id")]
    pub account_id: u64,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option",
        default
    )]
    pub price: Option<Decimal>,
    pub source: OrderSource,
    #[serde(rename = "client-order-id", skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(rename = "self-match-prevent")]
    pub self_match_prevent: u8,
    #[serde(
        rename = "stop-price",
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option",
        default
    )]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<StopPriceOperator>,
}

impl NewOrder {
    pub fn new(account_id: u64, symbol: impl Into<String>, order_type: OrderType, amount: Decimal) -> Self {
        Self {
            account_id,
            symbol: symbol.into(),
            order_type,
            amount,
            price: None,
            source: OrderSource::default(),
            client_order_id: None,
            self_match_prevent: 0,
            stop_price: None,
            operator: None,
        }
    }

    pub fn limit(
        account_id: u64,
        symbol: impl Into<String>,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        let order_type = match side {
            OrderSide::Buy => OrderType::BuyLimit,
            OrderSide::Sell => OrderType::SellLimit,
        };
        Self::new(account_id, symbol, order_type, amount).with_price(price)
    }

    pub fn market(account_id: u64, symbol: impl Into<String>, side: OrderSide, amount: Decimal) -> Self {
        let order_type = match side {
            OrderSide::Buy => OrderType::BuyMarket,
            OrderSide::Sell => OrderType::SellMarket,
        };
        Self::new(account_id, symbol, order_type, amount)
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_source(mut self, source: OrderSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }

    pub fn with_self_match_prevent(mut self, enabled: bool) -> Self {
        self.self_match_prevent = u8::from(enabled);
        self
    }

    pub fn with_stop(mut self, stop_price: Decimal, operator: StopPriceOperator) -> Self {
        self.stop_price = Some(stop_price);
        self.operator = Some(operator);
        self
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_symbol(&self.symbol)?;
        ensure_positive("amount", self.amount)?;
        match self.price {
            Some(price) => ensure_positive("price", price)?,
            None if self.order_type.requires_price() => {
                return Err(ExchangeError::validation(format!(
                    "price is required for {} orders",
                    self.order_type
                )))
            }
            None => {}
        }
        if self.order_type.is_stop() {
            let stop_price = self.stop_price.ok_or_else(|| {
                ExchangeError::validation(format!(
                    "stop-price is required for {} orders",
                    self.order_type
                ))
            })?;
            ensure_positive("stop-price", stop_price)?;
            if self.operator.is_none() {
                return Err(ExchangeError::validation(format!(
                    "operator is required for {} orders",
                    self.order_type
                )));
            }
        }
        Ok(())
    }
}

/// Body of `/v1/order/orders/batchCancelOpenOrders`
#[derive(Debug, Clone, Serialize)]
pub struct BatchCancelOpenOrders {
    #[serde(rename = "account-id", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(rename = "symbol", skip_serializing_if = "Option::is_none")]
    pub symbols: Option<String>,
    #[serde(rename = "types", skip_serializing_if = "Option::is_none")]
    pub order_types: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    pub size: u32,
}

impl Default for BatchCancelOpenOrders {
    fn default() -> Self {
        Self {
            account_id: None,
            symbols: None,
            order_types: None,
            side: None,
            size: 100,
        }
    }
}

impl BatchCancelOpenOrders {
    pub fn with_account_id(mut self, account_id: u64) -> Self {
        self.account_id = Some(account_id.to_string());
        self
    }

    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        self.symbols = (!symbols.is_empty()).then(|| symbols.join(","));
        self
    }

    pub fn with_order_types(mut self, order_types: &[OrderType]) -> Self {
        self.order_types = (!order_types.is_empty()).then(|| {
            order_types
                .iter()
                .map(OrderType::as_str)
                .collect::<Vec<_>>()
                .join(",")
        });
        self
    }

    pub fn with_side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("size", self.size, 1..=100)
    }
}

/// Transfer between accounts or users, `/v1/account/transfer`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetTransfer {
    #[serde(rename = "from-user")]
    pub from_user: u64,
    #[serde(rename = "from-account-type")]
    pub from_account_type: String,
    #[serde(rename = "from-account")]
    pub from_account: u64,
    #[serde(rename = "to-user")]
    pub to_user: u64,
    #[serde(rename = "to-account-type")]
    pub to_account_type: String,
    #[serde(rename = "to-account")]
    pub to_account: u64,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl AssetTransfer {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_not_empty("currency", &self.currency)?;
        ensure_not_empty("from-account-type", &self.from_account_type)?;
        ensure_not_empty("to-account-type", &self.to_account_type)?;
        ensure_positive("amount", self.amount)
    }
}

/// `/v1/dw/withdraw/api/create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawRequest {
    pub address: String,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::str_option")]
    pub fee: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(rename = "addr-tag", skip_serializing_if = "Option::is_none")]
    pub addr_tag: Option<String>,
    #[serde(rename = "client-order-id", skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl WithdrawRequest {
    pub fn new(address: impl Into<String>, currency: impl Into<String>, amount: Decimal) -> Self {
        Self {
            address: address.into(),
            currency: currency.into(),
            amount,
            fee: None,
            chain: None,
            addr_tag: None,
            client_order_id: None,
        }
    }

    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub fn with_addr_tag(mut self, tag: impl Into<String>) -> Self {
        self.addr_tag = Some(tag.into());
        self
    }

    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_not_empty("address", &self.address)?;
        ensure_not_empty("currency", &self.currency)?;
        ensure_positive("amount", self.amount)
    }
}

/// `/v2/algo-orders`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalOrder {
    pub account_id: u64,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::str_option")]
    pub order_price: Option<Decimal>,
    pub order_side: OrderSide,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::str_option")]
    pub order_size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::str_option")]
    pub order_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>,
    pub order_type: ConditionalOrderType,
    pub client_order_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub stop_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::str_option")]
    pub trailing_rate: Option<Decimal>,
}

impl ConditionalOrder {
    pub fn new(
        account_id: u64,
        symbol: impl Into<String>,
        order_side: OrderSide,
        order_type: ConditionalOrderType,
        client_order_id: impl Into<String>,
        stop_price: Decimal,
    ) -> Self {
        Self {
            account_id,
            symbol: symbol.into(),
            order_price: None,
            order_side,
            order_size: None,
            order_value: None,
            time_in_force: None,
            order_type,
            client_order_id: client_order_id.into(),
            stop_price,
            trailing_rate: None,
        }
    }

    pub fn with_order_price(mut self, price: Decimal) -> Self {
        self.order_price = Some(price);
        self
    }

    pub fn with_order_size(mut self, size: Decimal) -> Self {
        self.order_size = Some(size);
        self
    }

    pub fn with_order_value(mut self, value: Decimal) -> Self {
        self.order_value = Some(value);
        self
    }

    pub fn with_time_in_force(mut self, tif: impl Into<String>) -> Self {
        self.time_in_force = Some(tif.into());
        self
    }

    pub fn with_trailing_rate(mut self, rate: Decimal) -> Self {
        self.trailing_rate = Some(rate);
        self
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_symbol(&self.symbol)?;
        ensure_not_empty("clientOrderId", &self.client_order_id)?;
        ensure_positive("stopPrice", self.stop_price)?;
        if self.order_type == ConditionalOrderType::Limit && self.order_price.is_none() {
            return Err(ExchangeError::validation(
                "orderPrice is required for limit conditional orders",
            ));
        }
        if self.order_size.is_none() && self.order_value.is_none() {
            return Err(ExchangeError::validation(
                "either orderSize or orderValue is required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubUser {
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// `/v2/sub-user/creation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubUserCreation {
    pub user_list: Vec<SubUser>,
}

impl SubUserCreation {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_non_empty_list("userList", &self.user_list)?;
        for user in &self.user_list {
            ensure_not_empty("userName", &user.user_name)?;
        }
        Ok(())
    }
}

/// Query of `/v1/account/history`
#[derive(Debug, Clone)]
pub struct AccountHistoryQuery {
    pub account_id: u64,
    pub currency: Option<String>,
    pub transact_types: Vec<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub sort: Sort,
    pub size: u32,
    pub from_id: Option<u64>,
}

impl AccountHistoryQuery {
    pub fn new(account_id: u64) -> Self {
        Self {
            account_id,
            currency: None,
            transact_types: Vec::new(),
            start_time: None,
            end_time: None,
            sort: Sort::Asc,
            size: 100,
            from_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("size", self.size, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("account-id", self.account_id)
            .push_opt("currency", self.currency.as_deref())
            .push_list("transact-types", &self.transact_types)
            .push_opt("start-time", self.start_time)
            .push_opt("end-time", self.end_time)
            .push("sort", self.sort)
            .push("size", self.size)
            .push_opt("from-id", self.from_id)
    }
}

/// Query of `/v2/account/ledger`
#[derive(Debug, Clone)]
pub struct LedgerQuery {
    pub account_id: u64,
    pub currency: Option<String>,
    pub transact_types: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub sort: Sort,
    pub limit: u32,
    pub from_id: Option<u64>,
}

impl LedgerQuery {
    pub fn new(account_id: u64) -> Self {
        Self {
            account_id,
            currency: None,
            transact_types: None,
            start_time: None,
            end_time: None,
            sort: Sort::Asc,
            limit: 100,
            from_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("limit", self.limit, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("accountId", self.account_id)
            .push_opt("currency", self.currency.as_deref())
            .push_opt("transactTypes", self.transact_types.as_deref())
            .push_opt("startTime", self.start_time)
            .push_opt("endTime", self.end_time)
            .push("sort", self.sort)
            .push("limit", self.limit)
            .push_opt("fromId", self.from_id)
    }
}

/// Query of `/v2/account/withdraw/address`
#[derive(Debug, Clone)]
pub struct WithdrawAddressQuery {
    pub currency: String,
    pub chain: Option<String>,
    pub note: Option<String>,
    pub limit: u32,
    pub from_id: Option<u64>,
}

impl WithdrawAddressQuery {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            chain: None,
            note: None,
            limit: 100,
            from_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_not_empty("currency", &self.currency)?;
        ensure_range("limit", self.limit, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("currency", &self.currency)
            .push_opt("chain", self.chain.as_deref())
            .push_opt("note", self.note.as_deref())
            .push("limit", self.limit)
            .push_opt("fromId", self.from_id)
    }
}

/// Query of `/v1/query/deposit-withdraw`
#[derive(Debug, Clone)]
pub struct DepositWithdrawQuery {
    pub transfer_type: DepositWithdrawType,
    pub currency: Option<String>,
    pub from: Option<String>,
    pub size: u32,
    pub direct: Direct,
}

impl DepositWithdrawQuery {
    pub fn new(transfer_type: DepositWithdrawType) -> Self {
        Self {
            transfer_type,
            currency: None,
            from: None,
            size: 100,
            direct: Direct::Prev,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("size", self.size, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("type", self.transfer_type)
            .push_opt("currency", self.currency.as_deref())
            .push_opt("from", self.from.as_deref())
            .push("size", self.size)
            .push("direct", self.direct)
    }
}

/// Query of `/v1/order/openOrders`
#[derive(Debug, Clone)]
pub struct OpenOrdersQuery {
    pub account_id: Option<u64>,
    pub symbol: Option<String>,
    pub side: Option<OrderSide>,
    pub from: Option<String>,
    pub direct: Option<Direct>,
    pub size: u32,
}

impl Default for OpenOrdersQuery {
    fn default() -> Self {
        Self {
            account_id: None,
            symbol: None,
            side: None,
            from: None,
            direct: None,
            size: 100,
        }
    }
}

impl OpenOrdersQuery {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("size", self.size, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push_opt("account-id", self.account_id)
            .push_opt("symbol", self.symbol.as_deref())
            .push_opt("side", self.side)
            .push_opt("from", self.from.as_deref())
            .push_opt("direct", self.direct)
            .push("size", self.size)
    }
}

/// Query of `/v1/order/orders`
#[derive(Debug, Clone)]
pub struct PastOrdersQuery {
    pub symbol: String,
    pub states: Vec<String>,
    pub order_types: Vec<OrderType>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub from: Option<String>,
    pub size: u32,
    pub direct: Option<Direct>,
}

impl PastOrdersQuery {
    pub fn new(symbol: impl Into<String>, states: &[&str]) -> Self {
        Self {
            symbol: symbol.into(),
            states: states.iter().map(|s| (*s).to_string()).collect(),
            order_types: Vec::new(),
            start_time: None,
            end_time: None,
            from: None,
            size: 100,
            direct: None,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_symbol(&self.symbol)?;
        ensure_non_empty_list("states", &self.states)?;
        ensure_range("size", self.size, 1..=100)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("symbol", &self.symbol)
            .push_list("states", &self.states)
            .push_list("types", &self.order_types)
            .push_opt("start-time", self.start_time)
            .push_opt("end-time", self.end_time)
            .push_opt("from", self.from.as_deref())
            .push("size", self.size)
            .push_opt("direct", self.direct)
    }
}

/// Query of `/v1/order/history` (last 48 hours)
#[derive(Debug, Clone)]
pub struct RecentHistoryQuery {
    pub symbol: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub direct: Direct,
    pub size: u32,
}

impl Default for RecentHistoryQuery {
    fn default() -> Self {
        Self {
            symbol: None,
            start_time: None,
            end_time: None,
            direct: Direct::Next,
            size: 100,
        }
    }
}

impl RecentHistoryQuery {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("size", self.size, 10..=1000)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push_opt("symbol", self.symbol.as_deref())
            .push_opt("start-time", self.start_time)
            .push_opt("end-time", self.end_time)
            .push("direct", self.direct)
            .push("size", self.size)
    }
}

/// Query of `/v1/order/matchresults`
#[derive(Debug, Clone)]
pub struct MatchResultsQuery {
    pub symbol: String,
    pub order_types: Vec<OrderType>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub from: Option<String>,
    pub size: u32,
    pub direct: Direct,
}

impl MatchResultsQuery {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            order_types: Vec::new(),
            start_time: None,
            end_time: None,
            from: None,
            size: 100,
            direct: Direct::Next,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_symbol(&self.symbol)?;
        ensure_range("size", self.size, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("symbol", &self.symbol)
            .push_list("types", &self.order_types)
            .push_opt("start-time", self.start_time)
            .push_opt("end-time", self.end_time)
            .push_opt("from", self.from.as_deref())
            .push("size", self.size)
            .push("direct", self.direct)
    }
}

/// Query of `/v1/margin/loan-orders`
#[derive(Debug, Clone)]
pub struct IsolatedLoanOrdersQuery {
    pub symbol: String,
    pub states: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub from: Option<String>,
    pub direct: Option<Direct>,
    pub size: u32,
    pub sub_uid: Option<u64>,
}

impl IsolatedLoanOrdersQuery {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            states: Vec::new(),
            start_date: None,
            end_date: None,
            from: None,
            direct: None,
            size: 100,
            sub_uid: None,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_symbol(&self.symbol)?;
        ensure_range("size", self.size, 1..=100)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("symbol", &self.symbol)
            .push_list("states", &self.states)
            .push_opt("start-date", self.start_date)
            .push_opt("end-date", self.end_date)
            .push_opt("from", self.from.as_deref())
            .push_opt("direct", self.direct)
            .push("size", self.size)
            .push_opt("sub-uid", self.sub_uid)
    }
}

/// Query of `/v1/cross-margin/loan-orders`
#[derive(Debug, Clone)]
pub struct CrossLoanOrdersQuery {
    pub currency: Option<String>,
    pub state: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub from: Option<String>,
    pub direct: Option<Direct>,
    pub size: u32,
    pub sub_uid: Option<u64>,
}

impl Default for CrossLoanOrdersQuery {
    fn default() -> Self {
        Self {
            currency: None,
            state: None,
            start_date: None,
            end_date: None,
            from: None,
            direct: None,
            size: 10,
            sub_uid: None,
        }
    }
}

impl CrossLoanOrdersQuery {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("size", self.size, 10..=100)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push_opt("currency", self.currency.as_deref())
            .push_opt("state", self.state.as_deref())
            .push_opt("start-date", self.start_date)
            .push_opt("end-date", self.end_date)
            .push_opt("from", self.from.as_deref())
            .push_opt("direct", self.direct)
            .push("size", self.size)
            .push_opt("sub-uid", self.sub_uid)
    }
}

/// Query of `GET /v2/account/repayment`
#[derive(Debug, Clone)]
pub struct RepaymentQuery {
    pub repay_id: Option<u64>,
    pub account_id: Option<u64>,
    pub currency: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub sort: Sort,
    pub limit: u32,
    pub from_id: Option<u64>,
}

impl Default for RepaymentQuery {
    fn default() -> Self {
        Self {
            repay_id: None,
            account_id: None,
            currency: None,
            start_time: None,
            end_time: None,
            sort: Sort::Desc,
            limit: 50,
            from_id: None,
        }
    }
}

impl RepaymentQuery {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("limit", self.limit, 1..=100)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push_opt("repayId", self.repay_id)
            .push_opt("accountId", self.account_id)
            .push_opt("currency", self.currency.as_deref())
            .push_opt("startTime", self.start_time)
            .push_opt("endTime", self.end_time)
            .push("sort", self.sort)
            .push("limit", self.limit)
            .push_opt("fromId", self.from_id)
    }
}

/// Query of `/v2/sub-user/query-deposit`
#[derive(Debug, Clone)]
pub struct SubUserDepositQuery {
    pub sub_uid: u64,
    pub currency: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub sort: Sort,
    pub limit: u32,
    pub from_id: Option<u64>,
}

impl SubUserDepositQuery {
    pub fn new(sub_uid: u64) -> Self {
        Self {
            sub_uid,
            currency: None,
            start_time: None,
            end_time: None,
            sort: Sort::Asc,
            limit: 100,
            from_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("limit", self.limit, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("subUid", self.sub_uid)
            .push_opt("currency", self.currency.as_deref())
            .push_opt("startTime", self.start_time)
            .push_opt("endTime", self.end_time)
            .push("sort", self.sort)
            .push("limit", self.limit)
            .push_opt("fromId", self.from_id)
    }
}

/// Query of `/v2/algo-orders/opening`
#[derive(Debug, Clone)]
pub struct OpenConditionalOrdersQuery {
    pub account_id: Option<u64>,
    pub symbol: Option<String>,
    pub order_side: Option<OrderSide>,
    pub order_type: Option<ConditionalOrderType>,
    pub sort: Sort,
    pub limit: u32,
    pub from_id: Option<u64>,
}

impl Default for OpenConditionalOrdersQuery {
    fn default() -> Self {
        Self {
            account_id: None,
            symbol: None,
            order_side: None,
            order_type: None,
            sort: Sort::Desc,
            limit: 100,
            from_id: None,
        }
    }
}

impl OpenConditionalOrdersQuery {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_range("limit", self.limit, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push_opt("accountId", self.account_id)
            .push_opt("symbol", self.symbol.as_deref())
            .push_opt("orderSide", self.order_side)
            .push_opt("orderType", self.order_type)
            .push("sort", self.sort)
            .push("limit", self.limit)
            .push_opt("fromId", self.from_id)
    }
}

/// Query of `/v2/algo-orders/history`
#[derive(Debug, Clone)]
pub struct ConditionalOrderHistoryQuery {
    pub symbol: String,
    pub order_status: ConditionalOrderStatus,
    pub account_id: Option<u64>,
    pub order_side: Option<OrderSide>,
    pub order_type: Option<ConditionalOrderType>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub sort: Sort,
    pub limit: u32,
    pub from_id: Option<u64>,
}

impl ConditionalOrderHistoryQuery {
    pub fn new(symbol: impl Into<String>, order_status: ConditionalOrderStatus) -> Self {
        Self {
            symbol: symbol.into(),
            order_status,
            account_id: None,
            order_side: None,
            order_type: None,
            start_time: None,
            end_time: None,
            sort: Sort::Desc,
            limit: 100,
            from_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        ensure_symbol(&self.symbol)?;
        ensure_range("limit", self.limit, 1..=500)
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .push("symbol", &self.symbol)
            .push("orderStatus", self.order_status)
            .push_opt("accountId", self.account_id)
            .push_opt("orderSide", self.order_side)
            .push_opt("orderType", self.order_type)
            .push_opt("startTime", self.start_time)
            .push_opt("endTime", self.end_time)
            .push("sort", self.sort)
            .push("limit", self.limit)
            .push_opt("fromId", self.from_id)
    }
}
