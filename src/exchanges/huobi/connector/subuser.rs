use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::{
    ApiKeyPermission, DeductMode, LockSubUserAction, MarginAccountActivation,
    MarginAccountType, SubUserTransferType,
};
use crate::exchanges::huobi::requests::{SubUserCreation, SubUserDepositQuery};
use crate::exchanges::huobi::rest::{to_body, HuobiRest, Params};
use crate::exchanges::huobi::types::Page;
use crate::exchanges::huobi::validation::{
    ensure_non_empty_list, ensure_not_empty, ensure_positive,
};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use tracing::instrument;

/// Sub-user management of a parent account
pub struct SubUser<R: RestClient> {
    rest: HuobiRest<R>,
}

impl<R: RestClient> SubUser<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
        }
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn set_deduct_mode(
        &self,
        sub_uids: &[u64],
        mode: DeductMode,
    ) -> Result<Value, ExchangeError> {
        ensure_non_empty_list("subUids", sub_uids)?;
        let body = json!({ "subUids": join(sub_uids), "deductMode": mode });
        self.rest.post("/v2/sub-user/deduct-mode", &body).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn api_keys(
        &self,
        uid: u64,
        access_key: Option<&str>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .push("uid", uid)
            .push_opt("accessKey", access_key);
        self.rest.get("/v2/user/api-key", &params, true).await
    }

    /// UID of the calling user
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn uid(&self) -> Result<u64, ExchangeError> {
        self.rest.get("/v2/user/uid", &Params::new(), true).await
    }

    #[instrument(skip(self, request), fields(exchange = "huobi"))]
    pub async fn create(&self, request: &SubUserCreation) -> Result<Value, ExchangeError> {
        request.validate()?;
        self.rest
            .post("/v2/sub-user/creation", &to_body(request)?)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn list(&self, from_id: Option<u64>) -> Result<Page<Value>, ExchangeError> {
        self.rest
            .get_page(
                "/v2/sub-user/user-list",
                &Params::new().push_opt("fromId", from_id),
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn set_lock(
        &self,
        sub_uid: u64,
        action: LockSubUserAction,
    ) -> Result<Value, ExchangeError> {
        self.rest
            .post(
                "/v2/sub-user/management",
                &json!({ "subUid": sub_uid, "action": action }),
            )
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn status(&self, sub_uid: u64) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v2/sub-user/user-state",
                &Params::new().push("subUid", sub_uid),
                true,
            )
            .await
    }

    /// Open or close a margin market for sub-users
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn set_tradable_market(
        &self,
        sub_uids: &[u64],
        account_type: MarginAccountType,
        activation: MarginAccountActivation,
    ) -> Result<Value, ExchangeError> {
        ensure_non_empty_list("subUids", sub_uids)?;
        let body = json!({
            "subUids": join(sub_uids),
            "accountType": account_type,
            "activation": activation,
        });
        self.rest
            .post("/v2/sub-user/tradable-market", &body)
            .await
    }

    /// Allow or forbid transfers out of the sub-users' spot accounts
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn set_transferability(
        &self,
        sub_uids: &[u64],
        transferrable: bool,
    ) -> Result<Value, ExchangeError> {
        ensure_non_empty_list("subUids", sub_uids)?;
        let body = json!({
            "subUids": join(sub_uids),
            "accountType": "spot",
            "transferrable": transferrable.to_string(),
        });
        self.rest
            .post("/v2/sub-user/transferability", &body)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn accounts(&self, sub_uid: u64) -> Result<Value, ExchangeError> {
        self.rest
            .get(
                "/v2/sub-user/account-list",
                &Params::new().push("subUid", sub_uid),
                true,
            )
            .await
    }

    /// Create an API key for a sub-user. Read permission is always granted.
    #[instrument(skip(self, otp_token), fields(exchange = "huobi"))]
    pub async fn create_api_key(
        &self,
        otp_token: Option<&str>,
        sub_uid: u64,
        note: &str,
        permissions: &[ApiKeyPermission],
        ip_addresses: &[&str],
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("note", note)?;
        let mut body = Map::new();
        if let Some(otp_token) = otp_token {
            body.insert("otpToken".to_string(), Value::from(otp_token));
        }
        body.insert("subUid".to_string(), json!(sub_uid));
        body.insert("note".to_string(), Value::from(note));
        body.insert(
            "permission".to_string(),
            Value::from(permission_list(permissions)),
        );
        if !ip_addresses.is_empty() {
            body.insert("ipAddresses".to_string(), Value::from(ip_addresses.join(",")));
        }
        self.rest
            .post("/v2/sub-user/api-key-generation", &Value::Object(body))
            .await
    }

    /// Change note, permissions or IP whitelist of a sub-user API key;
    /// `None` and empty slices leave the field unchanged.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn modify_api_key(
        &self,
        sub_uid: u64,
        access_key: &str,
        note: Option<&str>,
        permissions: &[ApiKeyPermission],
        ip_addresses: &[&str],
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("accessKey", access_key)?;
        let mut body = Map::new();
        body.insert("subUid".to_string(), json!(sub_uid));
        body.insert("accessKey".to_string(), Value::from(access_key));
        if let Some(note) = note {
            body.insert("note".to_string(), Value::from(note));
        }
        if !permissions.is_empty() {
            body.insert(
                "permission".to_string(),
                Value::from(permission_list(permissions)),
            );
        }
        if !ip_addresses.is_empty() {
            body.insert("ipAddresses".to_string(), Value::from(ip_addresses.join(",")));
        }
        self.rest
            .post("/v2/sub-user/api-key-modification", &Value::Object(body))
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn delete_api_key(
        &self,
        sub_uid: u64,
        access_key: &str,
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("accessKey", access_key)?;
        self.rest
            .post(
                "/v2/sub-user/api-key-deletion",
                &json!({ "subUid": sub_uid, "accessKey": access_key }),
            )
            .await
    }

    /// Transfer between the parent and a sub-user; returns the transfer id.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn transfer(
        &self,
        sub_uid: u64,
        currency: &str,
        amount: Decimal,
        transfer_type: SubUserTransferType,
    ) -> Result<u64, ExchangeError> {
        ensure_not_empty("currency", currency)?;
        ensure_positive("amount", amount)?;
        let body = json!({
            "sub-uid": sub_uid,
            "currency": currency,
            "amount": amount.to_string(),
            "type": transfer_type,
        });
        self.rest.post("/v1/subuser/transfer", &body).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn deposit_address(
        &self,
        sub_uid: u64,
        currency: &str,
    ) -> Result<Value, ExchangeError> {
        ensure_not_empty("currency", currency)?;
        let params = Params::new()
            .push("subUid", sub_uid)
            .push("currency", currency);
        self.rest
            .get("/v2/sub-user/deposit-address", &params, true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn deposit_history(
        &self,
        query: &SubUserDepositQuery,
    ) -> Result<Page<Value>, ExchangeError> {
        query.validate()?;
        self.rest
            .get_page("/v2/sub-user/query-deposit", &query.to_params())
            .await
    }

    /// Balances of all sub-users summed per currency
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn aggregate_balance(&self) -> Result<Value, ExchangeError> {
        self.rest
            .get("/v1/subuser/aggregate-balance", &Params::new(), true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn balance(&self, sub_uid: u64) -> Result<Value, ExchangeError> {
        let endpoint = format!("/v1/account/accounts/{}", sub_uid);
        self.rest.get(&endpoint, &Params::new(), true).await
    }
}

fn join(values: &[u64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// `readOnly` first, then the requested permissions without duplicates.
fn permission_list(permissions: &[ApiKeyPermission]) -> String {
    let mut list = vec![ApiKeyPermission::ReadOnly];
    for permission in permissions {
        if !list.contains(permission) {
            list.push(*permission);
        }
    }
    list.iter()
        .map(ApiKeyPermission::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
