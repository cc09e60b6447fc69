use serde::{Deserialize, Serialize};
use std::fmt;

/// Implements `as_str` and `Display` from the same wire strings the serde
/// attributes use, so query parameters and JSON bodies never disagree.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Candlestick period accepted by `/market/history/kline` and `market.*.kline.*` topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandleInterval {
    #[serde(rename = "1min")]
    Min1,
    #[serde(rename = "5min")]
    Min5,
    #[serde(rename = "15min")]
    Min15,
    #[serde(rename = "30min")]
    Min30,
    #[serde(rename = "60min")]
    Min60,
    #[serde(rename = "4hour")]
    Hour4,
    #[serde(rename = "1day")]
    Day1,
    #[serde(rename = "1mon")]
    Mon1,
    #[serde(rename = "1week")]
    Week1,
    #[serde(rename = "1year")]
    Year1,
}

wire_enum!(CandleInterval {
    Min1 => "1min",
    Min5 => "5min",
    Min15 => "15min",
    Min30 => "30min",
    Min60 => "60min",
    Hour4 => "4hour",
    Day1 => "1day",
    Mon1 => "1mon",
    Week1 => "1week",
    Year1 => "1year",
});

/// Price aggregation step for order book requests and depth topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DepthLevel {
    #[default]
    Step0,
    Step1,
    Step2,
    Step3,
    Step4,
    Step5,
}

wire_enum!(DepthLevel {
    Step0 => "step0",
    Step1 => "step1",
    Step2 => "step2",
    Step3 => "step3",
    Step4 => "step4",
    Step5 => "step5",
});

/// Number of price levels returned by `/market/depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarketDepth {
    Depth5,
    Depth10,
    #[default]
    Depth20,
}

impl MarketDepth {
    pub const fn value(self) -> u32 {
        match self {
            Self::Depth5 => 5,
            Self::Depth10 => 10,
            Self::Depth20 => 20,
        }
    }
}

/// Numeric account type used by the valuation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountTypeCode {
    Spot = 1,
    Isolated = 2,
    Cross = 3,
    CoinFutures = 4,
    Flat = 5,
    Minepool = 6,
    CoinSwaps = 7,
    Investment = 8,
    Borrow = 9,
    Earn = 10,
    UsdtSwaps = 11,
    Option = 12,
    OtcOptions = 13,
    CryptoLoans = 14,
    GridTrading = 15,
}

impl AccountTypeCode {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    BuyMarket,
    SellMarket,
    BuyLimit,
    SellLimit,
    BuyIoc,
    SellIoc,
    BuyLimitMaker,
    SellLimitMaker,
    BuyStopLimit,
    SellStopLimit,
    BuyLimitFok,
    SellLimitFok,
    BuyStopLimitFok,
    SellStopLimitFok,
}

wire_enum!(OrderType {
    BuyMarket => "buy-market",
    SellMarket => "sell-market",
    BuyLimit => "buy-limit",
    SellLimit => "sell-limit",
    BuyIoc => "buy-ioc",
    SellIoc => "sell-ioc",
    BuyLimitMaker => "buy-limit-maker",
    SellLimitMaker => "sell-limit-maker",
    BuyStopLimit => "buy-stop-limit",
    SellStopLimit => "sell-stop-limit",
    BuyLimitFok => "buy-limit-fok",
    SellLimitFok => "sell-limit-fok",
    BuyStopLimitFok => "buy-stop-limit-fok",
    SellStopLimitFok => "sell-stop-limit-fok",
});

impl OrderType {
    /// Market orders are the only types that are sent without a price.
    pub const fn requires_price(self) -> bool {
        !matches!(self, Self::BuyMarket | Self::SellMarket)
    }

    pub const fn is_stop(self) -> bool {
        matches!(
            self,
            Self::BuyStopLimit | Self::SellStopLimit | Self::BuyStopLimitFok | Self::SellStopLimitFok
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

wire_enum!(OrderSide {
    Buy => "buy",
    Sell => "sell",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderSource {
    #[default]
    SpotApi,
    MarginApi,
    SuperMarginApi,
    C2cMarginApi,
}

wire_enum!(OrderSource {
    SpotApi => "spot-api",
    MarginApi => "margin-api",
    SuperMarginApi => "super-margin-api",
    C2cMarginApi => "c2c-margin-api",
});

/// Comparison applied to the stop price of a stop-limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopPriceOperator {
    Gte,
    Lte,
}

wire_enum!(StopPriceOperator {
    Gte => "gte",
    Lte => "lte",
});

/// Paging direction relative to a `from` cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direct {
    #[default]
    Next,
    Prev,
}

wire_enum!(Direct {
    Next => "next",
    Prev => "prev",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    Asc,
    Desc,
}

wire_enum!(Sort {
    Asc => "asc",
    Desc => "desc",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionalOrderType {
    Limit,
    Market,
}

wire_enum!(ConditionalOrderType {
    Limit => "limit",
    Market => "market",
});

/// Final states accepted by the conditional order history search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionalOrderStatus {
    Canceled,
    Rejected,
    Triggered,
}

wire_enum!(ConditionalOrderStatus {
    Canceled => "canceled",
    Rejected => "rejected",
    Triggered => "triggered",
});

impl std::str::FromStr for ConditionalOrderStatus {
    type Err = crate::core::errors::ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "canceled" => Ok(Self::Canceled),
            "rejected" => Ok(Self::Rejected),
            "triggered" => Ok(Self::Triggered),
            other => Err(crate::core::errors::ExchangeError::validation(format!(
                "Wrong order status \"{}\"",
                other
            ))),
        }
    }
}

/// Which party pays fees for sub-user trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductMode {
    Master,
    Sub,
}

wire_enum!(DeductMode {
    Master => "master",
    Sub => "sub",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarginAccountType {
    IsolatedMargin,
    CrossMargin,
}

wire_enum!(MarginAccountType {
    IsolatedMargin => "isolated-margin",
    CrossMargin => "cross-margin",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginAccountActivation {
    Activated,
    Deactivated,
}

wire_enum!(MarginAccountActivation {
    Activated => "activated",
    Deactivated => "deactivated",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockSubUserAction {
    Lock,
    Unlock,
}

wire_enum!(LockSubUserAction {
    Lock => "lock",
    Unlock => "unlock",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiKeyPermission {
    #[serde(rename = "readOnly")]
    ReadOnly,
    #[serde(rename = "trade")]
    Trade,
}

wire_enum!(ApiKeyPermission {
    ReadOnly => "readOnly",
    Trade => "trade",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubUserTransferType {
    MasterTransferIn,
    MasterTransferOut,
    MasterPointTransferIn,
    MasterPointTransferOut,
}

wire_enum!(SubUserTransferType {
    MasterTransferIn => "master-transfer-in",
    MasterTransferOut => "master-transfer-out",
    MasterPointTransferIn => "master-point-transfer-in",
    MasterPointTransferOut => "master-point-transfer-out",
});

/// Direction of a spot/futures transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FuturesTransferType {
    FuturesToPro,
    ProToFutures,
}

wire_enum!(FuturesTransferType {
    FuturesToPro => "futures-to-pro",
    ProToFutures => "pro-to-futures",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositWithdrawType {
    Deposit,
    Withdraw,
}

wire_enum!(DepositWithdrawType {
    Deposit => "deposit",
    Withdraw => "withdraw",
});

/// Push mode of the `trade.clearing#{symbol}#{mode}` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TradeDetailMode {
    /// Trade events only
    #[default]
    TradeOnly = 0,
    /// Trade and cancellation events
    TradeAndCancellation = 1,
}

/// Push mode of the `accounts.update#{mode}` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccountChangeMode {
    /// Balance changes only
    #[default]
    Balance = 0,
    /// Balance and available balance changes
    BalanceAndAvailable = 1,
    /// Every change, carrying both balances
    All = 2,
}

impl TryFrom<u8> for AccountChangeMode {
    type Error = crate::core::errors::ExchangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Balance),
            1 => Ok(Self::BalanceAndAvailable),
            2 => Ok(Self::All),
            other => Err(crate::core::errors::ExchangeError::validation(format!(
                "Wrong mode value \"{}\"",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_match_serde() {
        assert_eq!(
            serde_json::to_string(&OrderType::BuyLimitMaker).unwrap(),
            format!("\"{}\"", OrderType::BuyLimitMaker.as_str())
        );
        assert_eq!(
            serde_json::to_string(&CandleInterval::Min60).unwrap(),
            "\"60min\""
        );
        assert_eq!(
            serde_json::to_string(&ApiKeyPermission::ReadOnly).unwrap(),
            "\"readOnly\""
        );
        assert_eq!(
            serde_json::to_string(&SubUserTransferType::MasterPointTransferOut).unwrap(),
            format!("\"{}\"", SubUserTransferType::MasterPointTransferOut)
        );
        assert_eq!(OrderSource::default().as_str(), "spot-api");
        assert_eq!(DepthLevel::Step3.to_string(), "step3");
    }

    #[test]
    fn test_order_type_price_rules() {
        assert!(!OrderType::BuyMarket.requires_price());
        assert!(OrderType::SellLimitFok.requires_price());
        assert!(OrderType::BuyStopLimit.is_stop());
        assert!(!OrderType::BuyIoc.is_stop());
    }

    #[test]
    fn test_account_change_mode_range() {
        assert_eq!(AccountChangeMode::try_from(2).unwrap(), AccountChangeMode::All);
        assert!(AccountChangeMode::try_from(3).is_err());
    }

    #[test]
    fn test_conditional_status_parse() {
        assert_eq!(
            "triggered".parse::<ConditionalOrderStatus>().unwrap(),
            ConditionalOrderStatus::Triggered
        );
        assert!("filled".parse::<ConditionalOrderStatus>().is_err());
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(AccountTypeCode::GridTrading.code(), 15);
        assert_eq!(MarketDepth::Depth5.value(), 5);
    }
}
