//! Shared enums and order configuration types
//!
//! Enum variants carry an explicit wire-string table (`as_str`) matching the
//! exchange's JSON schema. All prices and sizes are serialized as decimal
//! strings, never floats: the API requires string precision for financial
//! quantities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::query::DATE_FORMAT;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy order
    #[serde(rename = "BUY")]
    Buy,
    /// Sell order
    #[serde(rename = "SELL")]
    Sell,
}

impl Side {
    /// Returns the wire string used in paths and query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger direction for stop orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopDirection {
    /// Direction not specified
    #[serde(rename = "UNKNOWN_STOP_DIRECTION")]
    Unknown,
    /// Trigger when the price rises to the stop price
    #[serde(rename = "STOP_DIRECTION_STOP_UP")]
    Up,
    /// Trigger when the price falls to the stop price
    #[serde(rename = "STOP_DIRECTION_STOP_DOWN")]
    Down,
}

impl StopDirection {
    /// Returns the wire string used in order configurations
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN_STOP_DIRECTION",
            Self::Up => "STOP_DIRECTION_STOP_UP",
            Self::Down => "STOP_DIRECTION_STOP_DOWN",
        }
    }
}

impl std::fmt::Display for StopDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type filter for historical order queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Unknown order type
    #[serde(rename = "UNKNOWN_ORDER_TYPE")]
    Unknown,
    /// Market order
    #[serde(rename = "MARKET")]
    Market,
    /// Limit order
    #[serde(rename = "LIMIT")]
    Limit,
    /// Stop order
    #[serde(rename = "STOP")]
    Stop,
    /// Stop-limit order
    #[serde(rename = "STOP_LIMIT")]
    StopLimit,
}

impl OrderType {
    /// Returns the wire string used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN_ORDER_TYPE",
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::Stop => "STOP",
            Self::StopLimit => "STOP_LIMIT",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    /// Spot trading pair
    #[serde(rename = "SPOT")]
    Spot,
}

impl ProductType {
    /// Returns the wire string used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spot => "SPOT",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candle bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Unknown granularity
    #[serde(rename = "UNKNOWN_GRANULARITY")]
    Unknown,
    /// One-minute candles
    #[serde(rename = "ONE_MINUTE")]
    OneMinute,
    /// Five-minute candles
    #[serde(rename = "FIVE_MINUTE")]
    FiveMinute,
    /// Fifteen-minute candles
    #[serde(rename = "FIFTEEN_MINUTE")]
    FifteenMinute,
    /// Thirty-minute candles
    #[serde(rename = "THIRTY_MINUTE")]
    ThirtyMinute,
    /// One-hour candles
    #[serde(rename = "ONE_HOUR")]
    OneHour,
    /// Two-hour candles
    #[serde(rename = "TWO_HOUR")]
    TwoHour,
    /// Six-hour candles
    #[serde(rename = "SIX_HOUR")]
    SixHour,
    /// One-day candles
    #[serde(rename = "ONE_DAY")]
    OneDay,
}

impl Granularity {
    /// Returns the wire string used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN_GRANULARITY",
            Self::OneMinute => "ONE_MINUTE",
            Self::FiveMinute => "FIVE_MINUTE",
            Self::FifteenMinute => "FIFTEEN_MINUTE",
            Self::ThirtyMinute => "THIRTY_MINUTE",
            Self::OneHour => "ONE_HOUR",
            Self::TwoHour => "TWO_HOUR",
            Self::SixHour => "SIX_HOUR",
            Self::OneDay => "ONE_DAY",
        }
    }

    /// Bucket width in minutes (`None` for `Unknown`)
    pub fn minutes(&self) -> Option<u32> {
        match self {
            Self::Unknown => None,
            Self::OneMinute => Some(1),
            Self::FiveMinute => Some(5),
            Self::FifteenMinute => Some(15),
            Self::ThirtyMinute => Some(30),
            Self::OneHour => Some(60),
            Self::TwoHour => Some(120),
            Self::SixHour => Some(360),
            Self::OneDay => Some(1440),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Order Configuration
// ============================================================================

/// Nested order configuration object sent with order creation
///
/// Exactly one of the variant fields is populated; the key name encodes both
/// the order type and the expiration policy (good-till-canceled vs
/// good-till-date).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderConfiguration {
    /// Market immediate-or-cancel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_market_ioc: Option<MarketIoc>,
    /// Limit, good-till-canceled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_limit_gtc: Option<LimitGtc>,
    /// Limit, good-till-date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_limit_gtd: Option<LimitGtd>,
    /// Stop-limit, good-till-canceled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_limit_stop_limit_gtc: Option<StopLimitGtc>,
    /// Stop-limit, good-till-date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_limit_stop_limit_gtd: Option<StopLimitGtd>,
}

/// Market order parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketIoc {
    /// Amount of quote currency to spend (buys)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_size: Option<String>,
    /// Amount of base currency to sell (sells)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_size: Option<String>,
}

/// Limit order parameters, good-till-canceled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitGtc {
    /// Amount of base currency
    pub base_size: String,
    /// Ceiling (buy) or floor (sell) execution price
    pub limit_price: String,
    /// Only included when explicitly set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
}

/// Limit order parameters, good-till-date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitGtd {
    /// Amount of base currency
    pub base_size: String,
    /// Ceiling (buy) or floor (sell) execution price
    pub limit_price: String,
    /// Cancellation time, `%Y-%m-%dT%H:%M:%SZ`
    pub end_time: String,
    /// Only included when explicitly set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
}

/// Stop-limit order parameters, good-till-canceled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopLimitGtc {
    /// Amount of base currency
    pub base_size: String,
    /// Execution price once triggered
    pub limit_price: String,
    /// Trigger price
    pub stop_price: String,
    /// Trigger direction
    pub stop_direction: StopDirection,
}

/// Stop-limit order parameters, good-till-date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopLimitGtd {
    /// Amount of base currency
    pub base_size: String,
    /// Execution price once triggered
    pub limit_price: String,
    /// Trigger price
    pub stop_price: String,
    /// Trigger direction
    pub stop_direction: StopDirection,
    /// Cancellation time, `%Y-%m-%dT%H:%M:%SZ`
    pub end_time: String,
}

impl OrderConfiguration {
    /// Market buy: size is denominated in the quote currency
    pub fn market_buy(quote_size: Decimal) -> Self {
        Self {
            market_market_ioc: Some(MarketIoc {
                quote_size: Some(quote_size.to_string()),
                base_size: None,
            }),
            ..Self::default()
        }
    }

    /// Market sell: size is denominated in the base currency
    pub fn market_sell(base_size: Decimal) -> Self {
        Self {
            market_market_ioc: Some(MarketIoc {
                quote_size: None,
                base_size: Some(base_size.to_string()),
            }),
            ..Self::default()
        }
    }

    /// Limit order; good-till-date when `cancel_time` is given, else
    /// good-till-canceled. `post_only` is included only if explicitly set.
    pub fn limit(
        limit_price: Decimal,
        base_size: Decimal,
        cancel_time: Option<DateTime<Utc>>,
        post_only: Option<bool>,
    ) -> Self {
        match cancel_time {
            Some(end_time) => Self {
                limit_limit_gtd: Some(LimitGtd {
                    base_size: base_size.to_string(),
                    limit_price: limit_price.to_string(),
                    end_time: end_time.format(DATE_FORMAT).to_string(),
                    post_only,
                }),
                ..Self::default()
            },
            None => Self {
                limit_limit_gtc: Some(LimitGtc {
                    base_size: base_size.to_string(),
                    limit_price: limit_price.to_string(),
                    post_only,
                }),
                ..Self::default()
            },
        }
    }

    /// Stop-limit order; good-till-date when `cancel_time` is given, else
    /// good-till-canceled.
    pub fn stop_limit(
        stop_price: Decimal,
        stop_direction: StopDirection,
        limit_price: Decimal,
        base_size: Decimal,
        cancel_time: Option<DateTime<Utc>>,
    ) -> Self {
        match cancel_time {
            Some(end_time) => Self {
                stop_limit_stop_limit_gtd: Some(StopLimitGtd {
                    base_size: base_size.to_string(),
                    limit_price: limit_price.to_string(),
                    stop_price: stop_price.to_string(),
                    stop_direction,
                    end_time: end_time.format(DATE_FORMAT).to_string(),
                }),
                ..Self::default()
            },
            None => Self {
                stop_limit_stop_limit_gtc: Some(StopLimitGtc {
                    base_size: base_size.to_string(),
                    limit_price: limit_price.to_string(),
                    stop_price: stop_price.to_string(),
                    stop_direction,
                }),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_wire_strings() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        assert_eq!(Side::Sell.as_str(), "SELL");
    }

    #[test]
    fn test_stop_direction_down_wire_string() {
        assert_eq!(
            serde_json::to_string(&StopDirection::Down).unwrap(),
            "\"STOP_DIRECTION_STOP_DOWN\""
        );
    }

    #[test]
    fn test_granularity_minutes() {
        assert_eq!(Granularity::OneDay.minutes(), Some(1440));
        assert_eq!(Granularity::FiveMinute.minutes(), Some(5));
        assert_eq!(Granularity::Unknown.minutes(), None);
        assert_eq!(Granularity::OneHour.as_str(), "ONE_HOUR");
    }

    #[test]
    fn test_market_buy_uses_quote_size() {
        let config = OrderConfiguration::market_buy(dec!(100.50));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["market_market_ioc"]["quote_size"], "100.50");
        assert!(json["market_market_ioc"].get("base_size").is_none());
    }

    #[test]
    fn test_market_sell_uses_base_size() {
        let config = OrderConfiguration::market_sell(dec!(5));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["market_market_ioc"]["base_size"], "5");
        assert!(json["market_market_ioc"].get("quote_size").is_none());
    }

    #[test]
    fn test_limit_without_cancel_time_is_gtc() {
        let config = OrderConfiguration::limit(dec!(0.19), dec!(10), None, None);
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("limit_limit_gtc").is_some());
        assert!(json.get("limit_limit_gtd").is_none());
        assert_eq!(json["limit_limit_gtc"]["limit_price"], "0.19");
        assert_eq!(json["limit_limit_gtc"]["base_size"], "10");
        // post_only omitted unless explicitly set
        assert!(json["limit_limit_gtc"].get("post_only").is_none());
    }

    #[test]
    fn test_limit_with_cancel_time_is_gtd() {
        let cancel = Utc.with_ymd_and_hms(2023, 5, 9, 15, 0, 0).unwrap();
        let config = OrderConfiguration::limit(dec!(0.19), dec!(10), Some(cancel), Some(true));
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("limit_limit_gtc").is_none());
        assert_eq!(json["limit_limit_gtd"]["end_time"], "2023-05-09T15:00:00Z");
        assert_eq!(json["limit_limit_gtd"]["post_only"], true);
    }

    #[test]
    fn test_stop_limit_key_selection() {
        let gtc = OrderConfiguration::stop_limit(
            dec!(0.18),
            StopDirection::Down,
            dec!(0.16),
            dec!(7),
            None,
        );
        let json = serde_json::to_value(&gtc).unwrap();
        assert_eq!(
            json["stop_limit_stop_limit_gtc"]["stop_direction"],
            "STOP_DIRECTION_STOP_DOWN"
        );
        assert_eq!(json["stop_limit_stop_limit_gtc"]["stop_price"], "0.18");

        let cancel = Utc.with_ymd_and_hms(2023, 5, 9, 15, 0, 0).unwrap();
        let gtd = OrderConfiguration::stop_limit(
            dec!(0.18),
            StopDirection::Up,
            dec!(0.16),
            dec!(7),
            Some(cancel),
        );
        let json = serde_json::to_value(&gtd).unwrap();
        assert!(json.get("stop_limit_stop_limit_gtc").is_none());
        assert_eq!(
            json["stop_limit_stop_limit_gtd"]["end_time"],
            "2023-05-09T15:00:00Z"
        );
    }

    #[test]
    fn test_sizes_serialize_as_strings_not_numbers() {
        let config = OrderConfiguration::limit(dec!(50000.01), dec!(0.001), None, None);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"50000.01\""));
        assert!(json.contains("\"0.001\""));
    }

    #[test]
    fn test_order_configuration_roundtrip() {
        let config = OrderConfiguration::market_buy(dec!(1));
        let json = serde_json::to_string(&config).unwrap();
        let back: OrderConfiguration = serde_json::from_str(&json).unwrap();
        assert!(back.market_market_ioc.is_some());
        assert!(back.limit_limit_gtc.is_none());
    }
}
