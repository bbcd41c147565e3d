//! Product endpoints
//!
//! Product listings, candles, and recent market trades. The exchange signs
//! these the same way as account endpoints, so authentication is required.

use crate::auth::Credentials;
use crate::endpoints::decode;
use crate::error::RestResult;
use crate::query::QueryParams;
use crate::types::{Granularity, ProductType};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Product endpoints
pub struct ProductEndpoints<'a> {
    client: &'a Client,
    credentials: &'a Credentials,
    base_url: &'a str,
}

impl<'a> ProductEndpoints<'a> {
    pub fn new(client: &'a Client, credentials: &'a Credentials, base_url: &'a str) -> Self {
        Self {
            client,
            credentials,
            base_url,
        }
    }

    /// Make an authenticated GET request
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> RestResult<T> {
        let headers = self.credentials.request_headers("GET", path, "");
        let url = format!("{}{}{}", self.base_url, path, query.as_str());

        debug!("Making authenticated request to {}", path);

        let response = headers.apply(self.client.get(&url)).send().await?;
        decode(response).await
    }

    /// List tradable products
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        product_type: Option<ProductType>,
    ) -> RestResult<ProductsPage> {
        let mut query = QueryParams::new();
        query
            .push_opt("limit", limit)
            .push_opt("offset", offset)
            .push_opt("product_type", product_type.map(|t| t.as_str()));

        self.get("/api/v3/brokerage/products", &query).await
    }

    /// Get a single product by ID (e.g., "BTC-USD")
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: &str) -> RestResult<Product> {
        let path = format!("/api/v3/brokerage/products/{}", product_id);
        self.get(&path, &QueryParams::new()).await
    }

    /// Get OHLCV candles for a product
    ///
    /// `start` and `end` are sent as Unix seconds; the bucket width is the
    /// granularity's wire string.
    #[instrument(skip(self))]
    pub async fn get_product_candles(
        &self,
        product_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> RestResult<CandlesPage> {
        let path = format!("/api/v3/brokerage/products/{}/candles", product_id);
        let mut query = QueryParams::new();
        query
            .push("start", start.timestamp())
            .push("end", end.timestamp())
            .push("granularity", granularity.as_str());

        self.get(&path, &query).await
    }

    /// Get recent market trades for a product, with the current best bid/ask
    #[instrument(skip(self))]
    pub async fn get_market_trades(
        &self,
        product_id: &str,
        limit: u32,
    ) -> RestResult<TradesPage> {
        let path = format!("/api/v3/brokerage/products/{}/ticker", product_id);
        let mut query = QueryParams::new();
        query.push("limit", limit);

        self.get(&path, &query).await
    }
}

// Response types specific to product endpoints

/// A tradable product (currency pair)
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// Product ID (e.g., "BTC-USD")
    pub product_id: String,
    /// Current price, decimal string
    pub price: Option<String>,
    /// 24h price change, percent, decimal string
    pub price_percentage_change_24h: Option<String>,
    /// 24h volume in base currency, decimal string
    pub volume_24h: Option<String>,
    /// 24h volume change, percent, decimal string
    pub volume_percentage_change_24h: Option<String>,
    /// Smallest base amount increment
    pub base_increment: Option<String>,
    /// Smallest quote amount increment
    pub quote_increment: Option<String>,
    /// Minimum order size in quote currency
    pub quote_min_size: Option<String>,
    /// Maximum order size in quote currency
    pub quote_max_size: Option<String>,
    /// Minimum order size in base currency
    pub base_min_size: Option<String>,
    /// Maximum order size in base currency
    pub base_max_size: Option<String>,
    /// Base currency display name
    pub base_name: Option<String>,
    /// Quote currency display name
    pub quote_name: Option<String>,
    /// Whether the user watches this product
    pub watched: Option<bool>,
    /// Whether trading is disabled for this product
    pub is_disabled: Option<bool>,
    /// Whether the product is newly listed
    pub new: Option<bool>,
    /// Product status
    pub status: Option<String>,
    /// Cancel-only mode
    pub cancel_only: Option<bool>,
    /// Limit-only mode
    pub limit_only: Option<bool>,
    /// Post-only mode
    pub post_only: Option<bool>,
    /// Whether trading is disabled account-wide
    pub trading_disabled: Option<bool>,
    /// Auction mode
    pub auction_mode: Option<bool>,
    /// Product type
    pub product_type: Option<ProductType>,
    /// Quote currency code
    pub quote_currency_id: Option<String>,
    /// Base currency code
    pub base_currency_id: Option<String>,
    /// Midpoint of the current spread, decimal string
    pub mid_market_price: Option<String>,
    /// FCM session details (futures products)
    pub fcm_trading_session_details: Option<Value>,
    /// Product alias
    pub alias: Option<String>,
    /// Products aliased to this one
    pub alias_to: Option<Vec<String>>,
    /// Base currency display symbol
    pub base_display_symbol: Option<String>,
    /// Quote currency display symbol
    pub quote_display_symbol: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// One page of products
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsPage {
    /// Products in this page
    #[serde(default)]
    pub products: Vec<Product>,
    /// Total number of products
    pub num_products: Option<u32>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ProductsPage {
    /// Iterate over the products in this page
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }
}

impl<'a> IntoIterator for &'a ProductsPage {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

/// An OHLCV summary over one time bucket
#[derive(Debug, Clone, Deserialize)]
pub struct Candle {
    /// Bucket start, Unix seconds as a string
    pub start: Option<String>,
    /// Lowest price in the bucket, decimal string
    pub low: Option<String>,
    /// Highest price in the bucket, decimal string
    pub high: Option<String>,
    /// Opening price, decimal string
    pub open: Option<String>,
    /// Closing price, decimal string
    pub close: Option<String>,
    /// Base-currency volume, decimal string
    pub volume: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A page of candles
#[derive(Debug, Clone, Deserialize)]
pub struct CandlesPage {
    /// Candles, newest first
    #[serde(default)]
    pub candles: Vec<Candle>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl CandlesPage {
    /// Iterate over the candles in this page
    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }
}

impl<'a> IntoIterator for &'a CandlesPage {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

/// A public market trade
#[derive(Debug, Clone, Deserialize)]
pub struct Trade {
    /// Trade ID
    pub trade_id: Option<String>,
    /// Trading pair
    pub product_id: Option<String>,
    /// Execution price, decimal string
    pub price: Option<String>,
    /// Executed base amount, decimal string
    pub size: Option<String>,
    /// Execution timestamp
    pub time: Option<String>,
    /// Taker side
    pub side: Option<String>,
    /// Best bid at trade time, decimal string
    pub bid: Option<String>,
    /// Best ask at trade time, decimal string
    pub ask: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A page of recent market trades
#[derive(Debug, Clone, Deserialize)]
pub struct TradesPage {
    /// Trades, newest first
    #[serde(default)]
    pub trades: Vec<Trade>,
    /// Current best bid, decimal string
    pub best_bid: Option<String>,
    /// Current best ask, decimal string
    pub best_ask: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl TradesPage {
    /// Iterate over the trades in this page
    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }
}

impl<'a> IntoIterator for &'a TradesPage {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserialization() {
        let json = r#"{
            "product_id": "BTC-USD",
            "price": "26000.55",
            "base_increment": "0.00000001",
            "quote_increment": "0.01",
            "base_name": "Bitcoin",
            "quote_name": "US Dollar",
            "status": "online",
            "product_type": "SPOT",
            "fcm_trading_session_details": null,
            "view_only": false
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_id, "BTC-USD");
        assert_eq!(product.product_type, Some(ProductType::Spot));
        assert!(product.fcm_trading_session_details.is_none());
        assert_eq!(product.extra["view_only"], false);
    }

    #[test]
    fn test_candles_page_deserialization() {
        let json = r#"{
            "candles": [
                {"start": "1672531200", "low": "0.17", "high": "0.21", "open": "0.18", "close": "0.20", "volume": "12345.6"}
            ]
        }"#;

        let page: CandlesPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.candles.len(), 1);
        assert_eq!(page.candles[0].close.as_deref(), Some("0.20"));
        assert_eq!(page.iter().count(), 1);
    }

    #[test]
    fn test_trades_page_carries_best_bid_ask() {
        let json = r#"{
            "trades": [{"trade_id": "t1", "price": "26000", "size": "0.01", "side": "BUY"}],
            "best_bid": "25999.99",
            "best_ask": "26000.01"
        }"#;

        let page: TradesPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.best_bid.as_deref(), Some("25999.99"));
        assert_eq!(page.trades[0].trade_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_products_page_defaults_to_empty() {
        let page: ProductsPage = serde_json::from_str(r#"{"num_products": 0}"#).unwrap();
        assert!(page.products.is_empty());
    }
}
