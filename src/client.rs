//! Main REST client implementation

use crate::auth::Credentials;
use crate::endpoints::{AccountEndpoints, FeeEndpoints, OrderEndpoints, ProductEndpoints};
use crate::error::RestResult;
use crate::types::{Granularity, OrderConfiguration, ProductType, Side, StopDirection};
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::info;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.coinbase.com";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Coinbase Advanced Trade REST API client
///
/// Every operation issues exactly one signed, blocking-until-complete HTTP
/// request; there is no retry or shared mutable state beyond the immutable
/// credentials.
///
/// # Example
///
/// ```no_run
/// use coinbase_rest::{CoinbaseRestClient, Credentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = Credentials::from_env()?;
///     let client = CoinbaseRestClient::new(creds);
///
///     let accounts = client.list_accounts(None, None).await?;
///     for account in &accounts {
///         println!("{}: {:?}", account.uuid, account.available_balance);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinbaseRestClient {
    http_client: Client,
    credentials: Credentials,
    base_url: String,
}

impl CoinbaseRestClient {
    /// Create a new client with credentials and default configuration
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client from `COINBASE_API_KEY` / `COINBASE_API_SECRET`
    pub fn from_env() -> RestResult<Self> {
        Ok(Self::new(Credentials::from_env()?))
    }

    /// Create a new client with custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or("coinbase-rest/0.1.0"))
            .build()
            .expect("Failed to create HTTP client");

        info!("Created Coinbase REST client for {}", config.base_url);

        Self {
            http_client,
            credentials,
            base_url: config.base_url,
        }
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Get account endpoints
    pub fn accounts(&self) -> AccountEndpoints<'_> {
        AccountEndpoints::new(&self.http_client, &self.credentials, &self.base_url)
    }

    /// Get order endpoints
    pub fn orders(&self) -> OrderEndpoints<'_> {
        OrderEndpoints::new(&self.http_client, &self.credentials, &self.base_url)
    }

    /// Get product endpoints
    pub fn products(&self) -> ProductEndpoints<'_> {
        ProductEndpoints::new(&self.http_client, &self.credentials, &self.base_url)
    }

    /// Get fee endpoints
    pub fn fees(&self) -> FeeEndpoints<'_> {
        FeeEndpoints::new(&self.http_client, &self.credentials, &self.base_url)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// List accounts
    pub async fn list_accounts(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> RestResult<crate::endpoints::accounts::AccountsPage> {
        self.accounts().list_accounts(limit, cursor).await
    }

    /// Get a single account by UUID
    pub async fn get_account(
        &self,
        account_id: &str,
    ) -> RestResult<crate::endpoints::accounts::Account> {
        self.accounts().get_account(account_id).await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Create an order from an explicit configuration
    pub async fn create_order(
        &self,
        client_order_id: &str,
        product_id: &str,
        side: Side,
        order_configuration: OrderConfiguration,
    ) -> RestResult<crate::endpoints::orders::Order> {
        self.orders()
            .create_order(client_order_id, product_id, side, order_configuration)
            .await
    }

    /// Create a market buy order, sized in the quote currency
    pub async fn create_buy_market_order(
        &self,
        client_order_id: &str,
        product_id: &str,
        quote_size: Decimal,
    ) -> RestResult<crate::endpoints::orders::Order> {
        self.orders()
            .create_buy_market_order(client_order_id, product_id, quote_size)
            .await
    }

    /// Create a market sell order, sized in the base currency
    pub async fn create_sell_market_order(
        &self,
        client_order_id: &str,
        product_id: &str,
        base_size: Decimal,
    ) -> RestResult<crate::endpoints::orders::Order> {
        self.orders()
            .create_sell_market_order(client_order_id, product_id, base_size)
            .await
    }

    /// Create a limit order
    #[allow(clippy::too_many_arguments)]
    pub async fn create_limit_order(
        &self,
        client_order_id: &str,
        product_id: &str,
        side: Side,
        limit_price: Decimal,
        base_size: Decimal,
        cancel_time: Option<DateTime<Utc>>,
        post_only: Option<bool>,
    ) -> RestResult<crate::endpoints::orders::Order> {
        self.orders()
            .create_limit_order(
                client_order_id,
                product_id,
                side,
                limit_price,
                base_size,
                cancel_time,
                post_only,
            )
            .await
    }

    /// Create a stop-limit order
    #[allow(clippy::too_many_arguments)]
    pub async fn create_stop_limit_order(
        &self,
        client_order_id: &str,
        product_id: &str,
        side: Side,
        stop_price: Decimal,
        stop_direction: StopDirection,
        limit_price: Decimal,
        base_size: Decimal,
        cancel_time: Option<DateTime<Utc>>,
    ) -> RestResult<crate::endpoints::orders::Order> {
        self.orders()
            .create_stop_limit_order(
                client_order_id,
                product_id,
                side,
                stop_price,
                stop_direction,
                limit_price,
                base_size,
                cancel_time,
            )
            .await
    }

    /// Cancel orders by ID
    pub async fn cancel_orders(
        &self,
        order_ids: &[&str],
    ) -> RestResult<crate::endpoints::orders::OrderBatchCancellation> {
        self.orders().cancel_orders(order_ids).await
    }

    /// List historical orders matching a filter
    pub async fn list_orders(
        &self,
        query: &crate::endpoints::orders::OrdersQuery,
    ) -> RestResult<crate::endpoints::orders::OrdersPage> {
        self.orders().list_orders(query).await
    }

    /// List fills matching a filter
    pub async fn list_fills(
        &self,
        query: &crate::endpoints::orders::FillsQuery,
    ) -> RestResult<crate::endpoints::orders::FillsPage> {
        self.orders().list_fills(query).await
    }

    /// Get a single historical order by ID
    pub async fn get_order(&self, order_id: &str) -> RestResult<crate::endpoints::orders::Order> {
        self.orders().get_order(order_id).await
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// List tradable products
    pub async fn list_products(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        product_type: Option<ProductType>,
    ) -> RestResult<crate::endpoints::products::ProductsPage> {
        self.products()
            .list_products(limit, offset, product_type)
            .await
    }

    /// Get a single product by ID
    pub async fn get_product(
        &self,
        product_id: &str,
    ) -> RestResult<crate::endpoints::products::Product> {
        self.products().get_product(product_id).await
    }

    /// Get OHLCV candles for a product
    pub async fn get_product_candles(
        &self,
        product_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> RestResult<crate::endpoints::products::CandlesPage> {
        self.products()
            .get_product_candles(product_id, start, end, granularity)
            .await
    }

    /// Get recent market trades for a product
    pub async fn get_market_trades(
        &self,
        product_id: &str,
        limit: u32,
    ) -> RestResult<crate::endpoints::products::TradesPage> {
        self.products().get_market_trades(product_id, limit).await
    }

    // ========================================================================
    // Fees
    // ========================================================================

    /// Get the account's volume and fee summary
    pub async fn get_transactions_summary(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        user_native_currency: Option<&str>,
        product_type: Option<ProductType>,
    ) -> RestResult<crate::endpoints::fees::TransactionsSummary> {
        self.fees()
            .get_transactions_summary(start_date, end_date, user_native_currency, product_type)
            .await
    }
}

impl std::fmt::Debug for CoinbaseRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinbaseRestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
