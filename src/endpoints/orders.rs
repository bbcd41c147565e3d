//! Order endpoints
//!
//! Order placement, cancellation, and history. These endpoints require
//! authentication. Order submissions are never retried: a transport error
//! surfaces to the caller rather than risking a double-submitted order.

use crate::auth::Credentials;
use crate::endpoints::decode;
use crate::error::{RestError, RestResult};
use crate::query::QueryParams;
use crate::types::{OrderConfiguration, OrderType, ProductType, Side, StopDirection};
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Order endpoints
pub struct OrderEndpoints<'a> {
    client: &'a Client,
    credentials: &'a Credentials,
    base_url: &'a str,
}

impl<'a> OrderEndpoints<'a> {
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

    /// Make an authenticated POST request
    ///
    /// The payload is serialized once and that exact string is both signed
    /// and sent, so the signature always covers the bytes on the wire.
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> RestResult<T> {
        let body = serde_json::to_string(payload)
            .map_err(|e| RestError::InvalidParameter(e.to_string()))?;
        let headers = self.credentials.request_headers("POST", path, &body);
        let url = format!("{}{}", self.base_url, path);

        debug!("Making authenticated request to {}", path);

        let response = headers
            .apply(self.client.post(&url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        decode(response).await
    }

    /// Create an order
    ///
    /// # Arguments
    /// * `client_order_id` - Caller-chosen idempotency key
    /// * `product_id` - Trading pair (e.g., "BTC-USD")
    /// * `side` - Buy or sell
    /// * `order_configuration` - Type-specific parameters
    #[instrument(skip(self, order_configuration), fields(product_id = %product_id, side = %side))]
    pub async fn create_order(
        &self,
        client_order_id: &str,
        product_id: &str,
        side: Side,
        order_configuration: OrderConfiguration,
    ) -> RestResult<Order> {
        let payload = CreateOrderRequest {
            client_order_id,
            product_id,
            side,
            order_configuration: &order_configuration,
        };

        debug!("Placing {} order for {}", side, product_id);

        let response: CreateOrderResponse =
            self.post("/api/v3/brokerage/orders", &payload).await?;

        if !response.success {
            let body = response.error_response.unwrap_or(Value::Null);
            return Err(RestError::from_error_value(200, body));
        }

        let mut order = response
            .success_response
            .ok_or_else(|| RestError::Parse("missing success_response".to_string()))?;
        if order.order_configuration.is_none() {
            order.order_configuration = response.order_configuration;
        }
        Ok(order)
    }

    /// Create a market buy order, sized in the quote currency
    pub async fn create_buy_market_order(
        &self,
        client_order_id: &str,
        product_id: &str,
        quote_size: Decimal,
    ) -> RestResult<Order> {
        self.create_order(
            client_order_id,
            product_id,
            Side::Buy,
            OrderConfiguration::market_buy(quote_size),
        )
        .await
    }

    /// Create a market sell order, sized in the base currency
    pub async fn create_sell_market_order(
        &self,
        client_order_id: &str,
        product_id: &str,
        base_size: Decimal,
    ) -> RestResult<Order> {
        self.create_order(
            client_order_id,
            product_id,
            Side::Sell,
            OrderConfiguration::market_sell(base_size),
        )
        .await
    }

    /// Create a limit order
    ///
    /// Good-till-date when `cancel_time` is given, good-till-canceled
    /// otherwise. `post_only` is sent only if explicitly set.
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
    ) -> RestResult<Order> {
        self.create_order(
            client_order_id,
            product_id,
            side,
            OrderConfiguration::limit(limit_price, base_size, cancel_time, post_only),
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
    ) -> RestResult<Order> {
        self.create_order(
            client_order_id,
            product_id,
            side,
            OrderConfiguration::stop_limit(
                stop_price,
                stop_direction,
                limit_price,
                base_size,
                cancel_time,
            ),
        )
        .await
    }

    /// Cancel orders by ID
    #[instrument(skip(self), fields(count = order_ids.len()))]
    pub async fn cancel_orders(&self, order_ids: &[&str]) -> RestResult<OrderBatchCancellation> {
        let payload = CancelOrdersRequest { order_ids };
        debug!("Cancelling {} orders", order_ids.len());
        self.post("/api/v3/brokerage/orders/batch_cancel/", &payload)
            .await
    }

    /// List historical orders matching a filter
    #[instrument(skip(self, query))]
    pub async fn list_orders(&self, query: &OrdersQuery) -> RestResult<OrdersPage> {
        self.get("/api/v3/brokerage/orders/historical/batch", &query.to_params())
            .await
    }

    /// List fills matching a filter
    #[instrument(skip(self, query))]
    pub async fn list_fills(&self, query: &FillsQuery) -> RestResult<FillsPage> {
        self.get("/api/v3/brokerage/orders/historical/fills", &query.to_params())
            .await
    }

    /// Get a single historical order by ID
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> RestResult<Order> {
        let path = format!("/api/v3/brokerage/orders/historical/{}", order_id);
        let envelope: OrderEnvelope = self.get(&path, &QueryParams::new()).await?;
        Ok(envelope.order)
    }
}

// Request types

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    client_order_id: &'a str,
    product_id: &'a str,
    side: Side,
    order_configuration: &'a OrderConfiguration,
}

#[derive(Debug, Serialize)]
struct CancelOrdersRequest<'a> {
    order_ids: &'a [&'a str],
}

/// Filter for listing historical orders
///
/// Only provided fields become query parameters, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct OrdersQuery {
    /// Trading pair filter
    pub product_id: Option<String>,
    /// Order status filter (comma-joined on the wire)
    pub order_status: Vec<String>,
    /// Maximum orders to return (default 999)
    pub limit: Option<u32>,
    /// Only orders created at or after this time
    pub start_date: Option<DateTime<Utc>>,
    /// Only orders created before this time
    pub end_date: Option<DateTime<Utc>>,
    /// Native currency for converted values
    pub user_native_currency: Option<String>,
    /// Order type filter
    pub order_type: Option<OrderType>,
    /// Order side filter
    pub order_side: Option<Side>,
    /// Pagination cursor
    pub cursor: Option<String>,
    /// Product type filter
    pub product_type: Option<ProductType>,
}

impl OrdersQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by trading pair
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Filter by order status
    pub fn with_order_status<S: Into<String>>(mut self, statuses: impl IntoIterator<Item = S>) -> Self {
        self.order_status = statuses.into_iter().map(Into::into).collect();
        self
    }

    /// Limit the number of orders returned
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict to a creation-time range
    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Filter by order type
    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// Filter by order side
    pub fn with_side(mut self, side: Side) -> Self {
        self.order_side = Some(side);
        self
    }

    /// Continue from a pagination cursor
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Filter by product type
    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = Some(product_type);
        self
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("product_id", self.product_id.as_deref());
        if !self.order_status.is_empty() {
            params.push_list("order_status", &self.order_status);
        }
        params.push("limit", self.limit.unwrap_or(999));
        params.push_date_opt("start_date", self.start_date);
        params.push_date_opt("end_date", self.end_date);
        params.push_opt("user_native_currency", self.user_native_currency.as_deref());
        params.push_opt("order_type", self.order_type.map(|t| t.as_str()));
        params.push_opt("order_side", self.order_side.map(|s| s.as_str()));
        params.push_opt("cursor", self.cursor.as_deref());
        params.push_opt("product_type", self.product_type.map(|t| t.as_str()));
        params
    }
}

/// Filter for listing fills
#[derive(Debug, Clone, Default)]
pub struct FillsQuery {
    /// Restrict to fills of one order
    pub order_id: Option<String>,
    /// Trading pair filter
    pub product_id: Option<String>,
    /// Maximum fills to return (default 100)
    pub limit: Option<u32>,
    /// Only fills at or after this time
    pub start_date: Option<DateTime<Utc>>,
    /// Only fills before this time
    pub end_date: Option<DateTime<Utc>>,
    /// Pagination cursor
    pub cursor: Option<String>,
}

impl FillsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to fills of one order
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Filter by trading pair
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Limit the number of fills returned
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict to a time range
    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Continue from a pagination cursor
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("order_id", self.order_id.as_deref());
        params.push_opt("product_id", self.product_id.as_deref());
        params.push("limit", self.limit.unwrap_or(100));
        params.push_date_opt("start_date", self.start_date);
        params.push_date_opt("end_date", self.end_date);
        params.push_opt("cursor", self.cursor.as_deref());
        params
    }
}

// Response types specific to order endpoints

/// An order, as created or as returned by the historical endpoints
///
/// The create-order response only populates the identifying fields; the
/// status and fill fields are present on historical lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Exchange-assigned order ID
    pub order_id: String,
    /// Trading pair
    pub product_id: String,
    /// Buy or sell
    pub side: Side,
    /// Caller-chosen idempotency key
    pub client_order_id: Option<String>,
    /// Order status (e.g., "OPEN", "FILLED", "CANCELLED")
    pub status: Option<String>,
    /// Expiration policy
    pub time_in_force: Option<String>,
    /// Creation timestamp
    pub created_time: Option<String>,
    /// Percentage of the order filled, decimal string
    pub completion_percentage: Option<String>,
    /// Filled base amount, decimal string
    pub filled_size: Option<String>,
    /// Volume-weighted average fill price, decimal string
    pub average_filled_price: Option<String>,
    /// Commission, decimal string
    pub fee: Option<String>,
    /// Number of fills
    pub number_of_fills: Option<String>,
    /// Filled quote value, decimal string
    pub filled_value: Option<String>,
    /// Whether a cancel request is pending
    pub pending_cancel: Option<bool>,
    /// Whether the size is denominated in the quote currency
    pub size_in_quote: Option<bool>,
    /// Total fees, decimal string
    pub total_fees: Option<String>,
    /// Whether the size includes fees
    pub size_inclusive_of_fees: Option<bool>,
    /// Total value after fees, decimal string
    pub total_value_after_fees: Option<String>,
    /// Stop trigger status
    pub trigger_status: Option<String>,
    /// Order type
    pub order_type: Option<OrderType>,
    /// Rejection reason code
    pub reject_reason: Option<String>,
    /// Whether the order is settled
    pub settled: Option<bool>,
    /// Product type
    pub product_type: Option<ProductType>,
    /// Rejection message
    pub reject_message: Option<String>,
    /// Cancellation message
    pub cancel_message: Option<String>,
    /// Type-specific order parameters
    pub order_configuration: Option<OrderConfiguration>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    success: bool,
    #[serde(default)]
    success_response: Option<Order>,
    #[serde(default)]
    error_response: Option<Value>,
    #[serde(default)]
    order_configuration: Option<OrderConfiguration>,
}

/// One page of historical orders
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
    /// Orders in this page
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Sequence number of the snapshot
    pub sequence: Option<String>,
    /// Whether another page exists
    pub has_next: Option<bool>,
    /// Cursor for the next page
    pub cursor: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl OrdersPage {
    /// Iterate over the orders in this page
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }
}

impl<'a> IntoIterator for &'a OrdersPage {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

/// A single execution against an order
#[derive(Debug, Clone, Deserialize)]
pub struct Fill {
    /// Unique fill ID
    pub entry_id: Option<String>,
    /// Trade ID this fill belongs to
    pub trade_id: Option<String>,
    /// Order that was filled
    pub order_id: Option<String>,
    /// Execution timestamp
    pub trade_time: Option<String>,
    /// Fill type
    pub trade_type: Option<String>,
    /// Execution price, decimal string
    pub price: Option<String>,
    /// Executed amount, decimal string
    pub size: Option<String>,
    /// Commission, decimal string
    pub commission: Option<String>,
    /// Trading pair
    pub product_id: Option<String>,
    /// Exchange sequence timestamp
    pub sequence_timestamp: Option<String>,
    /// Maker/taker indicator
    pub liquidity_indicator: Option<String>,
    /// Whether the size is denominated in the quote currency
    pub size_in_quote: Option<bool>,
    /// Owning user
    pub user_id: Option<String>,
    /// Buy or sell
    pub side: Option<Side>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// One page of fills
#[derive(Debug, Clone, Deserialize)]
pub struct FillsPage {
    /// Fills in this page
    #[serde(default)]
    pub fills: Vec<Fill>,
    /// Cursor for the next page
    pub cursor: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl FillsPage {
    /// Iterate over the fills in this page
    pub fn iter(&self) -> std::slice::Iter<'_, Fill> {
        self.fills.iter()
    }
}

impl<'a> IntoIterator for &'a FillsPage {
    type Item = &'a Fill;
    type IntoIter = std::slice::Iter<'a, Fill>;

    fn into_iter(self) -> Self::IntoIter {
        self.fills.iter()
    }
}

/// Outcome of one cancellation in a batch
#[derive(Debug, Clone, Deserialize)]
pub struct CancellationResult {
    /// Whether the cancellation was accepted
    pub success: Option<bool>,
    /// Failure reason code (if rejected)
    pub failure_reason: Option<String>,
    /// Order the result refers to
    pub order_id: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Receipt for a batch cancellation request
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBatchCancellation {
    /// Per-order results, in request order
    #[serde(default)]
    pub results: Vec<CancellationResult>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
