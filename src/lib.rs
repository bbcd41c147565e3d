//! Rust client for the Coinbase Advanced Trade REST API
//!
//! Provides an async [`CoinbaseRestClient`] covering accounts, orders,
//! products, candles, market trades, and fee summaries. Every request is
//! signed with HMAC-SHA256 using the `CB-ACCESS-*` header scheme.
//!
//! # Quick start
//!
//! ```no_run
//! use coinbase_rest::{CoinbaseRestClient, Credentials, Side};
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads COINBASE_API_KEY / COINBASE_API_SECRET
//!     let client = CoinbaseRestClient::from_env()?;
//!
//!     let product = client.get_product("BTC-USD").await?;
//!     println!("BTC-USD price: {:?}", product.price);
//!
//!     let order = client
//!         .create_limit_order(
//!             "my-order-1",
//!             "BTC-USD",
//!             Side::Buy,
//!             dec!(25000.00),
//!             dec!(0.001),
//!             None,
//!             Some(true),
//!         )
//!         .await?;
//!     println!("Placed order {}", order.order_id);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod query;
pub mod types;

pub use auth::Credentials;
pub use client::{ClientConfig, CoinbaseRestClient, DEFAULT_BASE_URL};
pub use error::{RestError, RestResult};
pub use query::QueryParams;
pub use types::{Granularity, OrderConfiguration, OrderType, ProductType, Side, StopDirection};

pub use endpoints::accounts::{Account, AccountsPage, Balance};
pub use endpoints::fees::{FeeTier, GoodsAndServicesTax, MarginRate, TransactionsSummary};
pub use endpoints::orders::{
    CancellationResult, Fill, FillsPage, FillsQuery, Order, OrderBatchCancellation, OrdersPage,
    OrdersQuery,
};
pub use endpoints::products::{Candle, CandlesPage, Product, ProductsPage, Trade, TradesPage};
