//! Fee endpoints

use crate::auth::Credentials;
use crate::endpoints::decode;
use crate::error::RestResult;
use crate::query::QueryParams;
use crate::types::ProductType;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Fee endpoints
pub struct FeeEndpoints<'a> {
    client: &'a Client,
    credentials: &'a Credentials,
    base_url: &'a str,
}

impl<'a> FeeEndpoints<'a> {
    pub fn new(client: &'a Client, credentials: &'a Credentials, base_url: &'a str) -> Self {
        Self {
            client,
            credentials,
            base_url,
        }
    }

    /// Get a summary of trading volume and the fee tier it places the user in
    #[instrument(skip(self))]
    pub async fn get_transactions_summary(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        user_native_currency: Option<&str>,
        product_type: Option<ProductType>,
    ) -> RestResult<TransactionsSummary> {
        let path = "/api/v3/brokerage/transaction_summary";
        let mut query = QueryParams::new();
        query
            .push_date_opt("start_date", start_date)
            .push_date_opt("end_date", end_date)
            .push_opt("user_native_currency", user_native_currency)
            .push_opt("product_type", product_type.map(|t| t.as_str()));

        let headers = self.credentials.request_headers("GET", path, "");
        let url = format!("{}{}{}", self.base_url, path, query.as_str());

        debug!("Making authenticated request to {}", path);

        let response = headers.apply(self.client.get(&url)).send().await?;
        decode(response).await
    }
}

// Response types specific to fee endpoints

/// A maker/taker fee tier in the volume-based schedule
#[derive(Debug, Clone, Deserialize)]
pub struct FeeTier {
    /// Tier name
    pub pricing_tier: Option<String>,
    /// Lower USD volume bound, decimal string
    pub usd_from: Option<String>,
    /// Upper USD volume bound, decimal string
    pub usd_to: Option<String>,
    /// Taker fee rate, decimal string
    pub taker_fee_rate: Option<String>,
    /// Maker fee rate, decimal string
    pub maker_fee_rate: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Margin rate applied to the account
#[derive(Debug, Clone, Deserialize)]
pub struct MarginRate {
    /// Rate, decimal string
    pub value: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Tax applied in some jurisdictions
#[derive(Debug, Clone, Deserialize)]
pub struct GoodsAndServicesTax {
    /// Tax rate, decimal string
    pub rate: Option<String>,
    /// Whether the tax applies to fees or the full amount
    #[serde(rename = "type")]
    pub tax_type: Option<String>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Trading volume and fee summary for the account
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsSummary {
    /// Total trading volume
    pub total_volume: Option<f64>,
    /// Total fees paid
    pub total_fees: Option<f64>,
    /// Current fee tier
    pub fee_tier: Option<FeeTier>,
    /// Margin rate, if margin is enabled
    pub margin_rate: Option<MarginRate>,
    /// Applicable tax, if any
    pub goods_and_services_tax: Option<GoodsAndServicesTax>,
    /// Volume on Advanced Trade only
    pub advanced_trade_only_volume: Option<f64>,
    /// Fees on Advanced Trade only
    pub advanced_trade_only_fees: Option<f64>,
    /// Legacy Coinbase Pro volume
    pub coinbase_pro_volume: Option<f64>,
    /// Legacy Coinbase Pro fees
    pub coinbase_pro_fees: Option<f64>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
