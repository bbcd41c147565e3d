//! Account endpoints
//!
//! These endpoints require authentication.

use crate::auth::Credentials;
use crate::endpoints::decode;
use crate::error::RestResult;
use crate::query::QueryParams;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Account endpoints
pub struct AccountEndpoints<'a> {
    client: &'a Client,
    credentials: &'a Credentials,
    base_url: &'a str,
}

impl<'a> AccountEndpoints<'a> {
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

    /// List accounts
    ///
    /// # Arguments
    /// * `limit` - Maximum accounts per page (default 49)
    /// * `cursor` - Pagination cursor from a previous page
    #[instrument(skip(self))]
    pub async fn list_accounts(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> RestResult<AccountsPage> {
        let mut query = QueryParams::new();
        query.push("limit", limit.unwrap_or(49));
        query.push_opt("cursor", cursor);

        self.get("/api/v3/brokerage/accounts", &query).await
    }

    /// Get a single account by UUID
    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: &str) -> RestResult<Account> {
        let path = format!("/api/v3/brokerage/accounts/{}", account_id);
        let envelope: AccountEnvelope = self.get(&path, &QueryParams::new()).await?;
        Ok(envelope.account)
    }
}

// Response types specific to account endpoints

/// An amount of a single currency
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    /// Decimal-string amount
    pub value: String,
    /// Currency code
    pub currency: String,
}

/// A trading account (one per currency)
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Account UUID
    pub uuid: String,
    /// Display name
    pub name: Option<String>,
    /// Currency code
    pub currency: Option<String>,
    /// Funds available for trading
    pub available_balance: Option<Balance>,
    /// Whether this is the default account for the currency
    pub default: Option<bool>,
    /// Whether the account is active
    pub active: Option<bool>,
    /// Creation timestamp
    pub created_at: Option<String>,
    /// Last update timestamp
    pub updated_at: Option<String>,
    /// Deletion timestamp (if deleted)
    pub deleted_at: Option<String>,
    /// Account type
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Whether the account is ready for transactions
    pub ready: Option<bool>,
    /// Funds on hold
    pub hold: Option<Balance>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// One page of accounts
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsPage {
    /// Accounts in this page
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Whether another page exists
    pub has_next: Option<bool>,
    /// Cursor for the next page
    pub cursor: Option<String>,
    /// Number of accounts in this page
    pub size: Option<u32>,
    /// Unrecognized fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl AccountsPage {
    /// Iterate over the accounts in this page
    pub fn iter(&self) -> std::slice::Iter<'_, Account> {
        self.accounts.iter()
    }
}

impl<'a> IntoIterator for &'a AccountsPage {
    type Item = &'a Account;
    type IntoIter = std::slice::Iter<'a, Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}

#[derive(Debug, Deserialize)]
struct AccountEnvelope {
    account: Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounts_page_deserialization() {
        let json = r#"{
            "accounts": [{
                "uuid": "a1",
                "name": "BTC Wallet",
                "currency": "BTC",
                "available_balance": {"value": "1.5", "currency": "BTC"},
                "default": true,
                "active": true,
                "type": "ACCOUNT_TYPE_CRYPTO",
                "ready": true,
                "hold": {"value": "0", "currency": "BTC"}
            }],
            "has_next": false,
            "cursor": "",
            "size": 1
        }"#;

        let page: AccountsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.accounts.len(), 1);
        assert_eq!(page.accounts[0].name.as_deref(), Some("BTC Wallet"));
        assert_eq!(
            page.accounts[0]
                .available_balance
                .as_ref()
                .map(|b| b.value.as_str()),
            Some("1.5")
        );
        assert_eq!(page.has_next, Some(false));
    }

    #[test]
    fn test_unknown_fields_preserved_in_extra() {
        let json = r#"{
            "uuid": "a1",
            "name": "BTC Wallet",
            "retail_portfolio_id": "p-42",
            "platform": "ACCOUNT_PLATFORM_CONSUMER"
        }"#;

        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.uuid, "a1");
        assert_eq!(account.extra["retail_portfolio_id"], "p-42");
        assert_eq!(account.extra["platform"], "ACCOUNT_PLATFORM_CONSUMER");
    }

    #[test]
    fn test_null_nested_balance_maps_to_none() {
        let json = r#"{"uuid": "a1", "available_balance": null, "hold": null}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.available_balance.is_none());
        assert!(account.hold.is_none());
    }

    #[test]
    fn test_page_iteration() {
        let json = r#"{"accounts": [{"uuid": "a1"}, {"uuid": "a2"}], "size": 2}"#;
        let page: AccountsPage = serde_json::from_str(json).unwrap();
        let uuids: Vec<&str> = page.iter().map(|a| a.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["a1", "a2"]);
    }
}
