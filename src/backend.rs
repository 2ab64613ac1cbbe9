//! Remote account client boundary.
//!
//! [`AccountBackend`] is the exact API surface the adapter consumes;
//! [`HttpBackend`] implements it over signed JSON POSTs. Nothing here is
//! retried internally — retry policy belongs to the caller.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::auth;
use crate::currency::Currency;
use crate::models::account::{AccountInfo, MailSettings, MailVerification};
use crate::models::address::IssuedAddress;
use crate::models::history::HistoryPage;
use crate::models::transfer::{SendConfirmation, SendRequest};
use crate::{CoinapultError, Result};

/// The remote account API surface consumed by the adapter.
///
/// One method per backend call, with every failure classified into
/// [`CoinapultError`] so callers pattern-match on kind instead of catching
/// transport exceptions.
#[allow(async_fn_in_trait)]
pub trait AccountBackend {
    /// Creates an account for the signing key; `options` may carry an
    /// `email` entry.
    async fn create_account(&self, options: &BTreeMap<String, String>) -> Result<()>;

    /// Enables (or disables) the account.
    async fn activate_account(&self, enable: bool) -> Result<()>;

    /// Attaches a contact address to the account.
    async fn set_mail(&self, address: &str) -> Result<MailSettings>;

    /// Confirms a verification link previously mailed to `email`.
    async fn verify_mail(&self, link: &str, email: &str) -> Result<MailVerification>;

    /// Fetches the per-currency balances of the account.
    async fn account_info(&self) -> Result<AccountInfo>;

    /// Issues a brand-new base-currency deposit address.
    async fn issue_base_address(&self) -> Result<IssuedAddress>;

    /// Searches recorded transactions; a hit carries a `transaction_id`
    /// key in the returned mapping.
    async fn search(&self, criteria: &BTreeMap<String, String>) -> Result<Value>;

    /// Binds a deposit address to the currency incoming funds should be
    /// credited as.
    async fn bind_address(&self, address: &str, currency: Currency) -> Result<()>;

    /// Fetches one page of the account's transfer history. Pages are
    /// numbered from 1; the cursor is stateless per call.
    async fn history(&self, page: u32) -> Result<HistoryPage>;

    /// Submits an outbound transfer.
    async fn send(&self, request: &SendRequest) -> Result<SendConfirmation>;
}

/// Transport-level request timeout. The adapter enforces no timeout of
/// its own above this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Signed-HTTP implementation of [`AccountBackend`].
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: Zeroizing<String>,
}

impl HttpBackend {
    /// Builds a backend client for `base_url` with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CoinapultError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str, api_secret: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoinapultError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_secret: Zeroizing::new(api_secret.to_string()),
        })
    }

    /// Sends one signed JSON call and decodes the response body.
    ///
    /// An application-level `error` field in the response surfaces as
    /// [`CoinapultError::Rejected`]; HTTP and transport failures are
    /// classified by the [`From<reqwest::Error>`](crate::CoinapultError)
    /// conversion.
    async fn call<T: serde::de::DeserializeOwned>(&self, path: &str, payload: Value) -> Result<T> {
        let body = self.stamp(payload)?;
        let signature = auth::sign(&self.api_secret, &body)?;

        debug!(path, "calling backend");
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header(auth::KEY_HEADER, &self.api_key)
            .header(auth::SIGNATURE_HEADER, &signature)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let response = response.error_for_status()?;
        let value: Value = response.json().await?;

        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Err(CoinapultError::Rejected(error.to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| CoinapultError::Unknown(format!("malformed {path} response: {e}")))
    }

    /// Adds the nonce and timestamp fields every signed payload carries.
    fn stamp(&self, mut payload: Value) -> Result<String> {
        let map = payload
            .as_object_mut()
            .ok_or_else(|| CoinapultError::Unknown("payload must be a JSON object".to_string()))?;
        map.insert("nonce".to_string(), auth::next_nonce().into());
        map.insert("timestamp".to_string(), auth::unix_timestamp().into());

        serde_json::to_string(&payload)
            .map_err(|e| CoinapultError::Unknown(format!("payload serialization: {e}")))
    }
}

impl AccountBackend for HttpBackend {
    async fn create_account(&self, options: &BTreeMap<String, String>) -> Result<()> {
        let payload = serde_json::to_value(options)
            .map_err(|e| CoinapultError::Unknown(format!("options serialization: {e}")))?;
        let _: Value = self.call("/api/account/create", payload).await?;
        info!("account created");
        Ok(())
    }

    async fn activate_account(&self, enable: bool) -> Result<()> {
        let _: Value = self
            .call("/api/account/activate", json!({ "activate": enable }))
            .await?;
        info!(enable, "account activation updated");
        Ok(())
    }

    async fn set_mail(&self, address: &str) -> Result<MailSettings> {
        self.call("/api/account/mail", json!({ "email": address }))
            .await
    }

    async fn verify_mail(&self, link: &str, email: &str) -> Result<MailVerification> {
        self.call(
            "/api/account/mail/verify",
            json!({ "link": link, "email": email }),
        )
        .await
    }

    async fn account_info(&self) -> Result<AccountInfo> {
        self.call("/api/account/info", json!({})).await
    }

    async fn issue_base_address(&self) -> Result<IssuedAddress> {
        self.call("/api/address/new", json!({})).await
    }

    async fn search(&self, criteria: &BTreeMap<String, String>) -> Result<Value> {
        let payload = serde_json::to_value(criteria)
            .map_err(|e| CoinapultError::Unknown(format!("criteria serialization: {e}")))?;
        self.call("/api/search", payload).await
    }

    async fn bind_address(&self, address: &str, currency: Currency) -> Result<()> {
        let _: Value = self
            .call(
                "/api/address/config",
                json!({ "address": address, "currency": currency.code() }),
            )
            .await?;
        debug!(address, currency = %currency, "address bound");
        Ok(())
    }

    async fn history(&self, page: u32) -> Result<HistoryPage> {
        self.call("/api/history", json!({ "page": page })).await
    }

    async fn send(&self, request: &SendRequest) -> Result<SendConfirmation> {
        let payload = serde_json::to_value(request)
            .map_err(|e| CoinapultError::Unknown(format!("send serialization: {e}")))?;
        self.call("/api/send", payload).await
    }
}
