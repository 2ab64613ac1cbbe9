//! Account lifecycle and balance models.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response from the account info endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    /// One line per currency the account has ever held.
    #[serde(default)]
    pub balances: Vec<BalanceLine>,
}

/// A single per-currency balance as reported by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceLine {
    /// Wire currency code (e.g. `"BTC"`, `"USD"`).
    pub currency: String,
    /// Major-unit decimal amount.
    pub amount: Decimal,
}

/// Response from the mail settings endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    /// The address now attached to the account, if any.
    #[serde(default)]
    pub email: Option<String>,
}

/// Response from the mail verification endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MailVerification {
    pub verified: bool,
    /// Backend-supplied reason when verification failed.
    #[serde(default)]
    pub error: Option<String>,
}
