//! Application configuration loaded from environment variables.
//!
//! Credentials **must** be provided via environment variables:
//! - `COINAPULT_API_KEY` — API key issued for the account
//! - `COINAPULT_API_SECRET` — shared secret used to sign request bodies
//!
//! An optional `COINAPULT_API_URL` overrides the production endpoint.

use zeroize::Zeroizing;

/// Default production REST endpoint.
const DEFAULT_API_URL: &str = "https://api.coinapult.com";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub coinapult: CoinapultConfig,
}

/// Coinapult-specific configuration values.
#[derive(Debug)]
pub struct CoinapultConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    /// Signing secret; wiped from memory on drop.
    pub api_secret: Option<Zeroizing<String>>,
}

/// Loads the application configuration from environment variables.
///
/// The API URL defaults to `https://api.coinapult.com` and can be
/// overridden with `COINAPULT_API_URL`. Credentials are optional at this
/// layer (account creation flows may not have them yet) but when one is
/// set both must be present.
///
/// # Errors
///
/// Returns [`CoinapultError::Config`](crate::CoinapultError::Config) if
/// only one of the two credential variables is set.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let api_url = non_empty_var("COINAPULT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let api_key = non_empty_var("COINAPULT_API_KEY");
    let api_secret = non_empty_var("COINAPULT_API_SECRET");

    match (&api_key, &api_secret) {
        (Some(_), None) => {
            return Err(crate::CoinapultError::Config(
                "COINAPULT_API_KEY is set but COINAPULT_API_SECRET is missing".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(crate::CoinapultError::Config(
                "COINAPULT_API_SECRET is set but COINAPULT_API_KEY is missing".to_string(),
            ));
        }
        _ => {}
    }

    Ok(AppConfig {
        coinapult: CoinapultConfig {
            api_url,
            api_key,
            api_secret: api_secret.map(Zeroizing::new),
        },
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
