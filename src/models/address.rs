//! Deposit address models.

use serde::Deserialize;

use crate::currency::Currency;

/// Response from the address issuance endpoint.
///
/// The backend issues one shared base-currency address type regardless of
/// which currency it will later be bound to.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuedAddress {
    pub address: String,
}

/// A deposit address bound to the currency it should be credited as.
///
/// The adapter does not persist addresses; holding on to the returned
/// value is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositAddress {
    pub currency: Currency,
    pub address: String,
}
