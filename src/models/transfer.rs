//! Outbound transfer models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payload for the send endpoint.
///
/// Exactly one of the two amounts is non-zero: BTC-denominated transfers
/// carry the value on `destination_amount`, pegged transfers on
/// `source_amount` with the pegged code in `currency`. The from/to
/// semantics were inferred from observed usage; confirm against the
/// backend contract before extending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendRequest {
    /// Amount debited from the source balance, in major units.
    pub source_amount: Decimal,
    /// Currency the transfer is denominated in.
    pub currency: String,
    /// Destination address the funds are paid out to.
    pub address: String,
    /// Amount credited at the destination, in major units.
    pub destination_amount: Decimal,
}

/// Response from the send endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SendConfirmation {
    /// Identifier of the accepted transfer, when the backend assigned one.
    #[serde(default)]
    pub transaction_id: Option<String>,
}
