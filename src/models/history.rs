//! Transaction history models.

use rust_decimal::Decimal;
use serde::Deserialize;

/// One page of the account's transfer history.
///
/// Transient: produced per backend call, consumed immediately, never
/// retained by the adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPage {
    pub page: u32,
    #[serde(rename = "pageCount")]
    pub page_count: u32,
    /// Records in backend pagination order.
    #[serde(default)]
    pub result: Vec<RawLedgerRecord>,
}

/// A raw transfer record exactly as the backend reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLedgerRecord {
    /// Backend-native transaction id. Variable length, so not usable as a
    /// fixed-width primary key; see [`EntryId`](crate::ledger::EntryId).
    pub tid: String,
    /// Record type; `"payment"` marks an outbound transfer.
    #[serde(rename = "type")]
    pub kind: String,
    /// Leg describing funds leaving the counterparty. On incoming records
    /// this is the side credited to the account.
    pub out: TransactionLeg,
    /// Leg describing funds leaving this account.
    #[serde(rename = "in")]
    pub in_leg: TransactionLeg,
    /// Settlement time in unix seconds; zero while unsettled.
    #[serde(rename = "completeTime", default)]
    pub complete_time: i64,
    /// Backend state string (e.g. `"complete"`, `"pending"`).
    pub state: String,
    /// Creation time in unix seconds.
    #[serde(default)]
    pub timestamp: i64,
}

/// One side of a raw record, carrying its own currency and amount.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionLeg {
    pub currency: String,
    /// Major-unit decimal amount.
    pub amount: Decimal,
}
