//! Normalized ledger entries with deterministic ids.
//!
//! Raw history records come back in whatever shape the backend pages them;
//! this module turns them into stable [`LedgerEntry`] values keyed by a
//! fixed-width content hash, so repeated fetches of the same record always
//! produce the same id.

use sha2::{Digest, Sha256};

use crate::currency::{Currency, Money};
use crate::models::history::{HistoryPage, RawLedgerRecord};
use crate::{CoinapultError, Result};

/// Byte width of a ledger entry id (SHA-256 output).
pub const ENTRY_ID_LEN: usize = 32;

/// Fixed-length, content-derived identifier for a ledger entry.
///
/// The backend's native `tid` is variable-length, so it cannot serve as a
/// fixed-width primary key. The `tid` bytes are right-padded with zeros to
/// [`ENTRY_ID_LEN`] and hashed; shorter and longer ids that share a prefix
/// still digest to different values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId([u8; ENTRY_ID_LEN]);

impl EntryId {
    /// Derives the id for a backend transaction id.
    pub fn from_tid(tid: &str) -> Self {
        let mut input = tid.as_bytes().to_vec();
        if input.len() < ENTRY_ID_LEN {
            input.resize(ENTRY_ID_LEN, 0);
        }
        Self(Sha256::digest(&input).into())
    }

    pub fn as_bytes(&self) -> &[u8; ENTRY_ID_LEN] {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Whether a transfer credited or debited this account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// A normalized, deterministically-identified historical transfer.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub amount: Money,
    pub direction: Direction,
    /// Settlement time in unix seconds; zero while unsettled.
    pub completed_at: i64,
    /// Backend state string, passed through untouched.
    pub status: String,
    /// Creation time in unix seconds. Entry ordering follows backend
    /// pagination, not this field.
    pub occurred_at: i64,
    /// Raw record dump kept for support tooling.
    pub debug: String,
}

/// A `"payment"` record is an outbound transfer; every other record type
/// credits the account.
pub fn direction_of(record: &RawLedgerRecord) -> Direction {
    if record.kind == "payment" {
        Direction::Outgoing
    } else {
        Direction::Incoming
    }
}

/// Appends the page's records denominated in `currency` to `entries`,
/// preserving record order.
///
/// Incoming records are valued from the `out` leg: the backend names legs
/// from the counterparty's point of view, so "out" denotes funds arriving
/// at this account. Records whose leg currency differs from `currency`
/// (or is unknown to the registry) are dropped, not surfaced.
///
/// # Errors
///
/// Returns [`CoinapultError::Unknown`] when a matching record's amount
/// cannot be represented in minor units; the caller discards the whole
/// history in that case.
pub fn collect_entries(
    currency: Currency,
    page: &HistoryPage,
    entries: &mut Vec<LedgerEntry>,
) -> Result<()> {
    for record in &page.result {
        let direction = direction_of(record);
        let leg = match direction {
            Direction::Incoming => &record.out,
            Direction::Outgoing => &record.in_leg,
        };
        let Some(leg_currency) = Currency::from_code(&leg.currency) else {
            continue;
        };
        if leg_currency != currency {
            continue;
        }
        let amount = Money::from_decimal(leg.amount, currency).ok_or_else(|| {
            CoinapultError::Unknown(format!(
                "unrepresentable amount {} {} in record {}",
                leg.amount, leg.currency, record.tid
            ))
        })?;
        entries.push(LedgerEntry {
            id: EntryId::from_tid(&record.tid),
            amount,
            direction,
            completed_at: record.complete_time,
            status: record.state.clone(),
            occurred_at: record.timestamp,
            debug: format!("{record:?}"),
        });
    }
    Ok(())
}
