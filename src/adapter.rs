//! Custodial account adapter: cached balances, deposit address issuance,
//! normalized transaction history, and outbound payments.
//!
//! Every operation drives its backend calls strictly sequentially and
//! spawns no tasks; callers are expected to invoke the adapter from their
//! own background contexts. The one piece of shared state — the balance
//! snapshot — lives behind a mutex held across the whole
//! read-check-refresh sequence, so concurrent callers can neither race a
//! newer snapshot with an older one nor observe a half-updated one.

use std::collections::BTreeMap;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::backend::AccountBackend;
use crate::currency::{Currency, Money};
use crate::ledger::{self, LedgerEntry};
use crate::models::account::BalanceLine;
use crate::models::address::DepositAddress;
use crate::models::transfer::{SendConfirmation, SendRequest};
use crate::{CoinapultError, Result};

/// How long a balance snapshot stays fresh.
const SNAPSHOT_TTL: Duration = Duration::from_millis(10_000);

/// Point-in-time capture of every per-currency balance.
///
/// Replaced wholesale on refresh, never mutated in place, so capture times
/// are monotonically non-decreasing across successful refreshes.
struct Snapshot {
    captured_at: Instant,
    lines: Vec<BalanceLine>,
}

/// Per-currency balance derived from the shared snapshot.
///
/// The backend reports a single available figure; the remaining legs stay
/// zero until it learns to distinguish them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub available: Money,
    pub pending_incoming: Money,
    pub pending_outgoing: Money,
    pub reserved: Money,
}

/// Async adapter over a custodial multi-currency account.
pub struct AccountAdapter<B> {
    backend: B,
    snapshot: Mutex<Option<Snapshot>>,
}

impl<B: AccountBackend> AccountAdapter<B> {
    /// Wraps a backend client; the balance snapshot starts empty.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            snapshot: Mutex::new(None),
        }
    }

    /// Ensures the account exists and is active.
    ///
    /// Probes the account by priming the balance snapshot. When the
    /// backend reports no account, one is created first, attaching `mail`
    /// as the contact address when given.
    ///
    /// # Errors
    ///
    /// Fatal signing-setup failures and any error other than
    /// [`CoinapultError::NotProvisioned`] propagate untouched; failures of
    /// the creation or activation calls surface as-is.
    pub async fn activate(&self, mail: Option<&str>) -> Result<()> {
        match self.snapshot_lines().await {
            Ok(_) => {}
            Err(CoinapultError::NotProvisioned) => {
                let mut options = BTreeMap::new();
                if let Some(mail) = mail
                    && !mail.is_empty()
                {
                    options.insert("email".to_string(), mail.to_string());
                }
                info!("account not provisioned, creating");
                self.backend.create_account(&options).await?;
            }
            Err(err) => return Err(err),
        }
        self.backend.activate_account(true).await
    }

    /// Returns the balance held in `currency`, refreshing the shared
    /// snapshot when it is older than ten seconds.
    ///
    /// `Ok(None)` means the account has no line for that currency —
    /// absent, not zero. A failed refresh falls back to the stale snapshot
    /// when one exists; the error reaches the caller only when nothing is
    /// cached at all.
    pub async fn balance(&self, currency: Currency) -> Result<Option<AccountBalance>> {
        let lines = self.snapshot_lines().await?;
        let Some(line) = lines.iter().find(|l| l.currency == currency.code()) else {
            return Ok(None);
        };
        let available = Money::from_decimal(line.amount, currency).ok_or_else(|| {
            CoinapultError::Unknown(format!(
                "unrepresentable balance {} {}",
                line.amount, line.currency
            ))
        })?;
        Ok(Some(AccountBalance {
            available,
            pending_incoming: Money::zero(currency),
            pending_outgoing: Money::zero(currency),
            reserved: Money::zero(currency),
        }))
    }

    /// Copies the current snapshot lines, refreshing first when stale.
    ///
    /// The mutex stays held across the refresh so two concurrent callers
    /// cannot overwrite each other's snapshot out of order.
    async fn snapshot_lines(&self) -> Result<Vec<BalanceLine>> {
        let mut guard = self.snapshot.lock().await;
        let stale = guard
            .as_ref()
            .is_none_or(|s| s.captured_at.elapsed() > SNAPSHOT_TTL);
        if stale {
            match self.backend.account_info().await {
                Ok(info) => {
                    debug!(lines = info.balances.len(), "balance snapshot refreshed");
                    *guard = Some(Snapshot {
                        captured_at: Instant::now(),
                        lines: info.balances,
                    });
                }
                Err(err) if guard.is_some() => {
                    warn!(error = %err, "balance refresh failed, serving stale snapshot");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(guard.as_ref().map(|s| s.lines.clone()).unwrap_or_default())
    }

    /// Returns a deposit address for `currency`, never reusing one that
    /// has already received funds.
    ///
    /// Without a prior address a fresh one is issued. With one, the
    /// backend is searched for transactions against it: a hit rotates to a
    /// fresh address, otherwise the prior address is kept. Either way the
    /// address is bound to `currency` so incoming funds are credited
    /// correctly.
    ///
    /// # Errors
    ///
    /// Any backend failure is returned as-is and leaves the address
    /// unresolved; callers should retry rather than assume an address.
    pub async fn deposit_address(
        &self,
        currency: Currency,
        current: Option<&str>,
    ) -> Result<DepositAddress> {
        let address = match current {
            None => self.backend.issue_base_address().await?.address,
            Some(current) => {
                let mut criteria = BTreeMap::new();
                criteria.insert("to".to_string(), current.to_string());
                let matches = self.backend.search(&criteria).await?;
                if matches.get("transaction_id").is_some() {
                    info!(address = current, "deposit address already used, rotating");
                    self.backend.issue_base_address().await?.address
                } else {
                    current.to_string()
                }
            }
        };
        self.backend.bind_address(&address, currency).await?;
        Ok(DepositAddress { currency, address })
    }

    /// Fetches the full transfer history and returns the entries
    /// denominated in `currency`, in backend pagination order.
    ///
    /// Page 1 reports the page count; the remaining pages are requested
    /// strictly sequentially in increasing order, as the paging cursor is
    /// page-number based and stateless per call.
    ///
    /// # Errors
    ///
    /// Any failure on any page aborts the whole operation — entries from
    /// pages already fetched are discarded rather than returned as a
    /// partial history.
    pub async fn transactions(&self, currency: Currency) -> Result<Vec<LedgerEntry>> {
        let mut entries = Vec::new();
        let mut batch = self.backend.history(1).await?;
        ledger::collect_entries(currency, &batch, &mut entries)?;

        let mut next = 2;
        while batch.page < batch.page_count {
            batch = self.backend.history(next).await?;
            ledger::collect_entries(currency, &batch, &mut entries)?;
            next += 1;
        }
        debug!(currency = %currency, entries = entries.len(), "history assembled");
        Ok(entries)
    }

    /// Submits an outbound transfer of `amount` to `destination`.
    ///
    /// BTC transfers carry the value on the destination leg; pegged
    /// transfers carry it on the source leg with the pegged code named as
    /// the conversion target. The new transaction may not show up in
    /// [`transactions`](Self::transactions) until the backend's next
    /// settlement cycle.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; a confirmation without a
    /// transaction id counts as [`CoinapultError::Rejected`].
    pub async fn broadcast(&self, amount: Money, destination: &str) -> Result<SendConfirmation> {
        let currency = amount.currency;
        let value = amount.to_decimal();
        let request = if currency.is_base() {
            SendRequest {
                source_amount: Decimal::ZERO,
                currency: currency.code().to_string(),
                address: destination.to_string(),
                destination_amount: value,
            }
        } else {
            SendRequest {
                source_amount: value,
                currency: currency.code().to_string(),
                address: destination.to_string(),
                destination_amount: Decimal::ZERO,
            }
        };

        let confirmation = self.backend.send(&request).await?;
        if confirmation.transaction_id.is_none() {
            return Err(CoinapultError::Rejected(
                "send accepted without a transaction id".to_string(),
            ));
        }
        info!(currency = %currency, "transfer submitted");
        Ok(confirmation)
    }

    /// Attaches `mail` to the account; `true` when the backend echoes the
    /// address back.
    pub async fn set_mail(&self, mail: &str) -> Result<bool> {
        let settings = self.backend.set_mail(mail).await?;
        Ok(settings.email.as_deref() == Some(mail))
    }

    /// Confirms a mail verification link.
    pub async fn verify_mail(&self, link: &str, email: &str) -> Result<bool> {
        let verification = self.backend.verify_mail(link, email).await?;
        if !verification.verified
            && let Some(error) = &verification.error
        {
            warn!(error = %error, "mail verification rejected");
        }
        Ok(verification.verified)
    }
}
