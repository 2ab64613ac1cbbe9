//! Shared test utilities: a scriptable in-memory backend.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use serde_json::Value;

use coinapult::Result;
use coinapult::backend::AccountBackend;
use coinapult::currency::Currency;
use coinapult::models::account::{AccountInfo, BalanceLine, MailSettings, MailVerification};
use coinapult::models::address::IssuedAddress;
use coinapult::models::history::{HistoryPage, RawLedgerRecord, TransactionLeg};
use coinapult::models::transfer::{SendConfirmation, SendRequest};

/// In-memory [`AccountBackend`] that records every call and pops
/// pre-scripted responses in order.
///
/// Clones share state, so tests keep one handle for assertions after
/// moving another into the adapter. An unscripted call panics, which
/// doubles as an assertion that the adapter made no extra backend calls.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    account_info: Mutex<Vec<Result<AccountInfo>>>,
    histories: Mutex<Vec<Result<HistoryPage>>>,
    addresses: Mutex<Vec<String>>,
    searches: Mutex<Vec<Result<Value>>>,
    sends: Mutex<Vec<Result<SendConfirmation>>>,
    mail_settings: Mutex<Vec<Result<MailSettings>>>,
    calls: Mutex<Vec<String>>,
    bound: Mutex<Vec<(String, Currency)>>,
    sent: Mutex<Vec<SendRequest>>,
    created_with: Mutex<Vec<BTreeMap<String, String>>>,
    activations: Mutex<Vec<bool>>,
}

impl MockBackend {
    pub fn script_account_info(&self, response: Result<AccountInfo>) {
        self.state.account_info.lock().unwrap().push(response);
    }

    pub fn script_history(&self, response: Result<HistoryPage>) {
        self.state.histories.lock().unwrap().push(response);
    }

    pub fn script_address(&self, address: &str) {
        self.state.addresses.lock().unwrap().push(address.to_string());
    }

    pub fn script_search(&self, response: Result<Value>) {
        self.state.searches.lock().unwrap().push(response);
    }

    pub fn script_send(&self, response: Result<SendConfirmation>) {
        self.state.sends.lock().unwrap().push(response);
    }

    pub fn script_mail_settings(&self, response: Result<MailSettings>) {
        self.state.mail_settings.lock().unwrap().push(response);
    }

    /// Full call log, e.g. `["account_info", "history:1"]`.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn bound(&self) -> Vec<(String, Currency)> {
        self.state.bound.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<SendRequest> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn created_with(&self) -> Vec<BTreeMap<String, String>> {
        self.state.created_with.lock().unwrap().clone()
    }

    pub fn activations(&self) -> Vec<bool> {
        self.state.activations.lock().unwrap().clone()
    }

    fn log(&self, entry: impl Into<String>) {
        self.state.calls.lock().unwrap().push(entry.into());
    }

    fn pop<T>(queue: &Mutex<Vec<T>>, what: &str) -> T {
        let mut queue = queue.lock().unwrap();
        assert!(!queue.is_empty(), "unscripted backend call: {what}");
        queue.remove(0)
    }
}

impl AccountBackend for MockBackend {
    async fn create_account(&self, options: &BTreeMap<String, String>) -> Result<()> {
        self.log("create_account");
        self.state.created_with.lock().unwrap().push(options.clone());
        Ok(())
    }

    async fn activate_account(&self, enable: bool) -> Result<()> {
        self.log("activate_account");
        self.state.activations.lock().unwrap().push(enable);
        Ok(())
    }

    async fn set_mail(&self, address: &str) -> Result<MailSettings> {
        self.log(format!("set_mail:{address}"));
        Self::pop(&self.state.mail_settings, "set_mail")
    }

    async fn verify_mail(&self, _link: &str, _email: &str) -> Result<MailVerification> {
        self.log("verify_mail");
        Ok(MailVerification {
            verified: true,
            error: None,
        })
    }

    async fn account_info(&self) -> Result<AccountInfo> {
        self.log("account_info");
        Self::pop(&self.state.account_info, "account_info")
    }

    async fn issue_base_address(&self) -> Result<IssuedAddress> {
        self.log("issue_base_address");
        Ok(IssuedAddress {
            address: Self::pop(&self.state.addresses, "issue_base_address"),
        })
    }

    async fn search(&self, criteria: &BTreeMap<String, String>) -> Result<Value> {
        self.log(format!(
            "search:{}",
            criteria.get("to").cloned().unwrap_or_default()
        ));
        Self::pop(&self.state.searches, "search")
    }

    async fn bind_address(&self, address: &str, currency: Currency) -> Result<()> {
        self.log(format!("bind_address:{address}"));
        self.state
            .bound
            .lock()
            .unwrap()
            .push((address.to_string(), currency));
        Ok(())
    }

    async fn history(&self, page: u32) -> Result<HistoryPage> {
        self.log(format!("history:{page}"));
        Self::pop(&self.state.histories, "history")
    }

    async fn send(&self, request: &SendRequest) -> Result<SendConfirmation> {
        self.log("send");
        self.state.sent.lock().unwrap().push(request.clone());
        Self::pop(&self.state.sends, "send")
    }
}

/// Builds an [`AccountInfo`] from `(code, amount)` pairs.
pub fn info(lines: &[(&str, Decimal)]) -> AccountInfo {
    AccountInfo {
        balances: lines
            .iter()
            .map(|(currency, amount)| BalanceLine {
                currency: currency.to_string(),
                amount: *amount,
            })
            .collect(),
    }
}

/// Builds a raw history record with fixed timestamps.
pub fn record(
    tid: &str,
    kind: &str,
    out: (&str, Decimal),
    in_leg: (&str, Decimal),
) -> RawLedgerRecord {
    RawLedgerRecord {
        tid: tid.to_string(),
        kind: kind.to_string(),
        out: TransactionLeg {
            currency: out.0.to_string(),
            amount: out.1,
        },
        in_leg: TransactionLeg {
            currency: in_leg.0.to_string(),
            amount: in_leg.1,
        },
        complete_time: 1_423_687_805,
        state: "complete".to_string(),
        timestamp: 1_423_687_700,
    }
}

/// Builds one history page.
pub fn page(page: u32, page_count: u32, result: Vec<RawLedgerRecord>) -> HistoryPage {
    HistoryPage {
        page,
        page_count,
        result,
    }
}
