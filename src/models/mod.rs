//! Typed wire models for the Coinapult REST API.
//!
//! Contains request payloads and response bodies for the account, address,
//! history, and transfer endpoint families.

pub mod account;
pub mod address;
pub mod history;
pub mod transfer;
