//! Supported currencies and exact minor-unit money arithmetic.
//!
//! Coinapult custodies one base-chain currency (BTC, in which deposit
//! addresses are issued) plus pegged Locks balances (USD, EUR, GBP). The
//! set is closed: every wire code resolves through the [`Currency`] enum.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A currency supported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Btc,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    /// Every supported currency, base currency first.
    pub const ALL: [Currency; 4] = [Self::Btc, Self::Usd, Self::Eur, Self::Gbp];

    /// Returns the wire-format currency code expected by the API.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Btc => "BTC",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// Number of decimal places in one major unit (8 for BTC, 2 for fiat).
    pub fn unit_exponent(&self) -> u32 {
        match self {
            Currency::Btc => 8,
            Currency::Usd | Currency::Eur | Currency::Gbp => 2,
        }
    }

    /// Whether the backend issues deposit addresses natively in this currency.
    pub fn is_base(&self) -> bool {
        matches!(self, Currency::Btc)
    }

    /// Looks a wire code up in the registry.
    pub fn from_code(code: &str) -> Option<Currency> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.to_uppercase()).ok_or_else(|| format!("unknown currency: {s}"))
    }
}

/// An exact monetary amount in minor units, tagged with its currency.
///
/// Arithmetic never crosses currencies and never touches floating point:
/// wire decimals are scaled by `10^unit_exponent` on the way in and back
/// out on the way to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    /// Amount in the smallest unit (satoshis for BTC, cents for fiat).
    pub minor: i64,
    pub currency: Currency,
}

impl Money {
    pub const fn new(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    pub const fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Scales a decimal major-unit amount into minor units.
    ///
    /// Precision beyond the currency's unit exponent is truncated, matching
    /// how the backend itself rounds ledger amounts. Returns `None` when
    /// the scaled value does not fit an `i64`.
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Option<Self> {
        let scale = Decimal::from(10u64.pow(currency.unit_exponent()));
        let minor = amount.checked_mul(scale)?.trunc().to_i64()?;
        Some(Self { minor, currency })
    }

    /// Inverse of [`from_decimal`](Self::from_decimal): minor units back to
    /// a major-unit decimal, exactly.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.minor, self.currency.unit_exponent())
    }

    /// Adds two amounts of the same currency.
    ///
    /// Returns `None` on a currency mismatch or `i64` overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Self {
            minor: self.minor.checked_add(other.minor)?,
            currency: self.currency,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.to_decimal(), self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn registry_roundtrips_wire_codes() {
        for currency in Currency::ALL {
            assert_eq!(Currency::from_code(currency.code()), Some(currency));
        }
        assert_eq!(Currency::from_code("XRP"), None);
        assert_eq!(Currency::from_code(""), None);
    }

    #[test]
    fn only_btc_is_base() {
        assert!(Currency::Btc.is_base());
        assert!(!Currency::Usd.is_base());
        assert!(!Currency::Eur.is_base());
        assert!(!Currency::Gbp.is_base());
    }

    #[test]
    fn unit_exponents() {
        assert_eq!(Currency::Btc.unit_exponent(), 8);
        assert_eq!(Currency::Usd.unit_exponent(), 2);
        assert_eq!(Currency::Eur.unit_exponent(), 2);
        assert_eq!(Currency::Gbp.unit_exponent(), 2);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(Currency::from_str("btc").unwrap(), Currency::Btc);
        assert_eq!(Currency::from_str("GBP").unwrap(), Currency::Gbp);
        assert!(Currency::from_str("DOGE").is_err());
    }

    #[test]
    fn decimal_scaling_is_exact() {
        let btc = Money::from_decimal(dec!(1.50000000), Currency::Btc).unwrap();
        assert_eq!(btc.minor, 150_000_000);
        assert_eq!(btc.to_decimal(), dec!(1.5));

        let usd = Money::from_decimal(dec!(310.42), Currency::Usd).unwrap();
        assert_eq!(usd.minor, 31_042);
        assert_eq!(usd.to_decimal(), dec!(310.42));
    }

    #[test]
    fn sub_minor_precision_is_truncated() {
        let usd = Money::from_decimal(dec!(1.999), Currency::Usd).unwrap();
        assert_eq!(usd.minor, 199);
    }

    #[test]
    fn overflowing_amounts_are_rejected() {
        assert!(Money::from_decimal(dec!(99999999999999999999), Currency::Btc).is_none());
    }

    #[test]
    fn checked_add_requires_matching_currency() {
        let a = Money::new(100, Currency::Usd);
        let b = Money::new(50, Currency::Usd);
        assert_eq!(a.checked_add(b), Some(Money::new(150, Currency::Usd)));

        let c = Money::new(50, Currency::Eur);
        assert_eq!(a.checked_add(c), None);

        let max = Money::new(i64::MAX, Currency::Usd);
        assert_eq!(max.checked_add(b), None);
    }

    #[test]
    fn zero_is_zero() {
        assert!(Money::zero(Currency::Btc).is_zero());
        assert!(!Money::new(1, Currency::Btc).is_zero());
    }
}
