//! Recognized field validator kinds and their predicates.
//!
//! Each kind is backed by a fixed regular expression or a numeric-range
//! check and carries one fixed failure message.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::dates::parse_date;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}[\p{L}\p{M} .'\-]{1,99}$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid regex"));

static AADHAAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid regex"));

static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("valid regex"));

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("valid regex"));

static BANK_ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9,18}$").expect("valid regex"));

static IFSC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid regex"));

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid regex"));

/// Oldest age accepted by the `age` field type.
pub const MAX_AGE_YEARS: u64 = 120;

/// Address length bounds (characters).
pub const ADDRESS_MIN_CHARS: usize = 10;
pub const ADDRESS_MAX_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// A recognized validator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Name,
    Email,
    Mobile,
    Aadhaar,
    Pincode,
    Amount,
    Date,
    BankAccount,
    IfscCode,
    Text,
    Number,
    Pan,
    Age,
    Address,
}

impl FieldType {
    /// Every recognized kind, in declaration order.
    pub const ALL: [FieldType; 14] = [
        Self::Name,
        Self::Email,
        Self::Mobile,
        Self::Aadhaar,
        Self::Pincode,
        Self::Amount,
        Self::Date,
        Self::BankAccount,
        Self::IfscCode,
        Self::Text,
        Self::Number,
        Self::Pan,
        Self::Age,
        Self::Address,
    ];

    /// Parse a kind from its wire name.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown field type '{s}'")))
    }

    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Mobile => "mobile",
            Self::Aadhaar => "aadhaar",
            Self::Pincode => "pincode",
            Self::Amount => "amount",
            Self::Date => "date",
            Self::BankAccount => "bank_account",
            Self::IfscCode => "ifsc_code",
            Self::Text => "text",
            Self::Number => "number",
            Self::Pan => "pan",
            Self::Age => "age",
            Self::Address => "address",
        }
    }

    /// The fixed message returned when a value fails this kind's check.
    pub fn invalid_message(self) -> &'static str {
        match self {
            Self::Name => {
                "Name should contain only letters, spaces, dots and hyphens (2-100 characters)"
            }
            Self::Email => "Please enter a valid email address",
            Self::Mobile => "Mobile number must be 10 digits starting with 6, 7, 8 or 9",
            Self::Aadhaar => "Aadhaar number must be exactly 12 digits",
            Self::Pincode => "PIN code must be 6 digits",
            Self::Amount => "Please enter a valid amount (up to 2 decimal places)",
            Self::Date => "Please enter a valid date (YYYY-MM-DD)",
            Self::BankAccount => "Bank account number must be 9 to 18 digits",
            Self::IfscCode => "IFSC code must be 11 characters (e.g. SBIN0001234)",
            Self::Text => "This field cannot be empty",
            Self::Number => "Please enter a valid number",
            Self::Pan => "PAN must be 10 characters (e.g. ABCDE1234F)",
            Self::Age => "Age must be a whole number between 0 and 120",
            Self::Address => "Address must be between 10 and 500 characters",
        }
    }

    /// Whether this kind is normalized by an auto-correct transform.
    pub fn is_text_like(self) -> bool {
        !matches!(self, Self::Number | Self::Age | Self::Amount | Self::Date)
    }

    /// Apply this kind's predicate to a non-empty, trimmed value.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Name => NAME_RE.is_match(value),
            Self::Email => EMAIL_RE.is_match(value),
            Self::Mobile => MOBILE_RE.is_match(value),
            Self::Aadhaar => AADHAAR_RE.is_match(value),
            Self::Pincode => PINCODE_RE.is_match(value),
            Self::Amount => AMOUNT_RE.is_match(value),
            Self::Date => parse_date(value).is_some(),
            Self::BankAccount => BANK_ACCOUNT_RE.is_match(value),
            Self::IfscCode => IFSC_RE.is_match(value),
            Self::Text => true,
            Self::Number => value.parse::<f64>().map_or(false, f64::is_finite),
            Self::Pan => PAN_RE.is_match(value),
            Self::Age => value.parse::<u64>().map_or(false, |n| n <= MAX_AGE_YEARS),
            Self::Address => {
                let len = value.chars().count();
                (ADDRESS_MIN_CHARS..=ADDRESS_MAX_CHARS).contains(&len)
            }
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::parse(t.as_str()).unwrap(), t);
        }
        assert!(FieldType::parse("voter_id").is_err());
    }

    #[test]
    fn serde_name_matches_as_str() {
        for t in FieldType::ALL {
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json, serde_json::json!(t.as_str()));
        }
    }

    #[test]
    fn messages_are_distinct_and_nonempty() {
        let mut seen = std::collections::HashSet::new();
        for t in FieldType::ALL {
            assert!(!t.invalid_message().is_empty());
            assert!(seen.insert(t.invalid_message()));
        }
    }

    #[test]
    fn names_accept_letters_and_marks() {
        assert!(FieldType::Name.accepts("Ramesh Kumar"));
        assert!(FieldType::Name.accepts("D'Souza"));
        assert!(FieldType::Name.accepts("K. Lakshmi-Devi"));
        assert!(FieldType::Name.accepts("राम प्रसाद"));
        assert!(!FieldType::Name.accepts("R"));
        assert!(!FieldType::Name.accepts("Agent 007"));
        assert!(!FieldType::Name.accepts(" Leading"));
    }

    #[test]
    fn emails() {
        assert!(FieldType::Email.accepts("user@example.com"));
        assert!(FieldType::Email.accepts("first.last+tag@gov.in"));
        assert!(!FieldType::Email.accepts("user@example"));
        assert!(!FieldType::Email.accepts("user example@x.com"));
        assert!(!FieldType::Email.accepts("@example.com"));
    }

    #[test]
    fn mobile_must_start_six_to_nine() {
        assert!(FieldType::Mobile.accepts("9876543210"));
        assert!(FieldType::Mobile.accepts("6000000000"));
        assert!(!FieldType::Mobile.accepts("1234567890"));
        assert!(!FieldType::Mobile.accepts("987654321"));
        assert!(!FieldType::Mobile.accepts("98765432100"));
    }

    #[test]
    fn pincode_and_aadhaar_lengths() {
        assert!(FieldType::Pincode.accepts("560001"));
        assert!(!FieldType::Pincode.accepts("060001"));
        assert!(!FieldType::Pincode.accepts("56001"));
        assert!(FieldType::Aadhaar.accepts("123456789012"));
        assert!(!FieldType::Aadhaar.accepts("12345678901a"));
    }

    #[test]
    fn amount_allows_two_fraction_digits() {
        assert!(FieldType::Amount.accepts("0"));
        assert!(FieldType::Amount.accepts("1500.5"));
        assert!(FieldType::Amount.accepts("1500.50"));
        assert!(!FieldType::Amount.accepts("1500.505"));
        assert!(!FieldType::Amount.accepts("-10"));
        assert!(!FieldType::Amount.accepts("1,500"));
    }

    #[test]
    fn banking_codes() {
        assert!(FieldType::IfscCode.accepts("SBIN0001234"));
        assert!(!FieldType::IfscCode.accepts("SBIN1001234"));
        assert!(!FieldType::IfscCode.accepts("sbin0001234"));
        assert!(FieldType::BankAccount.accepts("123456789"));
        assert!(!FieldType::BankAccount.accepts("12345678"));
        assert!(FieldType::Pan.accepts("ABCDE1234F"));
        assert!(!FieldType::Pan.accepts("ABCD1234F"));
    }

    #[test]
    fn numeric_kinds() {
        assert!(FieldType::Age.accepts("0"));
        assert!(FieldType::Age.accepts("120"));
        assert!(!FieldType::Age.accepts("121"));
        assert!(!FieldType::Age.accepts("12.5"));
        assert!(FieldType::Number.accepts("-3.25"));
        assert!(!FieldType::Number.accepts("NaN"));
        assert!(!FieldType::Number.accepts("abc"));
    }

    #[test]
    fn address_length_bounds() {
        assert!(!FieldType::Address.accepts("Short rd"));
        assert!(FieldType::Address.accepts("12 Temple Street, Hosur"));
        assert!(!FieldType::Address.accepts(&"x".repeat(501)));
    }

    #[test]
    fn dates() {
        assert!(FieldType::Date.accepts("2024-02-29"));
        assert!(!FieldType::Date.accepts("2023-02-29"));
        assert!(!FieldType::Date.accepts("29/02/2024"));
    }
}
