//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce the catalog invariants (positive identifiers,
//! non-blank text, valid email, non-negative prices with currency precision,
//! bounded priority) so that once a value reaches the domain layer it can be
//! treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Price below zero.
    #[error("price cannot be negative")]
    NegativePrice,
    /// Price with more than two decimal places.
    #[error("price cannot have more than {} decimal places", Price::SCALE)]
    PriceTooPrecise,
    /// Price with more digits than the column allows.
    #[error("price must be lower than {}", Price::LIMIT)]
    PriceOutOfRange,
    /// Priority outside of `1..=5`.
    #[error("priority must be between {} and {}", Priority::MIN, Priority::MAX)]
    PriorityOutOfRange,
    /// Negative lead time.
    #[error("lead time cannot be negative")]
    NegativeLeadTime,
    /// Unknown service category.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    /// Unknown request status.
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

/// Trims and validates an email string. Case is preserved.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_string();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ServiceId, "Unique identifier for a catalog service.");
id_newtype!(ClientRequestId, "Unique identifier for a client request.");

/// Validated contact email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and trims an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                Ok(Self(trimmed))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(ServiceName, "Catalog service name enforcing non-empty values.");

non_empty_string_newtype!(
    ServiceDescription,
    "Catalog service description enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(ClientName, "Client name wrapper enforcing non-empty values.");

non_empty_string_newtype!(
    RequestMessage,
    "Inquiry message wrapper enforcing trimmed, non-empty values."
);

/// Non-negative amount in Mexican pesos with at most two decimal places.
///
/// The value is always rescaled to two decimals so it serializes as
/// `"1500.00"` and maps losslessly to integer cents in storage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places kept.
    pub const SCALE: u32 = 2;
    /// Exclusive upper bound (ten significant digits, two of them decimals).
    pub const LIMIT: i64 = 100_000_000;

    pub fn new(value: Decimal) -> Result<Self, TypeConstraintError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(TypeConstraintError::NegativePrice);
        }
        let normalized = value.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(TypeConstraintError::PriceTooPrecise);
        }
        if normalized >= Decimal::from(Self::LIMIT) {
            return Err(TypeConstraintError::PriceOutOfRange);
        }
        let mut scaled = normalized.abs();
        scaled.rescale(Self::SCALE);
        Ok(Self(scaled))
    }

    /// Builds a price from a stored amount of cents.
    pub fn from_cents(cents: i64) -> Result<Self, TypeConstraintError> {
        if cents < 0 {
            return Err(TypeConstraintError::NegativePrice);
        }
        Self::new(Decimal::new(cents, Self::SCALE))
    }

    /// Amount expressed in cents.
    pub fn cents(self) -> i64 {
        // Bounded by `LIMIT`, always fits.
        (self.0 * Decimal::ONE_HUNDRED).to_i64().unwrap_or(i64::MAX)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = TypeConstraintError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Service priority level in `1..=5`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub struct Priority(i32);

impl Priority {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;
    pub const DEFAULT: i32 = 3;

    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::PriorityOutOfRange)
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<i32> for Priority {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for i32 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

/// Estimated delivery time in days.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub struct LeadTimeDays(i32);

impl LeadTimeDays {
    pub const DEFAULT: i32 = 7;

    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeLeadTime)
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for LeadTimeDays {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<i32> for LeadTimeDays {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LeadTimeDays> for i32 {
    fn from(value: LeadTimeDays) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(ServiceId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ClientRequestId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ServiceId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn email_is_trimmed_and_validated() {
        let email = EmailAddress::new("  Dev@Example.com ").unwrap();
        assert_eq!(email.as_str(), "Dev@Example.com");
        assert_eq!(
            EmailAddress::new("email-invalido"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert_eq!(ServiceName::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(RequestMessage::new(""), Err(TypeConstraintError::EmptyString));
        assert_eq!(ClientName::new(" Ana ").unwrap().as_str(), "Ana");
    }

    #[test]
    fn price_is_rescaled_to_cents() {
        let price = Price::new(dec("50000")).unwrap();
        assert_eq!(price.to_string(), "50000.00");
        assert_eq!(price.cents(), 5_000_000);

        let price = Price::new(dec("19.9")).unwrap();
        assert_eq!(price.cents(), 1990);
        assert_eq!(Price::from_cents(1990).unwrap(), price);
    }

    #[test]
    fn price_bounds_are_enforced() {
        assert_eq!(Price::new(dec("-0.01")), Err(TypeConstraintError::NegativePrice));
        assert_eq!(Price::new(dec("1.999")), Err(TypeConstraintError::PriceTooPrecise));
        assert_eq!(
            Price::new(dec("100000000")),
            Err(TypeConstraintError::PriceOutOfRange)
        );
        assert!(Price::new(dec("99999999.99")).is_ok());
        assert_eq!(Price::new(Decimal::ZERO).unwrap().cents(), 0);
        // Trailing zeros beyond the scale are not extra precision.
        assert!(Price::new(dec("10.5000")).is_ok());
    }

    #[test]
    fn price_serializes_as_decimal_string() {
        let price = Price::new(dec("25000")).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"25000.00\"");
        let parsed: Price = serde_json::from_str("\"25000.00\"").unwrap();
        assert_eq!(parsed, price);
        assert!(serde_json::from_str::<Price>("\"-1\"").is_err());
    }

    #[test]
    fn priority_and_lead_time_bounds() {
        assert_eq!(Priority::default().get(), 3);
        assert!(Priority::new(1).is_ok());
        assert!(Priority::new(5).is_ok());
        assert_eq!(Priority::new(6), Err(TypeConstraintError::PriorityOutOfRange));
        assert_eq!(Priority::new(0), Err(TypeConstraintError::PriorityOutOfRange));

        assert_eq!(LeadTimeDays::default().get(), 7);
        assert!(LeadTimeDays::new(0).is_ok());
        assert_eq!(LeadTimeDays::new(-5), Err(TypeConstraintError::NegativeLeadTime));
    }
}
