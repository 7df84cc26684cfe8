use crate::error::ApiError;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use validator::ValidationError;

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 128;

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();

    if len < MIN_LEN {
        return Err(error("password_too_short"));
    }

    if len > MAX_LEN {
        return Err(error("password_too_long"));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_letter && has_digit) {
        return Err(error("password_policy_violation"));
    }

    Ok(())
}

fn error(code: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.add_param("min_length".into(), &MIN_LEN);
    err.add_param("max_length".into(), &MAX_LEN);
    err
}

/// Decimal supplied by a client as a JSON string or an integral JSON number.
/// Fractional JSON numbers are refused: they have already been through a
/// binary float by the time they reach us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalInput {
    Text(String),
    Integer(i128),
}

impl DecimalInput {
    pub fn raw(&self) -> String {
        match self {
            DecimalInput::Text(s) => s.trim().to_string(),
            DecimalInput::Integer(n) => n.to_string(),
        }
    }

    pub fn to_decimal(&self) -> Result<Decimal, ApiError> {
        parse_decimal(&self.raw())
    }

    pub fn to_positive(&self) -> Result<Decimal, ApiError> {
        parse_positive_amount(&self.raw())
    }
}

impl<'de> Deserialize<'de> for DecimalInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalInputVisitor;

        impl Visitor<'_> for DecimalInputVisitor {
            type Value = DecimalInput;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal string or an integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(DecimalInput::Text(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(DecimalInput::Integer(v.into()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(DecimalInput::Integer(v.into()))
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
                Err(E::custom(
                    "fractional amounts must be sent as strings, e.g. \"0.1\"",
                ))
            }
        }

        deserializer.deserialize_any(DecimalInputVisitor)
    }
}

impl From<&str> for DecimalInput {
    fn from(value: &str) -> Self {
        DecimalInput::Text(value.to_string())
    }
}

pub fn parse_decimal(raw: &str) -> Result<Decimal, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::InvalidAmount("amount is required".into()));
    }

    // from_str would round past 28 fractional digits; excess precision is an error
    Decimal::from_str_exact(raw).map_err(|_| {
        ApiError::InvalidAmount(format!(
            "'{}' is not a decimal with at most 28 fractional digits",
            raw
        ))
    })
}

pub fn parse_positive_amount(raw: &str) -> Result<Decimal, ApiError> {
    let value = parse_decimal(raw)?;

    if value <= Decimal::ZERO {
        return Err(ApiError::InvalidAmount("amount must be greater than zero".into()));
    }

    Ok(value)
}
