use crate::error::ApiError;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    DbEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::FiatCurrency"]
#[DbValueStyle = "verbatim"]
#[strum(serialize_all = "UPPERCASE")]
pub enum FiatCurrency {
    ZAR,
    USD,
}

impl FiatCurrency {
    pub const ALL: [FiatCurrency; 2] = [FiatCurrency::ZAR, FiatCurrency::USD];

    pub fn parse(input: &str) -> Result<Self, ApiError> {
        let normalized = input.trim().to_uppercase();

        FiatCurrency::from_str(&normalized)
            .map_err(|_| ApiError::BadRequest(format!("Unsupported currency: {}", input)))
    }

    /// Lowercase code used by the external price feed.
    pub fn feed_code(self) -> &'static str {
        match self {
            FiatCurrency::ZAR => "zar",
            FiatCurrency::USD => "usd",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    DbEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::TransactionKind"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionKind {
    Buy,
    Sell,
    Deposit,
    Withdrawal,
    AdminCredit,
    AdminDebit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inflow,
    Outflow,
}

/// Presentation attributes of a transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct KindDisplay {
    #[schema(value_type = String)]
    pub label: &'static str,
    pub direction: Direction,
    #[schema(value_type = String)]
    pub icon: &'static str,
    #[schema(value_type = String)]
    pub sign: &'static str,
}

/// Resolved by label against the fixed kind table; unknown labels are refused.
impl<'de> Deserialize<'de> for KindDisplay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            label: String,
        }

        let wire = Wire::deserialize(deserializer)?;
        TransactionKind::ALL
            .iter()
            .map(|kind| kind.display())
            .find(|display| display.label == wire.label)
            .ok_or_else(|| {
                serde::de::Error::custom(format!("unknown transaction label '{}'", wire.label))
            })
    }
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 6] = [
        TransactionKind::Buy,
        TransactionKind::Sell,
        TransactionKind::Deposit,
        TransactionKind::Withdrawal,
        TransactionKind::AdminCredit,
        TransactionKind::AdminDebit,
    ];

    /// Direction is from the point of view of the crypto wallet.
    pub const fn display(self) -> KindDisplay {
        match self {
            TransactionKind::Buy => KindDisplay {
                label: "Buy",
                direction: Direction::Inflow,
                icon: "arrow-down-left",
                sign: "+",
            },
            TransactionKind::Sell => KindDisplay {
                label: "Sell",
                direction: Direction::Outflow,
                icon: "arrow-up-right",
                sign: "-",
            },
            TransactionKind::Deposit => KindDisplay {
                label: "Deposit",
                direction: Direction::Inflow,
                icon: "download",
                sign: "+",
            },
            TransactionKind::Withdrawal => KindDisplay {
                label: "Withdrawal",
                direction: Direction::Outflow,
                icon: "upload",
                sign: "-",
            },
            TransactionKind::AdminCredit => KindDisplay {
                label: "Admin Credit",
                direction: Direction::Inflow,
                icon: "shield-plus",
                sign: "+",
            },
            TransactionKind::AdminDebit => KindDisplay {
                label: "Admin Debit",
                direction: Direction::Outflow,
                icon: "shield-minus",
                sign: "-",
            },
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, TransactionKind::AdminCredit | TransactionKind::AdminDebit)
    }

    pub fn is_trade(self) -> bool {
        matches!(self, TransactionKind::Buy | TransactionKind::Sell)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::TransactionStatus"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl From<TradeSide> for TransactionKind {
    fn from(side: TradeSide) -> Self {
        match side {
            TradeSide::Buy => TransactionKind::Buy,
            TradeSide::Sell => TransactionKind::Sell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_display_entry() {
        for kind in TransactionKind::ALL {
            let display = kind.display();
            assert!(!display.label.is_empty());
            let expected_sign = match display.direction {
                Direction::Inflow => "+",
                Direction::Outflow => "-",
            };
            assert_eq!(display.sign, expected_sign, "{kind}");
        }
    }

    #[test]
    fn kinds_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::AdminCredit).unwrap(),
            "\"admin_credit\""
        );
        assert_eq!(TransactionKind::AdminDebit.to_string(), "admin_debit");
        assert_eq!(
            TransactionKind::from_str("withdrawal").unwrap(),
            TransactionKind::Withdrawal
        );
    }

    #[test]
    fn display_decodes_back_to_its_table_entry() {
        let wire = serde_json::to_value(TransactionKind::AdminDebit.display()).unwrap();
        let decoded: KindDisplay = serde_json::from_value(wire).unwrap();
        assert_eq!(decoded, TransactionKind::AdminDebit.display());

        let unknown = serde_json::json!({ "label": "Airdrop", "direction": "inflow" });
        assert!(serde_json::from_value::<KindDisplay>(unknown).is_err());
    }

    #[test]
    fn fiat_parse_is_case_insensitive() {
        assert_eq!(FiatCurrency::parse(" zar ").unwrap(), FiatCurrency::ZAR);
        assert!(FiatCurrency::parse("EUR").is_err());
    }
}
