//! Transaction records: raw ingestion input and the validated ledger entry.

use crate::domain::{Action, Decimal, OptionType, PositionKey, Symbol};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Raw transaction fields as captured at the input boundary.
///
/// `quantity` is the unsigned contract count the user typed; the sign is
/// applied from `action` during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub action: Action,
    pub option_type: OptionType,
    pub underlying: String,
    pub quantity: i64,
    pub expiration_date: NaiveDate,
    pub strike: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub commission: Decimal,
}

/// Largest contract count accepted for a single transaction.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Largest per-contract premium accepted for a single transaction.
pub const MAX_PRICE: i64 = 1_000_000;

/// Rejection reasons for a transaction at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(i64),
    #[error("quantity must not exceed {max}, got {0}", max = MAX_QUANTITY)]
    QuantityTooLarge(i64),
    #[error("strike must not be negative, got {0}")]
    NegativeStrike(Decimal),
    #[error("price must not be negative, got {0}")]
    NegativePrice(Decimal),
    #[error("price must not exceed {max}, got {0}", max = MAX_PRICE)]
    PriceTooLarge(Decimal),
    #[error("underlying symbol must not be blank")]
    BlankUnderlying,
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NonPositiveQuantity(_) | ValidationError::QuantityTooLarge(_) => {
                "quantity"
            }
            ValidationError::NegativeStrike(_) => "strike",
            ValidationError::NegativePrice(_) | ValidationError::PriceTooLarge(_) => "price",
            ValidationError::BlankUnderlying => "underlying",
        }
    }
}

/// A validated, immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier assigned at append time.
    pub id: Uuid,
    pub date: NaiveDate,
    pub action: Action,
    pub option_type: OptionType,
    pub underlying: Symbol,
    /// Signed contract count: positive for Buy, negative for Sell. Never zero.
    pub quantity: i64,
    pub expiration_date: NaiveDate,
    pub strike: Decimal,
    /// Per-contract premium.
    pub price: Decimal,
    /// Captured for display only; not part of any P/L figure.
    pub commission: Decimal,
}

impl NewTransaction {
    /// Validate the raw fields and produce a signed, normalized Transaction.
    pub fn validate(self) -> Result<Transaction, ValidationError> {
        if self.quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity(self.quantity));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(ValidationError::QuantityTooLarge(self.quantity));
        }
        if self.strike.is_negative() {
            return Err(ValidationError::NegativeStrike(self.strike));
        }
        if self.price.is_negative() {
            return Err(ValidationError::NegativePrice(self.price));
        }
        if self.price > Decimal::from(MAX_PRICE) {
            return Err(ValidationError::PriceTooLarge(self.price));
        }
        let underlying = Symbol::parse(&self.underlying).ok_or(ValidationError::BlankUnderlying)?;

        Ok(Transaction {
            id: Uuid::new_v4(),
            date: self.date,
            action: self.action,
            option_type: self.option_type,
            underlying,
            quantity: self.quantity * self.action.sign(),
            expiration_date: self.expiration_date,
            strike: self.strike,
            price: self.price,
            commission: self.commission,
        })
    }
}

impl Transaction {
    /// The position this transaction belongs to.
    pub fn key(&self) -> PositionKey {
        PositionKey {
            underlying: self.underlying.clone(),
            option_type: self.option_type,
            strike: self.strike,
            expiration_date: self.expiration_date,
        }
    }

    /// Unsigned contract count, used as the weight in price averaging.
    pub fn abs_quantity(&self) -> i64 {
        self.quantity.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn new_tx(action: Action, qty: i64) -> NewTransaction {
        NewTransaction {
            date: date("2024-01-02"),
            action,
            option_type: OptionType::Call,
            underlying: " aapl ".to_string(),
            quantity: qty,
            expiration_date: date("2024-02-16"),
            strike: d("190"),
            price: d("2.50"),
            commission: d("0.65"),
        }
    }

    #[test]
    fn test_sell_is_stored_negative() {
        let tx = new_tx(Action::Sell, 5).validate().unwrap();
        assert_eq!(tx.quantity, -5);
        assert_eq!(tx.abs_quantity(), 5);
    }

    #[test]
    fn test_buy_is_stored_positive() {
        let tx = new_tx(Action::Buy, 5).validate().unwrap();
        assert_eq!(tx.quantity, 5);
    }

    #[test]
    fn test_underlying_is_normalized() {
        let tx = new_tx(Action::Buy, 1).validate().unwrap();
        assert_eq!(tx.underlying.as_str(), "AAPL");
    }

    #[test]
    fn test_zero_and_negative_quantity_rejected() {
        let err = new_tx(Action::Buy, 0).validate().unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveQuantity(0));
        assert_eq!(err.field(), "quantity");

        let err = new_tx(Action::Sell, -3).validate().unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveQuantity(-3));
    }

    #[test]
    fn test_negative_strike_rejected() {
        let mut input = new_tx(Action::Buy, 1);
        input.strike = d("-1");
        let err = input.validate().unwrap_err();
        assert_eq!(err.field(), "strike");
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut input = new_tx(Action::Buy, 1);
        input.price = d("-0.01");
        let err = input.validate().unwrap_err();
        assert_eq!(err.field(), "price");
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let err = new_tx(Action::Buy, i64::MAX).validate().unwrap_err();
        assert_eq!(err, ValidationError::QuantityTooLarge(i64::MAX));
        assert_eq!(err.field(), "quantity");

        assert!(new_tx(Action::Sell, MAX_QUANTITY).validate().is_ok());
        assert!(new_tx(Action::Sell, MAX_QUANTITY + 1).validate().is_err());
    }

    #[test]
    fn test_oversized_price_rejected() {
        let mut input = new_tx(Action::Buy, 1);
        input.price = d("100000000000000000");
        let err = input.validate().unwrap_err();
        assert_eq!(err.field(), "price");

        let mut input = new_tx(Action::Buy, 1);
        input.price = Decimal::from(MAX_PRICE);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_zero_strike_and_price_accepted() {
        let mut input = new_tx(Action::Buy, 1);
        input.strike = Decimal::zero();
        input.price = Decimal::zero();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_underlying_rejected() {
        let mut input = new_tx(Action::Buy, 1);
        input.underlying = "  ".to_string();
        assert_eq!(input.validate().unwrap_err(), ValidationError::BlankUnderlying);
    }

    #[test]
    fn test_key_ignores_date_and_action() {
        let a = new_tx(Action::Buy, 1).validate().unwrap();
        let mut other = new_tx(Action::Sell, 2);
        other.date = date("2024-01-10");
        let b = other.validate().unwrap();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_new_transaction_json_defaults_commission() {
        let json = r#"{
            "date": "2024-01-02",
            "action": "Buy",
            "optionType": "Put",
            "underlying": "spy",
            "quantity": 3,
            "expirationDate": "2024-03-15",
            "strike": 470,
            "price": "4.10"
        }"#;
        let input: NewTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(input.commission, Decimal::zero());
        assert_eq!(input.option_type, OptionType::Put);
        assert_eq!(input.strike, d("470"));
    }
}
