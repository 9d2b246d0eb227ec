//! Monetary column type.
//!
//! The `SQLite` driver binds `Decimal` as a double, so money columns hold the decimal's
//! text form instead and come back with every digit and the original scale.

use rust_decimal::Decimal;
use sea_orm::sea_query::{ArrayType, ColumnType, Nullable, ValueType, ValueTypeErr};
use sea_orm::{ColIdx, DbErr, QueryResult, TryGetError, TryGetable, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `Decimal` stored as `TEXT`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub Decimal);

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl PartialEq<Decimal> for Amount {
    fn eq(&self, other: &Decimal) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn parse_amount(text: &str) -> Result<Amount, DbErr> {
    Decimal::from_str(text)
        .map(Amount)
        .map_err(|e| DbErr::Type(format!("Invalid stored amount '{text}': {e}")))
}

impl From<Amount> for Value {
    fn from(value: Amount) -> Self {
        Self::String(Some(Box::new(value.0.to_string())))
    }
}

impl TryGetable for Amount {
    fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> Result<Self, TryGetError> {
        let text = String::try_get_by(res, index)?;
        parse_amount(&text).map_err(TryGetError::DbErr)
    }
}

impl ValueType for Amount {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        match v {
            Value::String(Some(text)) => parse_amount(&text).map_err(|_| ValueTypeErr),
            _ => Err(ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Amount".to_owned()
    }

    fn array_type() -> ArrayType {
        ArrayType::String
    }

    fn column_type() -> ColumnType {
        ColumnType::Text
    }
}

impl Nullable for Amount {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_value_keeps_every_digit_and_scale() {
        let amount = Amount(Decimal::new(1_234_567_890_123_456_789, 10));
        let value: Value = amount.into();
        assert_eq!(
            value,
            Value::String(Some(Box::new("123456789.0123456789".to_string())))
        );
        assert_eq!(<Amount as ValueType>::try_from(value).unwrap(), amount);

        let cents: Value = Amount(Decimal::new(1050, 2)).into();
        assert_eq!(cents, Value::String(Some(Box::new("10.50".to_string()))));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let value = Value::String(Some(Box::new("douze".to_string())));
        assert!(<Amount as ValueType>::try_from(value).is_err());
        assert!(<Amount as ValueType>::try_from(Value::Double(Some(1.5))).is_err());
    }
}
