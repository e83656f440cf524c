use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 100;

pub const PRICE_MAX_DIGITS: u32 = 5;
pub const PRICE_DECIMAL_PLACES: u32 = 3;

/// Pagination query parameters shared by every list endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct ListQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(0, MAX_LIMIT)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub headquarters: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TeamCreate {
    pub name: String,
    pub headquarters: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub headquarters: Option<String>,
}

// No Serialize on purpose: rows carry the password hash and must never
// reach a response body. Handlers go through UserPublic.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub team_id: Option<i64>,
    pub pwd_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct UserPublic {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub team_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        UserPublic {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            team_id: user.team_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub password: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub team_id: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub team_id: Option<i64>,
}

/// Item row. `price` is stored as a count of thousandths (scale 3) so the
/// fixed-point value round-trips through SQLite without parsing.
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub is_offer: bool,
    pub units: i64,
    pub units_measurement: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ItemPublic {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub is_offer: bool,
    pub units: i64,
    pub units_measurement: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Item> for ItemPublic {
    fn from(item: Item) -> Self {
        ItemPublic {
            id: item.id,
            name: item.name,
            price: Decimal::new(item.price, PRICE_DECIMAL_PLACES).normalize(),
            is_offer: item.is_offer,
            units: item.units,
            units_measurement: item.units_measurement,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ItemCreate {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub is_offer: bool,
    pub units: i64,
    pub units_measurement: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub is_offer: Option<bool>,
    pub units: Option<i64>,
    pub units_measurement: Option<String>,
}

/// Checks the 5-digit / 3-decimal-place price constraint and converts the
/// value to its thousandths representation for storage.
pub fn validate_price(price: Decimal) -> Result<i64, AppError> {
    let normalized = price.normalize();
    if normalized.scale() > PRICE_DECIMAL_PLACES {
        return Err(AppError::Validation(format!(
            "price supports at most {} decimal places",
            PRICE_DECIMAL_PLACES
        )));
    }
    let mut scaled = normalized;
    scaled.rescale(PRICE_DECIMAL_PLACES);
    if scaled.mantissa().abs() >= 10i128.pow(PRICE_MAX_DIGITS) {
        return Err(AppError::Validation(format!(
            "price supports at most {} total digits",
            PRICE_MAX_DIGITS
        )));
    }
    Ok(scaled.mantissa() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn validate_price_accepts_max_value() {
        assert_eq!(validate_price(dec("99.999")).unwrap(), 99_999);
    }

    #[test]
    fn validate_price_rescales_short_values() {
        assert_eq!(validate_price(dec("2.5")).unwrap(), 2_500);
        assert_eq!(validate_price(dec("0")).unwrap(), 0);
    }

    #[test]
    fn validate_price_ignores_trailing_zeros() {
        // 12.3400 normalizes to 12.34 before the scale check.
        assert_eq!(validate_price(dec("12.3400")).unwrap(), 12_340);
    }

    #[test]
    fn validate_price_rejects_excess_decimal_places() {
        assert!(validate_price(dec("1.2345")).is_err());
    }

    #[test]
    fn validate_price_rejects_excess_digits() {
        assert!(validate_price(dec("100.000")).is_err());
        assert!(validate_price(dec("100")).is_err());
    }

    #[test]
    fn list_query_defaults_and_cap() {
        let q = ListQuery {
            offset: None,
            limit: None,
        };
        assert_eq!(q.offset(), 0);
        assert_eq!(q.limit(), 100);

        let q = ListQuery {
            offset: Some(-5),
            limit: Some(1000),
        };
        assert_eq!(q.offset(), 0);
        assert_eq!(q.limit(), 100);
    }
}
