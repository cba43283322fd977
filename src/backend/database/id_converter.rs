//! Mapping between application ids and backend key representations
//!
//! The application always handles ids as `i64`. Each table stores its key
//! in one fixed native type, chosen at configuration time; a converter
//! translates in both directions for that type.

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Bidirectional id mapping for one backend key type `I`
pub trait IdConverter<I>: Send + Sync {
    /// Application id to backend key
    fn from_app(&self, id: i64) -> AppResult<I>;

    /// Backend key to application id
    fn to_app(&self, value: &I) -> AppResult<i64>;
}

/// Numeric strategy used unless a table asks for something else
///
/// Narrower integer keys are produced by a truncating cast, so only ids the
/// backend itself generated are guaranteed to round-trip. Text keys hold the
/// base-10 rendering of the id.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIdConverter;

impl IdConverter<i16> for DefaultIdConverter {
    fn from_app(&self, id: i64) -> AppResult<i16> {
        Ok(id as i16)
    }

    fn to_app(&self, value: &i16) -> AppResult<i64> {
        Ok(i64::from(*value))
    }
}

impl IdConverter<i32> for DefaultIdConverter {
    fn from_app(&self, id: i64) -> AppResult<i32> {
        Ok(id as i32)
    }

    fn to_app(&self, value: &i32) -> AppResult<i64> {
        Ok(i64::from(*value))
    }
}

impl IdConverter<i64> for DefaultIdConverter {
    fn from_app(&self, id: i64) -> AppResult<i64> {
        Ok(id)
    }

    fn to_app(&self, value: &i64) -> AppResult<i64> {
        Ok(*value)
    }
}

impl IdConverter<String> for DefaultIdConverter {
    fn from_app(&self, id: i64) -> AppResult<String> {
        Ok(id.to_string())
    }

    fn to_app(&self, value: &String) -> AppResult<i64> {
        value
            .parse::<i64>()
            .map_err(|e| AppError::Conversion(format!("'{}' is not a base-10 id: {}", value, e)))
    }
}

/// Stores the application id in the low 64 bits of a UUID
///
/// The high 64 bits are always zero on the way in and ignored on the way
/// out, so UUIDs minted elsewhere do not map back uniquely.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdConverter;

impl IdConverter<Uuid> for UuidIdConverter {
    fn from_app(&self, id: i64) -> AppResult<Uuid> {
        Ok(Uuid::from_u128(u128::from(id as u64)))
    }

    fn to_app(&self, value: &Uuid) -> AppResult<i64> {
        Ok(value.as_u128() as u64 as i64)
    }
}
