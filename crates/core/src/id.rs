//! Strongly-typed identifiers used across the domain.
//!
//! Catalog records are keyed by positive integers. Raw request values are
//! accepted as `i64` and only become identifiers once they pass the
//! positivity check, so a zero or negative id never reaches a handler.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

/// Identifier of a catalog category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(u32);

/// Identifier of a shop (multi-shop boundary).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(u32);

/// Identifier of a group of shops.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopGroupId(u32);

/// Identifier of an installed language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(u32);

/// Identifier of a stored virtual product file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualProductFileId(u32);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Build an identifier from a raw value, rejecting zero.
            pub fn new(value: u32) -> Result<Self, DomainError> {
                if value == 0 {
                    return Err(DomainError::invalid_id(format!(
                        "{} must be a positive integer, got 0",
                        $name
                    )));
                }
                Ok(Self(value))
            }

            pub fn value(&self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$t> for u32 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl TryFrom<i64> for $t {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                let raw = u32::try_from(value).map_err(|_| {
                    DomainError::invalid_id(format!(
                        "{} must be a positive integer, got {}",
                        $name, value
                    ))
                })?;
                Self::new(raw)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Self::try_from(raw)
            }
        }
    };
}

impl_int_newtype!(ProductId, "ProductId");
impl_int_newtype!(CategoryId, "CategoryId");
impl_int_newtype!(ShopId, "ShopId");
impl_int_newtype!(ShopGroupId, "ShopGroupId");
impl_int_newtype!(LanguageId, "LanguageId");
impl_int_newtype!(VirtualProductFileId, "VirtualProductFileId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(matches!(ProductId::new(0), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn negative_raw_values_are_rejected() {
        let err = ProductId::try_from(-3).unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_id("ProductId must be a positive integer, got -3")
        );
    }

    #[test]
    fn parses_from_path_segment() {
        let id: ShopId = " 7 ".parse().unwrap();
        assert_eq!(id.value(), 7);
        assert!("abc".parse::<ShopId>().is_err());
    }

    #[test]
    fn displays_inner_value() {
        assert_eq!(CategoryId::new(12).unwrap().to_string(), "12");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn positive_values_round_trip(raw in 1i64..=u32::MAX as i64) {
                let id = ProductId::try_from(raw).unwrap();
                prop_assert_eq!(id.value() as i64, raw);
            }

            #[test]
            fn non_positive_values_never_build_ids(raw in i64::MIN..=0i64) {
                prop_assert!(ProductId::try_from(raw).is_err());
            }
        }
    }
}
