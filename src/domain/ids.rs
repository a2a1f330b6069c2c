//! Domain identifier types with proper encapsulation.
//!
//! The game API keys every reference entity by a numeric id. These newtypes
//! keep country, currency, region and item ids from being mixed up in maps
//! and function signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new id from a raw numeric value.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw numeric value.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::new(id)
            }
        }
    };
}

numeric_id!(
    /// Currency identifier - newtype for type safety.
    CurrencyId
);

numeric_id!(
    /// Country identifier - newtype for type safety.
    CountryId
);

numeric_id!(
    /// Region identifier - newtype for type safety.
    RegionId
);

numeric_id!(
    /// Traded item identifier - newtype for type safety.
    ItemId
);
