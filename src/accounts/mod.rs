//! Account schema migration
//!
//! Reshapes legacy user and organization accounts into the normalized
//! account schema, joining users against exported Ory identities.

mod account;
mod error;
mod legacy;
mod normalizer;

pub use account::{Account, AccountType, Profile};
pub use error::TransformError;
pub use legacy::{LegacyAccount, USER_ACCOUNT_TYPE, parse_legacy_accounts};
pub use normalizer::{AccountNormalizer, DroppedAccount, NormalizedAccounts};
