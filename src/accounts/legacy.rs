//! Pre-migration account records

use super::TransformError;
use eyre::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

pub const USER_ACCOUNT_TYPE: &str = "user";

/// Account as stored in the legacy accounts table (after tag decoding)
///
/// `identity_id` is only meaningful for users, `name`/`description` only for
/// organizations. Any type other than `"user"` is treated as an organization.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LegacyAccount {
    pub account_id: String,
    pub account_type: String,
    pub disabled: bool,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LegacyAccount {
    pub fn is_user(&self) -> bool {
        self.account_type == USER_ACCOUNT_TYPE
    }
}

/// Parse decoded account records, naming the offending record on failure
///
/// A user record must carry an `identity_id` attribute. A null one is
/// accepted; such an account joins nothing and is dropped by the normalizer.
pub fn parse_legacy_accounts(records: Vec<Value>) -> Result<Vec<LegacyAccount>> {
    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| -> Result<LegacyAccount> {
            let label = record
                .get("account_id")
                .and_then(|v| v.as_str())
                .map(|id| format!("'{}'", id))
                .unwrap_or_else(|| format!("#{}", position));
            let has_identity_id = record.get("identity_id").is_some();
            let account: LegacyAccount = serde_json::from_value(record)
                .with_context(|| format!("Invalid legacy account {}", label))?;

            if account.is_user() && !has_identity_id {
                return Err(TransformError::MissingIdentityId {
                    account_id: account.account_id,
                }
                .into());
            }
            Ok(account)
        })
        .collect()
}
