//! Post-migration account schema

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    User,
    Organization,
}

/// Account record written to `accounts.json` and the accounts table
///
/// `identity` and `email` are only present on user accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub account_id: String,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub disabled: bool,
    pub flags: Vec<String>,
    pub profile: Profile,
}

/// Public profile; `bio` and `location` serialize as `null` when unknown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}
