//! Legacy account → normalized account transform
//!
//! User accounts are joined against the exported identities by
//! `identity_id`; organizations carry their own profile fields.

use super::{Account, AccountType, LegacyAccount, Profile, TransformError};
use crate::etl::Transformer;
use crate::ory::{Identity, IdentityIndex};
use eyre::Result;

/// A user account left out of the output because its identity was not exported
///
/// `identity_id` is `None` when the legacy record held a null id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedAccount {
    pub account_id: String,
    pub identity_id: Option<String>,
}

/// Result of normalizing a whole accounts table
#[derive(Debug, Default)]
pub struct NormalizedAccounts {
    pub accounts: Vec<Account>,
    pub dropped: Vec<DroppedAccount>,
}

/// Transformer producing normalized accounts
///
/// Yields `None` for a user account whose identity is missing from the
/// index or whose `identity_id` is null; [`AccountNormalizer::normalize_all`]
/// collects those as dropped. Identities are parsed only when joined.
///
/// # Example
/// ```
/// use source_migrate::accounts::{AccountNormalizer, LegacyAccount};
/// use source_migrate::etl::Transformer;
/// use source_migrate::ory::IdentityIndex;
///
/// let normalizer = AccountNormalizer::new(IdentityIndex::new());
/// let org = LegacyAccount {
///     account_id: "radiant".to_string(),
///     account_type: "organization".to_string(),
///     disabled: false,
///     identity_id: None,
///     name: Some("Radiant Earth".to_string()),
///     description: None,
/// };
///
/// let account = normalizer.transform(org).unwrap().unwrap();
/// assert_eq!(account.profile.name, "Radiant Earth");
/// assert!(account.flags.is_empty());
/// ```
pub struct AccountNormalizer {
    identities: IdentityIndex,
}

impl AccountNormalizer {
    pub fn new(identities: IdentityIndex) -> Self {
        Self { identities }
    }

    /// Build a user account from its identity
    pub fn user_account(
        account: &LegacyAccount,
        identity: &Identity,
    ) -> Result<Account, TransformError> {
        let traits = &identity.traits;
        let email = traits
            .email
            .clone()
            .ok_or_else(|| TransformError::MissingEmail {
                identity_id: identity.id.clone(),
            })?;

        let missing_name = |part| TransformError::MissingName {
            identity_id: identity.id.clone(),
            part,
        };
        let name = traits.name.as_ref();
        let first_name = name
            .and_then(|n| n.first_name.as_deref())
            .ok_or_else(|| missing_name("first_name"))?;
        let last_name = name
            .and_then(|n| n.last_name.as_deref())
            .ok_or_else(|| missing_name("last_name"))?;

        Ok(Account {
            account_id: account.account_id.clone(),
            account_type: AccountType::User,
            identity: Some(identity.id.clone()),
            email: Some(email),
            disabled: account.disabled,
            flags: identity.flags(),
            profile: Profile {
                name: format!("{} {}", first_name, last_name),
                bio: traits.bio.clone(),
                location: traits.country.clone(),
            },
        })
    }

    /// Build an organization account from its own fields
    pub fn organization_account(account: &LegacyAccount) -> Result<Account, TransformError> {
        let name = account
            .name
            .clone()
            .ok_or_else(|| TransformError::MissingOrganizationName {
                account_id: account.account_id.clone(),
            })?;

        Ok(Account {
            account_id: account.account_id.clone(),
            account_type: AccountType::Organization,
            identity: None,
            email: None,
            disabled: account.disabled,
            flags: Vec::new(),
            profile: Profile {
                name,
                bio: account.description.clone(),
                location: None,
            },
        })
    }

    /// Normalize every account, collecting the ones dropped for lack of an identity
    ///
    /// # Errors
    /// Fails on the first account with a missing required field.
    pub fn normalize_all(&self, accounts: Vec<LegacyAccount>) -> Result<NormalizedAccounts> {
        let mut result = NormalizedAccounts::default();

        for account in accounts {
            let pending = account
                .is_user()
                .then(|| (account.account_id.clone(), account.identity_id.clone()));

            match self.transform(account)? {
                Some(normalized) => result.accounts.push(normalized),
                None => {
                    if let Some((account_id, identity_id)) = pending {
                        log::warn!(
                            "Dropping user account '{}': identity '{}' not found in export",
                            account_id,
                            identity_id.as_deref().unwrap_or("null")
                        );
                        result.dropped.push(DroppedAccount {
                            account_id,
                            identity_id,
                        });
                    }
                }
            }
        }

        Ok(result)
    }
}

impl Transformer for AccountNormalizer {
    type Input = LegacyAccount;
    type Output = Option<Account>;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        if !input.is_user() {
            return Ok(Some(Self::organization_account(&input)?));
        }

        let Some(identity_id) = input.identity_id.as_deref() else {
            return Ok(None);
        };

        match self.identities.get(identity_id) {
            Some(record) => {
                let identity = Identity::from_record(identity_id, record)?;
                Ok(Some(Self::user_account(&input, &identity)?))
            }
            None => Ok(None),
        }
    }
}
