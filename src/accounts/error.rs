use thiserror::Error;

/// Reasons a legacy account cannot be reshaped
///
/// Every one of these aborts the transform; nothing is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("identity '{identity_id}' has no email trait")]
    MissingEmail { identity_id: String },

    #[error("identity '{identity_id}' has no name.{part} trait")]
    MissingName {
        identity_id: String,
        part: &'static str,
    },

    #[error("user account '{account_id}' has no identity_id")]
    MissingIdentityId { account_id: String },

    #[error("organization account '{account_id}' has no name")]
    MissingOrganizationName { account_id: String },
}
