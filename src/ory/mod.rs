//! Ory identity export
//!
//! Extracts every identity from the admin API and writes them to disk as an
//! id → record map. The typed [`Identity`] view is what the account
//! transform joins against.

mod extractor;
mod identity;
mod index;
mod link_header;

pub use extractor::{IdentitiesExtractor, IdentityPage};
pub use identity::{Identity, IdentityIndex, NameTraits, PublicMetadata, Traits};
pub use index::{IdentityMapWriter, index_by_id};
pub use link_header::{LinkEntry, next_page_url, parse_link_header};
