//! Ory admin API client and authentication.
//!
//! This module provides the [`OryClient`] used by the identity export,
//! along with the [`Auth`] credentials it sends.

mod auth;
mod ory;

pub use auth::Auth;
pub use ory::OryClient;
