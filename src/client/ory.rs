//! Ory admin API client
//!
//! Provides `OryClient`, a thin wrapper over `reqwest` that carries the base
//! URL and bearer credentials for the Ory project being exported.

use super::Auth;
use eyre::{Context, Result, eyre};
use reqwest::{Client, Method};
use url::Url;

/// Ory client for making admin API requests.
///
/// Paths are resolved against the base URL, so a project mounted under a
/// path prefix (`http://localhost:4434/kratos/`) keeps that prefix. Absolute
/// URLs, such as pagination cursors, are used as-is.
///
/// # Example
/// ```no_run
/// use source_migrate::client::{Auth, OryClient};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("https://project.projects.oryapis.com")?;
/// let client = OryClient::try_new(url, Auth::Bearer("ory_pat_...".to_string()))?;
///
/// let response = client.get("/admin/identities").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct OryClient {
    client: Client,
    url: Url,
}

impl OryClient {
    /// Create a new OryClient from a base URL and credentials.
    ///
    /// # Errors
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn try_new(url: Url, auth: Auth) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, "application/json".parse()?);
        if let Auth::Bearer(token) = auth {
            let mut value: reqwest::header::HeaderValue = format!("Bearer {}", token)
                .parse()
                .with_context(|| "Ory access token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, url })
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolve a path or absolute URL against the base URL.
    ///
    /// Leading slashes are stripped from relative paths so they land under
    /// the base URL's path instead of replacing it.
    pub fn resolve(&self, target: &str) -> Result<Url> {
        if let Ok(absolute) = Url::parse(target) {
            return Ok(absolute);
        }

        let mut base = self.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let relative = target.trim_start_matches('/');
        base.join(relative)
            .with_context(|| format!("Invalid path '{}' for {}", target, self.url))
    }

    /// Send a request to a path or absolute URL.
    pub async fn request(&self, method: Method, target: &str) -> Result<reqwest::Response> {
        let url = self.resolve(target)?;
        log::trace!("{} {}", method, url);

        self.client
            .request(method, url)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))
    }

    /// Helper for GET requests.
    pub async fn get(&self, target: &str) -> Result<reqwest::Response> {
        self.request(Method::GET, target).await
    }
}

impl std::fmt::Display for OryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
