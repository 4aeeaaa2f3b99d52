//! Identities API extractor
//!
//! Walks every page of GET /admin/identities, following the `link` header.

use super::next_page_url;
use crate::client::OryClient;
use crate::etl::Extractor;
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::collections::HashSet;

const IDENTITIES_PATH: &str = "/admin/identities";

/// One page of the identity listing
#[derive(Debug)]
pub struct IdentityPage {
    pub identities: Vec<Value>,
    pub next: Option<String>,
}

/// Extractor for every identity in an Ory project
///
/// Records are returned exactly as Ory serves them.
///
/// # Example
/// ```no_run
/// use source_migrate::client::{Auth, OryClient};
/// use source_migrate::etl::Extractor;
/// use source_migrate::ory::IdentitiesExtractor;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("http://localhost:4434")?;
/// let client = OryClient::try_new(url, Auth::None)?;
///
/// let extractor = IdentitiesExtractor::new(client).with_page_size(500);
/// let identities = extractor.extract().await?;
/// # Ok(())
/// # }
/// ```
pub struct IdentitiesExtractor {
    client: OryClient,
    page_size: Option<u32>,
}

impl IdentitiesExtractor {
    pub fn new(client: OryClient) -> Self {
        Self {
            client,
            page_size: None,
        }
    }

    /// Ask Ory for pages of this size instead of its default
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    fn first_page(&self) -> String {
        match self.page_size {
            Some(size) => format!("{}?page_size={}", IDENTITIES_PATH, size),
            None => IDENTITIES_PATH.to_string(),
        }
    }

    /// Fetch one page and the cursor to the page after it
    pub async fn fetch_page(&self, target: &str) -> Result<IdentityPage> {
        log::debug!("Fetching identities from {}", target);

        let response = self
            .client
            .get(target)
            .await
            .with_context(|| format!("Failed to fetch identities from {}", target))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eyre::bail!("Failed to fetch identities ({}): {}", status, body);
        }

        // A proxy may split the links over several header lines
        let link = response
            .headers()
            .get_all(reqwest::header::LINK)
            .iter()
            .map(|value| value.to_str().with_context(|| "Link header is not valid UTF-8"))
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        let next = next_page_url(&link);

        let identities: Vec<Value> = response
            .json()
            .await
            .with_context(|| "Failed to parse identities response")?;

        Ok(IdentityPage { identities, next })
    }
}

impl Extractor for IdentitiesExtractor {
    type Item = Value;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        let mut identities = Vec::new();
        let mut seen = HashSet::new();
        let mut target = Some(self.first_page());
        let mut pages = 0usize;

        while let Some(current) = target.take() {
            let url = self.client.resolve(&current)?;
            if url.origin() != self.client.url().origin() {
                eyre::bail!(
                    "Refusing to follow pagination cursor to another origin: {}",
                    url
                );
            }
            if !seen.insert(url.to_string()) {
                eyre::bail!("Pagination cursor loops back to {}", url);
            }

            let page = self.fetch_page(url.as_str()).await?;
            pages += 1;
            log::debug!(
                "Page {}: {} identities{}",
                pages,
                page.identities.len(),
                if page.next.is_some() { "" } else { " (last)" }
            );

            identities.extend(page.identities);
            target = page.next;
        }

        log::info!(
            "Fetched {} identities in {} page(s) from {}",
            identities.len(),
            pages,
            self.client.url().bright_black()
        );

        Ok(identities)
    }
}
