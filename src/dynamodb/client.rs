//! DynamoDB client construction

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;

/// Endpoint used by `--local` when no endpoint is configured
pub const LOCAL_ENDPOINT: &str = "http://localhost:8000";

/// Where and as whom to connect to DynamoDB
///
/// Without overrides the standard AWS chain (env, profile, instance role)
/// decides region and credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamoConfig {
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
    /// Use fixed throwaway credentials, as DynamoDB Local expects
    pub local_credentials: bool,
}

impl DynamoConfig {
    /// Settings for a DynamoDB Local instance
    pub fn local(endpoint_url: Option<String>) -> Self {
        Self {
            endpoint_url: Some(endpoint_url.unwrap_or_else(|| LOCAL_ENDPOINT.to_string())),
            region: Some("local".to_string()),
            local_credentials: true,
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: Option<String>) -> Self {
        if endpoint_url.is_some() {
            self.endpoint_url = endpoint_url;
        }
        self
    }

    /// Resolve the AWS configuration and build a client
    pub async fn connect(&self) -> Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if self.local_credentials {
            loader = loader.credentials_provider(local_credentials());
        }
        if let Some(endpoint) = &self.endpoint_url {
            log::debug!("Using DynamoDB endpoint {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Client::new(&sdk_config)
    }
}

fn local_credentials() -> Credentials {
    Credentials::new("local", "local", None, None, "srcmig-local")
}

/// Client that never resolves anything from the environment, for tests
#[cfg(test)]
pub(crate) fn offline_client() -> Client {
    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("local"))
        .credentials_provider(local_credentials())
        .endpoint_url("http://127.0.0.1:9")
        .build();
    Client::from_conf(config)
}
