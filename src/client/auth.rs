/// Credentials attached to every request sent by an [`OryClient`](super::OryClient)
pub enum Auth {
    /// Ory personal access token, sent as `Authorization: Bearer <token>`
    Bearer(String),
    /// Don't send an Authorization header (local Kratos admin ports)
    None,
}

impl Auth {
    /// Build from an optional token; an empty token means no authentication
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Self::Bearer(token),
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => write!(f, "Bearer"),
            Self::None => write!(f, "None"),
        }
    }
}
