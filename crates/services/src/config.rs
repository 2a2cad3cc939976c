//! Service configuration read from the environment.

/// Default base URL when `PUBLIC_LISTING_BASE_URL` is unset.
const DEFAULT_BASE_URL: &str = "https://listings.proplens.app/l";

/// Configuration for building public share links.
#[derive(Debug, Clone)]
pub struct PublicListingConfig {
    base_url: String,
}

impl PublicListingConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read from `PUBLIC_LISTING_BASE_URL`, falling back to the default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("PUBLIC_LISTING_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }

    /// Build the public share URL for a token.
    pub fn public_url(&self, token: &str) -> String {
        format!("{}/{token}", self.base_url.trim_end_matches('/'))
    }
}
