//! Image URL rewriting against the resolved endpoint

use crate::core::endpoint::health::url::is_absolute_http_url;
use crate::core::endpoint::types::Endpoint;

/// Locally bundled asset shown when a record has no image
pub const DEFAULT_PLACEHOLDER: &str = "/assets/placeholder.png";

/// Rewrite a resource path into an absolute URL
///
/// Rules, first match wins:
/// 1. empty or missing → `placeholder` (served locally, never prefixed)
/// 2. already `http(s)://` → unchanged
/// 3. equal to `placeholder` → unchanged
/// 4. leading `/` → endpoint + path
/// 5. anything else → endpoint + `/` + path
///
/// Checking rule 2 before rule 4 keeps externally hosted images from being
/// prefixed twice.
pub fn rewrite_image_url(path: Option<&str>, endpoint: &Endpoint, placeholder: &str) -> String {
    let path = match path.map(str::trim) {
        None | Some("") => return placeholder.to_string(),
        Some(path) => path,
    };

    if is_absolute_http_url(path) || path == placeholder {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", endpoint, path)
    } else {
        format!("{}/{}", endpoint, path)
    }
}

/// [`rewrite_image_url`] bound to one endpoint and placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlRewriter {
    endpoint: Endpoint,
    placeholder: String,
}

impl ImageUrlRewriter {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn rewrite(&self, path: Option<&str>) -> String {
        rewrite_image_url(path, &self.endpoint, &self.placeholder)
    }
}
