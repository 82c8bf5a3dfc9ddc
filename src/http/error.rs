//! Error type for non-success forum API responses.

use reqwest::StatusCode;

/// A non-2xx response from the forum API.
///
/// Carries the request method and URL, the response status, and the
/// response body when one was present. Absence of a matching resource is
/// represented by callers as `None`, not by this type.
#[derive(Debug)]
pub struct HttpError {
    pub method: String,
    pub url: String,
    pub status: StatusCode,
    /// Response body text; only captured when the response announced a
    /// nonzero content-length.
    pub body: Option<String>,
}

impl HttpError {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.method,
            self.url,
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("Unknown Status")
        )?;
        if let Some(body) = &self.body {
            write!(f, "\n{}", body)?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}
