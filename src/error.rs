//! Error types for provider configuration and API calls

use std::fmt;

use thiserror::Error;

/// An error reported by (or on the way to) the Bare Metal Cloud API.
///
/// Carries whatever the service gave us: the HTTP status, the service
/// error code and message from the JSON error body, and the
/// `opc-request-id` so operators can correlate with service-side logs.
/// Requests that never produced a response have no status.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
    pub request_id: Option<String>,
}

impl ApiError {
    /// Error for a request that failed before any response arrived.
    pub fn transport(err: &reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            code: None,
            message: err.to_string(),
            request_id: None,
        }
    }

    /// Error raised locally while assembling or decoding a request.
    pub fn request(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
            request_id: None,
        }
    }

    /// Whether a retry could plausibly change the outcome.
    ///
    /// 404 is in the set: the service is eventually consistent and a
    /// freshly created resource can 404 for a short window. 429 and the
    /// transient 5xx family are the usual throttling/recovery cases. A
    /// missing status means the request never completed (connect reset,
    /// timeout), which is worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self.status {
            None => true,
            Some(404 | 429 | 500 | 502 | 503 | 504) => true,
            Some(_) => false,
        }
    }

    pub(crate) fn after_attempts(mut self, attempts: u32) -> Self {
        self.message = format!("{} (gave up after {} attempts)", self.message, attempts);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {})", status)?;
        }
        if let Some(code) = &self.code {
            write!(f, " (code {})", code)?;
        }
        if let Some(id) = &self.request_id {
            write!(f, " (opc-request-id {})", id)?;
        }
        Ok(())
    }
}

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Missing required setting: {setting}")]
    MissingCredential { setting: String },

    #[error("Invalid key material: {reason}")]
    KeyMaterial { reason: String },

    #[error("Client construction failed: {reason}")]
    ClientConstruction { reason: String },

    #[error("Transient service error: {0}")]
    Transient(ApiError),

    #[error("Service error: {0}")]
    Terminal(ApiError),

    #[error("Unknown type: {type_name}")]
    UnknownType { type_name: String },
}

impl ProviderError {
    pub fn missing_credential(setting: impl Into<String>) -> Self {
        Self::MissingCredential {
            setting: setting.into(),
        }
    }

    pub fn key_material(reason: impl Into<String>) -> Self {
        Self::KeyMaterial {
            reason: reason.into(),
        }
    }

    pub fn client_construction(reason: impl Into<String>) -> Self {
        Self::ClientConstruction {
            reason: reason.into(),
        }
    }

    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// True for errors the retry loop would have absorbed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
