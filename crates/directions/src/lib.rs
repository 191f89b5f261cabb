use std::error;
use std::fmt;
use std::sync::Arc;

use polyline::PolylineError;

pub mod client;
pub mod response;

pub use client::{Directions, DirectionsClient, DirectionsCredentials};

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    /// The service answered, but with a status other than `OK`.
    Status {
        status: String,
        message: Option<String>,
    },
    NoRoute,
    Polyline(PolylineError),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            ApiError::Status { status, message } => match message {
                Some(message) => write!(f, "Directions status {}: {}", status, message),
                None => write!(f, "Directions status {}", status),
            },
            ApiError::NoRoute => write!(f, "No route found."),
            ApiError::Polyline(e) => write!(f, "{}", e),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<PolylineError> for ApiError {
    fn from(e: PolylineError) -> Self {
        ApiError::Polyline(e)
    }
}
