//! HTTP clients for the external collaborators.
//!
//! Three services sit outside the core: receipt OCR, currency rates and the
//! advice generator. Each client gets its configuration injected at
//! construction. Rates and advice degrade to a deterministic fallback on
//! any upstream failure; OCR surfaces the failure so the caller can record
//! the attempt.

use thiserror::Error;

pub use advice::AdviceClient;
pub use ocr::OcrClient;
pub use rates::{RateTable, RatesClient};

mod advice;
mod ocr;
mod rates;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
