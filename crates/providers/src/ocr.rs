//! Receipt OCR collaborator (`file bytes -> raw text`).

use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;

use crate::{ProviderError, join_url};

#[derive(Clone, Debug)]
pub struct OcrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(rename = "IsErroredOnProcessing", default)]
    is_errored_on_processing: bool,
}

#[derive(Debug, Deserialize)]
struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
}

impl OcrClient {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Sends the receipt image off for text extraction.
    ///
    /// The caller treats any error as "collaborator unavailable"; nothing
    /// here touches ledger state.
    pub async fn parse_receipt(&self, bytes: &[u8]) -> Result<String, ProviderError> {
        let image = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        );
        let form = [("base64Image", image.as_str()), ("OCREngine", "2")];

        let response = self
            .client
            .post(join_url(&self.base_url, "/parse/image"))
            .header("apikey", &self.api_key)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json::<OcrResponse>()
            .await?;

        if response.is_errored_on_processing {
            return Err(ProviderError::UnexpectedResponse(
                "OCR provider reported a processing error".to_string(),
            ));
        }
        response
            .parsed_results
            .into_iter()
            .next()
            .map(|result| result.parsed_text)
            .ok_or_else(|| {
                ProviderError::UnexpectedResponse("OCR provider returned no text".to_string())
            })
    }
}
