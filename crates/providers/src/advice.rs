//! Financial advice collaborator (`text -> text`).
//!
//! Backed by a Gemini-style generation endpoint when an API key is
//! configured. Without a key, or on any upstream failure, a deterministic
//! keyword-matched fallback answers instead, so the advice endpoint never
//! propagates a collaborator error.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ProviderError, join_url};

#[derive(Clone, Debug)]
pub struct AdviceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl AdviceClient {
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Answers a free-text financial question.
    pub async fn financial_advice(&self, query: &str, context: Option<&str>) -> String {
        let prompt = match context {
            Some(context) if !context.is_empty() => format!("{context} {query}"),
            _ => format!(
                "You are a professional financial advisor. Provide helpful, \
                 practical advice for this question: {query}"
            ),
        };
        self.generate_or_fallback(&prompt, query).await
    }

    /// Summarizes spending patterns from a transaction digest.
    pub async fn analyze_spending(&self, summary: &str) -> String {
        let prompt = format!(
            "Analyze this spending data and point out notable patterns and \
             one concrete saving opportunity: {summary}"
        );
        self.generate_or_fallback(&prompt, summary).await
    }

    async fn generate_or_fallback(&self, prompt: &str, query: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return fallback_advice(query);
        };
        match self.generate(api_key, prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("advice generation failed: {err}");
                fallback_advice(query)
            }
        }
    }

    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(join_url(&self.base_url, "/gemini-pro:generateContent"))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ProviderError::UnexpectedResponse("no candidates in response".to_string())
            })
    }
}

/// Static advice used whenever the generator is unreachable or unconfigured.
fn fallback_advice(query: &str) -> String {
    let query = query.to_lowercase();
    let tips: &[&str] = if query.contains("save") || query.contains("saving") {
        &[
            "Set up an automatic transfer to savings on payday.",
            "Follow the 50/30/20 rule: 50% needs, 30% wants, 20% savings.",
            "Track expenses daily to find places to cut back.",
        ]
    } else if query.contains("budget") || query.contains("groceries") || query.contains("food") {
        &[
            "Plan meals for the week and shop with a list.",
            "A typical grocery budget is 10-15% of income.",
            "Review and adjust the budget monthly.",
        ]
    } else if query.contains("debt") || query.contains("loan") {
        &[
            "List all debts with their interest rates.",
            "Pay minimums everywhere, extra on the highest rate.",
            "Avoid new debt while paying off existing balances.",
        ]
    } else if query.contains("invest") {
        &[
            "Build an emergency fund of 3-6 months of expenses first.",
            "Prefer low-cost index funds for long-term money.",
            "Do not invest money you will need within five years.",
        ]
    } else {
        &[
            "Track every expense for a month to see where money goes.",
            "Pay yourself first: move savings out before spending.",
            "Review subscriptions and cancel the ones you forgot about.",
        ]
    };

    let mut out = String::from("General guidance:\n");
    for (i, tip) in tips.iter().enumerate() {
        out.push_str(&format!("{}. {tip}\n", i + 1));
    }
    out
}
