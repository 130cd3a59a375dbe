//! Currency rate collaborator (Frankfurter-style API).
//!
//! Conversions degrade to the input amount on any failure, and the rate
//! table degrades to an empty one: read endpoints backed by this client
//! never fail because the upstream did.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::Deserialize;

use crate::{ProviderError, join_url};

#[derive(Clone, Debug)]
pub struct RatesClient {
    client: Client,
    base_url: String,
}

/// Exchange rates for one base currency.
#[derive(Clone, Debug, Default)]
pub struct RateTable {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
}

impl RatesClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Converts `amount_minor` from one currency to another.
    ///
    /// On any upstream failure the input amount is returned unchanged.
    pub async fn convert(&self, from: &str, to: &str, amount_minor: i64) -> i64 {
        match self.convert_inner(from, to, amount_minor).await {
            Ok(converted) => converted,
            Err(err) => {
                tracing::error!("currency conversion failed: {err}");
                amount_minor
            }
        }
    }

    async fn convert_inner(
        &self,
        from: &str,
        to: &str,
        amount_minor: i64,
    ) -> Result<i64, ProviderError> {
        let amount = amount_minor as f64 / 100.0;
        let response = self
            .client
            .get(join_url(&self.base_url, "/latest"))
            .query(&[
                ("from", from),
                ("to", to),
                ("amount", amount.to_string().as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<LatestResponse>()
            .await?;

        // With an `amount` parameter the provider returns the converted
        // total under the target currency's key.
        let converted = response
            .rates
            .get(&to.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| {
                ProviderError::UnexpectedResponse(format!("no rate for {to} in response"))
            })?;
        Ok((converted * 100.0).round() as i64)
    }

    /// Latest rates for `base`; an empty table on failure.
    pub async fn latest(&self, base: &str) -> RateTable {
        match self.latest_inner(base).await {
            Ok(table) => table,
            Err(err) => {
                tracing::error!("exchange rate fetch failed: {err}");
                RateTable {
                    base: base.to_ascii_uppercase(),
                    rates: BTreeMap::new(),
                }
            }
        }
    }

    async fn latest_inner(&self, base: &str) -> Result<RateTable, ProviderError> {
        let response = self
            .client
            .get(join_url(&self.base_url, "/latest"))
            .query(&[("from", base)])
            .send()
            .await?
            .error_for_status()?
            .json::<LatestResponse>()
            .await?;

        Ok(RateTable {
            base: response.base.unwrap_or_else(|| base.to_ascii_uppercase()),
            rates: response.rates,
        })
    }
}
