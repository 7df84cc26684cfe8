use reqwest::{Client, Url};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use vaultex_primitives::error::ApiError;

/// One asset's figures as reported by the feed. Change, volume and market
/// cap are quoted against ZAR.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuote {
    pub price_zar: Decimal,
    pub price_usd: Decimal,
    pub change_24h: Decimal,
    pub volume_24h: Decimal,
    pub market_cap: Decimal,
}

/// Client for a CoinGecko-compatible `/simple/price` endpoint.
#[derive(Clone)]
pub struct PriceFeedClient {
    http: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl PriceFeedClient {
    pub fn new(
        http: Client,
        base_url: &str,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ApiError::Internal("Invalid price feed base URL".into()))?;

        Ok(Self {
            http,
            base_url,
            api_key,
            timeout,
        })
    }

    /// Fetches quotes keyed by feed id. Assets the feed omits, or reports
    /// without a price, are absent from the result.
    pub async fn fetch_quotes(
        &self,
        feed_ids: &[&str],
    ) -> Result<HashMap<String, FeedQuote>, ApiError> {
        if feed_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Internal("Invalid price feed URL path".into()))?
            .pop_if_empty()
            .extend(["simple", "price"]);
        url.query_pairs_mut()
            .append_pair("ids", &feed_ids.join(","))
            .append_pair("vs_currencies", "zar,usd")
            .append_pair("include_24hr_change", "true")
            .append_pair("include_24hr_vol", "true")
            .append_pair("include_market_cap", "true");

        let mut request = self.http.get(url).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key.expose_secret());
        }

        let resp = request.send().await.map_err(|e| {
            warn!(error = %e, "price feed unreachable");
            ApiError::Upstream("Price feed unreachable".into())
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(http_status = status.as_u16(), "price feed returned an error");
            return Err(ApiError::Upstream(format!(
                "Price feed responded with {}",
                status
            )));
        }

        let body: HashMap<String, HashMap<String, Value>> = resp.json().await.map_err(|e| {
            warn!(error = %e, "invalid price feed response");
            ApiError::Upstream("Invalid price feed response".into())
        })?;

        Ok(body
            .into_iter()
            .filter_map(|(id, fields)| Self::to_quote(&fields).map(|q| (id, q)))
            .collect())
    }

    /// Feed figures are binary floats; digits past 28 places are rounded.
    fn feed_decimal(raw: &str) -> Option<Decimal> {
        let raw = raw.trim();
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .ok()
    }

    fn to_quote(fields: &HashMap<String, Value>) -> Option<FeedQuote> {
        let field = |name: &str| -> Option<Decimal> {
            match fields.get(name)? {
                Value::Number(n) => Self::feed_decimal(&n.to_string()),
                Value::String(s) => Self::feed_decimal(s),
                _ => None,
            }
        };

        Some(FeedQuote {
            price_zar: field("zar")?,
            price_usd: field("usd")?,
            change_24h: field("zar_24h_change").unwrap_or_default(),
            volume_24h: field("zar_24h_vol").unwrap_or_default(),
            market_cap: field("zar_market_cap").unwrap_or_default(),
        })
    }
}
