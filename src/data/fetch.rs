use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::data::series::{PricePoint, PriceSeries};

const COINGECKO_BASE: &str = "https://api.coingecko.com";

/// A failed refresh cycle. Every variant aborts the cycle; there is no retry.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api returned status {0}")]
    Status(StatusCode),

    #[error("response body is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed ohlc row {index}: {reason}")]
    Malformed { index: usize, reason: String },
}

/// CoinGecko OHLC endpoint client.
#[derive(Debug, Clone)]
pub struct OhlcClient {
    client: Client,
    base_url: String,
}

impl Default for OhlcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: COINGECKO_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetches the trailing OHLC window for one instrument.
    ///
    /// One GET per call; the server decides granularity from `days`
    /// (30 days comes back as daily candles, oldest first).
    pub async fn fetch_ohlc(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<PriceSeries, FetchError> {
        let url = format!("{}/api/v3/coins/{}/ohlc", self.base_url, coin_id);
        let days_str = days.to_string();
        let res = self
            .client
            .get(&url)
            .query(&[("vs_currency", vs_currency), ("days", &days_str)])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(FetchError::Status(res.status()));
        }

        let body = res.text().await?;
        let points = parse_ohlc(&body)?;
        debug!(rows = points.len(), coin_id, "fetched ohlc window");
        Ok(PriceSeries::new(points))
    }
}

/// Decodes the JSON array of `[timestampMillis, open, high, low, close]`
/// rows. Short rows, non-numeric fields, and out-of-range timestamps all
/// fail the parse.
pub fn parse_ohlc(body: &str) -> Result<Vec<PricePoint>, FetchError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;

    let mut points = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.len() < 5 {
            return Err(FetchError::Malformed {
                index,
                reason: format!("expected 5 fields, got {}", row.len()),
            });
        }

        let field = |pos: usize, name: &str| {
            row[pos].as_f64().ok_or_else(|| FetchError::Malformed {
                index,
                reason: format!("{name} is not a number"),
            })
        };

        let millis = row[0].as_i64().ok_or_else(|| FetchError::Malformed {
            index,
            reason: "timestamp is not an integer".to_string(),
        })?;
        let timestamp =
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| FetchError::Malformed {
                    index,
                    reason: format!("timestamp {millis} is out of range"),
                })?;

        points.push(PricePoint {
            timestamp,
            open: field(1, "open")?,
            high: field(2, "high")?,
            low: field(3, "low")?,
            close: field(4, "close")?,
        });
    }

    Ok(points)
}
