//! Client for the National Bank of Ukraine exchange rate feed.

use anyhow::{Context, bail};
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::exchange_rate::NewExchangeRate;

pub const DEFAULT_NBU_URL: &str =
    "https://bank.gov.ua/NBUStatService/v1/statdirectory/exchange?json";

const EXCHANGE_DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Deserialize, PartialEq)]
struct XmlCurrency {
    r030: i32,
    txt: String,
    rate: String,
    cc: String,
    exchangedate: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct XmlExchange {
    #[serde(rename = "currency", default)]
    currency: Vec<XmlCurrency>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedFormat {
    Json,
    Xml,
}

pub struct NbuClient {
    client: Client,
    url: String,
}

impl NbuClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the current batch and keep only rows fit for storage.
    pub async fn fetch_rates(&self) -> anyhow::Result<Vec<NewExchangeRate>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Rate request to {} failed", self.url))?;
        if !resp.status().is_success() {
            bail!("Can't download exchange rates: {}", resp.status());
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = resp.text().await.context("Failed to read rate response")?;

        let rates = parse_feed(content_type.as_deref(), &text)?;
        let fetched = rates.len();
        let valid = validate(rates);
        debug!("Fetched {} rates, {} valid", fetched, valid.len());

        if valid.is_empty() {
            bail!("Upstream returned no usable exchange rates");
        }
        Ok(valid)
    }
}

fn detect_format(content_type: Option<&str>, body: &str) -> anyhow::Result<FeedFormat> {
    if let Some(content_type) = content_type {
        if content_type.contains("json") {
            return Ok(FeedFormat::Json);
        }
        if content_type.contains("xml") {
            return Ok(FeedFormat::Xml);
        }
    }

    match body.trim_start().chars().next() {
        Some('[') | Some('{') => Ok(FeedFormat::Json),
        Some('<') => Ok(FeedFormat::Xml),
        _ => bail!("Unrecognised exchange rate payload"),
    }
}

fn parse_feed(content_type: Option<&str>, body: &str) -> anyhow::Result<Vec<NewExchangeRate>> {
    match detect_format(content_type, body)? {
        FeedFormat::Json => {
            serde_json::from_str(body).context("Failed to parse JSON exchange rates")
        }
        FeedFormat::Xml => {
            let exchange: XmlExchange =
                quick_xml::de::from_str(body).context("Failed to parse XML exchange rates")?;
            exchange
                .currency
                .into_iter()
                .map(|c| -> anyhow::Result<NewExchangeRate> {
                    let rate = normalize_decimal_string(&c.rate)
                        .parse::<f64>()
                        .with_context(|| format!("Invalid rate {:?} for {}", c.rate, c.cc))?;
                    Ok(NewExchangeRate {
                        r030: c.r030,
                        txt: c.txt,
                        rate,
                        cc: c.cc,
                        exchangedate: c.exchangedate,
                    })
                })
                .collect()
        }
    }
}

fn normalize_decimal_string(s: &str) -> String {
    s.trim().replace(',', ".")
}

fn validate(rates: Vec<NewExchangeRate>) -> Vec<NewExchangeRate> {
    rates
        .into_iter()
        .filter(|r| {
            if r.cc.trim().is_empty() {
                warn!("Dropping rate {} with empty currency code", r.r030);
                return false;
            }
            if !r.rate.is_finite() || r.rate <= 0.0 {
                warn!("Dropping {} with non-positive rate {}", r.cc, r.rate);
                return false;
            }
            if NaiveDate::parse_from_str(&r.exchangedate, EXCHANGE_DATE_FORMAT).is_err() {
                warn!("Dropping {} with bad date {:?}", r.cc, r.exchangedate);
                return false;
            }
            true
        })
        .collect()
}
