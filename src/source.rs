use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::models::JobCard;

const DEFAULT_API_URL: &str = "https://api.adzuna.com/v1/api/jobs/ch/search/1";
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Fetches a bounded page of job records and maps them into the flat shape
/// the swipe engine consumes. The whole batch either succeeds or the caller
/// gets a single error; there is no partial-batch recovery.
pub struct JobSource {
    client: reqwest::blocking::Client,
    base_url: String,
    app_id: Option<String>,
    app_key: Option<String>,
    search: Option<String>,
    location: Option<String>,
}

impl JobSource {
    pub fn from_env(search: Option<String>, location: Option<String>) -> Self {
        let base_url =
            std::env::var("JOBDECK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self {
            client: reqwest::blocking::Client::new(),
            base_url,
            app_id: std::env::var("ADZUNA_APP_ID").ok(),
            app_key: std::env::var("ADZUNA_API_KEY").ok(),
            search,
            location,
        }
    }

    /// One request for up to `limit` records. Transport errors and 5xx
    /// responses are retried with doubling delay; 4xx and malformed bodies
    /// fail immediately since retrying cannot help.
    pub fn fetch_batch(&self, limit: usize) -> Result<Vec<JobCard>> {
        let mut last_err = None;
        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                let delay = RETRY_BASE_DELAY_MS * 2u64.pow(attempt - 2);
                tracing::warn!(attempt, delay_ms = delay, "retrying job batch fetch");
                std::thread::sleep(Duration::from_millis(delay));
            }
            match self.try_fetch(limit) {
                Ok(cards) => return Ok(cards),
                Err(FetchError::Fatal(e)) => return Err(e),
                Err(FetchError::Transient(e)) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow!("job batch fetch failed")))
            .context("Failed to fetch job batch after retries")
    }

    fn try_fetch(&self, limit: usize) -> Result<Vec<JobCard>, FetchError> {
        let mut query: Vec<(&str, String)> = vec![
            ("results_per_page", limit.to_string()),
            ("content-type", "application/json".to_string()),
        ];
        if let Some(id) = &self.app_id {
            query.push(("app_id", id.clone()));
        }
        if let Some(key) = &self.app_key {
            query.push(("app_key", key.clone()));
        }
        if let Some(what) = &self.search {
            query.push(("what", what.clone()));
        }
        if let Some(location) = &self.location {
            query.push(("where", location.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .context("Failed to reach job endpoint")
            .map_err(FetchError::Transient)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(FetchError::Transient(anyhow!(
                "job endpoint returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(FetchError::Fatal(anyhow!(
                "job endpoint returned {}",
                status
            )));
        }

        let batch: BatchResponse = response
            .json()
            .context("Failed to parse job batch response")
            .map_err(FetchError::Fatal)?;

        tracing::debug!(count = batch.results.len(), "job batch fetched");
        Ok(batch.results.into_iter().map(map_job).collect())
    }
}

enum FetchError {
    /// Worth another attempt: transport failure or 5xx.
    Transient(anyhow::Error),
    /// Retrying cannot help: 4xx or an unparseable body.
    Fatal(anyhow::Error),
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    results: Vec<RemoteJob>,
}

/// The remote record's nested shape, before flattening.
#[derive(Debug, Deserialize)]
struct RemoteJob {
    #[serde(deserialize_with = "id_string")]
    id: String,
    title: String,
    location: Option<RemoteName>,
    company: Option<RemoteName>,
    description: Option<String>,
    redirect_url: Option<String>,
    contract_time: Option<String>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RemoteName {
    display_name: Option<String>,
}

// Remote ids arrive as strings or bare numbers depending on the feed.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

fn map_job(remote: RemoteJob) -> JobCard {
    JobCard {
        id: remote.id,
        title: remote.title,
        company: remote
            .company
            .and_then(|c| c.display_name)
            .unwrap_or_else(|| "Unknown company".to_string()),
        location: remote
            .location
            .and_then(|l| l.display_name)
            .unwrap_or_else(|| "Unspecified".to_string()),
        description: remote.description.unwrap_or_default(),
        external_url: remote.redirect_url.unwrap_or_default(),
        salary: format_salary(remote.salary_min, remote.salary_max),
        kind: remote.contract_time.as_deref().map(contract_label),
    }
}

fn contract_label(contract_time: &str) -> String {
    match contract_time {
        "full_time" => "Full-time".to_string(),
        "part_time" => "Part-time".to_string(),
        other => other.to_string(),
    }
}

fn format_salary(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) => Some(format!("CHF {} - {}", group(min), group(max))),
        (Some(min), None) => Some(format!("CHF {}+", group(min))),
        (None, Some(max)) => Some(format!("up to CHF {}", group(max))),
        (None, None) => None,
    }
}

fn group(value: f64) -> String {
    let n = value.round() as i64;
    let digits = n.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// The bundled demo deck, for running the interface without network access.
pub fn sample_batch() -> Vec<JobCard> {
    vec![
        JobCard {
            id: "sample-1".to_string(),
            title: "Senior Software Engineer".to_string(),
            company: "TechCorp Zurich".to_string(),
            location: "Zurich".to_string(),
            description: "Join our team building next-generation financial technology \
                          solutions using Rust and cloud infrastructure."
                .to_string(),
            external_url: "https://example.com/jobs/1".to_string(),
            salary: Some("CHF 120,000 - 140,000".to_string()),
            kind: Some("Full-time".to_string()),
        },
        JobCard {
            id: "sample-2".to_string(),
            title: "Product Manager".to_string(),
            company: "InnovateCH".to_string(),
            location: "Geneva".to_string(),
            description: "Lead product strategy for our growing fintech platform, working \
                          with cross-functional teams to deliver exceptional user experiences."
                .to_string(),
            external_url: "https://example.com/jobs/2".to_string(),
            salary: Some("CHF 110,000 - 130,000".to_string()),
            kind: Some("Full-time".to_string()),
        },
        JobCard {
            id: "sample-3".to_string(),
            title: "UX Designer".to_string(),
            company: "DesignStudio Basel".to_string(),
            location: "Basel (Remote)".to_string(),
            description: "Create intuitive user experiences for B2B applications, working \
                          with a talented design team."
                .to_string(),
            external_url: "https://example.com/jobs/3".to_string(),
            salary: Some("CHF 85,000 - 105,000".to_string()),
            kind: Some("Full-time".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_nested_remote_shape_flat() {
        let body = r#"{
            "results": [
                {
                    "id": "123",
                    "title": "Rust Engineer",
                    "location": { "display_name": "Zurich, Switzerland" },
                    "company": { "display_name": "TechCorp" },
                    "description": "Build systems.",
                    "redirect_url": "https://example.com/j/123",
                    "contract_time": "full_time",
                    "salary_min": 110000,
                    "salary_max": 130000
                }
            ]
        }"#;
        let batch: BatchResponse = serde_json::from_str(body).unwrap();
        let cards: Vec<JobCard> = batch.results.into_iter().map(map_job).collect();

        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.id, "123");
        assert_eq!(card.company, "TechCorp");
        assert_eq!(card.location, "Zurich, Switzerland");
        assert_eq!(card.external_url, "https://example.com/j/123");
        assert_eq!(card.kind.as_deref(), Some("Full-time"));
        assert_eq!(card.salary.as_deref(), Some("CHF 110,000 - 130,000"));
    }

    #[test]
    fn test_numeric_id_and_missing_fields() {
        let body = r#"{
            "results": [
                { "id": 4567890123, "title": "Designer" }
            ]
        }"#;
        let batch: BatchResponse = serde_json::from_str(body).unwrap();
        let card = map_job(batch.results.into_iter().next().unwrap());

        assert_eq!(card.id, "4567890123");
        assert_eq!(card.company, "Unknown company");
        assert_eq!(card.location, "Unspecified");
        assert!(card.salary.is_none());
        assert!(card.kind.is_none());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(serde_json::from_str::<BatchResponse>("{\"items\": []}").is_err());
        assert!(serde_json::from_str::<BatchResponse>("not json").is_err());
    }

    #[test]
    fn test_contract_label() {
        assert_eq!(contract_label("full_time"), "Full-time");
        assert_eq!(contract_label("part_time"), "Part-time");
        assert_eq!(contract_label("contract"), "contract");
    }

    #[test]
    fn test_format_salary() {
        assert_eq!(
            format_salary(Some(85000.0), Some(105000.0)).as_deref(),
            Some("CHF 85,000 - 105,000")
        );
        assert_eq!(format_salary(Some(90000.0), None).as_deref(), Some("CHF 90,000+"));
        assert_eq!(
            format_salary(None, Some(1200000.0)).as_deref(),
            Some("up to CHF 1,200,000")
        );
        assert_eq!(format_salary(None, None), None);
    }

    #[test]
    fn test_sample_batch_has_unique_ids() {
        let cards = sample_batch();
        assert_eq!(cards.len(), 3);
        for (i, a) in cards.iter().enumerate() {
            for b in &cards[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
