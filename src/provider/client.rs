//! Ergast API client and response mapping.
//!
//! The Ergast schema encodes every number as a JSON string, so the response
//! structs here mirror the raw shape (`MRData -> RaceTable -> Races ->
//! Results`) and a separate mapping step parses them into typed records.
//! Fetching and parsing are split: the raw body is what the response cache
//! stores, and parsing stays testable without a network.

use crate::error::ProviderError;
use crate::models::{RawResultRecord, SessionKind};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default API endpoint. jolpica is the maintained successor to the
/// retired ergast.com service and keeps the same response schema.
pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// HTTP client for an Ergast-compatible API.
pub struct ErgastClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ErgastClient {
    /// Create a client against the given base URL with a request timeout.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// Endpoint URL for one session's classification.
    ///
    /// Returns `None` for session kinds the Ergast schema has no data for
    /// (the practice sessions).
    pub fn endpoint_url(&self, season: u16, round: u8, kind: SessionKind) -> Option<String> {
        let resource = match kind {
            SessionKind::Race => "results",
            SessionKind::Qualifying => "qualifying",
            _ => return None,
        };
        Some(format!(
            "{}/{}/{}/{}.json",
            self.base_url, season, round, resource
        ))
    }

    /// Fetch the raw response body for one session.
    ///
    /// The body is returned unparsed so the caller can store it in the
    /// response cache before mapping it.
    pub async fn fetch_raw(
        &self,
        season: u16,
        round: u8,
        kind: SessionKind,
    ) -> Result<String, ProviderError> {
        let url = self
            .endpoint_url(season, round, kind)
            .ok_or(ProviderError::NoData {
                season,
                round,
                session: kind,
            })?;

        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable {
                detail: format!("{} returned HTTP {}", url, status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Unavailable {
                detail: format!("failed to read response body: {}", e),
            })?;

        info!("Fetched {} bytes for {} r{} {}", body.len(), season, round, kind.code());
        Ok(body)
    }
}

// --- Raw Ergast response shapes ---------------------------------------------

#[derive(Debug, Deserialize)]
struct ErgastResponse {
    #[serde(rename = "MRData")]
    mr_data: MrData,
}

#[derive(Debug, Deserialize)]
struct MrData {
    #[serde(rename = "RaceTable")]
    race_table: Option<RaceTable>,
}

#[derive(Debug, Deserialize)]
struct RaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<ApiRace>,
}

#[derive(Debug, Deserialize)]
struct ApiRace {
    #[serde(rename = "raceName")]
    race_name: String,
    #[serde(rename = "Results", default)]
    results: Vec<ApiRaceResult>,
    #[serde(rename = "QualifyingResults", default)]
    qualifying_results: Vec<ApiQualifyingResult>,
}

#[derive(Debug, Deserialize)]
struct ApiRaceResult {
    #[serde(rename = "positionText")]
    position_text: String,
    points: String,
    laps: String,
    status: String,
    #[serde(rename = "Driver")]
    driver: ApiDriver,
    #[serde(rename = "Constructor")]
    constructor: ApiConstructor,
}

#[derive(Debug, Deserialize)]
struct ApiQualifyingResult {
    position: String,
    #[serde(rename = "Driver")]
    driver: ApiDriver,
    #[serde(rename = "Constructor")]
    constructor: ApiConstructor,
}

#[derive(Debug, Deserialize)]
struct ApiDriver {
    #[serde(rename = "givenName")]
    given_name: String,
    #[serde(rename = "familyName")]
    family_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiConstructor {
    name: String,
}

// --- Mapping -----------------------------------------------------------------

/// Parse a raw response body into result records plus the event name.
///
/// Works off a string (fresh fetch or cache hit alike). An absent or empty
/// race table means the API has no session at those coordinates.
pub fn parse_session(
    body: &str,
    season: u16,
    round: u8,
    kind: SessionKind,
) -> Result<(Vec<RawResultRecord>, String), ProviderError> {
    let response: ErgastResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed {
            detail: e.to_string(),
        })?;

    let races = response
        .mr_data
        .race_table
        .map(|table| table.races)
        .unwrap_or_default();

    let race = races.into_iter().next().ok_or(ProviderError::NoData {
        season,
        round,
        session: kind,
    })?;

    let records = match kind {
        SessionKind::Qualifying => race
            .qualifying_results
            .iter()
            .map(map_qualifying_result)
            .collect::<Result<Vec<_>, _>>()?,
        _ => race
            .results
            .iter()
            .map(map_race_result)
            .collect::<Result<Vec<_>, _>>()?,
    };

    debug!("Parsed {} records from '{}'", records.len(), race.race_name);
    Ok((records, race.race_name))
}

fn map_race_result(api: &ApiRaceResult) -> Result<RawResultRecord, ProviderError> {
    let driver = display_name(&api.driver);

    let points = api.points.parse::<f64>().map_err(|_| malformed_field(&driver, "points", &api.points))?;
    let laps = api.laps.parse::<u32>().map_err(|_| malformed_field(&driver, "laps", &api.laps))?;

    Ok(RawResultRecord {
        // positionText is "R", "W", "D" etc. for non-classified entrants.
        position: api.position_text.parse::<u32>().ok(),
        driver,
        team: api.constructor.name.clone(),
        status: api.status.clone(),
        points,
        laps,
    })
}

/// Qualifying rows carry no points, laps, or status in the Ergast schema;
/// they are mapped to neutral values so the downstream shape stays uniform.
fn map_qualifying_result(api: &ApiQualifyingResult) -> Result<RawResultRecord, ProviderError> {
    let driver = display_name(&api.driver);

    let position = api
        .position
        .parse::<u32>()
        .map_err(|_| malformed_field(&driver, "position", &api.position))?;

    Ok(RawResultRecord {
        position: Some(position),
        driver,
        team: api.constructor.name.clone(),
        status: "Finished".to_string(),
        points: 0.0,
        laps: 0,
    })
}

fn display_name(driver: &ApiDriver) -> String {
    format!("{} {}", driver.given_name, driver.family_name)
}

fn malformed_field(driver: &str, field: &str, value: &str) -> ProviderError {
    ProviderError::Malformed {
        detail: format!("unparseable {} '{}' for driver '{}'", field, value, driver),
    }
}
