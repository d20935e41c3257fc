//! Frequency tables aggregated from a real-world athlete corpus.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::cdf::FrequencyTable;
use crate::error::SynthError;
use crate::numbers::floor_f64_to_u32;
use crate::position::Position;

/// Attribute frequencies observed for one position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionProfile {
    #[serde(default)]
    pub jerseys: FrequencyTable<u32>,
    #[serde(default)]
    pub heights: FrequencyTable<u32>,
    #[serde(default)]
    pub weights: FrequencyTable<u32>,
    #[serde(default)]
    pub ages: FrequencyTable<u32>,
    #[serde(default)]
    pub years_of_experience: FrequencyTable<u32>,
}

impl PositionProfile {
    fn record(&mut self, athlete: &NormalizedAthlete) {
        *self.jerseys.entry(athlete.jersey).or_default() += 1;
        *self.heights.entry(athlete.height).or_default() += 1;
        *self.weights.entry(athlete.weight).or_default() += 1;
        *self.ages.entry(athlete.age).or_default() += 1;
        *self
            .years_of_experience
            .entry(athlete.years_of_experience)
            .or_default() += 1;
    }
}

/// Everything the sampler bundle is built from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregatedPlayerStats {
    #[serde(default)]
    pub position_profile: BTreeMap<String, PositionProfile>,
    #[serde(default)]
    pub first_names: FrequencyTable<String>,
    #[serde(default)]
    pub last_names: FrequencyTable<String>,
}

impl AggregatedPlayerStats {
    /// Load aggregated stats from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Count one normalized athlete into the position and name tables.
    pub fn record(&mut self, athlete: &NormalizedAthlete) {
        self.position_profile
            .entry(athlete.position.clone())
            .or_default()
            .record(athlete);
        *self
            .first_names
            .entry(athlete.first_name.clone())
            .or_default() += 1;
        *self
            .last_names
            .entry(athlete.last_name.clone())
            .or_default() += 1;
    }

    /// Aggregate a batch of already-normalized athletes.
    #[must_use]
    pub fn from_athletes<'a>(athletes: impl IntoIterator<Item = &'a NormalizedAthlete>) -> Self {
        let mut stats = Self::default();
        for athlete in athletes {
            stats.record(athlete);
        }
        stats
    }

    #[must_use]
    pub fn profile(&self, position: Position) -> Option<&PositionProfile> {
        self.position_profile.get(position.code())
    }
}

/// Source of aggregated frequencies; the corpus itself lives outside the engine.
pub trait StatsAggregator {
    /// Produce the aggregated frequency bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying corpus cannot be read or is malformed.
    fn aggregate(&self) -> Result<AggregatedPlayerStats, SynthError>;
}

/// Pre-built stats, typically loaded from the JSON written by `draftsim aggregate`.
#[derive(Debug, Clone, Default)]
pub struct StaticStats(pub AggregatedPlayerStats);

impl StatsAggregator for StaticStats {
    fn aggregate(&self) -> Result<AggregatedPlayerStats, SynthError> {
        Ok(self.0.clone())
    }
}

/// One corpus record after validation and type coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAthlete {
    pub first_name: String,
    pub last_name: String,
    pub height: u32,
    pub weight: u32,
    pub jersey: u32,
    pub age: u32,
    pub position: String,
    pub years_of_experience: u32,
}

/// Why a corpus record was left out of the aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing or invalid position abbreviation")]
    MissingPosition,
    #[error("missing or invalid status type")]
    MissingStatus,
    #[error("free agent")]
    FreeAgent,
    #[error("missing or invalid draft year")]
    MissingDraftYear,
    #[error("draft year {0} is after the reference year")]
    FutureDraft(i64),
    #[error("draft year {0} is out of range")]
    DraftYearOutOfRange(i64),
}

/// Aggregates a `{"athletes": [...]}` corpus.
///
/// Records are skipped when they are free agents or lack a position, status or
/// draft year. Years of experience are measured against `reference_year`.
#[derive(Debug, Clone)]
pub struct CorpusAggregator {
    athletes: Vec<Value>,
    reference_year: i32,
}

impl CorpusAggregator {
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or has no `athletes` array.
    pub fn from_json(json: &str, reference_year: i32) -> Result<Self, SynthError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value, reference_year)
    }

    /// # Errors
    ///
    /// Returns an error if the value has no `athletes` array.
    pub fn from_value(value: Value, reference_year: i32) -> Result<Self, SynthError> {
        let Value::Object(mut root) = value else {
            return Err(SynthError::Corpus("root is not an object".to_string()));
        };
        match root.remove("athletes") {
            Some(Value::Array(athletes)) => Ok(Self {
                athletes,
                reference_year,
            }),
            _ => Err(SynthError::Corpus(
                "'athletes' field is not a list".to_string(),
            )),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.athletes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }

    /// Normalize every record, dropping the ones that fail validation.
    #[must_use]
    pub fn normalized(&self) -> Vec<NormalizedAthlete> {
        let mut kept = Vec::with_capacity(self.athletes.len());
        let mut skipped = 0_usize;
        for (idx, record) in self.athletes.iter().enumerate() {
            match normalize_athlete(record, self.reference_year) {
                Ok(athlete) => kept.push(athlete),
                Err(reason) => {
                    skipped += 1;
                    log::debug!("skipping athlete #{idx}: {reason}");
                }
            }
        }
        if skipped > 0 {
            log::warn!(
                "skipped {skipped} of {} corpus records during aggregation",
                self.athletes.len()
            );
        }
        kept
    }
}

impl StatsAggregator for CorpusAggregator {
    fn aggregate(&self) -> Result<AggregatedPlayerStats, SynthError> {
        let athletes = self.normalized();
        Ok(AggregatedPlayerStats::from_athletes(&athletes))
    }
}

fn number_field(record: &serde_json::Map<String, Value>, key: &str) -> u32 {
    record
        .get(key)
        .and_then(Value::as_f64)
        .map_or(0, floor_f64_to_u32)
}

fn text_field(record: &serde_json::Map<String, Value>, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn nested_str<'a>(
    record: &'a serde_json::Map<String, Value>,
    outer: &str,
    inner: &str,
) -> Option<&'a str> {
    record.get(outer)?.as_object()?.get(inner)?.as_str()
}

fn jersey_field(record: &serde_json::Map<String, Value>) -> u32 {
    match record.get("jersey") {
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        Some(Value::Number(number)) => number.as_f64().map_or(0, floor_f64_to_u32),
        _ => 0,
    }
}

/// Validate and coerce one raw corpus record.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the record must be excluded.
pub fn normalize_athlete(
    record: &Value,
    reference_year: i32,
) -> Result<NormalizedAthlete, SkipReason> {
    let record = record.as_object().ok_or(SkipReason::NotAnObject)?;

    let position = nested_str(record, "position", "abbreviation")
        .ok_or(SkipReason::MissingPosition)?
        .to_string();
    let status = nested_str(record, "status", "type").ok_or(SkipReason::MissingStatus)?;
    if status == "free-agent" {
        return Err(SkipReason::FreeAgent);
    }

    let draft_year = record
        .get("draft")
        .and_then(Value::as_object)
        .and_then(|draft| draft.get("year"))
        .and_then(Value::as_f64)
        .ok_or(SkipReason::MissingDraftYear)?;
    #[allow(clippy::cast_possible_truncation)]
    let draft_year = draft_year.trunc() as i64;
    let experience = i64::from(reference_year)
        .checked_sub(draft_year)
        .ok_or(SkipReason::DraftYearOutOfRange(draft_year))?;
    if experience < 0 {
        return Err(SkipReason::FutureDraft(draft_year));
    }
    let years_of_experience =
        u32::try_from(experience).map_err(|_| SkipReason::DraftYearOutOfRange(draft_year))?;

    Ok(NormalizedAthlete {
        first_name: text_field(record, "firstName"),
        last_name: text_field(record, "lastName"),
        height: number_field(record, "height"),
        weight: number_field(record, "weight"),
        jersey: jersey_field(record),
        age: number_field(record, "age"),
        position,
        years_of_experience,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn athlete(first: &str, position: &str, status: &str, draft: i64) -> Value {
        json!({
            "firstName": first,
            "lastName": "Tester",
            "height": 74.0,
            "weight": 221.0,
            "jersey": "12",
            "age": 27.0,
            "position": { "abbreviation": position },
            "status": { "type": status },
            "draft": { "year": draft }
        })
    }

    #[test]
    fn normalizes_well_formed_record() {
        let normalized = normalize_athlete(&athlete("Sam", "QB", "active", 2019), 2025).unwrap();
        assert_eq!(normalized.first_name, "Sam");
        assert_eq!(normalized.position, "QB");
        assert_eq!(normalized.jersey, 12);
        assert_eq!(normalized.height, 74);
        assert_eq!(normalized.years_of_experience, 6);
    }

    #[test]
    fn skip_policy_matches_exclusions() {
        assert_eq!(
            normalize_athlete(&athlete("A", "QB", "free-agent", 2019), 2025),
            Err(SkipReason::FreeAgent)
        );
        assert_eq!(
            normalize_athlete(&json!({"status": {"type": "active"}}), 2025),
            Err(SkipReason::MissingPosition)
        );
        assert_eq!(
            normalize_athlete(
                &json!({"position": {"abbreviation": "WR"}, "status": {"type": "active"}}),
                2025
            ),
            Err(SkipReason::MissingDraftYear)
        );
        assert_eq!(
            normalize_athlete(&athlete("B", "TE", "active", 2030), 2025),
            Err(SkipReason::FutureDraft(2030))
        );
        let ancient = json!({
            "position": { "abbreviation": "QB" },
            "status": { "type": "active" },
            "draft": { "year": -1e30 }
        });
        assert_eq!(
            normalize_athlete(&ancient, 2025),
            Err(SkipReason::DraftYearOutOfRange(i64::MIN))
        );
        assert_eq!(
            normalize_athlete(&athlete("C", "RB", "active", -10_000_000_000), 2025),
            Err(SkipReason::DraftYearOutOfRange(-10_000_000_000))
        );
        assert_eq!(
            normalize_athlete(&json!("nope"), 2025),
            Err(SkipReason::NotAnObject)
        );
    }

    #[test]
    fn missing_numbers_default_to_zero() {
        let record = json!({
            "position": { "abbreviation": "PK" },
            "status": { "type": "active" },
            "draft": { "year": 2025 },
            "jersey": "n/a"
        });
        let normalized = normalize_athlete(&record, 2025).unwrap();
        assert_eq!(normalized.jersey, 0);
        assert_eq!(normalized.weight, 0);
        assert_eq!(normalized.years_of_experience, 0);
        assert!(normalized.first_name.is_empty());
    }

    #[test]
    fn corpus_aggregates_by_position_and_name() {
        let corpus = json!({
            "athletes": [
                athlete("Sam", "QB", "active", 2020),
                athlete("Sam", "QB", "active", 2021),
                athlete("Lee", "RB", "active", 2022),
                athlete("Max", "RB", "free-agent", 2022),
                42
            ]
        });
        let aggregator = CorpusAggregator::from_value(corpus, 2025).unwrap();
        assert_eq!(aggregator.len(), 5);
        let stats = aggregator.aggregate().unwrap();
        assert_eq!(stats.position_profile.len(), 2);
        let qb = stats.profile(Position::Quarterback).unwrap();
        assert_eq!(qb.years_of_experience.get(&5), Some(&1));
        assert_eq!(qb.years_of_experience.get(&4), Some(&1));
        assert_eq!(qb.jerseys.get(&12), Some(&2));
        assert_eq!(stats.first_names.get("Sam"), Some(&2));
        assert_eq!(stats.first_names.get("Max"), None);
        assert_eq!(stats.last_names.get("Tester"), Some(&3));
    }

    #[test]
    fn corpus_requires_athlete_list() {
        assert!(matches!(
            CorpusAggregator::from_json(r#"{"athletes": {}}"#, 2025),
            Err(SynthError::Corpus(_))
        ));
        assert!(matches!(
            CorpusAggregator::from_json("[]", 2025),
            Err(SynthError::Corpus(_))
        ));
        assert!(matches!(
            CorpusAggregator::from_json("{", 2025),
            Err(SynthError::Json(_))
        ));
    }

    #[test]
    fn aggregated_stats_roundtrip_through_json() {
        let athletes = [
            normalize_athlete(&athlete("Sam", "QB", "active", 2020), 2025).unwrap(),
            normalize_athlete(&athlete("Lee", "WR", "active", 2024), 2025).unwrap(),
        ];
        let stats = AggregatedPlayerStats::from_athletes(&athletes);
        let json = stats.to_json_pretty().unwrap();
        assert!(json.contains("\"position_profile\""));
        assert!(json.contains("\"years_of_experience\""));
        assert_eq!(AggregatedPlayerStats::from_json(&json).unwrap(), stats);
    }
}
