//! Scan accumulators and their record-at-a-time trait.
//!
//! Each `Accumulator` sees every decoded record once, in file order, and
//! keeps whatever it needs. The scan pipeline owns one of each for the
//! length of a run and hands them back when the pass is over.

use crate::record::{DecodedRecord, RecordKind};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

/// Target short name collected when none is configured.
pub const DEFAULT_TARGET: &str = "NERUDA";

/// City name of a match whose code is not in the city index.
pub const UNKNOWN_CITY: &str = "unknown";

/// Population of a match whose code is not in the population table.
pub const UNKNOWN_POPULATION: &str = "0";

/// A sink that receives decoded records one at a time.
pub trait Accumulator {
    /// Observe one decoded record.
    fn accept(&mut self, record: &DecodedRecord);

    /// The display name of this accumulator.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// CityIndex
// ---------------------------------------------------------------------------

/// City code to city name. The first name seen for a code wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityIndex {
    names: IndexMap<String, String>,
}

impl CityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name unless the code is already present.
    ///
    /// Returns `true` if the entry was added.
    pub fn insert(&mut self, code: &str, name: &str) -> bool {
        match self.names.entry(code.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(name.to_string());
                true
            }
        }
    }

    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Number of distinct city codes.
    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Fold in an index built from later input. Existing names are kept.
    pub fn merge(&mut self, later: CityIndex) {
        for (code, name) in later.names {
            self.names.entry(code).or_insert(name);
        }
    }
}

impl Accumulator for CityIndex {
    fn accept(&mut self, record: &DecodedRecord) {
        if record.kind == RecordKind::City {
            self.insert(&record.city_code, &record.city_name);
        }
    }

    fn name(&self) -> &str {
        "CITY-INDEX"
    }
}

// ---------------------------------------------------------------------------
// StreetFrequency
// ---------------------------------------------------------------------------

/// Street short name to number of street records carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreetFrequency {
    counts: IndexMap<String, u64>,
}

impl StreetFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, name: &str) {
        if let Some(count) = self.counts.get_mut(name) {
            *count += 1;
        } else {
            self.counts.insert(name.to_string(), 1);
        }
    }

    pub fn count(&self, name: &str) -> Option<u64> {
        self.counts.get(name).copied()
    }

    /// Number of distinct short names.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Remove every entry whose count is below `threshold`.
    ///
    /// Returns how many entries were removed.
    pub fn filter_min(&mut self, threshold: u64) -> usize {
        let before = self.counts.len();
        self.counts.retain(|_, count| *count >= threshold);
        before - self.counts.len()
    }

    /// `(name, count)` pairs, highest count first.
    ///
    /// Equal counts keep first-insertion order.
    pub fn export_sorted_desc(&self) -> Vec<(String, u64)> {
        let mut pairs: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs
    }

    /// Add the counts of another frequency table.
    pub fn merge(&mut self, other: StreetFrequency) {
        for (name, count) in other.counts {
            *self.counts.entry(name).or_insert(0) += count;
        }
    }
}

impl Accumulator for StreetFrequency {
    fn accept(&mut self, record: &DecodedRecord) {
        if record.kind == RecordKind::Street {
            self.increment(&record.short_name);
        }
    }

    fn name(&self) -> &str {
        "STREET-FREQUENCY"
    }
}

// ---------------------------------------------------------------------------
// MatchCollector
// ---------------------------------------------------------------------------

/// A registry line whose short name equals the target token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    #[serde(rename = "City code")]
    pub city_code: String,
    #[serde(rename = "City name")]
    pub city_name: String,
    #[serde(rename = "Population")]
    pub population: String,
    #[serde(rename = "Short name")]
    pub short_name: String,
    #[serde(rename = "Complete name")]
    pub complete_name: String,
}

impl MatchRecord {
    /// A match with city name and population not yet filled in.
    pub fn from_decoded(record: &DecodedRecord) -> Self {
        Self {
            city_code: record.city_code.clone(),
            city_name: UNKNOWN_CITY.to_string(),
            population: UNKNOWN_POPULATION.to_string(),
            short_name: record.short_name.clone(),
            complete_name: record.complete_name.clone(),
        }
    }
}

/// Collects matches for an exact, case-sensitive short name.
///
/// Matching ignores the record kind.
#[derive(Debug, Clone)]
pub struct MatchCollector {
    target: String,
    matches: Vec<MatchRecord>,
}

impl Default for MatchCollector {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

impl MatchCollector {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            matches: Vec::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<MatchRecord> {
        self.matches
    }
}

impl Accumulator for MatchCollector {
    fn accept(&mut self, record: &DecodedRecord) {
        if record.short_name == self.target {
            self.matches.push(MatchRecord::from_decoded(record));
        }
    }

    fn name(&self) -> &str {
        "MATCH"
    }
}

/// Fill in city names from the index. Unmatched codes keep their name.
///
/// Returns how many matches were found in the index.
pub fn enrich_city_names(matches: &mut [MatchRecord], cities: &CityIndex) -> usize {
    let mut enriched = 0;
    for m in matches.iter_mut() {
        if let Some(name) = cities.lookup(&m.city_code) {
            m.city_name = name.to_string();
            enriched += 1;
        }
    }
    enriched
}
