//! Executes a validated [`RunConfig`].

use crate::accumulator::{CityIndex, MatchRecord, StreetFrequency, enrich_city_names};
use crate::config::{RunConfig, Stage};
use crate::error::Result;
use crate::export::{export_frequency, export_matches};
use crate::population::{PopulationLoader, enrich_population};
use crate::scan::{ScanCounts, ScanPipeline};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub counts: ScanCounts,
    pub distinct_cities: usize,
    pub distinct_streets: usize,
    pub matches: usize,
    pub matches_with_city: usize,
    pub matches_with_population: usize,
    pub population_codes: usize,
    pub population_rows_skipped: usize,
    pub streets_removed: usize,
    pub written: Vec<PathBuf>,
}

/// In-memory results of a run, kept even if a later write fails.
#[derive(Debug, Clone)]
pub struct RunState {
    pub city_index: CityIndex,
    pub street_frequency: StreetFrequency,
    pub matches: Vec<MatchRecord>,
    pub report: RunReport,
}

/// Validate `config` and run every configured stage.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let mut state = run_in_memory(config)?;
    write_outputs(config, &mut state)?;
    Ok(state.report)
}

/// Run the stages that do not write files.
pub fn run_in_memory(config: &RunConfig) -> Result<RunState> {
    config.validate()?;

    let out = ScanPipeline::new(config.target.clone()).scan_path(&config.registry)?;
    let mut state = RunState {
        report: RunReport {
            counts: out.counts,
            distinct_cities: out.city_index.size(),
            distinct_streets: out.street_frequency.len(),
            matches: out.matches.len(),
            ..RunReport::default()
        },
        city_index: out.city_index,
        street_frequency: out.street_frequency,
        matches: out.matches,
    };

    if config.has(Stage::EnrichCity) {
        debug!(stage = Stage::EnrichCity.name(), "running stage");
        state.report.matches_with_city = enrich_city_names(&mut state.matches, &state.city_index);
        info!(
            enriched = state.report.matches_with_city,
            matches = state.matches.len(),
            "city names added to matches"
        );
    }

    if config.has(Stage::EnrichPopulation)
        && let Some(path) = &config.population
    {
        debug!(stage = Stage::EnrichPopulation.name(), "running stage");
        let table = PopulationLoader::new(config.population_format, config.population_policy)
            .load_path(path)?;
        if table.is_empty() {
            warn!(path = %path.display(), "population table is empty; no match will be enriched");
        }
        state.report.population_codes = table.len();
        state.report.population_rows_skipped = table.skipped().len();
        state.report.matches_with_population = enrich_population(&mut state.matches, &table);
        info!(
            enriched = state.report.matches_with_population,
            matches = state.matches.len(),
            "populations added to matches"
        );
    }

    Ok(state)
}

/// Run the write stages, plus the threshold filter that precedes the
/// frequency write.
pub fn write_outputs(config: &RunConfig, state: &mut RunState) -> Result<()> {
    if config.has(Stage::WriteMatches)
        && let Some(path) = &config.matches_out
    {
        export_matches(path, &state.matches)?;
        state.report.written.push(path.clone());
    }

    if let Some(min) = config.threshold() {
        let removed = state.street_frequency.filter_min(min);
        state.report.streets_removed = removed;
        info!(min, removed, kept = state.street_frequency.len(), "street names filtered");
    }

    if config.has(Stage::WriteFrequency)
        && let Some(path) = &config.frequency_out
    {
        let rows = state.street_frequency.export_sorted_desc();
        export_frequency(path, &rows)?;
        state.report.written.push(path.clone());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FantoirError;

    #[test]
    fn test_invalid_config_fails_before_io() {
        // The registry does not exist, but validation must fail first.
        let cfg = RunConfig::new("/nonexistent/registry").with_stage(Stage::WriteMatches);
        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, FantoirError::Config(_)));
    }

    #[test]
    fn test_missing_registry() {
        let cfg = RunConfig::new("/nonexistent/registry");
        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, FantoirError::InputNotFound { .. }));
    }
}
