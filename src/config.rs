//! Run configuration: which stages to run and where their files live.
//!
//! Stages always execute in a fixed order, whatever order they were added
//! in:
//!
//! ```text
//! SCAN -> ENRICH-CITY -> ENRICH-POPULATION -> WRITE-MATCHES
//!      -> FILTER-THRESHOLD -> WRITE-FREQUENCY
//! ```
//!
//! The whole configuration is checked by [`RunConfig::validate`] before any
//! file is opened.

use crate::accumulator::DEFAULT_TARGET;
use crate::error::{FantoirError, Result};
use crate::population::{PopulationFormat, PopulationPolicy};
use std::path::PathBuf;

/// One optional step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Read the registry and build the accumulators.
    Scan,
    /// Fill match city names from the city index.
    EnrichCity,
    /// Fill match populations from the population registry.
    EnrichPopulation,
    /// Write the match extract.
    WriteMatches,
    /// Drop street names seen fewer than `min` times.
    FilterThreshold { min: u64 },
    /// Write the frequency extract.
    WriteFrequency,
}

impl Stage {
    /// Get the stage name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Scan => "SCAN",
            Stage::EnrichCity => "ENRICH-CITY",
            Stage::EnrichPopulation => "ENRICH-POPULATION",
            Stage::WriteMatches => "WRITE-MATCHES",
            Stage::FilterThreshold { .. } => "FILTER-THRESHOLD",
            Stage::WriteFrequency => "WRITE-FREQUENCY",
        }
    }

    fn same_kind(&self, other: &Stage) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub registry: PathBuf,
    pub population: Option<PathBuf>,
    pub population_format: PopulationFormat,
    pub population_policy: PopulationPolicy,
    pub target: String,
    pub matches_out: Option<PathBuf>,
    pub frequency_out: Option<PathBuf>,
    pub stages: Vec<Stage>,
}

impl RunConfig {
    /// A configuration that only scans `registry` for the default target.
    pub fn new(registry: impl Into<PathBuf>) -> Self {
        Self {
            registry: registry.into(),
            population: None,
            population_format: PopulationFormat::default(),
            population_policy: PopulationPolicy::default(),
            target: DEFAULT_TARGET.to_string(),
            matches_out: None,
            frequency_out: None,
            stages: vec![Stage::Scan],
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_population(mut self, path: impl Into<PathBuf>) -> Self {
        self.population = Some(path.into());
        self
    }

    pub fn with_matches_out(mut self, path: impl Into<PathBuf>) -> Self {
        self.matches_out = Some(path.into());
        self
    }

    pub fn with_frequency_out(mut self, path: impl Into<PathBuf>) -> Self {
        self.frequency_out = Some(path.into());
        self
    }

    /// Whether a stage of the same kind is configured.
    pub fn has(&self, stage: Stage) -> bool {
        self.stages.iter().any(|s| s.same_kind(&stage))
    }

    /// Configured threshold, if any.
    pub fn threshold(&self) -> Option<u64> {
        self.stages.iter().find_map(|s| match s {
            Stage::FilterThreshold { min } => Some(*min),
            _ => None,
        })
    }

    /// Check the configuration before any I/O.
    pub fn validate(&self) -> Result<()> {
        for (i, stage) in self.stages.iter().enumerate() {
            if self.stages[..i].iter().any(|s| s.same_kind(stage)) {
                return Err(config_err(format!("{} configured more than once", stage.name())));
            }
        }

        if !self.has(Stage::Scan) {
            return Err(config_err("SCAN is required; every other stage reads its output"));
        }
        if self.target.trim().is_empty() {
            return Err(config_err("target token must not be empty"));
        }
        if self.has(Stage::EnrichPopulation) && self.population.is_none() {
            return Err(config_err("ENRICH-POPULATION requires a population file"));
        }
        if self.has(Stage::WriteMatches) && self.matches_out.is_none() {
            return Err(config_err("WRITE-MATCHES requires an output path"));
        }
        if self.has(Stage::WriteFrequency) && self.frequency_out.is_none() {
            return Err(config_err("WRITE-FREQUENCY requires an output path"));
        }
        if self.threshold().is_some() && !self.has(Stage::WriteFrequency) {
            return Err(config_err("FILTER-THRESHOLD only applies to WRITE-FREQUENCY"));
        }
        Ok(())
    }
}

fn config_err(msg: impl Into<String>) -> FantoirError {
    FantoirError::Config(msg.into())
}
