//! Population registry loading and the population join.
//!
//! Rows are semicolon-separated: `code;name;_;_;population`. The population
//! is kept as the raw source text.

use crate::accumulator::MatchRecord;
use crate::error::{FantoirError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// Minimum number of `;`-separated fields in a population row.
pub const MIN_FIELDS: usize = 5;

/// How rows are framed in the population file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopulationFormat {
    /// Comma-delimited CSV whose first column holds the `;`-joined row.
    #[default]
    Wrapped,
    /// Each text line is the `;`-joined row.
    Raw,
}

/// What to do with a row that has too few fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopulationPolicy {
    /// Log a warning, remember the row and keep loading.
    #[default]
    Skip,
    /// Fail the whole load.
    Strict,
}

/// A row that was skipped under [`PopulationPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based row number.
    pub row: usize,
    /// Fields actually found.
    pub found: usize,
}

/// City code to population, as loaded from the population registry.
#[derive(Debug, Clone, Default)]
pub struct PopulationTable {
    populations: HashMap<String, String>,
    skipped: Vec<SkippedRow>,
}

impl PopulationTable {
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.populations.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// Add one `;`-separated row. Later rows overwrite earlier codes.
    fn add_row(
        &mut self,
        row: &str,
        row_no: usize,
        path: &Path,
        policy: PopulationPolicy,
    ) -> Result<()> {
        let fields: Vec<&str> = row.splitn(MIN_FIELDS, ';').collect();
        if fields.len() < MIN_FIELDS {
            let err = FantoirError::PopulationParse {
                path: path.to_path_buf(),
                row: row_no,
                found: fields.len(),
            };
            return match policy {
                PopulationPolicy::Strict => Err(err),
                PopulationPolicy::Skip => {
                    warn!("{err}; row skipped");
                    self.skipped.push(SkippedRow {
                        row: row_no,
                        found: fields.len(),
                    });
                    Ok(())
                }
            };
        }
        self.populations
            .insert(fields[0].to_string(), fields[4].to_string());
        Ok(())
    }
}

/// Loads population tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationLoader {
    format: PopulationFormat,
    policy: PopulationPolicy,
}

impl PopulationLoader {
    pub fn new(format: PopulationFormat, policy: PopulationPolicy) -> Self {
        Self { format, policy }
    }

    /// Open and load the population file at `path`.
    pub fn load_path(&self, path: &Path) -> Result<PopulationTable> {
        let file = File::open(path).map_err(|source| FantoirError::InputNotFound {
            what: "population",
            path: path.to_path_buf(),
            source,
        })?;
        self.load(BufReader::new(file), path)
    }

    /// Load from any reader. `path` is only used in messages.
    pub fn load<R: BufRead>(&self, reader: R, path: &Path) -> Result<PopulationTable> {
        let table = match self.format {
            PopulationFormat::Wrapped => self.load_wrapped(reader, path)?,
            PopulationFormat::Raw => self.load_raw(reader, path)?,
        };
        info!(
            path = %path.display(),
            codes = table.len(),
            skipped = table.skipped.len(),
            "population table loaded"
        );
        Ok(table)
    }

    fn load_wrapped<R: Read>(&self, reader: R, path: &Path) -> Result<PopulationTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut table = PopulationTable::default();
        for (idx, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|source| FantoirError::PopulationCsv {
                path: path.to_path_buf(),
                source,
            })?;
            let Some(row) = record.get(0) else { continue };
            if row.is_empty() && record.len() <= 1 {
                continue;
            }
            // Blank lines are skipped by the CSV reader, so count file lines.
            let row_no = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);
            table.add_row(row, row_no, path, self.policy)?;
        }
        Ok(table)
    }

    fn load_raw<R: BufRead>(&self, reader: R, path: &Path) -> Result<PopulationTable> {
        let mut table = PopulationTable::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| FantoirError::Read {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
            let row = line.trim_end_matches('\r');
            if row.is_empty() {
                continue;
            }
            table.add_row(row, idx + 1, path, self.policy)?;
        }
        Ok(table)
    }
}

/// Fill in populations from the table. Unmatched codes keep their value.
///
/// Returns how many matches were found in the table.
pub fn enrich_population(matches: &mut [MatchRecord], table: &PopulationTable) -> usize {
    let mut enriched = 0;
    for m in matches.iter_mut() {
        if let Some(pop) = table.lookup(&m.city_code) {
            m.population = pop.to_string();
            enriched += 1;
        }
    }
    enriched
}
