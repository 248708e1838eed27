//! Single-pass registry scan.
//!
//! Reads the registry one line at a time, decodes each line and pushes the
//! decoded record through every accumulator before reading the next line.

use crate::accumulator::{
    Accumulator, CityIndex, DEFAULT_TARGET, MatchCollector, MatchRecord, StreetFrequency,
};
use crate::error::{FantoirError, Result};
use crate::record::{DecodedRecord, Record, RecordKind};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Line counts by kind for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCounts {
    pub lines: usize,
    pub counties: usize,
    pub cities: usize,
    pub streets: usize,
    pub unknown: usize,
}

impl ScanCounts {
    fn record(&mut self, kind: RecordKind) {
        self.lines += 1;
        match kind {
            RecordKind::County => self.counties += 1,
            RecordKind::City => self.cities += 1,
            RecordKind::Street => self.streets += 1,
            RecordKind::Unknown => self.unknown += 1,
        }
    }
}

/// Everything a scan accumulates.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub city_index: CityIndex,
    pub street_frequency: StreetFrequency,
    pub matches: Vec<MatchRecord>,
    pub counts: ScanCounts,
}

/// Drives one pass over a registry.
#[derive(Debug, Clone)]
pub struct ScanPipeline {
    target: String,
}

impl Default for ScanPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

impl ScanPipeline {
    /// Pipeline collecting matches for `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Open and scan the registry at `path`.
    pub fn scan_path(&self, path: &Path) -> Result<ScanOutput> {
        let file = File::open(path).map_err(|source| FantoirError::InputNotFound {
            what: "registry",
            path: path.to_path_buf(),
            source,
        })?;
        self.scan(BufReader::new(file), path)
    }

    /// Scan every line of `reader`. `path` is only used in error messages.
    ///
    /// Each call starts from empty accumulators.
    pub fn scan<R: BufRead>(&self, mut reader: R, path: &Path) -> Result<ScanOutput> {
        let started = Instant::now();
        let mut cities = CityIndex::new();
        let mut streets = StreetFrequency::new();
        let mut collector = MatchCollector::new(self.target.clone());
        let mut counts = ScanCounts::default();

        debug!(
            path = %path.display(),
            target = %self.target,
            sinks = ?[cities.name(), streets.name(), collector.name()],
            "scanning registry"
        );

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let line_no = counts.lines + 1;
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| FantoirError::Read {
                    path: path.to_path_buf(),
                    line: line_no,
                    source,
                })?;
            if n == 0 {
                break;
            }

            let line = ascii_line(&buf).ok_or_else(|| FantoirError::Decode {
                path: path.to_path_buf(),
                line: line_no,
            })?;
            let decoded = DecodedRecord::decode(&Record::from_line(line));
            counts.record(decoded.kind);

            let sinks: [&mut dyn Accumulator; 3] = [&mut cities, &mut streets, &mut collector];
            for sink in sinks {
                sink.accept(&decoded);
            }
        }

        info!(
            lines = counts.lines,
            cities = counts.cities,
            streets = counts.streets,
            matches = collector.matches().len(),
            elapsed = ?started.elapsed(),
            "registry scan complete"
        );

        Ok(ScanOutput {
            city_index: cities,
            street_frequency: streets,
            matches: collector.into_matches(),
            counts,
        })
    }
}

fn ascii_line(bytes: &[u8]) -> Option<&str> {
    if bytes.is_ascii() {
        std::str::from_utf8(bytes).ok()
    } else {
        None
    }
}
