//! # fantoir-scan
//!
//! Street-name statistics from the French FANTOIR registry.
//!
//! FANTOIR is a fixed-width ASCII file, one record per line. Each line is
//! a county, a city or a street, and nothing but the shape of the Rivoli
//! code in its first ten columns says which.
//!
//! ## Overview
//!
//! A run is one sequential pass over the registry:
//! - **Decode**: classify each line and cut its fixed columns
//! - **Accumulate**: city code to name, street short name to count, and
//!   every line whose short name equals a target token (`NERUDA` by default)
//! - **Enrich**: add city names and populations to the collected matches
//! - **Export**: write the match list and the frequency table as CSV
//!
//! ## Example
//!
//! ```
//! use fantoir_scan::{DecodedRecord, RecordKind};
//!
//! // Code(10) Key(1) Complete name(101) Short name
//! let line = format!("{:<11}{:<101}{}", "7500560123", "RUE PABLO NERUDA", "NERUDA");
//! let rec = DecodedRecord::from_line(&line);
//!
//! assert_eq!(rec.kind, RecordKind::Street);
//! assert_eq!(rec.city_code, "75056");
//! assert_eq!(rec.short_name, "NERUDA");
//! ```

pub mod accumulator;
pub mod config;
pub mod error;
pub mod export;
pub mod population;
pub mod record;
pub mod run;
pub mod scan;

pub use accumulator::{
    Accumulator, CityIndex, DEFAULT_TARGET, MatchCollector, MatchRecord, StreetFrequency,
    enrich_city_names,
};
pub use config::{RunConfig, Stage};
pub use error::{FantoirError, Result};
pub use export::{export_frequency, export_matches, write_frequency, write_matches};
pub use population::{
    PopulationFormat, PopulationLoader, PopulationPolicy, PopulationTable, enrich_population,
};
pub use record::{DecodedRecord, Record, RecordKind};
pub use run::{RunReport, RunState, run, run_in_memory, write_outputs};
pub use scan::{ScanCounts, ScanOutput, ScanPipeline};
