//! End-to-end runs against registry and population files on disk.

use fantoir_scan::{
    FantoirError, PopulationFormat, PopulationPolicy, RunConfig, Stage, run, run_in_memory,
    write_outputs,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn city(code: &str, name: &str) -> String {
    format!("{code:<10} {name:<31}{:<70}", "")
}

fn street(code: &str, complete: &str, short: &str) -> String {
    format!("{code:<10} {complete:<101}{short}")
}

fn write_registry(dir: &Path) -> std::path::PathBuf {
    let mut lines = vec![
        format!("{:<120}", ""),
        format!("{:<10} {:<31}", "750", "PARIS"),
        city("750056", "PARIS"),
        street("7500560001", "RUE DE LA PAIX", "RUE DE LA PAIX"),
        street("7500560002", "RUE PABLO NERUDA", "NERUDA"),
        city("130055", "MARSEILLE"),
        city("130055", "MARSEILLE BIS"),
        street("1300550001", "AV PABLO NERUDA", "NERUDA"),
        street("1300550002", "IMPASSE X", "IMPASSE X"),
        street("9400280001", "RUE PABLO NERUDA", "NERUDA"),
    ];
    for i in 0..8 {
        lines.push(street(&format!("13005500{:02}", 10 + i), "RUE DE LA PAIX", "RUE DE LA PAIX"));
    }
    let path = dir.join("FANTOIR0721");
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

fn write_population(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("PopCommunesINSEE.csv");
    fs::write(
        &path,
        "75056;Paris;x;y;2148000\n13055;Marseille;x;y;870000\nbad;row\n",
    )
    .unwrap();
    path
}

fn full_config(dir: &TempDir) -> RunConfig {
    let registry = write_registry(dir.path());
    let population = write_population(dir.path());
    RunConfig::new(registry)
        .with_population(population)
        .with_matches_out(dir.path().join("out/neruda.csv"))
        .with_frequency_out(dir.path().join("out/streets.csv"))
        .with_stage(Stage::EnrichCity)
        .with_stage(Stage::EnrichPopulation)
        .with_stage(Stage::WriteMatches)
        .with_stage(Stage::FilterThreshold { min: 5 })
        .with_stage(Stage::WriteFrequency)
}

#[test]
fn test_full_run_writes_both_extracts() {
    let dir = TempDir::new().unwrap();
    let cfg = full_config(&dir);
    let report = run(&cfg).unwrap();

    assert_eq!(report.counts.lines, 18);
    assert_eq!(report.counts.counties, 1);
    assert_eq!(report.counts.cities, 3);
    assert_eq!(report.counts.streets, 13);
    assert_eq!(report.counts.unknown, 1);
    assert_eq!(report.distinct_cities, 2);
    assert_eq!(report.distinct_streets, 3);
    assert_eq!(report.matches, 3);
    assert_eq!(report.matches_with_city, 2);
    assert_eq!(report.matches_with_population, 2);
    assert_eq!(report.population_codes, 2);
    assert_eq!(report.population_rows_skipped, 1);
    assert_eq!(report.streets_removed, 2);
    assert_eq!(report.written.len(), 2);

    let matches = fs::read_to_string(dir.path().join("out/neruda.csv")).unwrap();
    assert_eq!(
        matches,
        "City code,City name,Population,Short name,Complete name\n\
         75056,PARIS,2148000,NERUDA,RUE PABLO NERUDA\n\
         13055,MARSEILLE,870000,NERUDA,AV PABLO NERUDA\n\
         94028,unknown,0,NERUDA,RUE PABLO NERUDA\n"
    );

    let streets = fs::read_to_string(dir.path().join("out/streets.csv")).unwrap();
    assert_eq!(streets, "RUE DE LA PAIX,9\n");
}

#[test]
fn test_scan_only_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());
    let report = run(&RunConfig::new(registry)).unwrap();
    assert_eq!(report.matches, 3);
    assert_eq!(report.matches_with_city, 0);
    assert!(report.written.is_empty());
}

#[test]
fn test_frequency_without_threshold_sorted() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());
    let out = dir.path().join("streets.csv");
    let cfg = RunConfig::new(registry)
        .with_frequency_out(&out)
        .with_stage(Stage::WriteFrequency);
    run(&cfg).unwrap();
    assert_eq!(
        fs::read_to_string(out).unwrap(),
        "RUE DE LA PAIX,9\nNERUDA,3\nIMPASSE X,1\n"
    );
}

#[test]
fn test_zero_threshold_keeps_every_street() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());
    let out = dir.path().join("streets.csv");
    let cfg = RunConfig::new(registry)
        .with_frequency_out(&out)
        .with_stage(Stage::FilterThreshold { min: 0 })
        .with_stage(Stage::WriteFrequency);
    let report = run(&cfg).unwrap();
    assert_eq!(report.streets_removed, 0);
    assert_eq!(
        fs::read_to_string(out).unwrap(),
        "RUE DE LA PAIX,9\nNERUDA,3\nIMPASSE X,1\n"
    );
}

#[test]
fn test_strict_population_aborts() {
    let dir = TempDir::new().unwrap();
    let mut cfg = full_config(&dir);
    cfg.population_policy = PopulationPolicy::Strict;
    let err = run(&cfg).unwrap_err();
    assert!(matches!(err, FantoirError::PopulationParse { row: 3, found: 2, .. }));
}

#[test]
fn test_raw_population_format() {
    let dir = TempDir::new().unwrap();
    let mut cfg = full_config(&dir);
    cfg.population_format = PopulationFormat::Raw;
    let state = run_in_memory(&cfg).unwrap();
    assert_eq!(state.matches[0].population, "2148000");
}

#[test]
fn test_failed_write_keeps_results() {
    let dir = TempDir::new().unwrap();
    let mut cfg = full_config(&dir);
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    cfg.matches_out = Some(blocker.join("neruda.csv"));

    let mut state = run_in_memory(&cfg).unwrap();
    let err = write_outputs(&cfg, &mut state).unwrap_err();
    assert!(matches!(err, FantoirError::OutputWrite { .. }));
    assert_eq!(state.matches.len(), 3);
    assert_eq!(state.matches[0].city_name, "PARIS");
}

#[test]
fn test_missing_population_file() {
    let dir = TempDir::new().unwrap();
    let mut cfg = full_config(&dir);
    cfg.population = Some(dir.path().join("nope.csv"));
    let err = run(&cfg).unwrap_err();
    assert!(err.to_string().contains("nope.csv"));
}
