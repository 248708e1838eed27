//! CSV extracts: the match list and the street frequency table.

use crate::accumulator::MatchRecord;
use crate::error::{FantoirError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write matches with a `City code,City name,Population,Short name,Complete name` header.
pub fn write_matches<W: Write>(writer: W, matches: &[MatchRecord]) -> csv::Result<()> {
    let mut w = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    if matches.is_empty() {
        w.write_record(["City code", "City name", "Population", "Short name", "Complete name"])?;
    }
    for m in matches {
        w.serialize(m)?;
    }
    w.flush()?;
    Ok(())
}

/// Write `name,count` rows with no header, in the order given.
pub fn write_frequency<W: Write>(writer: W, rows: &[(String, u64)]) -> csv::Result<()> {
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    for (name, count) in rows {
        w.write_record([name.as_str(), count.to_string().as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Write the match extract to `path`, creating parent directories.
pub fn export_matches(path: &Path, matches: &[MatchRecord]) -> Result<()> {
    let file = create(path)?;
    write_matches(file, matches).map_err(|source| FantoirError::OutputCsv {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = matches.len(), "match extract written");
    Ok(())
}

/// Write the frequency extract to `path`, creating parent directories.
pub fn export_frequency(path: &Path, rows: &[(String, u64)]) -> Result<()> {
    let file = create(path)?;
    write_frequency(file, rows).map_err(|source| FantoirError::OutputCsv {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = rows.len(), "frequency extract written");
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    let write_err = |source: std::io::Error| FantoirError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    File::create(path).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> csv::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_matches_header_and_rows() {
        let matches = vec![MatchRecord {
            city_code: "75056".to_string(),
            city_name: "PARIS".to_string(),
            population: "2148000".to_string(),
            short_name: "NERUDA".to_string(),
            complete_name: "RUE PABLO NERUDA".to_string(),
        }];
        let out = to_string(|buf| write_matches(buf, &matches));
        assert_eq!(
            out,
            "City code,City name,Population,Short name,Complete name\n\
             75056,PARIS,2148000,NERUDA,RUE PABLO NERUDA\n"
        );
    }

    #[test]
    fn test_write_matches_empty_still_has_header() {
        let out = to_string(|buf| write_matches(buf, &[]));
        assert_eq!(out, "City code,City name,Population,Short name,Complete name\n");
    }

    #[test]
    fn test_write_frequency_no_header() {
        let rows = vec![
            ("RUE DE LA PAIX".to_string(), 10),
            ("PLACE, DU MARCHE".to_string(), 4),
        ];
        let out = to_string(|buf| write_frequency(buf, &rows));
        assert_eq!(out, "RUE DE LA PAIX,10\n\"PLACE, DU MARCHE\",4\n");
    }

    #[test]
    fn test_export_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = export_frequency(&blocker.join("out.csv"), &[]).unwrap_err();
        assert!(matches!(err, FantoirError::OutputWrite { .. }));
    }
}
