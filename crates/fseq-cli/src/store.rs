// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Directory-backed dataset: one JSON file per flight record.

use fseq_core::{Dataset, FseqError, Record};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const RECORD_EXTENSION: &str = "json";

/// On-disk record layout. `null` column entries are missing samples.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordFile {
    index: Vec<i64>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

/// Decodes one record file. The record takes its name from the file stem.
pub fn load_record(path: &Path) -> Result<Record, FseqError> {
    let name = record_name(path);
    let raw = fs::read_to_string(path).map_err(|err| {
        FseqError::invalid_input(format!("failed to read '{}': {err}", path.display()))
    })?;
    parse_record(&name, &raw)
}

fn parse_record(name: &str, raw: &str) -> Result<Record, FseqError> {
    let file: RecordFile = serde_json::from_str(raw)
        .map_err(|err| FseqError::invalid_input(format!("invalid record JSON: {err}")))?;
    let columns = file
        .columns
        .into_iter()
        .map(|(column, values)| {
            let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            (column, values)
        })
        .collect();
    Record::new(name, file.index, columns)
}

fn record_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lazily loaded [`Dataset`] over the `*.json` files of a directory.
///
/// Files are ordered by name. A file that cannot be read or decoded surfaces
/// as [`FseqError::Corrupted`] at its position. Removal only drops the entry
/// from this view; files on disk are never touched.
#[derive(Clone, Debug)]
pub struct DirectoryDataset {
    root: PathBuf,
    entries: Vec<PathBuf>,
    position: usize,
}

impl DirectoryDataset {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, FseqError> {
        let root = root.into();
        let listing = fs::read_dir(&root).map_err(|err| {
            FseqError::invalid_input(format!(
                "failed to list dataset directory '{}': {err}",
                root.display()
            ))
        })?;

        let mut entries = Vec::new();
        for entry in listing {
            let path = entry
                .map_err(|err| {
                    FseqError::invalid_input(format!(
                        "failed to list dataset directory '{}': {err}",
                        root.display()
                    ))
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == RECORD_EXTENSION) {
                entries.push(path);
            }
        }
        entries.sort();
        debug!(root = %root.display(), records = entries.len(), "opened dataset directory");

        Ok(Self {
            root,
            entries,
            position: 0,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|path| record_name(path) == name)
    }
}

impl Dataset for DirectoryDataset {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    fn read_at(&mut self, position: usize) -> Result<Record, FseqError> {
        let path = self.entries.get(position).ok_or_else(|| {
            FseqError::invalid_input(format!(
                "position {position} out of range for dataset of length {}",
                self.entries.len()
            ))
        })?;
        load_record(path)
            .map_err(|err| FseqError::corrupted(position, record_name(path), err.to_string()))
    }

    fn record_names(&self) -> Vec<String> {
        self.entries.iter().map(|path| record_name(path)).collect()
    }

    fn remove_named(&mut self, name: &str) -> bool {
        match self.position_of(name) {
            Some(position) => {
                self.entries.remove(position);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, position: usize) -> Option<String> {
        if position >= self.entries.len() {
            return None;
        }
        Some(record_name(&self.entries.remove(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectoryDataset, parse_record};
    use fseq_core::{Dataset, FseqError};
    use std::fs;

    #[test]
    fn parses_nulls_as_missing() {
        let record = parse_record(
            "flight_1",
            r#"{"index": [0, 1, 2], "columns": {"CL": [0, null, 2]}}"#,
        )
        .expect("record should parse");
        assert_eq!(record.name(), "flight_1");
        assert_eq!(record.missing_count(), 1);
        assert_eq!(record.index(), &[0, 1, 2]);
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = parse_record("f", r#"{"index": [0, 1], "columns": {"CL": [0]}}"#)
            .expect_err("ragged record must fail");
        assert!(err.to_string().contains("column 'CL'"));
    }

    #[test]
    fn unreadable_file_surfaces_as_corrupted() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("a.json"),
            r#"{"index": [0], "columns": {"CL": [1]}}"#,
        )
        .expect("write a");
        fs::write(dir.path().join("b.json"), "{ not json").expect("write b");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write notes");

        let mut ds = DirectoryDataset::open(dir.path()).expect("open dataset");
        assert_eq!(ds.record_names(), vec!["a", "b"]);
        assert!(ds.read_at(0).is_ok());
        match ds.read_at(1) {
            Err(FseqError::Corrupted { position, name, .. }) => {
                assert_eq!(position, 1);
                assert_eq!(name, "b");
            }
            other => panic!("expected corrupted record, got {other:?}"),
        }
    }

    #[test]
    fn removal_leaves_files_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["a", "b", "c"] {
            fs::write(
                dir.path().join(format!("{name}.json")),
                r#"{"index": [0], "columns": {}}"#,
            )
            .expect("write record");
        }
        let mut ds = DirectoryDataset::open(dir.path()).expect("open dataset");
        assert!(ds.remove_named("b"));
        assert!(!ds.remove_named("b"));
        assert_eq!(ds.remove_at(1).as_deref(), Some("c"));
        assert_eq!(ds.record_names(), vec!["a"]);
        assert!(dir.path().join("b.json").exists());
    }

    #[test]
    fn missing_directory_is_invalid_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DirectoryDataset::open(dir.path().join("absent")).expect_err("must fail");
        assert_eq!(err.code(), "invalid_input");
    }
}
