//! JSON-backed speech record store.
//!
//! Completed speeches are appended to a flat JSON array on disk. Every
//! operation reads the file fresh and writes it back whole -- the file is
//! small and this keeps concurrent CLI invocations from clobbering an
//! in-memory cache. A missing file reads as an empty list and is created
//! on first append.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::profile::SpeechCategory;

/// One completed speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub timestamp: DateTime<Utc>,
    pub speech_type: SpeechCategory,
    pub speaker_name: String,
    pub duration_seconds: u64,
    pub duration_formatted: String,
}

impl SpeechRecord {
    pub fn new(category: SpeechCategory, speaker_name: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            speech_type: category,
            speaker_name: speaker_name.into(),
            duration_seconds: duration_secs,
            duration_formatted: format_duration(duration_secs),
        }
    }
}

/// Format seconds as `MM:SS`.
pub fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Append-only record store over a JSON file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a completed speech and return the stored entry.
    pub fn append(
        &self,
        category: SpeechCategory,
        speaker_name: &str,
        duration_secs: u64,
    ) -> Result<SpeechRecord, RecordError> {
        let record = SpeechRecord::new(category, speaker_name, duration_secs);
        let mut records = self.all()?;
        records.push(record.clone());
        self.write(&records)?;
        Ok(record)
    }

    /// All records, oldest first.
    pub fn all(&self) -> Result<Vec<SpeechRecord>, RecordError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(RecordError::ReadFailed {
                    path: self.path.clone(),
                    source: err,
                })
            }
        };
        serde_json::from_str(&data).map_err(|err| RecordError::Malformed {
            path: self.path.clone(),
            source: err,
        })
    }

    pub fn count(&self) -> Result<usize, RecordError> {
        Ok(self.all()?.len())
    }

    pub fn by_category(&self, category: SpeechCategory) -> Result<Vec<SpeechRecord>, RecordError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| r.speech_type == category)
            .collect())
    }

    /// Records for a speaker, matched case-insensitively.
    pub fn by_speaker(&self, speaker_name: &str) -> Result<Vec<SpeechRecord>, RecordError> {
        let wanted = speaker_name.to_lowercase();
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| r.speaker_name.to_lowercase() == wanted)
            .collect())
    }

    pub fn clear(&self) -> Result<(), RecordError> {
        self.write(&[])
    }

    fn write(&self, records: &[SpeechRecord]) -> Result<(), RecordError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| RecordError::WriteFailed {
                    path: self.path.clone(),
                    source: err,
                })?;
            }
        }
        // Small file; serialize in full rather than streaming.
        let json = serde_json::to_string_pretty(records).map_err(|err| RecordError::Malformed {
            path: self.path.clone(),
            source: err,
        })?;
        fs::write(&self.path, json).map_err(|err| RecordError::WriteFailed {
            path: self.path.clone(),
            source: err,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, RecordStore) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("speech_records.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, store) = store();
        assert!(store.all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn append_then_read_back() {
        let (_dir, store) = store();
        let record = store
            .append(SpeechCategory::Prepared, "Alice", 395)
            .unwrap();
        assert_eq!(record.duration_formatted, "06:35");

        let all = store.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].speaker_name, "Alice");
        assert_eq!(all[0].speech_type, SpeechCategory::Prepared);
        assert_eq!(all[0].duration_seconds, 395);
    }

    #[test]
    fn appends_accumulate_in_order() {
        let (_dir, store) = store();
        store.append(SpeechCategory::IceBreaker, "Alice", 290).unwrap();
        store.append(SpeechCategory::Evaluation, "Bob", 160).unwrap();
        store.append(SpeechCategory::TableTopic, "Alice", 95).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].speaker_name, "Bob");
    }

    #[test]
    fn filter_by_category_and_speaker() {
        let (_dir, store) = store();
        store.append(SpeechCategory::IceBreaker, "Alice", 290).unwrap();
        store.append(SpeechCategory::Evaluation, "Bob", 160).unwrap();
        store.append(SpeechCategory::IceBreaker, "bob", 310).unwrap();

        let ice = store.by_category(SpeechCategory::IceBreaker).unwrap();
        assert_eq!(ice.len(), 2);

        // Speaker match is case-insensitive.
        let bobs = store.by_speaker("BOB").unwrap();
        assert_eq!(bobs.len(), 2);
    }

    #[test]
    fn clear_empties_the_file() {
        let (_dir, store) = store();
        store.append(SpeechCategory::Test, "Alice", 20).unwrap();
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        // The file itself still exists with an empty array.
        assert!(store.path().exists());
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(60), "01:00");
        assert_eq!(format_duration(395), "06:35");
        assert_eq!(format_duration(3600), "60:00");
    }
}
