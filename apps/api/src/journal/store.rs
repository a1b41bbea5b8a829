//! Append-only journal log stored as one CSV file.
//!
//! Appends hold the write guard so records never interleave; reads share the
//! read guard so they never observe a half-written record. Guards are owned by
//! the blocking task, so a cancelled request still holds the lock until its
//! file work finishes.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::journal::models::{normalize_tags, JournalEntry};

pub const LOG_HEADER: [&str; 6] = [
    "timestamp",
    "user_id",
    "content",
    "activities",
    "tone_analysis",
    "wellbeing_score",
];

const TAG_SEPARATOR: &str = ", ";

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode journal record: {0}")]
    Encode(#[from] csv::Error),

    #[error("malformed journal row {row}: {source}")]
    Malformed {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("journal task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Row layout on disk. Field order is the header order.
#[derive(Debug, Serialize, Deserialize)]
struct LogRecord {
    timestamp: String,
    user_id: String,
    content: String,
    activities: String,
    tone_analysis: String,
    wellbeing_score: u32,
}

impl From<&JournalEntry> for LogRecord {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            timestamp: entry.timestamp.clone(),
            user_id: entry.user_id.clone(),
            content: entry.content.clone(),
            activities: entry.activities.join(TAG_SEPARATOR),
            tone_analysis: entry.tone_analysis.clone(),
            wellbeing_score: entry.wellbeing_score,
        }
    }
}

impl From<LogRecord> for JournalEntry {
    fn from(record: LogRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            user_id: record.user_id,
            content: record.content,
            activities: normalize_tags(record.activities.split(TAG_SEPARATOR)),
            tone_analysis: record.tone_analysis,
            wellbeing_score: record.wellbeing_score,
        }
    }
}

#[derive(Debug)]
pub struct JournalLog {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl JournalLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Creates the file with its header row if it is missing or empty.
    pub async fn init(&self) -> Result<(), JournalError> {
        let guard = Arc::clone(&self.lock).write_owned().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            init_blocking(&path)
        })
        .await??;
        info!("Journal log ready at {}", self.path.display());
        Ok(())
    }

    pub async fn append(&self, entry: &JournalEntry) -> Result<(), JournalError> {
        let guard = Arc::clone(&self.lock).write_owned().await;
        let path = self.path.clone();
        let record = LogRecord::from(entry);
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            append_blocking(&path, &record)
        })
        .await??;
        info!(
            "Appended journal entry for user {} (score {})",
            entry.user_id, entry.wellbeing_score
        );
        Ok(())
    }

    /// All entries in insertion order. A missing file is an empty log.
    pub async fn load(&self) -> Result<Vec<JournalEntry>, JournalError> {
        let guard = Arc::clone(&self.lock).read_owned().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            load_blocking(&path)
        })
        .await?
    }

    pub async fn latest(&self) -> Result<Option<JournalEntry>, JournalError> {
        Ok(self.load().await?.pop())
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn init_blocking(path: &Path) -> Result<(), JournalError> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata()?.len() == 0 {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(LOG_HEADER)?;
        let buf = writer.into_inner().map_err(|e| e.into_error())?;
        file.write_all(&buf)?;
        file.sync_data()?;
    }
    Ok(())
}

/// Encodes the record (plus header for a new file) in memory, then writes it
/// with a single `write_all` on an append-mode handle.
fn append_blocking(path: &Path, record: &LogRecord) -> Result<(), JournalError> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(Vec::new());
    writer.serialize(record)?;
    let buf = writer.into_inner().map_err(|e| e.into_error())?;

    file.write_all(&buf)?;
    file.sync_data()?;
    Ok(())
}

fn load_blocking(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = csv::Reader::from_reader(file);
    let mut entries = Vec::new();
    for (i, record) in reader.deserialize::<LogRecord>().enumerate() {
        let record = record.map_err(|source| JournalError::Malformed { row: i + 1, source })?;
        entries.push(JournalEntry::from(record));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str, activities: &[&str], score: u32) -> JournalEntry {
        JournalEntry::new(
            "12345".to_string(),
            content.to_string(),
            activities.iter().map(|a| a.to_string()).collect(),
            None,
            score,
        )
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = JournalLog::new(dir.path().join("journal.csv"));
        assert!(log.load().await.unwrap().is_empty());
        assert!(log.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_init_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        let log = JournalLog::new(&path);
        log.init().await.unwrap();
        log.init().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "timestamp,user_id,content,activities,tone_analysis,wellbeing_score\n"
        );
        assert!(log.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_creates_file_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("journal.csv");
        let log = JournalLog::new(&path);
        log.append(&entry("Went hiking.", &["hiking"], 80)).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,user_id,content,activities,tone_analysis,wellbeing_score")
        );
        assert_eq!(lines.count(), 1);
    }

    #[tokio::test]
    async fn test_append_then_load_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let log = JournalLog::new(dir.path().join("journal.csv"));
        let tone = serde_json::json!({"tones": [{"tone_id": "joy", "score": 0.71}]});
        let written = JournalEntry::new(
            "12345".to_string(),
            "Dinner with \"old\" friends,\nthen reading.".to_string(),
            vec!["dinner".to_string(), "reading".to_string()],
            Some(&tone),
            74,
        );
        log.append(&written).await.unwrap();

        let loaded = log.load().await.unwrap();
        assert_eq!(loaded, vec![written]);
    }

    #[tokio::test]
    async fn test_entries_load_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = JournalLog::new(dir.path().join("journal.csv"));
        for (i, score) in [10, 20, 30].into_iter().enumerate() {
            log.append(&entry(&format!("entry {i}"), &[], score)).await.unwrap();
        }
        let scores: Vec<u32> = log
            .load()
            .await
            .unwrap()
            .iter()
            .map(|e| e.wellbeing_score)
            .collect();
        assert_eq!(scores, vec![10, 20, 30]);
        assert_eq!(log.latest().await.unwrap().unwrap().wellbeing_score, 30);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(JournalLog::new(dir.path().join("journal.csv")));

        let mut handles = Vec::new();
        for i in 0..20u32 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                log.append(&entry(&format!("entry number {i}. It was fine."), &["walking"], i))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let loaded = log.load().await.unwrap();
        assert_eq!(loaded.len(), 20);
        let mut scores: Vec<u32> = loaded.iter().map(|e| e.wellbeing_score).collect();
        scores.sort();
        assert_eq!(scores, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_cancelled_appends_leave_log_readable() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(JournalLog::new(dir.path().join("journal.csv")));

        let mut aborted = Vec::new();
        for i in 0..10u32 {
            let log = Arc::clone(&log);
            let handle = tokio::spawn(async move {
                log.append(&entry(&"long entry. ".repeat(500), &["reading"], i)).await
            });
            tokio::task::yield_now().await;
            handle.abort();
            aborted.push(handle);
        }
        for handle in aborted {
            let _ = handle.await;
        }
        log.append(&entry("After the storm.", &["walking"], 99)).await.unwrap();

        let loaded = log.load().await.unwrap();
        assert_eq!(loaded.last().unwrap().wellbeing_score, 99);
        assert!(loaded[..loaded.len() - 1]
            .iter()
            .all(|e| e.content == "long entry. ".repeat(500)));
    }

    #[tokio::test]
    async fn test_malformed_row_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        std::fs::write(
            &path,
            "timestamp,user_id,content,activities,tone_analysis,wellbeing_score\n\
             2025-03-15T09:00:00Z,12345,ok,,,70\n\
             2025-03-16T09:00:00Z,12345,bad,,,not-a-number\n",
        )
        .unwrap();

        let err = JournalLog::new(&path).load().await.unwrap_err();
        assert!(matches!(err, JournalError::Malformed { row: 2, .. }));
    }

    #[tokio::test]
    async fn test_empty_activities_column_loads_as_no_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        std::fs::write(
            &path,
            "timestamp,user_id,content,activities,tone_analysis,wellbeing_score\n\
             2025-03-15T09:00:00Z,12345,quiet day,,,55\n\
             2025-03-16T09:00:00Z,12345,busy day,\"yoga, team meeting\",,65\n",
        )
        .unwrap();

        let entries = JournalLog::new(&path).load().await.unwrap();
        assert!(entries[0].activities.is_empty());
        assert_eq!(entries[1].activities, vec!["yoga", "team meeting"]);
    }
}
