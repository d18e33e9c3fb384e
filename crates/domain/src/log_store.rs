use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::{ExerciseID, StorageError, ValidationError};

/// Durable storage for the complete sequence of log entries.
#[allow(clippy::missing_errors_doc)]
pub trait LogRepository {
    fn read_log_entries(&self) -> Result<Vec<LogEntry>, StorageError>;
    fn write_log_entries(&self, entries: &[LogEntry]) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub date: DateTime<Utc>,
    pub exercise_id: ExerciseID,
    pub weight: String,
    pub notes: Option<String>,
}

/// The weights logged per exercise.
///
/// The store is append-only. Every change writes the whole sequence back to the repository.
pub struct ExerciseLog<R> {
    repository: R,
    entries: Vec<LogEntry>,
}

impl<R: LogRepository> ExerciseLog<R> {
    /// Loads the persisted entries. Missing or unreadable data results in an empty log.
    pub fn new(repository: R) -> Self {
        let entries = match repository.read_log_entries() {
            Ok(entries) => entries,
            Err(err) => {
                debug!("discarding persisted exercise log: {err}");
                Vec::new()
            }
        };
        Self {
            repository,
            entries,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Appends an entry stamped with the current time.
    pub fn append(
        &mut self,
        exercise_id: ExerciseID,
        weight: &str,
        notes: Option<&str>,
    ) -> Result<LogEntry, StorageError> {
        self.append_at(Utc::now(), exercise_id, weight, notes)
    }

    /// Appends an entry with an explicit time stamp.
    ///
    /// The entry stays in memory even if persisting fails.
    pub fn append_at(
        &mut self,
        date: DateTime<Utc>,
        exercise_id: ExerciseID,
        weight: &str,
        notes: Option<&str>,
    ) -> Result<LogEntry, StorageError> {
        let entry = LogEntry {
            date,
            exercise_id,
            weight: weight.to_string(),
            notes: notes.map(ToString::to_string),
        };
        self.entries.push(entry.clone());

        if let Err(err) = self.repository.write_log_entries(&self.entries) {
            warn!("failed to persist exercise log: {err}");
            return Err(err);
        }

        Ok(entry)
    }

    /// Validates user input before appending. A blank weight is rejected, blank notes are
    /// dropped.
    pub fn log(
        &mut self,
        exercise_id: ExerciseID,
        weight: &str,
        notes: &str,
    ) -> Result<LogEntry, ValidationError> {
        let weight = validate_weight(weight)?;
        let notes = Some(notes.trim()).filter(|n| !n.is_empty());
        self.append(exercise_id, weight, notes)
            .map_err(|err| ValidationError::Other(err.into()))
    }

    /// Entries of one exercise, most recent first.
    ///
    /// Entries with equal time stamps are ordered by reverse insertion.
    #[must_use]
    pub fn entries_for(&self, exercise_id: &ExerciseID) -> Vec<&LogEntry> {
        let mut entries = self
            .entries
            .iter()
            .rev()
            .filter(|e| e.exercise_id == *exercise_id)
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    #[must_use]
    pub fn last_entry_for(&self, exercise_id: &ExerciseID) -> Option<&LogEntry> {
        self.entries_for(exercise_id).into_iter().next()
    }
}

pub fn validate_weight(weight: &str) -> Result<&str, ValidationError> {
    let weight = weight.trim();
    if weight.is_empty() {
        return Err(ValidationError::Empty("weight".to_string()));
    }
    Ok(weight)
}
