use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use gloo_storage::{Storage, errors::StorageError};
use log::warn;
use treino_domain as domain;
use treino_web_app::{self as web_app, Settings};

use crate::rest::SessionStore;

/// The browser's local storage.
#[derive(Clone, Copy, Default)]
pub struct LocalStorage;

const KEY_EXERCISE_LOG: &str = "workout-logs";
const KEY_SETTINGS: &str = "settings";
const KEY_DIAGNOSTICS: &str = "diagnostics";
const KEY_SESSION: &str = "session";

fn read_or_default<T>(key: &str) -> Result<T, StorageError>
where
    T: for<'de> serde::Deserialize<'de> + Default,
{
    match gloo_storage::LocalStorage::get(key) {
        Ok(value) => Ok(value),
        Err(StorageError::KeyNotFound(_)) => Ok(T::default()),
        Err(err) => Err(err),
    }
}

impl domain::LogRepository for LocalStorage {
    fn read_log_entries(&self) -> Result<Vec<domain::LogEntry>, domain::StorageError> {
        let entries: Vec<LogEntry> = read_or_default(KEY_EXERCISE_LOG)
            .map_err(|err| domain::StorageError::Other(Box::new(err)))?;
        Ok(entries.into_iter().map(domain::LogEntry::from).collect())
    }

    fn write_log_entries(&self, entries: &[domain::LogEntry]) -> Result<(), domain::StorageError> {
        gloo_storage::LocalStorage::set(
            KEY_EXERCISE_LOG,
            entries.iter().map(LogEntry::from).collect::<Vec<_>>(),
        )
        .map_err(|err| domain::StorageError::Other(Box::new(err)))
    }
}

impl web_app::SettingsRepository for LocalStorage {
    async fn read_settings(&self) -> Result<Settings, String> {
        read_or_default(KEY_SETTINGS).map_err(|err| err.to_string())
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        gloo_storage::LocalStorage::set(KEY_SETTINGS, settings).map_err(|err| err.to_string())
    }
}

impl web_app::log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<web_app::log::Entry>, web_app::log::Error> {
        read_or_default(KEY_DIAGNOSTICS).map_err(|err| web_app::log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: web_app::log::Entry) -> Result<(), web_app::log::Error> {
        let mut entries = self.read_entries()?;
        web_app::log::push_entry(&mut entries, entry);
        gloo_storage::LocalStorage::set(KEY_DIAGNOSTICS, entries)
            .map_err(|err| web_app::log::Error::Unknown(err.to_string()))
    }
}

impl SessionStore for LocalStorage {
    fn read_token(&self) -> Option<String> {
        match gloo_storage::LocalStorage::get(KEY_SESSION) {
            Ok(token) => Some(token),
            Err(StorageError::KeyNotFound(_)) => None,
            Err(err) => {
                warn!("failed to read session: {err}");
                None
            }
        }
    }

    fn write_token(&self, token: Option<&str>) {
        match token {
            Some(token) => {
                if let Err(err) = gloo_storage::LocalStorage::set(KEY_SESSION, token) {
                    warn!("failed to write session: {err}");
                }
            }
            None => gloo_storage::LocalStorage::delete(KEY_SESSION),
        }
    }
}

/// Stored form of a log entry, compatible with logs written by earlier versions of the app.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub date: DateTime<Utc>,
    pub exercise_id: String,
    pub weight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&domain::LogEntry> for LogEntry {
    fn from(value: &domain::LogEntry) -> Self {
        Self {
            date: value.date,
            exercise_id: value.exercise_id.to_string(),
            weight: value.weight.clone(),
            notes: value.notes.clone(),
        }
    }
}

impl From<LogEntry> for domain::LogEntry {
    fn from(value: LogEntry) -> Self {
        Self {
            date: value.date,
            exercise_id: value.exercise_id.into(),
            weight: value.weight,
            notes: value.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tests::data::{LOG_ENTRIES, LOG_ENTRY, LOG_ENTRY_2};

    fn round_trip(entries: &[domain::LogEntry]) -> Vec<domain::LogEntry> {
        let json =
            serde_json::to_string(&entries.iter().map(LogEntry::from).collect::<Vec<_>>())
                .unwrap();
        serde_json::from_str::<Vec<LogEntry>>(&json)
            .unwrap()
            .into_iter()
            .map(domain::LogEntry::from)
            .collect()
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::without_notes(vec![LOG_ENTRY.clone()])]
    #[case::with_notes(vec![LOG_ENTRY_2.clone()])]
    #[case::mixed(LOG_ENTRIES.clone())]
    fn test_log_entries_round_trip(#[case] entries: Vec<domain::LogEntry>) {
        assert_eq!(round_trip(&entries), entries);
    }

    #[test]
    fn test_log_entry_format() {
        assert_eq!(
            serde_json::to_value(LogEntry::from(&*LOG_ENTRY)).unwrap(),
            serde_json::json!({
                "date": "2024-03-01T18:30:00Z",
                "exerciseId": "ex1",
                "weight": "80",
            })
        );
    }

    #[test]
    fn test_log_entry_from_earlier_version() {
        let entries: Vec<LogEntry> = serde_json::from_str(
            r#"[{"exerciseId":"ex2","weight":"12","notes":"","date":"2024-03-02T09:15:00.000Z"}]"#,
        )
        .unwrap();

        assert_eq!(
            entries
                .into_iter()
                .map(domain::LogEntry::from)
                .collect::<Vec<_>>(),
            vec![domain::LogEntry {
                date: "2024-03-02T09:15:00Z".parse().unwrap(),
                exercise_id: "ex2".into(),
                weight: "12".to_string(),
                notes: Some(String::new()),
            }]
        );
    }

    #[rstest]
    #[case::not_json("workout")]
    #[case::not_a_list(r#"{"exerciseId":"ex1"}"#)]
    #[case::invalid_date(r#"[{"exerciseId":"ex1","weight":"80","date":"yesterday"}]"#)]
    fn test_corrupt_log_entries(#[case] json: &str) {
        assert!(serde_json::from_str::<Vec<LogEntry>>(json).is_err());
    }
}
