use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;

use cohort_core::FormationConfig;
use cohort_state::StateStore;

pub mod allocate;
pub mod overlap;
pub mod report;
pub mod seed;
pub mod windows;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn open_store(db: &Path) -> anyhow::Result<StateStore> {
    StateStore::open(db).with_context(|| format!("opening state database {}", db.display()))
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<FormationConfig> {
    match path {
        Some(path) => FormationConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(FormationConfig::default()),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_core::{SessionId, TeamId};

    const DATASET: &str = r#"{
        "sessions": [{"id": 1, "title": "Session 5", "application_survey": 3}],
        "teams": [{"id": 1, "session": 1, "name": "Pony", "project": 1}],
        "memberships": [
            {"user": 100, "session": 1, "team": 1, "role": "navigator"},
            {"user": 101, "session": 1, "team": 1, "role": "captain"}
        ],
        "availability": [
            {"user": 100, "slots": [24.0, 24.5, 25.0, 25.5, 26.0, 26.5, 27.0, 27.5, 28.0, 28.5, 29.0, 29.5]},
            {"user": 101, "slots": [24.0, 24.5, 25.0, 25.5, 26.0, 26.5, 27.0, 27.5, 28.0, 28.5, 29.0, 29.5]},
            {"user": 10, "slots": [24.0, 24.5, 25.0, 25.5, 26.0, 26.5, 27.0, 27.5, 28.0, 28.5, 29.0, 29.5]}
        ],
        "responses": [
            {"id": 1, "survey": 3, "user": 10, "selection_rank": 0, "score": 80},
            {"id": 2, "survey": 3, "user": 11, "selection_rank": null, "score": null}
        ]
    }"#;

    fn seeded_db(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let file = dir.path().join("dataset.json");
        std::fs::write(&file, DATASET).unwrap();
        let db = dir.path().join("cohort.redb");
        seed::seed(&db, &file).unwrap();
        db
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        allocate::allocate(&db, &FormationConfig::default(), 1, true, OutputFormat::Json).unwrap();

        let store = open_store(&db).unwrap();
        assert_eq!(store.list_memberships_for_team(SessionId(1), TeamId(1)).unwrap().len(), 2);
    }

    #[test]
    fn allocate_then_report() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        allocate::allocate(&db, &FormationConfig::default(), 1, false, OutputFormat::Text).unwrap();
        report::report(&db, &FormationConfig::default(), 1, OutputFormat::Text).unwrap();

        let store = open_store(&db).unwrap();
        let members = store.list_memberships_for_team(SessionId(1), TeamId(1)).unwrap();
        assert_eq!(members.len(), 3);
    }

    #[test]
    fn overlap_and_windows_run() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        overlap::overlap(&db, &[100, 101, 10], OutputFormat::Text).unwrap();
        windows::windows(&db, 1, 3, OutputFormat::Json).unwrap();
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
        assert_eq!(load_config(None).unwrap(), FormationConfig::default());
    }
}
