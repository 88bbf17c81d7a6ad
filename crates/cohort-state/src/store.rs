//! StateStore: redb-backed persistence for sessions, teams, memberships,
//! availability, survey responses, and project preferences.
//!
//! All values are JSON-serialized into redb's `&[u8]` value columns. The
//! store supports both on-disk and in-memory backends (the latter for
//! testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use cohort_core::{Availability, SessionId, SurveyId, TeamId, UserId};

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        for table in ALL_TABLES {
            txn.open_table(table).map_err(map_err!(Table))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Generic row access ─────────────────────────────────────────

    fn put_row<T: Serialize>(&self, table: JsonTable, key: &str, row: &T) -> StateResult<()> {
        let value = serde_json::to_vec(row).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(table).map_err(map_err!(Table))?;
            table
                .insert(key, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn get_row<T: DeserializeOwned>(&self, table: JsonTable, key: &str) -> StateResult<Option<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(table).map_err(map_err!(Table))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let row: T =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    /// Rows whose key starts with `prefix`, in key order. An empty prefix
    /// lists the whole table.
    fn scan_rows<T: DeserializeOwned>(&self, table: JsonTable, prefix: &str) -> StateResult<Vec<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(table).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(prefix) {
                let row: T =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(row);
            }
        }
        Ok(results)
    }

    // ── Sessions ───────────────────────────────────────────────────

    /// Insert or update a session.
    pub fn put_session(&self, session: &SessionRecord) -> StateResult<()> {
        self.put_row(SESSIONS, &session.table_key(), session)?;
        debug!(session = %session.id, "session stored");
        Ok(())
    }

    pub fn get_session(&self, id: SessionId) -> StateResult<Option<SessionRecord>> {
        self.get_row(SESSIONS, &key_part(id.0))
    }

    // ── Teams ──────────────────────────────────────────────────────

    /// Insert or update a team.
    pub fn put_team(&self, team: &TeamRecord) -> StateResult<()> {
        self.put_row(TEAMS, &team.table_key(), team)
    }

    pub fn get_team(&self, session: SessionId, team: TeamId) -> StateResult<Option<TeamRecord>> {
        let key = format!("{}:{}", key_part(session.0), key_part(team.0));
        self.get_row(TEAMS, &key)
    }

    /// All teams of a session, in team id order.
    pub fn list_teams_for_session(&self, session: SessionId) -> StateResult<Vec<TeamRecord>> {
        self.scan_rows(TEAMS, &format!("{}:", key_part(session.0)))
    }

    // ── Memberships ────────────────────────────────────────────────

    /// Insert or replace a membership.
    pub fn put_membership(&self, membership: &Membership) -> StateResult<()> {
        self.put_row(MEMBERSHIPS, &membership.table_key(), membership)
    }

    pub fn get_membership(&self, session: SessionId, user: UserId) -> StateResult<Option<Membership>> {
        self.get_row(MEMBERSHIPS, &membership_key(session, user))
    }

    /// All memberships of a session, in user id order.
    pub fn list_memberships_for_session(&self, session: SessionId) -> StateResult<Vec<Membership>> {
        self.scan_rows(MEMBERSHIPS, &format!("{}:", key_part(session.0)))
    }

    /// Memberships tied to one team, in user id order.
    pub fn list_memberships_for_team(
        &self,
        session: SessionId,
        team: TeamId,
    ) -> StateResult<Vec<Membership>> {
        Ok(self
            .list_memberships_for_session(session)?
            .into_iter()
            .filter(|m| m.team == Some(team))
            .collect())
    }

    /// Insert memberships in a single write transaction, skipping any whose
    /// `{session}:{user}` key already exists (including duplicates within
    /// `memberships`). Returns how many rows were written.
    ///
    /// Either every new row is committed or none is.
    pub fn insert_memberships_ignoring_conflicts(
        &self,
        memberships: &[Membership],
    ) -> StateResult<usize> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let mut inserted = 0;
        {
            let mut table = txn.open_table(MEMBERSHIPS).map_err(map_err!(Table))?;
            for membership in memberships {
                let key = membership.table_key();
                if table.get(key.as_str()).map_err(map_err!(Read))?.is_some() {
                    debug!(session = %membership.session, user = %membership.user, "membership exists, skipped");
                    continue;
                }
                let value = serde_json::to_vec(membership).map_err(map_err!(Serialize))?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(map_err!(Write))?;
                inserted += 1;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(requested = memberships.len(), inserted, "memberships bulk inserted");
        Ok(inserted)
    }

    // ── Availability ───────────────────────────────────────────────

    /// Insert or replace a user's weekly availability.
    pub fn put_availability(&self, user: UserId, slots: &Availability) -> StateResult<()> {
        let record = UserAvailability {
            user,
            slots: slots.clone(),
        };
        self.put_row(AVAILABILITY, &record.table_key(), &record)
    }

    /// A user's availability, `None` if they never set one.
    pub fn get_availability(&self, user: UserId) -> StateResult<Option<Availability>> {
        let record: Option<UserAvailability> = self.get_row(AVAILABILITY, &key_part(user.0))?;
        Ok(record.map(|r| r.slots))
    }

    pub fn list_availability(&self) -> StateResult<Vec<UserAvailability>> {
        self.scan_rows(AVAILABILITY, "")
    }

    // ── Survey responses ───────────────────────────────────────────

    pub fn put_response(&self, response: &SurveyResponse) -> StateResult<()> {
        self.put_row(RESPONSES, &response.table_key(), response)
    }

    /// All responses to a survey, in user id order.
    pub fn list_responses_for_survey(&self, survey: SurveyId) -> StateResult<Vec<SurveyResponse>> {
        self.scan_rows(RESPONSES, &format!("{}:", key_part(survey.0)))
    }

    // ── Project preferences ────────────────────────────────────────

    pub fn put_preference(&self, preference: &ProjectPreference) -> StateResult<()> {
        self.put_row(PREFERENCES, &preference.table_key(), preference)
    }

    pub fn list_preferences_for_session(
        &self,
        session: SessionId,
    ) -> StateResult<Vec<ProjectPreference>> {
        self.scan_rows(PREFERENCES, &format!("{}:", key_part(session.0)))
    }

    // ── Bulk import ────────────────────────────────────────────────

    /// Write a whole dataset in one transaction. Existing rows with the
    /// same keys are replaced.
    pub fn import(&self, dataset: &Dataset) -> StateResult<usize> {
        fn write_all<T: Serialize>(
            txn: &redb::WriteTransaction,
            table: JsonTable,
            rows: &[T],
            key: impl Fn(&T) -> String,
        ) -> StateResult<()> {
            let mut table = txn.open_table(table).map_err(map_err!(Table))?;
            for row in rows {
                let value = serde_json::to_vec(row).map_err(map_err!(Serialize))?;
                table
                    .insert(key(row).as_str(), value.as_slice())
                    .map_err(map_err!(Write))?;
            }
            Ok(())
        }

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        write_all(&txn, SESSIONS, &dataset.sessions, SessionRecord::table_key)?;
        write_all(&txn, TEAMS, &dataset.teams, TeamRecord::table_key)?;
        write_all(&txn, MEMBERSHIPS, &dataset.memberships, Membership::table_key)?;
        write_all(&txn, AVAILABILITY, &dataset.availability, UserAvailability::table_key)?;
        write_all(&txn, RESPONSES, &dataset.responses, SurveyResponse::table_key)?;
        write_all(&txn, PREFERENCES, &dataset.preferences, ProjectPreference::table_key)?;
        txn.commit().map_err(map_err!(Transaction))?;

        let count = dataset.record_count();
        debug!(records = count, "dataset imported");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_core::{ProjectId, ResponseId, Role};

    fn test_session(id: u64, survey: Option<u64>) -> SessionRecord {
        SessionRecord {
            id: SessionId(id),
            title: format!("Session {id}"),
            application_survey: survey.map(SurveyId),
        }
    }

    fn test_team(session: u64, id: u64) -> TeamRecord {
        TeamRecord {
            id: TeamId(id),
            session: SessionId(session),
            name: format!("Team {id}"),
            project: ProjectId(1),
        }
    }

    fn djangonaut(session: u64, user: u64, team: u64) -> Membership {
        Membership {
            user: UserId(user),
            session: SessionId(session),
            team: Some(TeamId(team)),
            role: Role::Djangonaut,
        }
    }

    // ── Sessions and teams ─────────────────────────────────────────

    #[test]
    fn session_put_and_get() {
        let store = StateStore::open_in_memory().unwrap();
        let session = test_session(1, Some(10));

        store.put_session(&session).unwrap();

        assert_eq!(store.get_session(SessionId(1)).unwrap(), Some(session));
        assert!(store.get_session(SessionId(2)).unwrap().is_none());
    }

    #[test]
    fn teams_listed_in_id_order_per_session() {
        let store = StateStore::open_in_memory().unwrap();
        store.put_team(&test_team(1, 12)).unwrap();
        store.put_team(&test_team(1, 3)).unwrap();
        store.put_team(&test_team(2, 1)).unwrap();

        let teams = store.list_teams_for_session(SessionId(1)).unwrap();
        let ids: Vec<_> = teams.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TeamId(3), TeamId(12)]);
        assert!(store.get_team(SessionId(2), TeamId(1)).unwrap().is_some());
    }

    #[test]
    fn session_prefix_does_not_leak_into_longer_ids() {
        let store = StateStore::open_in_memory().unwrap();
        store.put_team(&test_team(1, 1)).unwrap();
        store.put_team(&test_team(11, 1)).unwrap();

        assert_eq!(store.list_teams_for_session(SessionId(1)).unwrap().len(), 1);
    }

    // ── Memberships ────────────────────────────────────────────────

    #[test]
    fn memberships_filtered_by_team() {
        let store = StateStore::open_in_memory().unwrap();
        store.put_membership(&djangonaut(1, 100, 1)).unwrap();
        store.put_membership(&djangonaut(1, 101, 2)).unwrap();
        store
            .put_membership(&Membership {
                user: UserId(102),
                session: SessionId(1),
                team: None,
                role: Role::Organizer,
            })
            .unwrap();

        assert_eq!(store.list_memberships_for_session(SessionId(1)).unwrap().len(), 3);
        let team1 = store.list_memberships_for_team(SessionId(1), TeamId(1)).unwrap();
        assert_eq!(team1.len(), 1);
        assert_eq!(team1[0].user, UserId(100));
    }

    #[test]
    fn bulk_insert_skips_existing_and_duplicate_keys() {
        let store = StateStore::open_in_memory().unwrap();
        store.put_membership(&djangonaut(1, 100, 1)).unwrap();

        let batch = vec![
            djangonaut(1, 100, 2),
            djangonaut(1, 101, 1),
            djangonaut(1, 101, 1),
        ];
        let inserted = store.insert_memberships_ignoring_conflicts(&batch).unwrap();

        assert_eq!(inserted, 1);
        // The pre-existing row is left untouched.
        let existing = store.get_membership(SessionId(1), UserId(100)).unwrap().unwrap();
        assert_eq!(existing.team, Some(TeamId(1)));
    }

    #[test]
    fn bulk_insert_is_idempotent() {
        let store = StateStore::open_in_memory().unwrap();
        let batch = vec![djangonaut(1, 100, 1), djangonaut(1, 101, 1)];

        assert_eq!(store.insert_memberships_ignoring_conflicts(&batch).unwrap(), 2);
        assert_eq!(store.insert_memberships_ignoring_conflicts(&batch).unwrap(), 0);
        assert_eq!(store.list_memberships_for_session(SessionId(1)).unwrap().len(), 2);
    }

    // ── Availability, responses, preferences ───────────────────────

    #[test]
    fn availability_missing_is_none() {
        let store = StateStore::open_in_memory().unwrap();
        let slots = Availability::from_hours([24.0, 24.5]).unwrap();
        store.put_availability(UserId(1), &slots).unwrap();

        assert_eq!(store.get_availability(UserId(1)).unwrap(), Some(slots));
        assert!(store.get_availability(UserId(2)).unwrap().is_none());
        assert_eq!(store.list_availability().unwrap().len(), 1);
    }

    #[test]
    fn responses_and_preferences_scoped_by_parent() {
        let store = StateStore::open_in_memory().unwrap();
        for (survey, user) in [(10, 1), (10, 2), (11, 1)] {
            store
                .put_response(&SurveyResponse {
                    id: ResponseId(survey * 100 + user),
                    survey: SurveyId(survey),
                    user: UserId(user),
                    selection_rank: Some(0),
                    score: None,
                })
                .unwrap();
        }
        store
            .put_preference(&ProjectPreference {
                session: SessionId(1),
                user: UserId(1),
                project: ProjectId(5),
            })
            .unwrap();

        assert_eq!(store.list_responses_for_survey(SurveyId(10)).unwrap().len(), 2);
        assert_eq!(store.list_preferences_for_session(SessionId(1)).unwrap().len(), 1);
        assert!(store.list_preferences_for_session(SessionId(2)).unwrap().is_empty());
    }

    // ── Import and persistence ─────────────────────────────────────

    #[test]
    fn import_writes_every_table() {
        let store = StateStore::open_in_memory().unwrap();
        let dataset = Dataset {
            sessions: vec![test_session(1, Some(10))],
            teams: vec![test_team(1, 1)],
            memberships: vec![djangonaut(1, 100, 1)],
            availability: vec![UserAvailability {
                user: UserId(100),
                slots: Availability::from_range(24.0, 30.0).unwrap(),
            }],
            ..Dataset::default()
        };

        assert_eq!(store.import(&dataset).unwrap(), 4);
        assert!(store.get_session(SessionId(1)).unwrap().is_some());
        assert_eq!(store.list_teams_for_session(SessionId(1)).unwrap().len(), 1);
        assert_eq!(store.get_availability(UserId(100)).unwrap().unwrap().len(), 12);
    }

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("cohort.redb");

        {
            let store = StateStore::open(&db_path).unwrap();
            store.put_session(&test_session(7, None)).unwrap();
        }

        let store = StateStore::open(&db_path).unwrap();
        let session = store.get_session(SessionId(7)).unwrap();
        assert_eq!(session.map(|s| s.title), Some("Session 7".to_string()));
    }

    #[test]
    fn empty_store_operations() {
        let store = StateStore::open_in_memory().unwrap();

        assert!(store.get_session(SessionId(1)).unwrap().is_none());
        assert!(store.list_teams_for_session(SessionId(1)).unwrap().is_empty());
        assert!(store.list_memberships_for_session(SessionId(1)).unwrap().is_empty());
        assert!(store.list_availability().unwrap().is_empty());
        assert_eq!(store.insert_memberships_ignoring_conflicts(&[]).unwrap(), 0);
    }
}
