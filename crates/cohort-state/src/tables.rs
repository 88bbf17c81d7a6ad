//! redb table definitions for the cohort state store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized records).
//! Composite keys follow the pattern `{parent_id}:{child_id}`.

use redb::TableDefinition;

pub(crate) type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Sessions keyed by `{session}`.
pub const SESSIONS: JsonTable = TableDefinition::new("sessions");

/// Teams keyed by `{session}:{team}`.
pub const TEAMS: JsonTable = TableDefinition::new("teams");

/// Memberships keyed by `{session}:{user}`.
pub const MEMBERSHIPS: JsonTable = TableDefinition::new("memberships");

/// Weekly availability keyed by `{user}`.
pub const AVAILABILITY: JsonTable = TableDefinition::new("availability");

/// Survey responses keyed by `{survey}:{user}`.
pub const RESPONSES: JsonTable = TableDefinition::new("responses");

/// Project preferences keyed by `{session}:{user}:{project}`.
pub const PREFERENCES: JsonTable = TableDefinition::new("preferences");

pub(crate) const ALL_TABLES: [JsonTable; 6] =
    [SESSIONS, TEAMS, MEMBERSHIPS, AVAILABILITY, RESPONSES, PREFERENCES];
