//! cohort-state: embedded state store for team formation.
//!
//! Backed by [redb](https://docs.rs/redb), holds the records the allocation
//! engine reads (sessions, teams, memberships, availability, survey
//! responses, project preferences) and the memberships it writes back.
//!
//! # Architecture
//!
//! All records are JSON-serialized into redb's `&[u8]` value columns.
//! Composite keys (`{session}:{team}`, `{survey}:{user}`) built from
//! zero-padded ids enable prefix scans that come back in id order.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::StateStore;
pub use types::*;
