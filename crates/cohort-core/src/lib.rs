pub mod config;
pub mod slot;
pub mod types;

pub use config::FormationConfig;
pub use slot::{Availability, SlotError, WeeklySlot};
pub use types::*;
