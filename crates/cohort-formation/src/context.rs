use cohort_core::FormationConfig;
use cohort_overlap::{AvailabilitySource, OverlapThresholds};

/// What feasibility checks need besides the team itself.
#[derive(Clone, Copy)]
pub struct FormationContext<'a> {
    pub source: &'a dyn AvailabilitySource,
    pub thresholds: OverlapThresholds,
}

impl<'a> FormationContext<'a> {
    pub fn new(source: &'a dyn AvailabilitySource, thresholds: OverlapThresholds) -> Self {
        Self { source, thresholds }
    }

    pub fn from_config(source: &'a dyn AvailabilitySource, config: &FormationConfig) -> Self {
        Self::new(source, OverlapThresholds::from(&config.thresholds))
    }
}

impl std::fmt::Debug for FormationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormationContext")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}
