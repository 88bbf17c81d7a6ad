use std::path::Path;

use anyhow::Context;
use tracing::info;

use cohort_state::Dataset;

pub fn seed(db: &Path, file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading dataset {}", file.display()))?;
    let dataset: Dataset = serde_json::from_str(&content)
        .with_context(|| format!("parsing dataset {}", file.display()))?;

    let store = super::open_store(db)?;
    let written = store.import(&dataset)?;
    info!(file = %file.display(), records = written, "dataset imported");

    println!(
        "✓ Seeded {} records ({} sessions, {} teams, {} memberships, {} availability, {} responses, {} preferences)",
        written,
        dataset.sessions.len(),
        dataset.teams.len(),
        dataset.memberships.len(),
        dataset.availability.len(),
        dataset.responses.len(),
        dataset.preferences.len(),
    );
    Ok(())
}
