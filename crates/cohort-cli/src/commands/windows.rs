use std::path::Path;

use cohort_core::SessionId;
use cohort_roster::session_windows;

use super::OutputFormat;

pub fn windows(db: &Path, session: u64, top: usize, format: OutputFormat) -> anyhow::Result<()> {
    let store = super::open_store(db)?;
    let windows = session_windows(&store, SessionId(session), top)?;

    if format == OutputFormat::Json {
        return super::print_json(&windows);
    }

    if windows.is_empty() {
        println!("no one-hour window shared by two or more members");
        return Ok(());
    }
    for (i, window) in windows.iter().enumerate() {
        println!(
            "{}. {} UTC: {} available ({})",
            i + 1,
            window.formatted_time(),
            window.total_available(),
            window.role_summary()
        );
        if !window.unavailable.is_empty() {
            let missing: Vec<String> = window.unavailable.iter().map(ToString::to_string).collect();
            println!("   unavailable: {}", missing.join(", "));
        }
    }
    Ok(())
}
