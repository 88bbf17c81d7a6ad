use std::path::Path;

use cohort_core::{FormationConfig, SessionId, UserId};
use cohort_overlap::format_slot_ranges;
use cohort_roster::team_reports;

use super::OutputFormat;

pub fn report(
    db: &Path,
    config: &FormationConfig,
    session: u64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let store = super::open_store(db)?;
    let reports = team_reports(&store, SessionId(session), config)?;

    if format == OutputFormat::Json {
        return super::print_json(&reports);
    }

    for report in &reports {
        let overlap = &report.overlap;
        let verdict = if overlap.is_valid { "✓" } else { "✗" };
        println!("{verdict} {} (#{}, project {})", report.name, report.team, report.project);
        println!("    navigators:  {}", join(&report.navigators));
        println!(
            "    captain:     {}",
            report.captain.map(|c| c.to_string()).unwrap_or_else(|| "-".into())
        );
        println!("    djangonauts: {}", join(&report.djangonauts));
        println!(
            "    navigator meeting: {}h (min {}h)",
            overlap.navigator_meeting_hours, config.thresholds.navigator_meeting_hours
        );
        for range in format_slot_ranges(overlap.navigator_meeting_slots.iter().copied()) {
            println!("      {range}");
        }
        for meeting in &overlap.captain_meetings {
            println!(
                "    captain 1:1 with {}: {}h (min {}h)",
                meeting.djangonaut, meeting.hours, config.thresholds.captain_overlap_hours
            );
        }
    }
    Ok(())
}

fn join(users: &[UserId]) -> String {
    if users.is_empty() {
        return "-".into();
    }
    users.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
