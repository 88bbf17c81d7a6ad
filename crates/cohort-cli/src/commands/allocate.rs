use std::path::Path;

use serde::Serialize;

use cohort_core::{FormationConfig, SessionId, TeamId, UserId};
use cohort_formation::{AllocationOutcome, allocate_session};
use cohort_roster::{AllocationSummary, apply_allocation, summarize};

use super::OutputFormat;

#[derive(Debug, Serialize)]
struct Assignment {
    user: UserId,
    team: TeamId,
    selection_rank: u32,
    score: Option<i64>,
}

#[derive(Debug, Serialize)]
struct AllocationReport {
    session: SessionId,
    dry_run: bool,
    phase1_allocated: usize,
    phase2_allocated: usize,
    summary: AllocationSummary,
    assignments: Vec<Assignment>,
    unallocated: Vec<UserId>,
}

pub fn allocate(
    db: &Path,
    config: &FormationConfig,
    session: u64,
    dry_run: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let session = SessionId(session);
    let store = super::open_store(db)?;
    let outcome = allocate_session(&store, session, config)?;

    let summary = if dry_run {
        summarize(&outcome.state, outcome.total_allocated())
    } else {
        apply_allocation(&outcome.state, session, &store)?
    };
    let report = build_report(session, dry_run, &outcome, summary);

    match format {
        OutputFormat::Json => super::print_json(&report)?,
        OutputFormat::Text => print_text(&report, &outcome),
    }
    Ok(())
}

fn build_report(
    session: SessionId,
    dry_run: bool,
    outcome: &AllocationOutcome,
    summary: AllocationSummary,
) -> AllocationReport {
    AllocationReport {
        session,
        dry_run,
        phase1_allocated: outcome.phase1_allocated,
        phase2_allocated: outcome.phase2_allocated,
        summary,
        assignments: outcome
            .state
            .allocations
            .iter()
            .map(|a| Assignment {
                user: a.candidate.user,
                team: a.team,
                selection_rank: a.candidate.selection_rank,
                score: a.candidate.score,
            })
            .collect(),
        unallocated: outcome.state.unallocated.iter().map(|c| c.user).collect(),
    }
}

fn print_text(report: &AllocationReport, outcome: &AllocationOutcome) {
    println!("Session {}", report.session);
    for team in &outcome.state.teams {
        let status = if team.is_full() { "complete" } else { "open" };
        println!("  {} (#{}, {status})", team.team.name, team.id());
        for allocation in outcome.state.allocations_for(team.id()) {
            println!(
                "    + user {} (rank {})",
                allocation.candidate.user, allocation.candidate.selection_rank
            );
        }
    }
    if !report.unallocated.is_empty() {
        let users: Vec<String> = report.unallocated.iter().map(ToString::to_string).collect();
        println!("  unallocated: {}", users.join(", "));
    }

    let verb = if report.dry_run { "would create" } else { "created" };
    println!(
        "{verb} {} memberships (phase 1: {}, phase 2: {}); {}/{} teams complete",
        report.summary.created,
        report.phase1_allocated,
        report.phase2_allocated,
        report.summary.complete_teams,
        report.summary.total_teams,
    );
    if report.dry_run {
        println!("dry run: nothing written");
    }
}
