use std::path::Path;

use serde::Serialize;

use cohort_core::{UserId, WeeklySlot};
use cohort_formation::load_availability;
use cohort_overlap::{availability_by_day, format_slot_ranges};

use super::OutputFormat;

#[derive(Debug, Serialize)]
struct OverlapView {
    users: Vec<UserId>,
    slots: Vec<WeeklySlot>,
    hour_blocks: u32,
    ranges: Vec<String>,
}

pub fn overlap(db: &Path, users: &[u64], format: OutputFormat) -> anyhow::Result<()> {
    let store = super::open_store(db)?;
    let book = load_availability(&store)?;
    let users: Vec<UserId> = users.iter().copied().map(UserId).collect();

    let shared = cohort_overlap::overlap(users.iter().copied(), &book);
    let view = OverlapView {
        ranges: format_slot_ranges(shared.slots.iter().copied()),
        users,
        slots: shared.slots,
        hour_blocks: shared.hour_blocks,
    };

    if format == OutputFormat::Json {
        return super::print_json(&view);
    }

    println!("{} shared hour blocks (UTC)", view.hour_blocks);
    for (day, ranges) in availability_by_day(view.slots.iter().copied()) {
        println!("  {day}: {}", ranges.join(", "));
    }
    Ok(())
}
