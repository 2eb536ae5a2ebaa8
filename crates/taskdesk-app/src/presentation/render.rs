//! Plain-text rendering of checklist views.

use std::fmt::Write;

use taskdesk_domain::checklist::Bucket;

use crate::application::dtos::{BucketSummaryDto, ChecklistItemDto};

pub const EMPTY_VIEW: &str = "No data found.";

pub fn render_items(bucket: Bucket, items: &[ChecklistItemDto]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", bucket.label(), items.len());

    if items.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_VIEW);
        return out;
    }

    for item in items {
        out.push('\n');
        out.push_str(&render_card(item));
    }
    out
}

pub fn render_card(item: &ChecklistItemDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{}  {}", item.task_id, item.description);

    let frequency = item
        .frequency_label
        .as_deref()
        .unwrap_or(item.frequency_code.as_str());
    let planned = item
        .planned_date
        .as_deref()
        .or(item.planned.as_deref())
        .unwrap_or("-");
    let _ = writeln!(out, "    {} | planned {}", frequency, planned);

    if item.is_done {
        let _ = writeln!(out, "    [x] done {}", item.actual.as_deref().unwrap_or(""));
    } else {
        let _ = writeln!(out, "    [ ] mark done: taskdesk done {}", item.task_id);
    }
    out
}

pub fn render_summary(summary: &BucketSummaryDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Checklist as of {}", summary.as_of);

    let rows = [
        (Bucket::Pending, summary.pending),
        (Bucket::Daily, summary.daily),
        (Bucket::Weekly, summary.weekly),
        (Bucket::Monthly, summary.monthly),
        (Bucket::Yearly, summary.yearly),
    ];
    for (bucket, count) in rows {
        let _ = writeln!(out, "  {:<10}{:>5}", bucket.label(), count);
    }

    let _ = writeln!(out, "  {:<10}{:>5}", "Done", summary.done);
    if summary.unclassifiable > 0 {
        let _ = writeln!(out, "  {:<10}{:>5}", "Unreadable", summary.unclassifiable);
    }
    let _ = writeln!(out, "  {:<10}{:>5}", "Total", summary.total);
    out
}
