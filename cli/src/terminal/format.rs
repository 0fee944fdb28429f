use crate::terminal::colors;
use colored::*;
use subrefine_core::pipeline::{SkipReason, StageStatus};

pub type Detail = (String, ColoredString);

pub fn stage_details(status: &StageStatus) -> Vec<Detail> {
    match status {
        StageStatus::Completed { summary } => vec![
            (String::from("Status"), "completed".color(colors::COMPLETED).bold()),
            (String::from("Output"), summary.color(colors::TEXT_DEFAULT)),
        ],
        StageStatus::Skipped(reason) => vec![
            (String::from("Status"), skip_label(reason)),
            (String::from("Reason"), reason.to_string().color(colors::TEXT_DEFAULT)),
        ],
    }
}

fn skip_label(reason: &SkipReason) -> ColoredString {
    match reason.is_abort() {
        true => "aborted".color(colors::ABORTED).bold(),
        false => "skipped".color(colors::SKIPPED),
    }
}
