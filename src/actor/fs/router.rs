use super::types::DebouncedEvents;
use crate::config::KilnConfig;
use crate::reload::{RebuildPlan, classify_changes};

pub(super) fn log_events(events: &DebouncedEvents) {
    for (path, kind) in &events.0 {
        crate::debug!("watch"; "{}: {}", kind.label(), path.display());
    }
}

/// Convert actionable events into a rebuild plan.
pub(super) fn events_to_plan(events: DebouncedEvents, config: &KilnConfig) -> RebuildPlan {
    let (changed, removed) = events.split();
    classify_changes(&changed, &removed, config)
}
