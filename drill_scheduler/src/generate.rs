use drill_schema::{Channel, Drill, Millis, MusicalBar};

use crate::time_map::TimeMap;
use crate::{ExpectedInstant, ScheduleIssue};

/// A bar-template note that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ValidNote {
    pub position: u32,
    pub channel: Option<Channel>,
}

/// Keeps the notes of one template that are in range and strictly ascending.
///
/// Positions at or past `slots_per_bar` are out of range. A position that does
/// not exceed the last accepted one would break ascending emission (or
/// duplicate an instant), so it is dropped as well.
pub(crate) fn validate_template(
    template_index: usize,
    bar: &MusicalBar,
    slots_per_bar: u32,
    issues: &mut Vec<ScheduleIssue>,
) -> Vec<ValidNote> {
    let mut valid = Vec::with_capacity(bar.notes.len());
    let mut last: Option<u32> = None;

    for (note_index, note) in bar.notes.iter().enumerate() {
        let position = note.position();

        if position >= slots_per_bar {
            issues.push(
                ScheduleIssue::new(
                    "E4001",
                    format!("grid position out of range (position={position}, slots={slots_per_bar})"),
                )
                .with_template(template_index)
                .with_note_index(note_index)
                .with_position(position),
            );
            continue;
        }

        if let Some(prev) = last {
            if position <= prev {
                issues.push(
                    ScheduleIssue::new(
                        "E4002",
                        format!("grid positions must be strictly ascending (position={position}, previous={prev})"),
                    )
                    .with_template(template_index)
                    .with_note_index(note_index)
                    .with_position(position),
                );
                continue;
            }
        }

        last = Some(position);
        valid.push(ValidNote {
            position,
            channel: note.channel(),
        });
    }

    valid
}

pub(crate) fn pass2_generate(
    drill: &Drill,
    time_map: &TimeMap,
    templates: &[Vec<ValidNote>],
    session_start_ms: Millis,
) -> Vec<ExpectedInstant> {
    if templates.is_empty() {
        return Vec::new();
    }

    let per_bar: usize = (0..drill.duration_bars)
        .map(|bar_index| templates[bar_index as usize % templates.len()].len())
        .sum();
    let mut instants = Vec::with_capacity(per_bar);

    for bar_index in 0..drill.duration_bars {
        let template = &templates[bar_index as usize % templates.len()];
        let bar_start = time_map.bar_start(session_start_ms, bar_index);

        for note in template {
            instants.push(ExpectedInstant {
                index: instants.len(),
                time_ms: time_map.instant(bar_start, note.position),
                channel: note.channel,
                bar_index,
                position: note.position,
            });
        }
    }

    instants
}
