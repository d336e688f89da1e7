use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The drill's tempo/meter cannot produce a time map; nothing is scheduled.
    TimeMap,
    /// A single note or template is malformed; only that part is dropped.
    Validation,
}

impl IssueKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            "E3003" | "E3004" | "E3006" | "E3007" => Self::TimeMap,
            // E4001..E4004 and anything unlisted only drop part of the drill.
            _ => Self::Validation,
        }
    }
}

/// A non-fatal problem found while expanding a drill.
///
/// Issues never abort scheduling: the offending note (or the whole drill, for
/// time-map problems) is skipped and the rest of the schedule is still built.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct ScheduleIssue {
    pub code: &'static str,
    pub kind: IssueKind,
    pub message: String,

    pub template: Option<usize>,
    pub note_index: Option<usize>,
    pub position: Option<u32>,
}

impl ScheduleIssue {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: IssueKind::from_code(code),
            message: message.into(),

            template: None,
            note_index: None,
            position: None,
        }
    }

    pub fn with_template(mut self, template: usize) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_note_index(mut self, note_index: usize) -> Self {
        self.note_index = Some(note_index);
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_fatal_for_schedule(&self) -> bool {
        self.kind == IssueKind::TimeMap
    }
}
