pub mod matcher;
pub mod windows;

pub use matcher::{ApproachCue, Judgment, MissedNote, NoteState, TapMatcher, TapOutcome, TickReport};
pub use windows::{Grade, HitWindows};
