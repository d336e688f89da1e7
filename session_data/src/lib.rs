pub mod result;
pub mod score;

pub use result::SessionRecord;
pub use score::{HitTally, LetterGrade};
