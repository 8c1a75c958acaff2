//! Weekly schedule rules
//!
//! Pure logic for validating a recurring weekly day selection.
//!
//! ```text
//! Selection ──▶ analyze() ──▶ ArcAnalysis ──▶ calculate_nights() ──▶ min-night bound ──▶ ValidationResult
//! ```
//!
//! The week is circular: an arc may cross Saturday→Sunday.

pub mod contiguity;
pub mod day;
pub mod nights;
pub mod selection;
pub mod validator;

pub use contiguity::{ArcAnalysis, analyze};
pub use day::{DAYS_PER_WEEK, Day};
pub use nights::calculate_nights;
pub use selection::Selection;
pub use validator::{
    DEFAULT_MIN_NIGHTS, ErrorCode, ScheduleValidator, ValidationResult, validate,
};
