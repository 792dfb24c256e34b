//! The guiagen library provides functionality for generating study guides
//! from LLM output: splitting the delimiter-based response into sections,
//! parsing each section into typed records, normalizing missing pieces with
//! deterministic fallbacks, and storing/rendering the resulting guides.

pub mod activities;
pub mod bibliography;
pub mod compose;
pub mod constants;
pub mod generate;
pub mod guide;
pub mod normalize;
pub mod quiz;
pub mod rubric;
pub mod sections;
pub mod storage;

/// Enum representing the target guides for an operation.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum GuideTarget {
    /// All guides in the database.
    #[default]
    All,
    /// A guide with the specified id.
    Guide { id: String },
}

impl From<&str> for GuideTarget {
    fn from(value: &str) -> Self {
        match value {
            "all" => Self::All,
            id => Self::Guide { id: id.to_string() },
        }
    }
}

pub use activities::parse_activities;
pub use bibliography::parse_bibliography;
pub use compose::{compose, render_guide};
pub use generate::generate;
pub use normalize::{normalize_guide, reparse_guides};
pub use quiz::parse_quiz;
pub use rubric::parse_rubric;
pub use sections::split_sections;
