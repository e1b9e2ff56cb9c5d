//! Matching services
//!
//! Each scoring stage sits behind a trait so the orchestrator can compose
//! (and tests can substitute) implementations:
//! - `PriorityMapping`: free-text priorities to taxonomy issues
//! - `CandidateMatching`: candidate roster scoring
//! - `MeasureMatching`: ballot measure scoring with location fallback

pub mod candidate_matcher;
pub mod conflict_detector;
pub mod measure_matcher;
pub mod priority_mapper;
pub mod scope_filter;

pub use candidate_matcher::{CandidateMatcher, CandidateMatching};
pub use conflict_detector::ConflictDetector;
pub use measure_matcher::{MeasureMatcher, MeasureMatching};
pub use priority_mapper::{MappingError, PriorityMapper, PriorityMapping};
