//! # VoteMatch Common Library
//!
//! Shared code for the VoteMatch recommendation engine:
//! - Static domain models (issues, conflicts, candidates, ballot measures)
//! - Static catalog loading and validation
//! - Configuration loading
//! - Common error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use models::{
    BallotMeasure, Candidate, ConflictDefinition, ConflictSeverity, ConflictType, Issue,
    IssueCategory, Mode, PolicyApproach, Position, Stance,
};
