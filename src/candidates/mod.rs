//! Candidate wheel lists.
//!
//! - [`parser`] - Turn a newline-delimited URL list into version-tagged candidates
//! - [`selector`] - Rank candidates and pick the newest one matching the environment

pub mod parser;
pub mod selector;

pub use parser::{filename_of, parse_version, Candidate, CandidateParser, ParseWarning, ParsedCandidates};
pub use selector::{major_minor, select, sort_newest_first, SelectionCriteria};
