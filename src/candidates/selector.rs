//! Candidate selection.
//!
//! Candidates are ranked newest first by their version tuple and the first
//! one whose filename carries every required tag wins.

use std::fmt;

use super::parser::Candidate;

/// Substrings a wheel filename must contain to be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    /// Interpreter tag, e.g. `cp310`.
    pub interpreter_tag: String,
    /// Accelerator build tag, e.g. `cu121`.
    pub accelerator_tag: String,
    /// Library tag, e.g. `torch2.4`.
    pub library_tag: String,
}

impl SelectionCriteria {
    /// Build criteria from a base library version such as `2.4.0`.
    ///
    /// The library tag is `library_prefix` followed by the version's major
    /// and minor components.
    pub fn new(
        interpreter_tag: impl Into<String>,
        accelerator_tag: impl Into<String>,
        library_prefix: &str,
        library_version: &str,
    ) -> Self {
        Self {
            interpreter_tag: interpreter_tag.into(),
            accelerator_tag: accelerator_tag.into(),
            library_tag: format!("{}{}", library_prefix, major_minor(library_version)),
        }
    }

    /// Whether `filename` contains all three tags.
    pub fn matches(&self, filename: &str) -> bool {
        filename.contains(&self.interpreter_tag)
            && filename.contains(&self.accelerator_tag)
            && filename.contains(&self.library_tag)
    }
}

impl fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Python '{}', CUDA '{}', library '{}'",
            self.interpreter_tag, self.accelerator_tag, self.library_tag
        )
    }
}

/// First two dot-separated components of a version (`2.4.0` → `2.4`).
pub fn major_minor(version: &str) -> String {
    version.split('.').take(2).collect::<Vec<_>>().join(".")
}

/// Order candidates newest first.
///
/// Tuples compare lexicographically; when one is a prefix of the other the
/// longer one sorts first. The sort is stable, so equal versions keep their
/// input order.
pub fn sort_newest_first(candidates: &mut [&Candidate]) {
    candidates.sort_by(|a, b| b.version.cmp(&a.version));
}

/// Pick the newest candidate matching `criteria`.
///
/// Returns `None` when no candidate qualifies, including for an empty slice.
pub fn select<'a>(candidates: &'a [Candidate], criteria: &SelectionCriteria) -> Option<&'a Candidate> {
    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    sort_newest_first(&mut ranked);
    ranked.into_iter().find(|c| criteria.matches(&c.filename))
}
