//! Candidate list parsing.
//!
//! A candidate list is plain text with one wheel URL per line. The version
//! of each wheel is read from its filename (`<package>-<version>-...`) and
//! turned into an integer tuple for ordering.

use anyhow::Context;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;

/// One downloadable build parsed from the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full download URL as written in the list.
    pub url: String,
    /// Final path segment of the URL.
    pub filename: String,
    /// Dot-separated release numbers, with the post-release number appended.
    pub version: Vec<u64>,
}

impl Candidate {
    /// Render the version tuple as a dotted string (e.g. `2.7.0.2`).
    pub fn version_string(&self) -> String {
        self.version
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// A line that was skipped while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number in the input.
    pub line: usize,
    /// Filename the line resolved to.
    pub filename: String,
    /// Why the line was skipped.
    pub reason: String,
}

/// Output of [`CandidateParser::parse`].
#[derive(Debug, Clone, Default)]
pub struct ParsedCandidates {
    /// Candidates in input order.
    pub candidates: Vec<Candidate>,
    /// Lines that were skipped.
    pub warnings: Vec<ParseWarning>,
}

/// Parses candidate lists for a single package name.
///
/// # Example
///
/// ```
/// use wheelpick::candidates::CandidateParser;
///
/// let parser = CandidateParser::new("flash_attn").unwrap();
/// let parsed = parser.parse(
///     "https://example.com/flash_attn-2.7.0.post2+cu121torch2.4-cp310-cp310-linux_x86_64.whl\n",
/// );
/// assert_eq!(parsed.candidates[0].version, vec![2, 7, 0, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct CandidateParser {
    package: String,
    pattern: Regex,
}

impl CandidateParser {
    /// Create a parser for wheels of `package` (e.g. `flash_attn`).
    pub fn new(package: &str) -> Result<Self> {
        let source = format!(r"{}-([\d.]*)(?:post([0-9A-Za-z]*))?", regex::escape(package));
        let pattern = Regex::new(&source)
            .with_context(|| format!("Invalid version pattern for package '{}'", package))?;

        Ok(Self {
            package: package.to_string(),
            pattern,
        })
    }

    /// Parse every non-blank line of `content`.
    ///
    /// Malformed lines never abort parsing; each one becomes a
    /// [`ParseWarning`] and is logged.
    pub fn parse(&self, content: &str) -> ParsedCandidates {
        let mut parsed = ParsedCandidates::default();

        for (index, raw) in content.lines().enumerate() {
            let url = raw.trim();
            if url.is_empty() {
                continue;
            }

            match self.parse_line(url) {
                Ok(candidate) => {
                    debug!(
                        "Parsed {} version {}",
                        candidate.filename,
                        candidate.version_string()
                    );
                    parsed.candidates.push(candidate);
                }
                Err(reason) => {
                    let warning = ParseWarning {
                        line: index + 1,
                        filename: filename_of(url).to_string(),
                        reason,
                    };
                    warn!(
                        "{} in filename '{}' (line {}). Skipping.",
                        warning.reason, warning.filename, warning.line
                    );
                    parsed.warnings.push(warning);
                }
            }
        }

        parsed
    }

    /// Parse a single trimmed URL.
    fn parse_line(&self, url: &str) -> std::result::Result<Candidate, String> {
        let filename = filename_of(url);

        let caps = self
            .pattern
            .captures(filename)
            .ok_or_else(|| format!("No {} version found", self.package))?;

        let release = caps.get(1).map_or("", |m| m.as_str());
        // `post` only counts as a post-release when a dot separates it.
        let post = caps
            .get(2)
            .filter(|_| release.ends_with('.'))
            .map(|m| m.as_str());
        let version = parse_version(release, post)?;

        Ok(Candidate {
            url: url.to_string(),
            filename: filename.to_string(),
            version,
        })
    }
}

/// Final path segment of a URL.
pub fn filename_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Turn a release string and optional post-release tag into a version tuple.
///
/// Empty pieces between dots are ignored, so `2.7.0.` and `2.7.0` agree.
pub fn parse_version(release: &str, post: Option<&str>) -> std::result::Result<Vec<u64>, String> {
    let post = match post {
        Some(tag) => Some(
            tag.parse::<u64>()
                .map_err(|_| format!("Non-numeric post-release tag '{}'", tag))?,
        ),
        None => None,
    };

    let pieces: Vec<&str> = release.split('.').filter(|p| !p.is_empty()).collect();
    if pieces.is_empty() {
        return Err(format!("Empty numeric part in version '{}'", release));
    }

    let mut version = pieces
        .iter()
        .map(|p| p.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| format!("Could not parse numeric parts from '{}'", release))?;

    version.extend(post);
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CandidateParser {
        CandidateParser::new("flash_attn").unwrap()
    }

    #[test]
    fn plain_version_parses_to_three_parts() {
        let parsed = parser().parse(
            "https://github.com/x/releases/download/v2.6.3/flash_attn-2.6.3+cu123torch2.4cxx11abiFALSE-cp310-cp310-linux_x86_64.whl",
        );
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.candidates[0].version, vec![2, 6, 3]);
    }

    #[test]
    fn post_release_is_appended() {
        let parsed =
            parser().parse("https://h/flash_attn-2.7.0.post2+cu124torch2.5-cp311-cp311-win_amd64.whl");
        assert_eq!(parsed.candidates[0].version, vec![2, 7, 0, 2]);
    }

    #[test]
    fn filename_is_last_path_segment() {
        let parsed = parser().parse("https://h/a/b/flash_attn-2.5.0-cp39-cu118.whl");
        let candidate = &parsed.candidates[0];
        assert_eq!(candidate.filename, "flash_attn-2.5.0-cp39-cu118.whl");
        assert_eq!(candidate.url, "https://h/a/b/flash_attn-2.5.0-cp39-cu118.whl");
    }

    #[test]
    fn blank_lines_and_whitespace_are_ignored() {
        let content = "\n   \n  https://h/flash_attn-2.5.0-cp39.whl  \n\n";
        let parsed = parser().parse(content);
        assert_eq!(parsed.candidates.len(), 1);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.candidates[0].url, "https://h/flash_attn-2.5.0-cp39.whl");
    }

    #[test]
    fn non_numeric_version_is_skipped_with_warning() {
        let content = "https://h/flash_attn-abc-cp310-cu121.whl\nhttps://h/flash_attn-2.6.1-cp310-cu121-torch2.4.whl\n";
        let parsed = parser().parse(content);

        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].version, vec![2, 6, 1]);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 1);
        assert!(parsed.warnings[0].reason.contains("Empty numeric part"));
    }

    #[test]
    fn non_numeric_post_tag_is_skipped() {
        let parsed = parser().parse("https://h/flash_attn-2.7.0.postX-cp310.whl");
        assert!(parsed.candidates.is_empty());
        assert!(parsed.warnings[0].reason.contains("post-release tag 'X'"));
    }

    #[test]
    fn post_without_dot_is_not_a_post_release() {
        let parsed = parser().parse(
            "https://h/flash_attn-2.7.0post2-cp310.whl\nhttps://h/flash_attn-2.7.0postX-cp310.whl",
        );
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.candidates[0].version, vec![2, 7, 0]);
        assert_eq!(parsed.candidates[1].version, vec![2, 7, 0]);
    }

    #[test]
    fn missing_package_prefix_is_skipped() {
        let parsed = parser().parse("https://h/xformers-0.0.28-cp310.whl");
        assert!(parsed.candidates.is_empty());
        assert!(parsed.warnings[0].reason.contains("No flash_attn version"));
        assert_eq!(parsed.warnings[0].filename, "xformers-0.0.28-cp310.whl");
    }

    #[test]
    fn overflowing_component_is_skipped() {
        let parsed = parser().parse("https://h/flash_attn-99999999999999999999999.1-cp310.whl");
        assert!(parsed.candidates.is_empty());
        assert!(parsed.warnings[0].reason.contains("Could not parse"));
    }

    #[test]
    fn package_name_is_escaped() {
        let parser = CandidateParser::new("a.b").unwrap();
        let parsed = parser.parse("https://h/aXb-1.0-cp310.whl\nhttps://h/a.b-1.0-cp310.whl");
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].filename, "a.b-1.0-cp310.whl");
    }

    #[test]
    fn parse_version_ignores_empty_pieces() {
        assert_eq!(parse_version("2.7.0.", None), Ok(vec![2, 7, 0]));
        assert_eq!(parse_version("2..7", Some("1")), Ok(vec![2, 7, 1]));
    }

    #[test]
    fn parse_version_rejects_only_dots() {
        assert!(parse_version("..", None).is_err());
        assert!(parse_version("", Some("3")).is_err());
    }

    #[test]
    fn version_string_joins_parts() {
        let candidate = Candidate {
            url: String::new(),
            filename: String::new(),
            version: vec![2, 7, 0, 2],
        };
        assert_eq!(candidate.version_string(), "2.7.0.2");
    }

    #[test]
    fn filename_of_url_without_slash() {
        assert_eq!(filename_of("flash_attn-2.5.0.whl"), "flash_attn-2.5.0.whl");
    }
}
