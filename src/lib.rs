//! wheelpick - pick and install the prebuilt wheel matching a Python environment.
//!
//! Given an accelerator tag (e.g. `cu121`) and a list of candidate wheel
//! URLs, wheelpick probes the target interpreter for its version and the
//! installed numerical library (torch by default), picks the newest wheel
//! whose filename carries all three tags, and hands it to the package
//! manager.
//!
//! # Modules
//!
//! - [`candidates`] - Candidate list parsing and selection
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings file loading and layering
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Interpreter probing and wheel installation
//! - [`shell`] - Child process execution
//!
//! # Example
//!
//! ```
//! use wheelpick::candidates::{select, CandidateParser, SelectionCriteria};
//!
//! let list = "\
//! https://example.com/flash_attn-2.6.3+cu121torch2.4-cp310-cp310-linux_x86_64.whl
//! https://example.com/flash_attn-2.7.0.post2+cu121torch2.4-cp310-cp310-linux_x86_64.whl
//! https://example.com/flash_attn-2.8.0+cu124torch2.4-cp310-cp310-linux_x86_64.whl
//! ";
//!
//! let parsed = CandidateParser::new("flash_attn").unwrap().parse(list);
//! let criteria = SelectionCriteria::new("cp310", "cu121", "torch", "2.4.0");
//! let chosen = select(&parsed.candidates, &criteria).unwrap();
//! assert_eq!(chosen.version, vec![2, 7, 0, 2]);
//! ```

pub mod candidates;
pub mod cli;
pub mod config;
pub mod error;
pub mod requirements;
pub mod shell;

pub use error::{Result, WheelpickError};
