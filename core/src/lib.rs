//! Assembles one schema document from an ordered list of fragment files.
//!
//! The output is a fixed preamble followed by each fragment, in manifest
//! order, each preceded by a single newline. Fragments are opaque text: they
//! are not parsed, deduplicated, or reordered.
//!
//! - [`AssemblyConfig`] — manifest, preamble, base directory, and output path.
//!   [`AssemblyConfig::default`] is the built-in Prisma layout.
//! - [`Assembler`] — reads, concatenates, writes ([`Assembler::assemble`]) or
//!   compares against the existing output ([`Assembler::check`]).
//! - [`validate_config`] — path-shape checks applied when loading YAML.
//!
//! # Example
//!
//! ```no_run
//! use schema_assemble_core::{Assembler, AssemblyConfig};
//!
//! let config = AssemblyConfig::new("HEADER", ["a.txt", "b.txt"])
//!     .with_base_dir("fragments")
//!     .with_output("combined.txt");
//! Assembler::new(&config).assemble().unwrap();
//! // fragments/combined.txt now holds "HEADER\n<a.txt>\n<b.txt>"
//! ```

mod assemble;
mod config;
mod error;
mod validate;

pub use assemble::{Assembler, Assembly, AssemblyReport, Freshness};
pub use config::{
    AssemblyConfig, DEFAULT_BASE_DIR, DEFAULT_FRAGMENTS, DEFAULT_OUTPUT, DEFAULT_PREAMBLE,
};
pub use error::{AssembleError, Result};
pub use validate::{ManifestError, validate_config};
