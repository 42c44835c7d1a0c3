//! Manifest shape validation.
//!
//! Checks each path on its own: fragments must stay inside the base
//! directory and the output must name a file. Entries are never compared
//! with each other, so duplicates and ordering are left to the caller.
//!
//! # Examples
//!
//! ```
//! use schema_assemble_core::{AssemblyConfig, ManifestError, validate_config};
//!
//! let config = AssemblyConfig::new("", ["models/user.prisma"]);
//! assert!(validate_config(&config).is_empty());
//!
//! let bad = AssemblyConfig::new("", ["../user.prisma"]);
//! assert_eq!(
//!     validate_config(&bad),
//!     vec![ManifestError::EscapesBaseDir("../user.prisma".into())]
//! );
//! ```

use std::path::{Component, Path};

use thiserror::Error;

use crate::AssemblyConfig;

/// Manifest validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// Output path is empty.
    #[error("output path cannot be empty")]
    EmptyOutput,
    /// Fragment entry at the given index is empty.
    #[error("fragment #{0} has an empty path")]
    EmptyFragment(usize),
    /// Fragment path is absolute.
    #[error("fragment '{0}' must be relative to the base directory")]
    AbsoluteFragment(String),
    /// Fragment path climbs out of the base directory.
    #[error("fragment '{0}' escapes the base directory")]
    EscapesBaseDir(String),
}

/// Validates the path shape of every manifest entry and the output.
///
/// Returns every problem found; an empty vector means the configuration is
/// usable.
pub fn validate_config(config: &AssemblyConfig) -> Vec<ManifestError> {
    let mut errors = Vec::new();

    if config.output.as_os_str().is_empty() {
        errors.push(ManifestError::EmptyOutput);
    }

    for (index, fragment) in config.fragments.iter().enumerate() {
        if fragment.as_os_str().is_empty() {
            errors.push(ManifestError::EmptyFragment(index));
            continue;
        }
        let display = fragment.display().to_string();
        if fragment.has_root() || fragment.is_absolute() {
            errors.push(ManifestError::AbsoluteFragment(display));
        } else if escapes_base_dir(fragment) {
            errors.push(ManifestError::EscapesBaseDir(display));
        }
    }

    errors
}

/// Returns `true` if `..` components climb above the path's starting
/// directory at any point.
fn escapes_base_dir(path: &Path) -> bool {
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return true,
            },
            Component::RootDir | Component::Prefix(_) => return true,
        }
    }
    false
}
