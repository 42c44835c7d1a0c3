//! Assembly configuration: the fragment manifest, preamble, and paths.
//!
//! [`AssemblyConfig::default`] is the built-in Prisma layout. Other layouts
//! are described in YAML and loaded with [`AssemblyConfig::load`].
//!
//! # Example YAML
//!
//! ```yaml
//! base_dir: prisma
//! output: schema.prisma
//! preamble: |
//!   datasource db {
//!     provider = "sqlite"
//!   }
//! fragments:
//!   - models/enums.prisma
//!   - models/user.prisma
//! ```

use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AssembleError, Result};
use crate::validate::validate_config;

/// Header written ahead of every fragment in the built-in configuration.
pub const DEFAULT_PREAMBLE: &str = r#"generator client {
  provider = "prisma-client-js"
}

datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

"#;

/// Built-in fragment manifest, in concatenation order.
pub const DEFAULT_FRAGMENTS: &[&str] = &[
    "models/enums.prisma",
    "models/user.prisma",
    "models/project.prisma",
    "models/gamification.prisma",
    "models/pathways.prisma",
    "models/collaboration.prisma",
    "models/subscriptions.prisma",
    "models/translations.prisma",
    "models/bookmarks.prisma",
    "models/roles.prisma",
    "models/audit.prisma",
    "models/skill.prisma",
];

/// Directory the built-in manifest is resolved against.
pub const DEFAULT_BASE_DIR: &str = "prisma";

/// Output file of the built-in configuration, relative to the base directory.
pub const DEFAULT_OUTPUT: &str = "schema.prisma";

/// Everything one assembly run needs.
///
/// The value is immutable for the duration of a run; the
/// [`Assembler`](crate::Assembler) only borrows it.
///
/// # Examples
///
/// ```
/// use schema_assemble_core::AssemblyConfig;
///
/// let config = AssemblyConfig::new("HEADER", ["a.txt", "b.txt"])
///     .with_base_dir("fragments")
///     .with_output("out.txt");
/// assert_eq!(config.output_path(), std::path::Path::new("fragments/out.txt"));
/// assert_eq!(config.fragment_paths().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Directory fragment paths (and a relative output path) resolve against.
    #[serde(default)]
    pub base_dir: PathBuf,
    /// Output file, relative to `base_dir` unless absolute.
    pub output: PathBuf,
    /// Text written before the first fragment.
    #[serde(default)]
    pub preamble: String,
    /// Fragment paths relative to `base_dir`, in concatenation order.
    pub fragments: Vec<PathBuf>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            preamble: DEFAULT_PREAMBLE.to_string(),
            fragments: DEFAULT_FRAGMENTS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl AssemblyConfig {
    /// Creates a configuration rooted at the current directory, writing to
    /// the built-in output file name.
    pub fn new<I, P>(preamble: impl Into<String>, fragments: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            base_dir: PathBuf::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            preamble: preamble.into(),
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    /// Replaces the base directory.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Replaces the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Resolved fragment paths, in manifest order.
    pub fn fragment_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.fragments.iter().map(|f| self.base_dir.join(f))
    }

    /// Resolved output path.
    pub fn output_path(&self) -> PathBuf {
        self.base_dir.join(&self.output)
    }

    /// Loads a configuration from a YAML file.
    ///
    /// A relative (or absent) `base_dir` is taken relative to the directory
    /// containing the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](AssembleError::IoError) if the file cannot be read,
    /// [`YamlError`](AssembleError::YamlError) if parsing fails, or
    /// [`InvalidManifest`](AssembleError::InvalidManifest) if the manifest
    /// fails [`validate_config`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;

        if config.base_dir.is_relative() {
            let root = path.parent().unwrap_or(Path::new(""));
            config.base_dir = root.join(&config.base_dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Runs [`validate_config`] and folds any problems into one error.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidManifest`](AssembleError::InvalidManifest) listing
    /// every problem found.
    pub fn validate(&self) -> Result<()> {
        let errors = validate_config(self);
        if errors.is_empty() {
            return Ok(());
        }
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(AssembleError::InvalidManifest(messages.join("; ")))
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](AssembleError::IoError) if the file cannot be
    /// written, or [`YamlError`](AssembleError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_yaml::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
