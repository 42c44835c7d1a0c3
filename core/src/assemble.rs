//! Reading fragments, concatenating them, and writing the output.
//!
//! The output is always `preamble` followed by `"\n" + fragment` for every
//! manifest entry, in manifest order. Fragment text is copied verbatim.
//! Every fragment is read before the output is touched, so a failed read
//! leaves any previous output in place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::AssemblyConfig;
use crate::error::{AssembleError, Result};

/// Concatenated schema text held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    content: String,
    fragment_count: usize,
}

impl Assembly {
    /// The full output text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of fragments appended after the preamble.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// SHA-256 hex digest of the output text.
    pub fn checksum(&self) -> String {
        let hash = Sha256::digest(self.content.as_bytes());
        format!("{:x}", hash)
    }

    /// Consumes the assembly, returning the output text.
    pub fn into_string(self) -> String {
        self.content
    }
}

/// Summary of a completed [`Assembler::assemble`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Path the output was written to.
    pub output: PathBuf,
    /// Number of fragments concatenated.
    pub fragments: usize,
    /// Bytes written.
    pub bytes: usize,
    /// SHA-256 hex digest of the written content.
    pub checksum: String,
}

/// Whether the on-disk output matches what a run would produce now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Output exists and is byte-identical.
    UpToDate,
    /// Output exists but differs.
    Stale,
    /// Output does not exist.
    Missing,
}

/// Builds one output file from a preamble and an ordered fragment manifest.
///
/// # Examples
///
/// ```no_run
/// use schema_assemble_core::{Assembler, AssemblyConfig};
///
/// let config = AssemblyConfig::default();
/// let report = Assembler::new(&config).assemble().unwrap();
/// println!("wrote {} fragments to {}", report.fragments, report.output.display());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    config: &'a AssemblyConfig,
}

impl<'a> Assembler<'a> {
    /// Creates an assembler over `config`.
    pub fn new(config: &'a AssemblyConfig) -> Self {
        Self { config }
    }

    /// Reads every fragment and concatenates them after the preamble without
    /// touching the output file.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::Read`] for the first fragment that is
    /// missing, unreadable, not a regular file, or not valid UTF-8.
    pub fn build(&self) -> Result<Assembly> {
        let mut content = self.config.preamble.clone();
        let mut fragment_count = 0;

        for path in self.config.fragment_paths() {
            let text = read_fragment(&path)?;
            debug!(path = %path.display(), bytes = text.len(), "appending fragment");
            content.push('\n');
            content.push_str(&text);
            fragment_count += 1;
        }

        Ok(Assembly {
            content,
            fragment_count,
        })
    }

    /// Builds the assembly and writes it to the output path, replacing any
    /// previous content.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::Read`] if a fragment cannot be read (nothing
    /// is written in that case), or [`AssembleError::Write`] if the output
    /// cannot be written.
    pub fn assemble(&self) -> Result<AssemblyReport> {
        let assembly = self.build()?;
        let output = self.config.output_path();

        fs::write(&output, assembly.content()).map_err(|source| AssembleError::Write {
            path: output.clone(),
            source,
        })?;

        let report = AssemblyReport {
            checksum: assembly.checksum(),
            fragments: assembly.fragment_count(),
            bytes: assembly.content().len(),
            output,
        };
        info!(
            output = %report.output.display(),
            fragments = report.fragments,
            bytes = report.bytes,
            checksum = %report.checksum,
            "wrote assembled schema"
        );
        Ok(report)
    }

    /// Compares the current output file against a fresh in-memory build.
    ///
    /// Never writes.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::Read`] if a fragment cannot be read, or
    /// [`AssembleError::ReadOutput`] if the existing output cannot be read.
    pub fn check(&self) -> Result<Freshness> {
        let assembly = self.build()?;
        let output = self.config.output_path();

        let freshness = match fs::read(&output) {
            Ok(existing) if existing == assembly.content().as_bytes() => Freshness::UpToDate,
            Ok(_) => Freshness::Stale,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Freshness::Missing,
            Err(source) => {
                return Err(AssembleError::ReadOutput {
                    path: output,
                    source,
                });
            }
        };

        info!(output = %output.display(), ?freshness, "checked assembled schema");
        Ok(freshness)
    }
}

fn read_fragment(path: &Path) -> Result<String> {
    let read_err = |source: io::Error| AssembleError::Read {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(read_err)?;
    if !metadata.is_file() {
        return Err(read_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    fs::read_to_string(path).map_err(read_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_build_example_scenario() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");
        write(dir.path(), "b.txt", "beta");
        let config = AssemblyConfig::new("HEADER", ["a.txt", "b.txt"]).with_base_dir(dir.path());

        let assembly = Assembler::new(&config).build().unwrap();
        assert_eq!(assembly.content(), "HEADER\nalpha\nbeta");
        assert_eq!(assembly.fragment_count(), 2);
    }

    #[test]
    fn test_empty_manifest_is_just_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let config = AssemblyConfig::new("HEADER", Vec::<PathBuf>::new()).with_base_dir(dir.path());

        let assembly = Assembler::new(&config).build().unwrap();
        assert_eq!(assembly.into_string(), "HEADER");
    }

    #[test]
    fn test_directory_fragment_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        let config = AssemblyConfig::new("", ["models"]).with_base_dir(dir.path());

        let err = Assembler::new(&config).build().unwrap_err();
        match err {
            AssembleError::Read { path, .. } => assert_eq!(path, dir.path().join("models")),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bin.prisma"), [0xff, 0xfe, 0x00]).unwrap();
        let config = AssemblyConfig::new("", ["bin.prisma"]).with_base_dir(dir.path());

        let err = Assembler::new(&config).build().unwrap_err();
        assert!(matches!(err, AssembleError::Read { .. }));
        assert!(err.to_string().contains("bin.prisma"));
    }

    #[test]
    fn test_checksum_is_sha256_hex() {
        let dir = tempfile::tempdir().unwrap();
        let config = AssemblyConfig::new("", Vec::<PathBuf>::new()).with_base_dir(dir.path());

        let assembly = Assembler::new(&config).build().unwrap();
        assert_eq!(
            assembly.checksum(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_report_matches_written_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");
        let config = AssemblyConfig::new("H", ["a.txt"])
            .with_base_dir(dir.path())
            .with_output("out.txt");

        let report = Assembler::new(&config).assemble().unwrap();
        assert_eq!(report.output, dir.path().join("out.txt"));
        assert_eq!(report.fragments, 1);
        assert_eq!(report.bytes, "H\nalpha".len());
        assert_eq!(fs::read_to_string(&report.output).unwrap(), "H\nalpha");
        assert_eq!(report.checksum.len(), 64);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");
        let config = AssemblyConfig::new("", ["a.txt"])
            .with_base_dir(dir.path())
            .with_output("missing/out.txt");

        let err = Assembler::new(&config).assemble().unwrap_err();
        match err {
            AssembleError::Write { path, .. } => {
                assert_eq!(path, dir.path().join("missing/out.txt"))
            }
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_states() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");
        let config = AssemblyConfig::new("H", ["a.txt"])
            .with_base_dir(dir.path())
            .with_output("out.txt");
        let assembler = Assembler::new(&config);

        assert_eq!(assembler.check().unwrap(), Freshness::Missing);
        assembler.assemble().unwrap();
        assert_eq!(assembler.check().unwrap(), Freshness::UpToDate);

        write(dir.path(), "a.txt", "alpha2");
        assert_eq!(assembler.check().unwrap(), Freshness::Stale);
        assert_eq!(
            fs::read_to_string(dir.path().join("out.txt")).unwrap(),
            "H\nalpha"
        );
    }

    #[test]
    fn test_check_unreadable_output_names_output() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");
        fs::create_dir(dir.path().join("out")).unwrap();
        let config = AssemblyConfig::new("H", ["a.txt"])
            .with_base_dir(dir.path())
            .with_output("out");

        let err = Assembler::new(&config).check().unwrap_err();
        match &err {
            AssembleError::ReadOutput { path, .. } => assert_eq!(path, &dir.path().join("out")),
            other => panic!("expected output read error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("failed to read existing output"));
    }
}
