// kb-helper: Reference preparation and pseudoalignment of single-cell RNA-seq samples.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! External pseudoalignment tools.
//!
//! The indexer and the counting tool are reached through [ToolInvoker] so
//! that the workflow never depends on a shell or on the tools being
//! installed. [KbTools](kallisto::KbTools) runs the real `kallisto` and `kb`
//! binaries.

// Tool specific implementations
pub mod kallisto;

#[cfg(test)]
pub(crate) mod fake;

use std::path::PathBuf;

use crate::error::ToolError;

type E = Box<dyn std::error::Error>;

/// Inputs for building a pseudoalignment index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexRequest {
    /// Index file to create.
    pub index: PathBuf,
    /// Compressed transcript sequences.
    pub fasta: PathBuf,
    /// Rename duplicated transcript names instead of failing.
    pub make_unique: bool,
}

/// Inputs for pseudoaligning and counting one sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountRequest {
    pub index: PathBuf,
    /// Normalized transcript to gene map.
    pub tr2g: PathBuf,
    /// Chemistry/version tag of the library, eg. `10xv3`.
    pub technology: String,
    pub threads: u32,
    pub memory_gb: u32,
    pub out_dir: PathBuf,
    /// Read files as mate pairs, `R1 R2 R1 R2 ...`.
    pub fastqs: Vec<PathBuf>,
}

/// Exit status and captured output of a tool invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub program: String,
    /// None if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turns a non-zero exit into [ToolError::Failed].
    pub fn check(self) -> Result<Self, ToolError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                program: self.program.clone(),
                code: self.code,
                stderr: stderr_tail(&self.stderr, 20),
            })
        }
    }
}

/// Runs the external indexer and counting tool.
pub trait ToolInvoker {
    fn build_index(&mut self, request: &IndexRequest) -> Result<ToolOutput, E>;

    fn run_counting(&mut self, request: &CountRequest) -> Result<ToolOutput, E>;
}

/// Last `n_lines` lines of captured stderr.
pub fn stderr_tail(stderr: &[u8], n_lines: usize) -> String {
    let contents = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = contents.lines().collect();
    let start = lines.len().saturating_sub(n_lines);
    lines[start..].join("\n")
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn check_passes_successful_output() {
        use super::ToolOutput;

        let output = ToolOutput{ program: "kb".to_string(), code: Some(0), ..Default::default() };

        assert!(output.check().is_ok());
    }

    #[test]
    fn check_fails_nonzero_exit() {
        use super::ToolOutput;
        use crate::error::ToolError;

        let output = ToolOutput{ program: "kb".to_string(), code: Some(2), stderr: b"[error] no reads\n".to_vec(), ..Default::default() };

        match output.check() {
            Err(ToolError::Failed { program, code, stderr }) => {
                assert_eq!(program, "kb");
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "[error] no reads");
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn check_fails_on_signal() {
        use super::ToolOutput;

        let output = ToolOutput{ program: "kallisto".to_string(), code: None, ..Default::default() };

        assert!(output.check().is_err());
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        use super::stderr_tail;

        let stderr = b"one\ntwo\nthree\nfour\n";

        assert_eq!(stderr_tail(stderr, 2), "three\nfour");
        assert_eq!(stderr_tail(stderr, 10), "one\ntwo\nthree\nfour");
        assert_eq!(stderr_tail(b"", 3), "");
    }
}
