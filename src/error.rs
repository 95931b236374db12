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

//! Fatal errors that end a run.
//!
//! Everything in here is reported to the user and followed by a non-zero
//! exit. Nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Missing or unusable inputs in the data directory.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Samplesheet not found. Please provide a valid samplesheet in tsv format with --samplesheet <path>")]
    MissingSampleSheet { path: Option<PathBuf> },

    #[error("Could not find the home directory. Please set the data directory with --root <dir>")]
    NoHomeDirectory,

    #[error("Samplesheet {} is malformed: {reason}", .path.display())]
    MalformedSampleSheet { path: PathBuf, reason: String },

    #[error("No reference index or fasta file found for '{reference}'. \
             Please provide either {} OR pre-built {} and {}",
            .fasta.display(), .index.display(), .tr2g.display())]
    MissingReference {
        reference: String,
        fasta: PathBuf,
        index: PathBuf,
        tr2g: PathBuf,
    },

    #[error("No {mate} fastq file found for sample '{sample}' in {}. \
             Please check your fastq files. Are they named correctly (*R1*.fastq.gz and *R2*.fastq.gz) \
             and in the correct folder (fastq/<sample_name>/)?", .dir.display())]
    MissingFastq {
        sample: String,
        dir: PathBuf,
        mate: &'static str,
    },

    #[error("Sample '{sample}' has {n_r1} R1 but {n_r2} R2 fastq files in {}. Every R1 file needs an R2 mate.", .dir.display())]
    UnpairedFastq {
        sample: String,
        dir: PathBuf,
        n_r1: usize,
        n_r2: usize,
    },

    #[error("No counts found for sample '{sample}' at {}. Was the alignment completed?", .dir.display())]
    MissingCounts { sample: String, dir: PathBuf },

    #[error("{}:{line}: expected at least transcript_id and gene_id columns", .path.display())]
    MalformedTr2g { path: PathBuf, line: u64 },
}

/// Failures of the external pseudoalignment tools.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to run {program}. Is it installed and on PATH?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {}: {stderr}", exit_code(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_code(code: &Option<i32>) -> String {
    code.map(|x| x.to_string()).unwrap_or("<signal>".to_string())
}
