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

//! Paths in the data directory and parameters of a run.
//!
//! The data directory has the following structure:
//!
//! ```text
//! kb_data/
//! ├── fastq/<sample>/*R1*.fastq.gz, *R2*.fastq.gz
//! ├── index/<reference>.idx
//! ├── index/tr2g_<reference>.tsv
//! ├── index/tr2g_<reference>_mod.tsv
//! ├── out/<reference>/<sample>/counts_unfiltered/cells_x_genes.genes.txt
//! └── ref-seqs/<reference>.fa.gz
//! ```
//!
//! All paths are derived from the root held in [Layout], nothing depends on
//! the current working directory.

use std::path::Path;
use std::path::PathBuf;

use crate::overwrite::OverwriteMode;

type E = Box<dyn std::error::Error>;

/// Name of the data directory created in the user's home directory.
pub const DATA_DIR_NAME: &str = "kb_data";

/// Location of inputs and outputs in the data directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Layout { root: root.into() }
    }

    /// Returns `~/kb_data`, or None if the home directory can't be resolved.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_dir(&self) -> PathBuf {
        self.root.join("index")
    }

    pub fn ref_seqs_dir(&self) -> PathBuf {
        self.root.join("ref-seqs")
    }

    pub fn fastq_root(&self) -> PathBuf {
        self.root.join("fastq")
    }

    pub fn out_root(&self) -> PathBuf {
        self.root.join("out")
    }

    /// Pseudoalignment index `index/<reference>.idx`.
    pub fn index_file(&self, reference: &str) -> PathBuf {
        self.index_dir().join(format!("{}.idx", reference))
    }

    /// Transcript to gene map extracted from the fasta headers.
    pub fn tr2g_file(&self, reference: &str) -> PathBuf {
        self.index_dir().join(format!("tr2g_{}.tsv", reference))
    }

    /// Transcript to gene map with missing gene names filled in.
    pub fn tr2g_mod_file(&self, reference: &str) -> PathBuf {
        self.index_dir().join(format!("tr2g_{}_mod.tsv", reference))
    }

    /// Compressed transcript sequences `ref-seqs/<reference>.fa.gz`.
    pub fn fasta_file(&self, reference: &str) -> PathBuf {
        self.ref_seqs_dir().join(format!("{}.fa.gz", reference))
    }

    pub fn fastq_dir(&self, sample: &str) -> PathBuf {
        self.fastq_root().join(sample)
    }

    pub fn reference_out_dir(&self, reference: &str) -> PathBuf {
        self.out_root().join(reference)
    }

    /// Output directory of the counting tool for `sample` against `reference`.
    pub fn out_dir(&self, reference: &str, sample: &str) -> PathBuf {
        self.reference_out_dir(reference).join(sample)
    }

    pub fn counts_dir(&self, reference: &str, sample: &str) -> PathBuf {
        self.out_dir(reference, sample).join("counts_unfiltered")
    }

    /// Gene list of the unfiltered count matrix.
    pub fn genes_file(&self, reference: &str, sample: &str) -> PathBuf {
        self.counts_dir(reference, sample).join("cells_x_genes.genes.txt")
    }

    /// Creates the top-level directories if they don't exist yet.
    pub fn create_dirs(&self) -> Result<(), E> {
        for dir in [self.index_dir(), self.ref_seqs_dir(), self.fastq_root(), self.out_root()] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

/// Parameters shared by all samples in a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Threads passed to the counting tool.
    pub threads: u32,
    /// Memory in GB passed to the counting tool.
    pub memory_gb: u32,
    /// Replace gene IDs with gene names in the count matrix gene lists.
    pub gene_names: bool,
    /// What to do when an alignment already exists.
    pub overwrite: OverwriteMode,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            threads: 32,
            memory_gb: 16,
            gene_names: true,
            overwrite: OverwriteMode::Prompt,
        }
    }
}
