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
use std::path::PathBuf;

use clap::Parser;

use kb_helper::overwrite::OverwriteMode;

#[derive(Parser)]
#[command(version)]
#[command(about = "Prepare references, pseudoalign samples with kb count and name the genes in the count matrices.")]
pub struct Cli {
    // Samplesheet with sample, reference and version rows
    #[arg(long = "samplesheet", value_name = "FILE", help = "Path to samplesheet (tsv format)")]
    pub samplesheet: Option<PathBuf>,

    // Threads for kb count
    #[arg(short = 't', long = "threads", default_value_t = 32, help = "Number of threads to use")]
    pub threads: u32,

    // Memory for kb count
    #[arg(short = 'm', long = "memory", default_value_t = 16, help = "Memory to use in GB")]
    pub memory: u32,

    // Keep gene IDs in the count matrices
    #[arg(long = "gene_names_off", default_value_t = false, help = "Do not change gene_ID with gene_name")]
    pub gene_names_off: bool,

    // Data directory, defaults to ~/kb_data
    #[arg(long = "root", value_name = "DIR", help = "Data directory [default: ~/kb_data]")]
    pub root: Option<PathBuf>,

    // Existing alignments
    #[arg(long = "overwrite", default_value = "prompt", help = "Run existing alignments again: prompt, always or never")]
    pub overwrite: OverwriteMode,

    // Tool executables
    #[arg(long = "kallisto", default_value = "kallisto", help = "kallisto executable")]
    pub kallisto: PathBuf,
    #[arg(long = "kb", default_value = "kb", help = "kb executable")]
    pub kb: PathBuf,

    // Verbosity
    #[arg(long = "verbose", default_value_t = false)]
    pub verbose: bool,
}
