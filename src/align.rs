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

//! Pseudoalignment of a single sample.
//!
//! The existence of `out/<reference>/<sample>` marks a finished alignment.
//! Existing alignments are only run again if the [OverwriteMode] allows it.

use std::path::Path;
use std::path::PathBuf;

use crate::config::Layout;
use crate::config::RunOptions;
use crate::error::ConfigurationError;
use crate::overwrite::is_yes;
use crate::overwrite::OverwriteMode;
use crate::overwrite::Prompt;
use crate::samplesheet::SampleEntry;
use crate::tools::CountRequest;
use crate::tools::ToolInvoker;

type E = Box<dyn std::error::Error>;

/// Question asked before running an existing alignment again.
pub const RERUN_QUESTION: &str = "Do you want to run it again? (yes/no)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignmentState {
    NoOutput,
    OutputExists,
}

/// What [align] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignOutcome {
    /// Aligned a sample that had no output.
    Created,
    /// Overwrote an existing alignment.
    Rerun,
    /// Left an existing alignment untouched.
    Kept,
}

pub fn alignment_state(layout: &Layout, entry: &SampleEntry) -> AlignmentState {
    if layout.out_dir(&entry.reference, &entry.sample).exists() {
        AlignmentState::OutputExists
    } else {
        AlignmentState::NoOutput
    }
}

fn glob_sorted(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, E> {
    let full = format!("{}/{}", glob::Pattern::escape(&dir.to_string_lossy()), pattern);
    let mut paths = glob::glob(&full)?.collect::<Result<Vec<PathBuf>, glob::GlobError>>()?;
    paths.sort();
    Ok(paths)
}

/// Find the read files of `sample`
///
/// Mate 1 files match `*R1*.fastq.gz` and mate 2 files `*R2*.fastq.gz` in
/// `fastq/<sample>/`. Files from several lanes are paired in sorted order and
/// returned as `R1 R2 R1 R2 ...`.
///
pub fn find_fastqs(
    layout: &Layout,
    sample: &str,
) -> Result<Vec<PathBuf>, E> {
    let dir = layout.fastq_dir(sample);
    let r1 = glob_sorted(&dir, "*R1*.fastq.gz")?;
    let r2 = glob_sorted(&dir, "*R2*.fastq.gz")?;

    if r1.is_empty() || r2.is_empty() {
        let mate = if r1.is_empty() { "R1" } else { "R2" };
        return Err(Box::new(ConfigurationError::MissingFastq { sample: sample.to_string(), dir, mate }))
    }
    if r1.len() != r2.len() {
        return Err(Box::new(ConfigurationError::UnpairedFastq { sample: sample.to_string(), dir, n_r1: r1.len(), n_r2: r2.len() }))
    }

    Ok(r1.into_iter().zip(r2).flat_map(|(mate1, mate2)| [mate1, mate2]).collect())
}

fn should_rerun<P: Prompt>(
    mode: OverwriteMode,
    prompt: &mut P,
) -> Result<bool, E> {
    match mode {
        OverwriteMode::Always => Ok(true),
        OverwriteMode::Never => Ok(false),
        OverwriteMode::Prompt => Ok(is_yes(&prompt.ask(RERUN_QUESTION)?)),
    }
}

fn run_count<T: ToolInvoker>(
    layout: &Layout,
    tools: &mut T,
    entry: &SampleEntry,
    options: &RunOptions,
) -> Result<(), E> {
    let request = CountRequest {
        index: layout.index_file(&entry.reference),
        tr2g: layout.tr2g_mod_file(&entry.reference),
        technology: entry.version.clone(),
        threads: options.threads,
        memory_gb: options.memory_gb,
        out_dir: layout.out_dir(&entry.reference, &entry.sample),
        fastqs: find_fastqs(layout, &entry.sample)?,
    };
    tools.run_counting(&request)?.check()?;
    Ok(())
}

/// Pseudoalign and count one sample
///
/// Runs the counting tool if the sample has no output yet. If it does, the
/// overwrite mode in `options` decides; with [OverwriteMode::Prompt] only the
/// exact answer `yes` runs the alignment again and any other answer keeps
/// the existing output.
///
pub fn align<T: ToolInvoker, P: Prompt>(
    layout: &Layout,
    tools: &mut T,
    prompt: &mut P,
    entry: &SampleEntry,
    options: &RunOptions,
) -> Result<AlignOutcome, E> {
    match alignment_state(layout, entry) {
        AlignmentState::NoOutput => {
            log::info!("No alignment found. Creating new alignment");
            run_count(layout, tools, entry, options)?;
            Ok(AlignOutcome::Created)
        },
        AlignmentState::OutputExists => {
            log::info!("Alignment already exists.");
            if should_rerun(options.overwrite, prompt)? {
                run_count(layout, tools, entry, options)?;
                Ok(AlignOutcome::Rerun)
            } else {
                log::info!("Continue");
                Ok(AlignOutcome::Kept)
            }
        },
    }
}
