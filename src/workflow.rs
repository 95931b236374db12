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

//! Processing of all samples in a sample sheet.
//!
//! Each sample goes through
//!
//!   1. [ensure_reference](crate::reference::ensure_reference)
//!   2. [normalize_reference](crate::tr2g::normalize_reference)
//!   3. [align](crate::align::align)
//!   4. [apply_gene_names](crate::rename::apply_gene_names), unless disabled
//!
//! Samples are processed one at a time in sample sheet order and the first
//! error stops the run.

use std::path::Path;

use crate::align::align;
use crate::align::AlignOutcome;
use crate::config::Layout;
use crate::config::RunOptions;
use crate::error::ConfigurationError;
use crate::overwrite::Prompt;
use crate::reference::ensure_reference;
use crate::rename::apply_gene_names;
use crate::samplesheet::SampleEntry;
use crate::samplesheet::SampleSheet;
use crate::tools::ToolInvoker;
use crate::tr2g::normalize_reference;

type E = Box<dyn std::error::Error>;

/// Counts of what happened during a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub samples: usize,
    pub created: usize,
    pub rerun: usize,
    pub kept: usize,
    pub renamed: usize,
}

pub struct Workflow<'a, T: ToolInvoker, P: Prompt> {
    layout: &'a Layout,
    tools: T,
    prompt: P,
    options: RunOptions,
}

impl<'a, T: ToolInvoker, P: Prompt> Workflow<'a, T, P> {
    pub fn new(
        layout: &'a Layout,
        tools: T,
        prompt: P,
        options: RunOptions,
    ) -> Self {
        Workflow { layout, tools, prompt, options }
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Reads the sample sheet at `path` and processes all samples in it.
    pub fn run_from_path(
        &mut self,
        path: Option<&Path>,
    ) -> Result<RunSummary, E> {
        log::info!("Reading samplesheet");
        let sheet = match path {
            Some(path) => SampleSheet::from_path(path)?,
            None => return Err(Box::new(ConfigurationError::MissingSampleSheet { path: None })),
        };
        self.run(&sheet)
    }

    /// Processes all samples in `sheet` in order.
    pub fn run(
        &mut self,
        sheet: &SampleSheet,
    ) -> Result<RunSummary, E> {
        log::info!("Number of samples: {}", sheet.len());

        let mut summary = RunSummary::default();
        for (idx, entry) in sheet.iter().enumerate() {
            log::info!("Working on sample {}", idx + 1);
            let (outcome, renamed) = self.process_sample(entry)?;

            summary.samples += 1;
            match outcome {
                AlignOutcome::Created => summary.created += 1,
                AlignOutcome::Rerun => summary.rerun += 1,
                AlignOutcome::Kept => summary.kept += 1,
            }
            if renamed {
                summary.renamed += 1;
            }
        }

        Ok(summary)
    }

    /// Runs all stages for one sample.
    ///
    /// Returns the alignment outcome and whether gene names were applied.
    pub fn process_sample(
        &mut self,
        entry: &SampleEntry,
    ) -> Result<(AlignOutcome, bool), E> {
        log::info!("Parameters: Sample= {} Index= {} Version= {}", entry.sample, entry.reference, entry.version);
        std::fs::create_dir_all(self.layout.reference_out_dir(&entry.reference))?;

        ensure_reference(self.layout, &mut self.tools, &entry.reference)?;
        normalize_reference(self.layout, &entry.reference)?;
        let outcome = align(self.layout, &mut self.tools, &mut self.prompt, entry, &self.options)?;

        if self.options.gene_names {
            apply_gene_names(self.layout, &entry.reference, &entry.sample)?;
        }

        Ok((outcome, self.options.gene_names))
    }
}
