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

//! kb-helper is a library and a command-line client for running
//! [kallisto | bustools](https://www.kallistobus.tools/) on a set of
//! single-cell RNA-seq samples:
//!
//!   - Building the pseudoalignment index and transcript to gene map of a
//!     reference from a BioMart fasta export.
//!   - Filling in missing gene names in the transcript to gene map.
//!   - Pseudoaligning and counting each sample with `kb count`.
//!   - Replacing gene IDs with gene names in the count matrix gene lists.
//!
//! ## Usage
//!
//! ### Command line
//!
//! ```text
//! kb-helper --samplesheet samplesheet.tsv -t 32 -m 16
//! ```
//!
//! All inputs and outputs live in a data directory, `~/kb_data` by default.
//! See [config] for its layout and [samplesheet] for the sample sheet format.
//!
//! References are built once and reused in later runs. Samples that already
//! have an alignment are only aligned again after confirmation, or according
//! to `--overwrite always|never`.
//!
//! ### Rust API
//!
//! The stages can be run separately:
//!
//!   - [ensure_reference](reference::ensure_reference): make sure the index and tr2g file of a reference exist.
//!   - [normalize_reference](tr2g::normalize_reference): fill in missing gene names.
//!   - [align](align::align): pseudoalign and count one sample.
//!   - [apply_gene_names](rename::apply_gene_names): name the genes in the count matrix.
//!
//! or all together for a sample sheet with [Workflow](workflow::Workflow).
//!
//! The external tools are called through the [ToolInvoker](tools::ToolInvoker)
//! trait and the overwrite confirmation through the [Prompt](overwrite::Prompt)
//! trait, so both can be replaced when the stages are embedded elsewhere.
//!

pub mod align;
pub mod config;
pub mod error;
pub mod overwrite;
pub mod reference;
pub mod rename;
pub mod samplesheet;
pub mod tools;
pub mod tr2g;
pub mod workflow;

pub use config::Layout;
pub use config::RunOptions;
pub use overwrite::OverwriteMode;
pub use samplesheet::SampleEntry;
pub use samplesheet::SampleSheet;
pub use tr2g::Tr2gRecord;
pub use workflow::Workflow;
