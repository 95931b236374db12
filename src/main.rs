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
use std::time::Instant;

use clap::Parser;

use kb_helper::config::Layout;
use kb_helper::config::RunOptions;
use kb_helper::error::ConfigurationError;
use kb_helper::overwrite::StdinPrompt;
use kb_helper::tools::kallisto::KbTools;
use kb_helper::workflow::RunSummary;
use kb_helper::workflow::Workflow;

mod cli;

type E = Box<dyn std::error::Error>;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()
    .unwrap();
}

fn run(cli: &cli::Cli) -> Result<RunSummary, E> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => Layout::default_root().ok_or(ConfigurationError::NoHomeDirectory)?,
    };
    let layout = Layout::new(root);
    layout.create_dirs()?;
    log::info!("Set up working directory: {}", layout.root().display());

    let tools = KbTools { kallisto: cli.kallisto.clone(), kb: cli.kb.clone() };
    let options = RunOptions {
        threads: cli.threads,
        memory_gb: cli.memory,
        gene_names: !cli.gene_names_off,
        overwrite: cli.overwrite,
    };

    let mut workflow = Workflow::new(&layout, tools, StdinPrompt, options);
    workflow.run_from_path(cli.samplesheet.as_deref())
}

fn main() {
    let cli = cli::Cli::parse();
    init_log(if cli.verbose { 3 } else { 2 });

    let start_time = Instant::now();
    match run(&cli) {
        Ok(summary) => {
            log::info!(
                "Processed {} samples: {} aligned, {} aligned again, {} kept, {} renamed",
                summary.samples, summary.created, summary.rerun, summary.kept, summary.renamed
            );
            log::info!("Runtime: {:.2} minutes", start_time.elapsed().as_secs_f64() / 60.0);
        },
        Err(e) => {
            log::error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                log::error!("  caused by: {}", cause);
                source = cause.source();
            }
            log::error!("Exiting program");
            std::process::exit(1);
        },
    }
}
