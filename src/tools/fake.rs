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
use std::fs;

use crate::tools::CountRequest;
use crate::tools::IndexRequest;
use crate::tools::ToolInvoker;
use crate::tools::ToolOutput;

type E = Box<dyn std::error::Error>;

/// Records requests and writes placeholder outputs instead of running tools.
#[derive(Debug, Default)]
pub struct FakeTools {
    pub index_calls: Vec<IndexRequest>,
    pub count_calls: Vec<CountRequest>,
    /// Exit code returned from every call.
    pub exit_code: i32,
}

impl FakeTools {
    pub fn failing(exit_code: i32) -> Self {
        FakeTools { exit_code, ..Default::default() }
    }

    fn output(&self, program: &str) -> ToolOutput {
        ToolOutput {
            program: program.to_string(),
            code: Some(self.exit_code),
            stdout: Vec::new(),
            stderr: if self.exit_code == 0 { Vec::new() } else { b"simulated failure\n".to_vec() },
        }
    }
}

impl ToolInvoker for FakeTools {
    fn build_index(&mut self, request: &IndexRequest) -> Result<ToolOutput, E> {
        self.index_calls.push(request.clone());
        if self.exit_code == 0 {
            fs::write(&request.index, b"index")?;
        }
        Ok(self.output("kallisto"))
    }

    fn run_counting(&mut self, request: &CountRequest) -> Result<ToolOutput, E> {
        self.count_calls.push(request.clone());
        if self.exit_code == 0 {
            let counts_dir = request.out_dir.join("counts_unfiltered");
            fs::create_dir_all(&counts_dir)?;
            fs::write(counts_dir.join("cells_x_genes.genes.txt"), b"ENSG01\nENSG02\n")?;
        }
        Ok(self.output("kb"))
    }
}
