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
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use crate::error::ToolError;
use crate::tools::CountRequest;
use crate::tools::IndexRequest;
use crate::tools::ToolInvoker;
use crate::tools::ToolOutput;

type E = Box<dyn std::error::Error>;

/// Runs `kallisto index` and `kb count` as child processes.
#[derive(Clone, Debug)]
pub struct KbTools {
    /// `kallisto` executable.
    pub kallisto: PathBuf,
    /// `kb` executable from kb-python.
    pub kb: PathBuf,
}

impl Default for KbTools {
    fn default() -> Self {
        KbTools { kallisto: PathBuf::from("kallisto"), kb: PathBuf::from("kb") }
    }
}

/// Arguments for `kallisto index`.
pub fn index_args(request: &IndexRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "index".into(),
        "-i".into(), request.index.clone().into(),
        request.fasta.clone().into(),
    ];
    if request.make_unique {
        args.push("--make-unique".into());
    }
    args
}

/// Arguments for `kb count`.
///
/// Always asks for an h5ad matrix and allows overwriting `out_dir`.
pub fn count_args(request: &CountRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "count".into(),
        "-t".into(), request.threads.to_string().into(),
        "-m".into(), format!("{}G", request.memory_gb).into(),
        "-i".into(), request.index.clone().into(),
        "-g".into(), request.tr2g.clone().into(),
        "-x".into(), request.technology.clone().into(),
        "--h5ad".into(),
        "--overwrite".into(),
        "-o".into(), request.out_dir.clone().into(),
    ];
    args.extend(request.fastqs.iter().map(|fastq| fastq.clone().into_os_string()));
    args
}

fn run(
    program: &Path,
    args: &[OsString],
) -> Result<ToolOutput, E> {
    let name = program.to_string_lossy().to_string();
    log::debug!("{} {}", name, args.iter().map(|x| x.to_string_lossy()).collect::<Vec<_>>().join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| ToolError::Spawn { program: name.clone(), source })?;

    if !output.stderr.is_empty() {
        log::debug!("{} stderr:\n{}", name, String::from_utf8_lossy(&output.stderr));
    }

    Ok(ToolOutput {
        program: name,
        code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

impl ToolInvoker for KbTools {
    fn build_index(&mut self, request: &IndexRequest) -> Result<ToolOutput, E> {
        run(&self.kallisto, &index_args(request))
    }

    fn run_counting(&mut self, request: &CountRequest) -> Result<ToolOutput, E> {
        run(&self.kb, &count_args(request))
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn index_args_make_unique() {
        use super::index_args;
        use crate::tools::IndexRequest;
        use std::ffi::OsString;
        use std::path::PathBuf;

        let request = IndexRequest{
            index: PathBuf::from("/kb_data/index/refA.idx"),
            fasta: PathBuf::from("/kb_data/ref-seqs/refA.fa.gz"),
            make_unique: true,
        };
        let expected: Vec<OsString> = ["index", "-i", "/kb_data/index/refA.idx", "/kb_data/ref-seqs/refA.fa.gz", "--make-unique"]
            .iter().map(OsString::from).collect();

        assert_eq!(index_args(&request), expected);
    }

    #[test]
    fn count_args_pass_mates_in_order() {
        use super::count_args;
        use crate::tools::CountRequest;
        use std::ffi::OsString;
        use std::path::PathBuf;

        let request = CountRequest{
            index: PathBuf::from("/kb_data/index/refA.idx"),
            tr2g: PathBuf::from("/kb_data/index/tr2g_refA_mod.tsv"),
            technology: "10xv3".to_string(),
            threads: 8,
            memory_gb: 16,
            out_dir: PathBuf::from("/kb_data/out/refA/s1"),
            fastqs: vec![PathBuf::from("/kb_data/fastq/s1/s1_R1.fastq.gz"), PathBuf::from("/kb_data/fastq/s1/s1_R2.fastq.gz")],
        };
        let expected: Vec<OsString> = [
            "count", "-t", "8", "-m", "16G",
            "-i", "/kb_data/index/refA.idx",
            "-g", "/kb_data/index/tr2g_refA_mod.tsv",
            "-x", "10xv3", "--h5ad", "--overwrite",
            "-o", "/kb_data/out/refA/s1",
            "/kb_data/fastq/s1/s1_R1.fastq.gz", "/kb_data/fastq/s1/s1_R2.fastq.gz",
        ].iter().map(OsString::from).collect();

        assert_eq!(count_args(&request), expected);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        use super::KbTools;
        use crate::error::ToolError;
        use crate::tools::IndexRequest;
        use crate::tools::ToolInvoker;
        use std::path::PathBuf;

        let mut tools = KbTools{ kallisto: PathBuf::from("/nonexistent/kallisto"), kb: PathBuf::from("/nonexistent/kb") };
        let request = IndexRequest{ index: PathBuf::from("x.idx"), fasta: PathBuf::from("x.fa.gz"), make_unique: true };

        let got = tools.build_index(&request).unwrap_err();

        assert!(matches!(got.downcast_ref::<ToolError>(), Some(ToolError::Spawn { .. })));
    }
}
