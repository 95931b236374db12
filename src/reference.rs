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

//! Reference index and transcript to gene map preparation.
//!
//! A reference is ready when both `index/<reference>.idx` and
//! `index/tr2g_<reference>.tsv` exist. Otherwise they are built from
//! `ref-seqs/<reference>.fa.gz`, which must be a BioMart export with headers
//!
//! ```text
//! >transcriptID|geneID|geneName|...
//! ```
//!
//! The headers are rewritten to be space separated so that the indexer
//! names each transcript by its transcript ID.

use std::fs;
use std::io::BufWriter;
use std::io::Write;

use bstr::ByteSlice;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::config::Layout;
use crate::error::ConfigurationError;
use crate::tools::IndexRequest;
use crate::tools::ToolInvoker;
use crate::tr2g::write_tr2g_file;
use crate::tr2g::Tr2gRecord;

type E = Box<dyn std::error::Error>;

/// Separator of the fields in BioMart fasta headers.
pub const BIOMART_SEPARATOR: &str = "|";

/// What [ensure_reference] had to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceStatus {
    /// Index and tr2g file were already present.
    Found,
    /// Built from the fasta file, with this many transcripts.
    Built { n_transcripts: usize },
}

/// True if both the index and the tr2g file of `reference` exist.
pub fn reference_ready(layout: &Layout, reference: &str) -> bool {
    layout.index_file(reference).exists() && layout.tr2g_file(reference).exists()
}

/// Split a space separated header into a tr2g record
///
/// Takes the first three fields split on single spaces. Missing fields are
/// left empty and fields past the third are discarded.
///
pub fn header_to_tr2g(header: &[u8]) -> Tr2gRecord {
    let mut fields = header.split_str(" ").map(|field| field.to_str_lossy().to_string());

    let transcript_id = fields.next().unwrap_or_default();
    let gene_id = fields.next().unwrap_or_default();
    let gene_name = fields.next().filter(|name| !name.is_empty());

    Tr2gRecord { transcript_id, gene_id, gene_name }
}

/// Build the tr2g file from the fasta headers
///
/// Rewrites `ref-seqs/<reference>.fa.gz` with `|` in the headers replaced by
/// spaces and writes the first three header fields of every record to
/// `index/tr2g_<reference>.tsv`.
///
/// Returns the number of records in the fasta file.
///
pub fn build_from_fasta(
    layout: &Layout,
    reference: &str,
) -> Result<usize, E> {
    let fasta_path = layout.fasta_file(reference);
    log::info!("Reference fasta file found: adapting headers");

    let mut reader = needletail::parse_fastx_file(&fasta_path)?;

    // Rewritten sequences go to a temporary file next to the input and
    // replace it only after the whole file has been read.
    let tmp = tempfile::NamedTempFile::new_in(layout.ref_seqs_dir())?;
    let mut conn_out = GzEncoder::new(BufWriter::new(tmp), Compression::default());

    let mut records: Vec<Tr2gRecord> = Vec::new();
    while let Some(record) = reader.next() {
        let record = record?;
        let header = record.id().replace(BIOMART_SEPARATOR, " ");

        conn_out.write_all(b">")?;
        conn_out.write_all(&header)?;
        conn_out.write_all(b"\n")?;
        conn_out.write_all(&record.seq())?;
        conn_out.write_all(b"\n")?;

        records.push(header_to_tr2g(&header));
    }

    log::info!("Extract tr2g file from fasta headers");
    log::debug!("{} transcripts in {}", records.len(), fasta_path.display());
    write_tr2g_file(&layout.tr2g_file(reference), &records)?;

    let tmp = conn_out.finish()?.into_inner()?;
    fs::set_permissions(tmp.path(), fs::metadata(&fasta_path)?.permissions())?;
    tmp.persist(&fasta_path)?;

    Ok(records.len())
}

/// Make sure the index and tr2g file of `reference` exist
///
/// Builds them from the fasta file if either one is missing. Returns
/// [ConfigurationError::MissingReference] if there is no fasta file to build
/// from.
///
pub fn ensure_reference<T: ToolInvoker>(
    layout: &Layout,
    tools: &mut T,
    reference: &str,
) -> Result<ReferenceStatus, E> {
    if reference_ready(layout, reference) {
        log::info!("Reference index and tr2g file found. Continue to alignment.");
        return Ok(ReferenceStatus::Found)
    }

    let fasta = layout.fasta_file(reference);
    if !fasta.exists() {
        return Err(Box::new(ConfigurationError::MissingReference {
            reference: reference.to_string(),
            fasta,
            index: layout.index_file(reference),
            tr2g: layout.tr2g_file(reference),
        }))
    }

    log::info!("No index found. Checking for BioMart compatible reference fasta file...");
    let n_transcripts = build_from_fasta(layout, reference)?;

    log::info!("Creating index");
    let request = IndexRequest {
        index: layout.index_file(reference),
        fasta,
        make_unique: true,
    };
    tools.build_index(&request)?.check()?;

    Ok(ReferenceStatus::Built { n_transcripts })
}
