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

//! Transcript to gene maps.
//!
//! A tr2g file is a headerless tab separated table with the columns
//!
//! ```text
//! transcript_id  gene_id  gene_name
//! ```
//!
//! BioMart exports leave the gene name blank or set it to `NA` for genes
//! without a name. [normalize_gene_map] fills these in with the gene ID so
//! that every gene gets a usable label in the count matrix.

use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;

use crate::config::Layout;
use crate::error::ConfigurationError;

type E = Box<dyn std::error::Error>;

/// Marker BioMart uses for genes without a name.
pub const MISSING_GENE_NAME: &str = "NA";

/// One row of a tr2g file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tr2gRecord {
    pub transcript_id: String,
    pub gene_id: String,
    /// None if the cell was empty or the column is absent.
    pub gene_name: Option<String>,
}

impl Tr2gRecord {
    pub fn new(transcript_id: &str, gene_id: &str, gene_name: Option<&str>) -> Self {
        Tr2gRecord {
            transcript_id: transcript_id.to_string(),
            gene_id: gene_id.to_string(),
            gene_name: gene_name.filter(|x| !x.is_empty()).map(|x| x.to_string()),
        }
    }

    /// True if the gene name is absent or exactly `NA`.
    pub fn lacks_gene_name(&self) -> bool {
        match &self.gene_name {
            None => true,
            Some(name) => name == MISSING_GENE_NAME,
        }
    }

    /// Gene name if there is one, otherwise the gene ID.
    pub fn label(&self) -> &str {
        self.gene_name.as_deref().unwrap_or(&self.gene_id)
    }
}

/// Parse a tr2g table
///
/// Reads tab separated rows from `conn`. `path` is only used in error
/// messages.
///
/// Rows with fewer than two columns are an error.
///
pub fn parse_tr2g<R: Read>(
    conn: &mut R,
    path: &Path,
) -> Result<Vec<Tr2gRecord>, E> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(conn);

    let mut records: Vec<Tr2gRecord> = Vec::new();
    for result in reader.records() {
        let row = result?;
        let (transcript_id, gene_id) = match (row.get(0), row.get(1)) {
            (Some(transcript_id), Some(gene_id)) => (transcript_id, gene_id),
            _ => {
                let line = row.position().map(|pos| pos.line()).unwrap_or(0);
                return Err(Box::new(ConfigurationError::MalformedTr2g { path: path.to_path_buf(), line }))
            },
        };
        records.push(Tr2gRecord::new(transcript_id, gene_id, row.get(2)));
    }

    Ok(records)
}

pub fn read_tr2g(path: &Path) -> Result<Vec<Tr2gRecord>, E> {
    let mut conn = File::open(path)?;
    parse_tr2g(&mut conn, path)
}

/// Write a tr2g table
///
/// Always writes three columns, a missing gene name is left as an empty cell.
///
pub fn write_tr2g<W: Write>(
    conn: &mut W,
    records: &[Tr2gRecord],
) -> Result<(), E> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(conn);

    for record in records {
        writer.write_record([
            record.transcript_id.as_str(),
            record.gene_id.as_str(),
            record.gene_name.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

pub fn write_tr2g_file(path: &Path, records: &[Tr2gRecord]) -> Result<(), E> {
    let mut conn = BufWriter::new(File::create(path)?);
    write_tr2g(&mut conn, records)?;
    conn.flush()?;
    Ok(())
}

/// Fill in missing gene names
///
/// Records whose gene name is missing or exactly `NA` get their gene ID as
/// the gene name. Other records and the order of the records are left as is.
///
pub fn normalize_gene_map(
    records: Vec<Tr2gRecord>,
) -> Vec<Tr2gRecord> {
    records.into_iter().map(|mut record| {
        if record.lacks_gene_name() {
            record.gene_name = Some(record.gene_id.clone());
        }
        record
    }).collect()
}

/// Normalize the tr2g file of `reference`
///
/// Reads `tr2g_<reference>.tsv`, fills in the missing gene names and writes
/// the result to `tr2g_<reference>_mod.tsv`.
///
/// Returns the number of gene names that were filled in.
///
pub fn normalize_reference(
    layout: &Layout,
    reference: &str,
) -> Result<usize, E> {
    log::info!("Checking tr2g file. If name = NA or blank, then gene_name = gene_id");
    let records = read_tr2g(&layout.tr2g_file(reference))?;
    let n_missing = records.iter().filter(|record| record.lacks_gene_name()).count();

    let normalized = normalize_gene_map(records);
    log::debug!("tr2g for {} has {} rows, filled in {} gene names", reference, normalized.len(), n_missing);

    write_tr2g_file(&layout.tr2g_mod_file(reference), &normalized)?;
    Ok(n_missing)
}

/// Keep the first record of each gene
///
/// Returns the records in the order their gene IDs were first seen.
///
pub fn dedupe_by_gene_id(
    records: &[Tr2gRecord],
) -> Vec<Tr2gRecord> {
    let mut genes: IndexMap<&str, &Tr2gRecord> = IndexMap::new();
    records.iter().for_each(|record| {
        genes.entry(record.gene_id.as_str()).or_insert(record);
    });
    genes.into_values().cloned().collect()
}

/// Write one gene label per line
///
/// The label is the gene name, or the gene ID for records that have none.
///
pub fn write_gene_names<W: Write>(
    conn: &mut W,
    records: &[Tr2gRecord],
) -> Result<(), E> {
    for record in records {
        conn.write_all(record.label().as_bytes())?;
        conn.write_all(b"\n")?;
    }
    conn.flush()?;
    Ok(())
}
