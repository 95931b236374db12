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

//! Sample sheets.
//!
//! A sample sheet is a tab separated file with one row per attribute and one
//! column per sample. The first column holds the attribute name:
//!
//! ```text
//! sample     dr_RGC_adult_s17        dr_pineal_s1
//! reference  D_rerio.GRCz11.101_mt   D_rerio.GRCz11.101
//! version    10xv3                   10xv3
//! ```
//!
//! Rows with other attribute names are ignored.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ConfigurationError;

type E = Box<dyn std::error::Error>;

const ATTRIBUTES: [&str; 3] = ["sample", "reference", "version"];

/// One sample column of a sample sheet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SampleEntry {
    /// Sample name, also the name of its directory under `fastq/`.
    pub sample: String,
    /// Reference to align against.
    pub reference: String,
    /// Chemistry/version tag, eg. `10xv3`.
    pub version: String,
}

impl SampleEntry {
    pub fn new(sample: &str, reference: &str, version: &str) -> Self {
        SampleEntry {
            sample: sample.to_string(),
            reference: reference.to_string(),
            version: version.to_string(),
        }
    }
}

/// Samples in the order of their columns.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SampleSheet {
    pub entries: Vec<SampleEntry>,
}

impl SampleSheet {
    /// Reads a sample sheet from `path`.
    ///
    /// Returns [ConfigurationError::MissingSampleSheet] if the file doesn't
    /// exist.
    pub fn from_path(path: &Path) -> Result<Self, E> {
        if !path.is_file() {
            return Err(Box::new(ConfigurationError::MissingSampleSheet { path: Some(path.to_path_buf()) }))
        }
        let mut conn = File::open(path)?;
        Self::parse(&mut conn, path)
    }

    /// Parses a sample sheet from `conn`. `path` is only used in error
    /// messages.
    pub fn parse<R: Read>(conn: &mut R, path: &Path) -> Result<Self, E> {
        let malformed = |reason: String| -> E {
            Box::new(ConfigurationError::MalformedSampleSheet { path: path.to_path_buf(), reason })
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(conn);

        let mut rows: HashMap<String, Vec<String>> = HashMap::new();
        for result in reader.records() {
            let record = result.map_err(|e| malformed(e.to_string()))?;
            let mut fields = record.iter();
            let label = match fields.next() {
                Some(label) if ATTRIBUTES.contains(&label) => label,
                Some(label) => {
                    log::debug!("Ignoring samplesheet row '{}'", label);
                    continue
                },
                None => continue,
            };
            if rows.contains_key(label) {
                log::warn!("Samplesheet row '{}' appears more than once, using the first one", label);
                continue
            }
            rows.insert(label.to_string(), fields.map(|x| x.to_string()).collect());
        }

        for attribute in ATTRIBUTES {
            if !rows.contains_key(attribute) {
                return Err(malformed(format!("missing row '{}'", attribute)))
            }
        }

        let samples = &rows["sample"];
        let references = &rows["reference"];
        let versions = &rows["version"];
        if references.len() != samples.len() || versions.len() != samples.len() {
            return Err(malformed(format!(
                "rows have different numbers of columns (sample: {}, reference: {}, version: {})",
                samples.len(), references.len(), versions.len()
            )))
        }

        let entries = samples.iter().zip(references.iter()).zip(versions.iter())
            .map(|((sample, reference), version)| SampleEntry::new(sample, reference, version))
            .collect();

        Ok(SampleSheet { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampleEntry> {
        self.entries.iter()
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn parse_two_samples() {
        use super::SampleEntry;
        use super::SampleSheet;
        use std::io::Cursor;
        use std::path::Path;

        let data: Vec<u8> = b"sample\tdr_RGC_adult_s17\tdr_pineal_s1\n\
reference\tD_rerio.GRCz11.101_mt\tD_rerio.GRCz11.101\n\
version\t10xv3\t10xv2\n".to_vec();
        let expected = vec![
            SampleEntry::new("dr_RGC_adult_s17", "D_rerio.GRCz11.101_mt", "10xv3"),
            SampleEntry::new("dr_pineal_s1", "D_rerio.GRCz11.101", "10xv2"),
        ];

        let mut input: Cursor<Vec<u8>> = Cursor::new(data);
        let got = SampleSheet::parse(&mut input, Path::new("samplesheet.tsv")).unwrap();

        assert_eq!(got.entries, expected);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn parse_rows_in_any_order() {
        use super::SampleEntry;
        use super::SampleSheet;
        use std::io::Cursor;
        use std::path::Path;

        let data: Vec<u8> = b"version\t10xv3\nnote\tfirst run\nsample\ts1\nreference\trefA\n".to_vec();

        let mut input: Cursor<Vec<u8>> = Cursor::new(data);
        let got = SampleSheet::parse(&mut input, Path::new("samplesheet.tsv")).unwrap();

        assert_eq!(got.entries, vec![SampleEntry::new("s1", "refA", "10xv3")]);
    }

    #[test]
    fn parse_missing_row() {
        use super::SampleSheet;
        use crate::error::ConfigurationError;
        use std::io::Cursor;
        use std::path::Path;

        let data: Vec<u8> = b"sample\ts1\nreference\trefA\n".to_vec();

        let mut input: Cursor<Vec<u8>> = Cursor::new(data);
        let got = SampleSheet::parse(&mut input, Path::new("samplesheet.tsv")).unwrap_err();

        assert!(matches!(got.downcast_ref::<ConfigurationError>(), Some(ConfigurationError::MalformedSampleSheet { .. })));
    }

    #[test]
    fn parse_uneven_rows() {
        use super::SampleSheet;
        use crate::error::ConfigurationError;
        use std::io::Cursor;
        use std::path::Path;

        let data: Vec<u8> = b"sample\ts1\ts2\nreference\trefA\nversion\t10xv3\t10xv3\n".to_vec();

        let mut input: Cursor<Vec<u8>> = Cursor::new(data);
        let got = SampleSheet::parse(&mut input, Path::new("samplesheet.tsv")).unwrap_err();

        assert!(matches!(got.downcast_ref::<ConfigurationError>(), Some(ConfigurationError::MalformedSampleSheet { .. })));
    }

    #[test]
    fn missing_file() {
        use super::SampleSheet;
        use crate::error::ConfigurationError;

        let tmp = tempfile::tempdir().unwrap();
        let got = SampleSheet::from_path(&tmp.path().join("samplesheet.tsv")).unwrap_err();

        assert!(matches!(got.downcast_ref::<ConfigurationError>(), Some(ConfigurationError::MissingSampleSheet { .. })));
    }
}
