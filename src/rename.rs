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
use std::fs::File;
use std::io::BufWriter;

use crate::config::Layout;
use crate::error::ConfigurationError;
use crate::tr2g::dedupe_by_gene_id;
use crate::tr2g::read_tr2g;
use crate::tr2g::write_gene_names;

type E = Box<dyn std::error::Error>;

/// Replace gene IDs with gene names in the count matrix
///
/// Overwrites `counts_unfiltered/cells_x_genes.genes.txt` of the alignment
/// with the gene names from the normalized tr2g file, taking the first
/// record of each gene ID.
///
/// Returns the number of genes written.
///
pub fn apply_gene_names(
    layout: &Layout,
    reference: &str,
    sample: &str,
) -> Result<usize, E> {
    log::info!("Setting gene_id to gene_name in matrix files.");

    let counts_dir = layout.counts_dir(reference, sample);
    if !counts_dir.is_dir() {
        return Err(Box::new(ConfigurationError::MissingCounts { sample: sample.to_string(), dir: counts_dir }))
    }

    let records = read_tr2g(&layout.tr2g_mod_file(reference))?;
    let genes = dedupe_by_gene_id(&records);

    let f = File::create(layout.genes_file(reference, sample))?;
    let mut conn_out = BufWriter::new(f);
    write_gene_names(&mut conn_out, &genes)?;

    log::debug!("Wrote {} gene names for {}", genes.len(), sample);
    Ok(genes.len())
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn apply_gene_names_first_name_per_gene() {
        use super::apply_gene_names;
        use crate::config::Layout;

        let tmp = tempfile::tempdir().unwrap();
        let layout = Layout::new(tmp.path());
        layout.create_dirs().unwrap();
        std::fs::write(
            layout.tr2g_mod_file("refA"),
            "tx1\tENSG01\tsox2\ntx2\tENSG02\tENSG02\ntx3\tENSG01\tsox2b\ntx4\tENSG03\tpax6a\n",
        ).unwrap();
        std::fs::create_dir_all(layout.counts_dir("refA", "s1")).unwrap();
        std::fs::write(layout.genes_file("refA", "s1"), "ENSG01\nENSG02\nENSG03\n").unwrap();

        let n_genes = apply_gene_names(&layout, "refA", "s1").unwrap();

        assert_eq!(n_genes, 3);
        let got = std::fs::read_to_string(layout.genes_file("refA", "s1")).unwrap();
        assert_eq!(got, "sox2\nENSG02\npax6a\n");
    }

    #[test]
    fn apply_gene_names_without_counts() {
        use super::apply_gene_names;
        use crate::config::Layout;
        use crate::error::ConfigurationError;

        let tmp = tempfile::tempdir().unwrap();
        let layout = Layout::new(tmp.path());
        layout.create_dirs().unwrap();
        std::fs::write(layout.tr2g_mod_file("refA"), "tx1\tENSG01\tsox2\n").unwrap();

        let got = apply_gene_names(&layout, "refA", "s1").unwrap_err();

        assert!(matches!(got.downcast_ref::<ConfigurationError>(), Some(ConfigurationError::MissingCounts { .. })));
    }
}
