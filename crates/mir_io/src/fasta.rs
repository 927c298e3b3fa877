//! FASTA export of live genomes: one record per gene, headed by the
//! organism's lineage name (or id) and the gene index.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mir_core::world::GenomeRecord;

use crate::error::Result;

pub fn write_genomes<P: AsRef<Path>>(path: P, records: &[GenomeRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        for (i, seq) in record.genes.iter().enumerate() {
            writeln!(writer, ">{}|gene{}", record.name, i)?;
            writeln!(writer, "{seq}")?;
        }
    }
    writer.flush()?;
    Ok(())
}
