use crate::lslib::make_spinner;
use anyhow::{Context, Result};
use bio::io::fasta;
use std::collections::HashMap;
use std::path::Path;

pub type ContigLengths = HashMap<String, u64>;

/// Open a FASTA for streaming its records
pub fn open_fasta(path: &Path) -> Result<fasta::Reader<std::io::BufReader<std::fs::File>>> {
    fasta::Reader::from_file(path).with_context(|| format!("unable to open fasta {:?}", path))
}

/// Sequence length of every record, keyed by record id. A repeated id keeps the last length
pub fn contig_lengths(path: &Path) -> Result<ContigLengths> {
    let pbar = make_spinner("contigs");
    let mut lengths = ContigLengths::new();
    for result in open_fasta(path)?.records() {
        let record = result.with_context(|| format!("malformed fasta record in {:?}", path))?;
        if lengths
            .insert(record.id().to_string(), record.seq().len() as u64)
            .is_some()
        {
            warn!("duplicate contig {} in {:?}", record.id(), path);
        }
        pbar.inc(1);
    }
    pbar.finish_and_clear();
    Ok(lengths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_contig_lengths() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ">c1 some description\nACGT\nAC\n>c2\n\n>c3\nGGGGGGGGGG\n").unwrap();
        file.flush().unwrap();

        let lengths = contig_lengths(file.path()).unwrap();
        assert_eq!(lengths.len(), 3);
        assert_eq!(lengths["c1"], 6);
        assert_eq!(lengths["c2"], 0);
        assert_eq!(lengths["c3"], 10);
    }

    #[test]
    fn test_missing_fasta_is_error() {
        assert!(contig_lengths(Path::new("/nonexistent/ref.fa")).is_err());
    }
}
