use crate::lslib::{open_fasta, SplitArgs};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Overlapping fragments of a sequence, named `{id}:{start}-{end}` (1-based, inclusive)
pub struct Fragments<'a> {
    id: &'a str,
    seq: &'a [u8],
    fragsize: usize,
    step: usize,
    offset: usize,
}

impl<'a> Fragments<'a> {
    /// `overlap` must be smaller than `fragsize`
    pub fn new(id: &'a str, seq: &'a [u8], fragsize: usize, overlap: usize) -> Self {
        Self {
            id,
            seq,
            fragsize,
            step: fragsize - overlap,
            offset: 0,
        }
    }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = (String, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset + 1 >= self.seq.len() {
            return None;
        }
        let end = self.seq.len().min(self.offset + self.fragsize);
        let ret = (
            format!("{}:{}-{}", self.id, self.offset + 1, end),
            &self.seq[self.offset..end],
        );
        self.offset += self.step;
        Some(ret)
    }
}

pub fn split_main(args: SplitArgs) -> Result<()> {
    let mut out = BufWriter::with_capacity(
        page_size::get() * 16,
        File::create(&args.output).with_context(|| format!("Error creating {:?}", args.output))?,
    );
    let mut n_seqs: u64 = 0;
    let mut n_frags: u64 = 0;
    for result in open_fasta(&args.input)?.records() {
        let record = result.context("malformed fasta record")?;
        n_seqs += 1;
        for (name, frag) in Fragments::new(record.id(), record.seq(), args.fragsize, args.overlap) {
            writeln!(out, ">{}", name)?;
            out.write_all(frag)?;
            writeln!(out)?;
            n_frags += 1;
        }
    }
    out.flush()?;
    info!("split {} sequences into {} fragments", n_seqs, n_frags);
    Ok(())
}
