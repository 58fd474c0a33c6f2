use crate::lslib::{load_sample_calls, open_fasta, ContextArgs, LoadParams, Site, VariantCall};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};

/// IUPAC ambiguity code for two distinct bases, N otherwise
pub fn iupac(b1: &str, b2: &str) -> u8 {
    let (b1, b2) = match (b1.as_bytes(), b2.as_bytes()) {
        ([x], [y]) => (x.to_ascii_uppercase(), y.to_ascii_uppercase()),
        _ => return b'N',
    };
    match (b1.min(b2), b1.max(b2)) {
        (b'A', b'C') => b'M',
        (b'A', b'G') => b'R',
        (b'A', b'T') => b'W',
        (b'C', b'G') => b'S',
        (b'C', b'T') => b'Y',
        (b'G', b'T') => b'K',
        _ => b'N',
    }
}

/// Header and sequence of the window around one variant.
/// None when the position lies outside the sequence
pub fn context_window(
    contig: &str,
    seq: &[u8],
    pos: u64,
    call: &VariantCall,
    flank: u64,
) -> Option<(String, Vec<u8>)> {
    let len = seq.len() as u64;
    if pos == 0 || pos > len {
        return None;
    }
    let end = len.min(pos.saturating_add(flank));
    let header = format!(
        "{}:{}:{}-{}",
        contig,
        pos,
        pos.saturating_sub(flank).max(1),
        end
    );
    let idx = (pos - 1) as usize;
    let left = idx.saturating_sub(usize::try_from(flank).unwrap_or(usize::MAX));
    let right = end as usize;

    let mut out = Vec::with_capacity(right - left);
    out.extend_from_slice(&seq[left..idx]);
    out.push(iupac(&call.alt, &call.reference));
    out.extend_from_slice(&seq[idx + 1..right]);
    Some((header, out))
}

/// Write flanking context of every PASS variant as fasta
pub fn context_main(args: ContextArgs) -> Result<()> {
    let params = LoadParams {
        sample: args.sample.as_deref(),
        depth_tag: &args.depth_tag,
    };
    let (calls, load_stats) = load_sample_calls(&args.vcf, "variants", &params)?;
    info!("{} variants loaded ({:?})", calls.len(), load_stats);

    let mut by_contig: HashMap<&str, BTreeMap<u64, &VariantCall>> = HashMap::new();
    for (Site { contig, pos }, call) in calls.calls.iter() {
        by_contig.entry(contig.as_str()).or_default().insert(*pos, call);
    }

    let mut out = BufWriter::with_capacity(
        page_size::get() * 16,
        File::create(&args.out).with_context(|| format!("Error creating {:?}", args.out))?,
    );
    let mut written: u64 = 0;
    for result in open_fasta(&args.reference)?.records() {
        let record = result.context("malformed reference record")?;
        let Some(sites) = by_contig.get(record.id()) else {
            continue;
        };
        for (pos, call) in sites {
            match context_window(record.id(), record.seq(), *pos, call, args.flank) {
                Some((header, seq)) => {
                    writeln!(out, ">{}", header)?;
                    out.write_all(&seq)?;
                    writeln!(out)?;
                    written += 1;
                }
                None => warn!("{}:{} is outside the reference sequence", record.id(), pos),
            }
        }
    }
    out.flush()?;
    info!("wrote {} context sequences", written);
    Ok(())
}
