use crate::lslib::{contig_lengths, read_lines, ContigLengths, CoverageArgs, SampleVariantSet};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Mean read count over all loaded calls of each contig. Uses the unfiltered calls
pub fn average_call_coverage(sample: &SampleVariantSet) -> HashMap<String, f64> {
    let mut sums: HashMap<String, (u64, u64)> = HashMap::new();
    for (site, call) in sample.calls.iter() {
        let entry = sums.entry(site.contig.clone()).or_default();
        entry.0 += call.read_count;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(contig, (total, n))| (contig, total as f64 / n as f64))
        .collect()
}

/// Sum of pileup depths (column 4) per contig
pub fn pileup_depth_sums(path: &Path) -> Result<HashMap<String, u64>> {
    let mut sums = HashMap::<String, u64>::new();
    let lines = read_lines(path).with_context(|| format!("unable to read pileup {:?}", path))?;
    for (idx, line) in lines.enumerate() {
        let line = line.with_context(|| format!("reading pileup {:?}", path))?;
        let collection: Vec<&str> = line.split('\t').collect();
        if collection.len() < 4 {
            warn!("skipping malformed pileup line {}", idx + 1);
            continue;
        }
        let depth = collection[3].trim().parse::<u64>().with_context(|| {
            format!("pileup line {} has non-integer depth {:?}", idx + 1, collection[3])
        })?;
        *sums.entry(collection[0].to_string()).or_default() += depth;
    }
    Ok(sums)
}

/// Average depth across each reference contig's full length, in contig name order.
/// None when the contig length is 0
pub fn contig_depth(
    sums: &HashMap<String, u64>,
    lengths: &ContigLengths,
) -> BTreeMap<String, Option<f64>> {
    for contig in sums.keys().filter(|c| !lengths.contains_key(*c)) {
        warn!("pileup contig {} not in reference, ignoring", contig);
    }
    lengths
        .iter()
        .map(|(contig, &len)| {
            let depth = match len {
                0 => None,
                _ => Some(*sums.get(contig).unwrap_or(&0) as f64 / len as f64),
            };
            (contig.clone(), depth)
        })
        .collect()
}

/// Per-contig average depth table from a pileup
pub fn coverage_main(args: CoverageArgs) -> Result<()> {
    let tstamp = Instant::now();
    let lengths = contig_lengths(&args.reference)?;
    info!("{} contig lengths in {:.1?}", lengths.len(), tstamp.elapsed());

    let tstamp = Instant::now();
    let sums = pileup_depth_sums(&args.pileup)?;
    let depth = contig_depth(&sums, &lengths);
    info!("average contig coverage in {:.1?}", tstamp.elapsed());

    let mut out = BufWriter::with_capacity(
        page_size::get() * 16,
        File::create(&args.out).with_context(|| format!("Error creating {:?}", args.out))?,
    );
    for (contig, value) in depth.iter() {
        match value {
            Some(v) => writeln!(out, "{}\t{:.5}", contig, v)?,
            None => writeln!(out, "{}\tNA", contig)?,
        }
    }
    out.flush()?;
    Ok(())
}
