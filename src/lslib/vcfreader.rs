use crate::lslib::{make_spinner, GenotypeClass, LoadStats, SampleVariantSet, Site, VariantCall};
use anyhow::{Context, Result};
use rust_htslib::bcf::{self, header::HeaderView, Read};
use std::path::Path;

/// How a sample's calls are pulled out of a VCF
#[derive(Debug, Clone)]
pub struct LoadParams<'a> {
    /// Sample column name, default first column
    pub sample: Option<&'a str>,
    /// Integer FORMAT tag holding the per-call read count
    pub depth_tag: &'a str,
}

/// Resolve a sample name to its column index in the VCF header
fn resolve_sample_index(header: &HeaderView, name: Option<&str>) -> Result<usize> {
    if header.sample_count() == 0 {
        anyhow::bail!("VCF contains no samples");
    }
    match name {
        None => Ok(0),
        Some(name) => header.sample_id(name.as_bytes()).with_context(|| {
            let samples: Vec<String> = header
                .samples()
                .iter()
                .map(|s| String::from_utf8_lossy(s).to_string())
                .collect();
            format!("Sample '{}' not found. Available samples: {:?}", name, samples)
        }),
    }
}

/// FILTER is exactly PASS. Records with '.' are not passing
fn is_pass(record: &bcf::Record, header: &HeaderView) -> bool {
    let filters: Vec<Vec<u8>> = record.filters().map(|id| header.id_to_name(id)).collect();
    filters.len() == 1 && filters[0] == b"PASS"
}

/// Pull one sample's call out of a record. None when a required field is absent
fn extract_call(
    record: &bcf::Record,
    header: &HeaderView,
    sample_idx: usize,
    depth_tag: &str,
) -> Option<(Site, VariantCall)> {
    let rid = record.rid()?;
    let contig = String::from_utf8_lossy(header.rid2name(rid).ok()?).to_string();
    let pos = u64::try_from(record.pos()).ok()? + 1;

    let alleles = record.alleles();
    if alleles.len() < 2 {
        return None;
    }
    let reference = String::from_utf8_lossy(alleles[0]).to_string();
    let alt = alleles[1..]
        .iter()
        .map(|a| String::from_utf8_lossy(a))
        .collect::<Vec<_>>()
        .join(",");

    let genotypes = record.genotypes().ok()?;
    let token = genotypes.get(sample_idx).to_string();

    let depths = record.format(depth_tag.as_bytes()).integer().ok()?;
    let depth = *depths.get(sample_idx)?.first()?;
    // negative covers htslib's missing/vector-end sentinels
    let read_count = u64::try_from(depth).ok()?;

    Some((
        Site { contig, pos },
        VariantCall {
            read_count,
            alt,
            reference,
            genotype: GenotypeClass::from_token(&token),
        },
    ))
}

/// Read every PASS call of one sample from a VCF/BCF
pub fn load_sample_calls(
    path: &Path,
    label: &str,
    params: &LoadParams,
) -> Result<(SampleVariantSet, LoadStats)> {
    let mut reader = bcf::Reader::from_path(path)
        .with_context(|| format!("Failed to open VCF {:?}", path))?;
    let header = reader.header().clone();
    let sample_idx = resolve_sample_index(&header, params.sample)
        .with_context(|| format!("resolving sample of {:?}", path))?;

    let mut sample = SampleVariantSet::new(label);
    let mut stats = LoadStats::default();
    let pbar = make_spinner(label);

    for result in reader.records() {
        stats.records += 1;
        pbar.inc(1);
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("{}: skipping unreadable record {}: {}", label, stats.records, e);
                stats.malformed += 1;
                continue;
            }
        };

        if !is_pass(&record, &header) {
            stats.not_pass += 1;
            continue;
        }

        match extract_call(&record, &header, sample_idx, params.depth_tag) {
            Some((site, call)) => {
                stats.kept += 1;
                sample.insert(site, call);
            }
            None => {
                debug!("{}: skipping incomplete record {}", label, stats.records);
                stats.malformed += 1;
            }
        }
    }
    pbar.finish_and_clear();

    if stats.malformed != 0 {
        warn!("{}: {} malformed records skipped", label, stats.malformed);
    }
    Ok((sample, stats))
}
