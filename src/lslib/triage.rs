use crate::lslib::{
    average_call_coverage, build_contig_summary, build_snp_table, classify_candidates,
    contig_lengths, load_motifs, load_sample_calls, load_synteny, render_contig_summary,
    render_snp_table, write_output, LoadParams, MotifMap, SampleVariantSet, SyntenyMap,
    TriageArgs, TriageStats,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

#[derive(Serialize)]
struct RunReport<'a> {
    params: &'a TriageArgs,
    stats: &'a TriageStats,
}

fn load_sample(
    path: &Path,
    label: &str,
    sample: &Option<String>,
    depth_tag: &str,
    stats: &mut TriageStats,
) -> Result<SampleVariantSet> {
    let tstamp = Instant::now();
    let params = LoadParams {
        sample: sample.as_deref(),
        depth_tag,
    };
    let (calls, load_stats) = load_sample_calls(path, label, &params)?;
    info!(
        "read {} SNPs from {} ({} records, {} not PASS) in {:.1?}",
        calls.len(),
        label,
        load_stats.records,
        load_stats.not_pass,
        tstamp.elapsed()
    );
    stats.load.push((label.to_string(), load_stats));
    Ok(calls)
}

/// Run the full triage and write both tables. Nothing is written unless every
/// input loads and both tables render.
pub fn triage_main(args: &TriageArgs) -> Result<TriageStats> {
    let mut stats = TriageStats::default();

    let tstamp = Instant::now();
    let lengths = contig_lengths(&args.reference)?;
    stats.contigs = lengths.len();
    info!("{} contig lengths in {:.1?}", lengths.len(), tstamp.elapsed());

    let depth_tag = args.vcf.depth_tag.as_str();
    let control = load_sample(&args.control, "resP", &args.vcf.control_sample, depth_tag, &mut stats)?;
    let sus_parent = load_sample(&args.sus_parent, "susP", &args.vcf.sus_parent_sample, depth_tag, &mut stats)?;
    let sus_bulk = load_sample(&args.sus_bulk, "susBulk", &args.vcf.sus_bulk_sample, depth_tag, &mut stats)?;
    stats.control_calls = control.len();
    stats.sus_parent_calls = sus_parent.len();
    stats.sus_bulk_calls = sus_bulk.len();

    let synteny = match &args.synteny {
        Some(path) => load_synteny(path)?,
        None => SyntenyMap::new(),
    };
    let motifs = match &args.motifs {
        Some(path) => load_motifs(path)?,
        None => MotifMap::new(),
    };

    let tstamp = Instant::now();
    let sus_parent_cov = average_call_coverage(&sus_parent);
    let sus_bulk_cov = average_call_coverage(&sus_bulk);
    info!("SNP coverage per contig in {:.1?}", tstamp.elapsed());

    let candidates = classify_candidates(&control, &sus_parent, &sus_bulk, &mut stats);
    stats.log_summary();

    let tstamp = Instant::now();
    let summary_rows = build_contig_summary(
        &candidates,
        &lengths,
        &sus_parent_cov,
        &sus_bulk_cov,
        &synteny,
        &motifs,
    );
    let snp_rows = build_snp_table(&candidates, &sus_parent, &sus_bulk);
    let summary = render_contig_summary(&summary_rows)?;
    let snps = render_snp_table(&snp_rows)?;

    write_output(&args.contig_summary, &summary)?;
    write_output(&args.snp_table, &snps)?;
    info!(
        "wrote {} contigs and {} SNPs in {:.1?}",
        summary_rows.len(),
        snp_rows.len(),
        tstamp.elapsed()
    );

    if let Some(path) = &args.stats {
        let report = RunReport {
            params: args,
            stats: &stats,
        };
        let json = serde_json::to_string_pretty(&report).context("serializing run stats")?;
        write_output(path, json.as_bytes())?;
    }

    Ok(stats)
}
