use crate::lslib::{GenotypeCriterion, SampleVariantSet, Site, TriageStats};
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

/// Number of qualifying SNPs on a contig per set
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct SnpCounts {
    pub sus_parent: usize,
    pub sus_bulk: usize,
    pub common: usize,
}

/// Output of the triage set algebra for one run
#[derive(Debug, Default)]
pub struct CandidateSet {
    pub common: BTreeSet<Site>,
    pub sus_parent_only: BTreeSet<Site>,
    pub common_contigs: BTreeSet<String>,
    pub sus_parent_only_contigs: BTreeSet<String>,
    pub candidate_contigs: BTreeSet<String>,
    pub counts: HashMap<String, SnpCounts>,
}

impl CandidateSet {
    pub fn counts_for(&self, contig: &str) -> SnpCounts {
        self.counts.get(contig).copied().unwrap_or_default()
    }
}

fn contigs_of(sites: &BTreeSet<Site>) -> BTreeSet<String> {
    sites.iter().map(|s| s.contig.clone()).collect()
}

/// Tally sites per contig into one of the SnpCounts slots
fn tally<F>(counts: &mut HashMap<String, SnpCounts>, sites: &BTreeSet<Site>, slot: F)
where
    F: Fn(&mut SnpCounts) -> &mut usize,
{
    for site in sites {
        *slot(counts.entry(site.contig.clone()).or_default()) += 1;
    }
}

/// Finds contigs whose homozygous-alt SNPs are shared by the susceptible parent
/// and bulk, after discarding sites the control calls homozygous.
///
/// A contig is a candidate only when it has at least one common SNP and no SNP
/// private to the susceptible parent.
pub fn classify_candidates(
    control: &SampleVariantSet,
    sus_parent: &SampleVariantSet,
    sus_bulk: &SampleVariantSet,
    stats: &mut TriageStats,
) -> CandidateSet {
    let control_sites = control.passing(&GenotypeCriterion::control());
    let mut parent_sites = sus_parent.passing(&GenotypeCriterion::susceptible());
    let mut bulk_sites = sus_bulk.passing(&GenotypeCriterion::susceptible());
    stats.control_filtered = control_sites.len();
    stats.sus_parent_filtered = parent_sites.len();
    stats.sus_bulk_filtered = bulk_sites.len();
    debug!(
        "filtered {}/{}/{}: {}/{}/{}",
        control.label,
        sus_parent.label,
        sus_bulk.label,
        control_sites.len(),
        parent_sites.len(),
        bulk_sites.len()
    );

    // Counts reflect the genotype-filtered sets before the control veto
    let mut counts: HashMap<String, SnpCounts> = HashMap::new();
    tally(&mut counts, &parent_sites, |c| &mut c.sus_parent);
    tally(&mut counts, &bulk_sites, |c| &mut c.sus_bulk);

    let tstamp = Instant::now();
    let before = (parent_sites.len(), bulk_sites.len());
    parent_sites.retain(|s| !control_sites.contains(s));
    bulk_sites.retain(|s| !control_sites.contains(s));
    stats.sus_parent_vetoed = before.0 - parent_sites.len();
    stats.sus_bulk_vetoed = before.1 - bulk_sites.len();
    info!(
        "removed control variant positions ({} {}, {} {}) in {:.1?}",
        stats.sus_parent_vetoed,
        sus_parent.label,
        stats.sus_bulk_vetoed,
        sus_bulk.label,
        tstamp.elapsed()
    );

    let common: BTreeSet<Site> = parent_sites.intersection(&bulk_sites).cloned().collect();
    tally(&mut counts, &common, |c| &mut c.common);

    let sus_parent_only: BTreeSet<Site> = parent_sites.difference(&bulk_sites).cloned().collect();

    let common_contigs = contigs_of(&common);
    let sus_parent_only_contigs = contigs_of(&sus_parent_only);
    // One private SNP vetoes the whole contig
    let candidate_contigs: BTreeSet<String> = common_contigs
        .difference(&sus_parent_only_contigs)
        .cloned()
        .collect();

    stats.common_snps = common.len();
    stats.common_contigs = common_contigs.len();
    stats.sus_parent_only_snps = sus_parent_only.len();
    stats.sus_parent_only_contigs = sus_parent_only_contigs.len();
    stats.candidate_contigs = candidate_contigs.len();

    CandidateSet {
        common,
        sus_parent_only,
        common_contigs,
        sus_parent_only_contigs,
        candidate_contigs,
        counts,
    }
}
