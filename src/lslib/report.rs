use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Per-file loader tallies
#[derive(Debug, Default, Clone, Serialize)]
pub struct LoadStats {
    pub records: u64,
    pub kept: u64,
    pub not_pass: u64,
    pub malformed: u64,
}

/// Set sizes recorded by each stage of a triage run
#[derive(Debug, Default, Clone, Serialize)]
pub struct TriageStats {
    pub contigs: usize,
    pub control_calls: usize,
    pub sus_parent_calls: usize,
    pub sus_bulk_calls: usize,
    pub control_filtered: usize,
    pub sus_parent_filtered: usize,
    pub sus_bulk_filtered: usize,
    pub sus_parent_vetoed: usize,
    pub sus_bulk_vetoed: usize,
    pub common_snps: usize,
    pub common_contigs: usize,
    pub sus_parent_only_snps: usize,
    pub sus_parent_only_contigs: usize,
    pub candidate_contigs: usize,
    pub load: Vec<(String, LoadStats)>,
}

impl TriageStats {
    pub fn log_summary(&self) {
        info!("common SNPs: {}", self.common_snps);
        info!("contigs with common SNPs: {}", self.common_contigs);
        info!("susP-only SNPs: {}", self.sus_parent_only_snps);
        info!("contigs with susP-only SNPs: {}", self.sus_parent_only_contigs);
        info!("candidate contigs: {}", self.candidate_contigs);
    }
}

/// Spinner counting records while a file is read
pub fn make_spinner(msg: &str) -> ProgressBar {
    let pbar = ProgressBar::new_spinner();
    if let Ok(sty) = ProgressStyle::with_template(" [{elapsed_precise}] {spinner} {pos} {msg}") {
        pbar.set_style(sty);
    }
    pbar.set_message(msg.to_string());
    pbar
}
