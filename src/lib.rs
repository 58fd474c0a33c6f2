#[macro_use]
extern crate log;

mod lslib;
pub use self::{
    lslib::average_call_coverage, lslib::build_contig_summary, lslib::build_snp_table,
    lslib::classify_candidates, lslib::context_main, lslib::context_window,
    lslib::contig_depth, lslib::contig_lengths, lslib::coverage_main, lslib::iupac,
    lslib::load_motifs, lslib::load_sample_calls, lslib::load_synteny, lslib::open_fasta,
    lslib::parse_blast_xml, lslib::pileup_depth_sums, lslib::render_contig_summary,
    lslib::render_snp_table, lslib::split_main, lslib::synteny_main, lslib::triage_main,
    lslib::CandidateSet, lslib::Cli, lslib::Commands, lslib::ContextArgs,
    lslib::ContigLengths, lslib::ContigSummaryRow, lslib::CoverageArgs, lslib::Fragments,
    lslib::GenotypeClass, lslib::GenotypeCriterion, lslib::GtFlags, lslib::HspFilter,
    lslib::LoadParams, lslib::LoadStats, lslib::LrrseekParams, lslib::MotifHit,
    lslib::MotifMap, lslib::SampleVariantSet, lslib::Site, lslib::SnpCounts,
    lslib::SnpTableRow, lslib::SplitArgs, lslib::SyntenyArgs, lslib::SyntenyHit,
    lslib::SyntenyMap, lslib::TriageArgs, lslib::TriageStats, lslib::VariantCall,
    lslib::VcfParams, lslib::CONTIG_TABLE_HEADER, lslib::SNP_TABLE_HEADER,
};
