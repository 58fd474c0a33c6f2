mod annotations;
pub use crate::lslib::annotations::{
    load_motifs, load_synteny, read_lines, MotifHit, MotifMap, SyntenyMap,
};

mod classifier;
pub use crate::lslib::classifier::{classify_candidates, CandidateSet, SnpCounts};

mod cli;
pub use crate::lslib::cli::{
    Cli, Commands, ContextArgs, CoverageArgs, LrrseekParams, SplitArgs, SyntenyArgs, TriageArgs,
    VcfParams,
};

mod context;
pub use crate::lslib::context::{context_main, context_window, iupac};

mod coverage;
pub use crate::lslib::coverage::{
    average_call_coverage, contig_depth, coverage_main, pileup_depth_sums,
};

mod fasta;
pub use crate::lslib::fasta::{contig_lengths, open_fasta, ContigLengths};

mod genotype;
pub use crate::lslib::genotype::{GenotypeClass, GenotypeCriterion, GtFlags};

mod report;
pub use crate::lslib::report::{make_spinner, LoadStats, TriageStats};

mod split;
pub use crate::lslib::split::{split_main, Fragments};

mod synteny;
pub use crate::lslib::synteny::{parse_blast_xml, synteny_main, HspFilter, SyntenyHit};

mod tables;
pub use crate::lslib::tables::{
    build_contig_summary, build_snp_table, render_contig_summary, render_snp_table,
    render_table, write_output, ContigSummaryRow, SnpTableRow, CONTIG_TABLE_HEADER,
    SNP_TABLE_HEADER,
};

mod triage;
pub use crate::lslib::triage::triage_main;

mod variants;
pub use crate::lslib::variants::{SampleVariantSet, Site, VariantCall};

mod vcfreader;
pub use crate::lslib::vcfreader::{load_sample_calls, LoadParams};
