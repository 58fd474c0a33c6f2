use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(name = "lrrseek")]
#[command(about = "Triage susceptible-specific SNPs onto candidate resistance-gene contigs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

pub trait LrrseekParams: std::fmt::Debug {
    fn validate(&self) -> bool;
    fn debug(&self) -> bool;
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Find candidate contigs from control, susceptible parent and bulk calls")]
    Triage(TriageArgs),

    #[command(about = "Extract flanking sequence around variants")]
    Context(ContextArgs),

    #[command(about = "Split fasta sequences into overlapping fragments")]
    Split(SplitArgs),

    #[command(about = "Average per-contig depth from a pileup")]
    Coverage(CoverageArgs),

    #[command(about = "Filter BLAST XML hits into a synteny table")]
    Synteny(SyntenyArgs),
}

impl Commands {
    pub fn params(&self) -> &dyn LrrseekParams {
        match self {
            Commands::Triage(args) => args,
            Commands::Context(args) => args,
            Commands::Split(args) => args,
            Commands::Coverage(args) => args,
            Commands::Synteny(args) => args,
        }
    }
}

#[derive(Parser, Serialize, Debug, Clone)]
pub struct TriageArgs {
    /// Reference contigs the variants were called against
    #[arg(short = 'f', long, help_heading = "Inputs")]
    pub reference: PathBuf,

    /// Resistant parent (control) VCF
    #[arg(long, help_heading = "Inputs")]
    pub control: PathBuf,

    /// Susceptible parent VCF
    #[arg(long, help_heading = "Inputs")]
    pub sus_parent: PathBuf,

    /// Susceptible bulk VCF
    #[arg(long, help_heading = "Inputs")]
    pub sus_bulk: PathBuf,

    /// Synteny table (contig, label)
    #[arg(long, help_heading = "Inputs")]
    pub synteny: Option<PathBuf>,

    /// Motif table (contig, label, score)
    #[arg(long, help_heading = "Inputs")]
    pub motifs: Option<PathBuf>,

    /// Output contig summary table
    #[arg(long, help_heading = "Outputs")]
    pub contig_summary: PathBuf,

    /// Output SNP table
    #[arg(long, help_heading = "Outputs")]
    pub snp_table: PathBuf,

    /// Output run statistics as json
    #[arg(long, help_heading = "Outputs")]
    pub stats: Option<PathBuf>,

    #[command(flatten)]
    pub vcf: VcfParams,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[derive(clap::Args, Serialize, Clone, Debug)]
pub struct VcfParams {
    /// Control sample name, default first column
    #[arg(long, help_heading = "Samples")]
    pub control_sample: Option<String>,

    /// Susceptible parent sample name, default first column
    #[arg(long, help_heading = "Samples")]
    pub sus_parent_sample: Option<String>,

    /// Susceptible bulk sample name, default first column
    #[arg(long, help_heading = "Samples")]
    pub sus_bulk_sample: Option<String>,

    /// FORMAT integer field holding per-call read count
    #[arg(long, default_value = "DP", help_heading = "Samples")]
    pub depth_tag: String,
}

impl LrrseekParams for TriageArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    /// Validate command line arguments
    fn validate(&self) -> bool {
        let mut is_ok = true;

        is_ok &= validate_file(&self.reference, "--reference");
        is_ok &= validate_file(&self.control, "--control");
        is_ok &= validate_file(&self.sus_parent, "--sus-parent");
        is_ok &= validate_file(&self.sus_bulk, "--sus-bulk");

        if let Some(path) = &self.synteny {
            is_ok &= validate_file(path, "--synteny");
        } else {
            warn!("no --synteny table, Synteny_GM will be NA");
        }

        if let Some(path) = &self.motifs {
            is_ok &= validate_file(path, "--motifs");
        } else {
            warn!("no --motifs table, NLR-motifs? will be NA");
        }

        if self.contig_summary == self.snp_table {
            error!("--contig-summary and --snp-table must be different files");
            is_ok = false;
        }

        is_ok &= validate_depth_tag(&self.vcf.depth_tag);

        is_ok
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ContextArgs {
    /// Reference the variants were called against
    #[arg(short = 'f', long)]
    pub reference: PathBuf,

    /// Variants to extract context around
    #[arg(long)]
    pub vcf: PathBuf,

    /// Output fasta
    #[arg(short, long)]
    pub out: PathBuf,

    /// Bases of flanking sequence on each side
    #[arg(long, default_value_t = 250)]
    pub flank: u64,

    /// Sample name, default first column
    #[arg(long)]
    pub sample: Option<String>,

    /// FORMAT integer field holding per-call read count
    #[arg(long, default_value = "DP")]
    pub depth_tag: String,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl LrrseekParams for ContextArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = true;

        is_ok &= validate_file(&self.reference, "--reference");
        is_ok &= validate_file(&self.vcf, "--vcf");
        is_ok &= validate_depth_tag(&self.depth_tag);

        if self.flank == 0 {
            warn!("--flank 0 outputs only the ambiguity code");
        }

        is_ok
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SplitArgs {
    /// Input fasta
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output fasta
    #[arg(short, long)]
    pub output: PathBuf,

    /// Size of the sequence fragments in bp
    #[arg(long, default_value_t = 10000)]
    pub fragsize: usize,

    /// Size of overlap between sequence fragments in bp
    #[arg(long, default_value_t = 1000)]
    pub overlap: usize,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl LrrseekParams for SplitArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = validate_file(&self.input, "--input");

        if self.fragsize < 1 {
            error!("--fragsize must be at least 1");
            is_ok = false;
        }

        if self.overlap >= self.fragsize {
            error!("--overlap must be smaller than --fragsize");
            is_ok = false;
        }

        is_ok
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CoverageArgs {
    /// Reference contigs the reads were piled up against
    #[arg(short = 'f', long)]
    pub reference: PathBuf,

    /// samtools mpileup output
    #[arg(short, long)]
    pub pileup: PathBuf,

    /// Output table (contig, average depth)
    #[arg(short, long)]
    pub out: PathBuf,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl LrrseekParams for CoverageArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = true;

        is_ok &= validate_file(&self.reference, "--reference");
        is_ok &= validate_file(&self.pileup, "--pileup");

        is_ok
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SyntenyArgs {
    /// BLAST XML report (-outfmt 5) of contigs against the reference genes
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output table (contig, label, subject, evalue, qcov, qlen, alnlen, identity)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep HSPs with an e-value below this
    #[arg(long, default_value_t = 1e-10)]
    pub evalue: f64,

    /// Minimum fraction of identical aligned positions
    #[arg(long, default_value_t = 0.75)]
    pub min_identity: f64,

    /// Minimum fraction of the query covered by the HSP
    #[arg(long, default_value_t = 0.75)]
    pub min_query_coverage: f64,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl LrrseekParams for SyntenyArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = validate_file(&self.input, "--input");

        if self.evalue <= 0.0 {
            error!("--evalue must be positive");
            is_ok = false;
        }

        for (value, label) in [
            (self.min_identity, "--min-identity"),
            (self.min_query_coverage, "--min-query-coverage"),
        ] {
            if !(0.0..=1.0).contains(&value) {
                error!("{} must be between 0 and 1", label);
                is_ok = false;
            }
        }

        is_ok
    }
}

/// Helper function to validate a file's existence and type
fn validate_file(path: &Path, label: &str) -> bool {
    if !path.exists() {
        error!("{} does not exist", label);
        return false;
    }
    if !path.is_file() {
        error!("{} is not a file", label);
        return false;
    }
    true
}

fn validate_depth_tag(tag: &str) -> bool {
    if tag.is_empty() || tag.contains(|c: char| c.is_whitespace() || c == ':') {
        error!("--depth-tag {:?} is not a FORMAT key", tag);
        return false;
    }
    true
}
