use crate::lslib::{
    CandidateSet, ContigLengths, MotifMap, SampleVariantSet, Site, SyntenyMap, VariantCall,
};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CONTIG_TABLE_HEADER: [&str; 12] = [
    "contig",
    "length",
    "avg(coverage, susP)",
    "avg(coverage, susBulk)",
    "#SNPs(susP)",
    "#SNPs(susBulk)",
    "#SNPs(common)",
    "SNP_freq(susP)",
    "SNP_freq(susBulk)",
    "SNP_freq(common)",
    "Synteny_GM",
    "NLR-motifs?",
];

pub const SNP_TABLE_HEADER: [&str; 8] = [
    "contig",
    "pos",
    "refBase",
    "susP/Ref:base",
    "susP/Ref:coverage",
    "susBulk/Ref:base",
    "susBulk/Ref:coverage",
    "susP identical to susBulk?",
];

const NA: &str = "NA";

/// One candidate contig's line of the contig summary
#[derive(Debug, Clone, PartialEq)]
pub struct ContigSummaryRow {
    pub contig: String,
    pub length: u64,
    pub sus_parent_coverage: f64,
    pub sus_bulk_coverage: f64,
    pub sus_parent_snps: usize,
    pub sus_bulk_snps: usize,
    pub common_snps: usize,
    pub synteny: Vec<String>,
    pub motifs: Vec<String>,
}

impl ContigSummaryRow {
    /// SNPs per base, None when the contig length is unknown
    fn frequency(&self, count: usize) -> Option<f64> {
        match self.length {
            0 => None,
            len => Some(count as f64 / len as f64),
        }
    }

    pub fn fields(&self) -> Vec<String> {
        let mut ret = vec![
            self.contig.clone(),
            self.length.to_string(),
            format!("{:.3}", self.sus_parent_coverage),
            format!("{:.3}", self.sus_bulk_coverage),
            format!("{:.3}", self.sus_parent_snps as f64),
            format!("{:.3}", self.sus_bulk_snps as f64),
            format!("{:.3}", self.common_snps as f64),
        ];
        for count in [self.sus_parent_snps, self.sus_bulk_snps, self.common_snps] {
            ret.push(match self.frequency(count) {
                Some(freq) => format!("{:.3}", freq),
                None => NA.to_string(),
            });
        }
        ret.push(join_or_na(&self.synteny));
        ret.push(join_or_na(&self.motifs));
        ret
    }
}

/// One common SNP's line of the SNP table
#[derive(Debug, Clone, PartialEq)]
pub struct SnpTableRow {
    pub contig: String,
    pub pos: u64,
    pub ref_base: String,
    pub sus_parent_base: String,
    pub sus_parent_coverage: u64,
    pub sus_bulk_base: String,
    pub sus_bulk_coverage: u64,
}

impl SnpTableRow {
    pub fn new(site: &Site, sus_parent: &VariantCall, sus_bulk: &VariantCall) -> Self {
        Self {
            contig: site.contig.clone(),
            pos: site.pos,
            ref_base: sus_parent.reference.clone(),
            sus_parent_base: sus_parent.alt.clone(),
            sus_parent_coverage: sus_parent.read_count,
            sus_bulk_base: sus_bulk.alt.clone(),
            sus_bulk_coverage: sus_bulk.read_count,
        }
    }

    pub fn fields(&self) -> Vec<String> {
        let mut ret = vec![
            self.contig.clone(),
            self.pos.to_string(),
            self.ref_base.clone(),
            self.sus_parent_base.clone(),
            self.sus_parent_coverage.to_string(),
            self.sus_bulk_base.clone(),
            self.sus_bulk_coverage.to_string(),
        ];
        // Flag compares the fields two and four columns back from it. The header
        // reads as a full-record identity check; this is narrower and kept as is.
        let identical = ret[ret.len() - 2] == ret[ret.len() - 4];
        ret.push(if identical { "YES" } else { "NO" }.to_string());
        ret
    }
}

/// Sorted, comma joined, or NA when there is nothing
fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        return NA.to_string();
    }
    items.iter().sorted().join(",")
}

/// Rows for every candidate contig, in contig name order
pub fn build_contig_summary(
    candidates: &CandidateSet,
    lengths: &ContigLengths,
    sus_parent_coverage: &HashMap<String, f64>,
    sus_bulk_coverage: &HashMap<String, f64>,
    synteny: &SyntenyMap,
    motifs: &MotifMap,
) -> Vec<ContigSummaryRow> {
    candidates
        .candidate_contigs
        .iter()
        .map(|contig| {
            let counts = candidates.counts_for(contig);
            ContigSummaryRow {
                contig: contig.clone(),
                length: *lengths.get(contig).unwrap_or(&0),
                sus_parent_coverage: *sus_parent_coverage.get(contig).unwrap_or(&0.0),
                sus_bulk_coverage: *sus_bulk_coverage.get(contig).unwrap_or(&0.0),
                sus_parent_snps: counts.sus_parent,
                sus_bulk_snps: counts.sus_bulk,
                common_snps: counts.common,
                synteny: synteny
                    .get(contig)
                    .map(|labels| labels.iter().cloned().collect())
                    .unwrap_or_default(),
                motifs: motifs
                    .get(contig)
                    .map(|hits| hits.iter().map(|h| h.to_string()).collect())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Rows for every common SNP in (contig, position) order
pub fn build_snp_table(
    candidates: &CandidateSet,
    sus_parent: &SampleVariantSet,
    sus_bulk: &SampleVariantSet,
) -> Vec<SnpTableRow> {
    candidates
        .common
        .iter()
        .filter_map(|site| match (sus_parent.get(site), sus_bulk.get(site)) {
            (Some(p), Some(b)) => Some(SnpTableRow::new(site, p, b)),
            _ => {
                warn!("common SNP {}:{} missing a call", site.contig, site.pos);
                None
            }
        })
        .collect()
}

/// Header line then one tab separated line per row
pub fn render_table<W: Write>(out: &mut W, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    writeln!(out, "{}", header.join("\t"))?;
    for row in rows {
        writeln!(out, "{}", row.join("\t"))?;
    }
    Ok(())
}

pub fn render_contig_summary(rows: &[ContigSummaryRow]) -> Result<Vec<u8>> {
    let mut buf = vec![];
    let fields: Vec<Vec<String>> = rows.iter().map(|r| r.fields()).collect();
    render_table(&mut buf, &CONTIG_TABLE_HEADER, &fields)?;
    Ok(buf)
}

pub fn render_snp_table(rows: &[SnpTableRow]) -> Result<Vec<u8>> {
    let mut buf = vec![];
    let fields: Vec<Vec<String>> = rows.iter().map(|r| r.fields()).collect();
    render_table(&mut buf, &SNP_TABLE_HEADER, &fields)?;
    Ok(buf)
}

/// Write a fully rendered table to disk
pub fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut out_buf = BufWriter::with_capacity(
        page_size::get() * 16,
        File::create(path).with_context(|| format!("Error creating output file {:?}", path))?,
    );
    out_buf.write_all(content)?;
    out_buf
        .flush()
        .with_context(|| format!("Error writing output file {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lslib::{GenotypeClass, MotifHit, SnpCounts};
    use std::collections::BTreeSet;

    fn call(alt: &str, read_count: u64) -> VariantCall {
        VariantCall {
            read_count,
            alt: alt.to_string(),
            reference: "A".to_string(),
            genotype: GenotypeClass::HomozygousAlt,
        }
    }

    fn candidates(contigs: &[&str]) -> CandidateSet {
        let mut ret = CandidateSet::default();
        for c in contigs {
            ret.candidate_contigs.insert(c.to_string());
            ret.counts.insert(
                c.to_string(),
                SnpCounts {
                    sus_parent: 4,
                    sus_bulk: 3,
                    common: 2,
                },
            );
        }
        ret
    }

    #[test]
    fn test_contig_row_fields() {
        let cand = candidates(&["c1"]);
        let lengths: ContigLengths = [("c1".to_string(), 1000)].into_iter().collect();
        let cov_p: HashMap<String, f64> = [("c1".to_string(), 12.5)].into_iter().collect();
        let cov_b: HashMap<String, f64> = [("c1".to_string(), 1.0 / 3.0)].into_iter().collect();
        let synteny: SyntenyMap = [(
            "c1".to_string(),
            BTreeSet::from(["Gm05".to_string(), "Gm01".to_string()]),
        )]
        .into_iter()
        .collect();
        let motifs: MotifMap = [(
            "c1".to_string(),
            BTreeSet::from([
                MotifHit::new("TIR", "2e-3"),
                MotifHit::Unlabelled,
                MotifHit::new("NB-ARC", "1e-20"),
            ]),
        )]
        .into_iter()
        .collect();

        let rows = build_contig_summary(&cand, &lengths, &cov_p, &cov_b, &synteny, &motifs);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].fields().join("\t"),
            "c1\t1000\t12.500\t0.333\t4.000\t3.000\t2.000\t0.004\t0.003\t0.002\tGm01,Gm05\tNA,NB-ARC/1e-20,TIR/2e-3"
        );
    }

    #[test]
    fn test_unknown_length_renders_na() {
        let cand = candidates(&["ghost"]);
        let rows = build_contig_summary(
            &cand,
            &ContigLengths::new(),
            &HashMap::new(),
            &HashMap::new(),
            &SyntenyMap::new(),
            &MotifMap::new(),
        );
        assert_eq!(
            rows[0].fields(),
            vec![
                "ghost", "0", "0.000", "0.000", "4.000", "3.000", "2.000", "NA", "NA", "NA", "NA",
                "NA"
            ]
        );
    }

    #[test]
    fn test_contig_rows_sorted() {
        let cand = candidates(&["c2", "c10", "c1", "b7"]);
        let rows = build_contig_summary(
            &cand,
            &ContigLengths::new(),
            &HashMap::new(),
            &HashMap::new(),
            &SyntenyMap::new(),
            &MotifMap::new(),
        );
        let names: Vec<&str> = rows.iter().map(|r| r.contig.as_str()).collect();
        assert_eq!(names, vec!["b7", "c1", "c10", "c2"]);
    }

    #[test]
    fn test_snp_rows() {
        let mut cand = CandidateSet::default();
        let mut sus_parent = SampleVariantSet::new("susP");
        let mut sus_bulk = SampleVariantSet::new("susBulk");
        for (contig, pos, alt_b) in [("c1", 200, "G"), ("c1", 30, "T"), ("c0", 999, "G")] {
            let site = Site::new(contig, pos);
            cand.common.insert(site.clone());
            sus_parent.insert(site.clone(), call("G", 11));
            sus_bulk.insert(site, call(alt_b, 9));
        }

        let rows = build_snp_table(&cand, &sus_parent, &sus_bulk);
        let buf = render_snp_table(&rows).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            format!(
                "{}\nc0\t999\tA\tG\t11\tG\t9\tYES\nc1\t30\tA\tG\t11\tT\t9\tNO\nc1\t200\tA\tG\t11\tG\t9\tYES\n",
                SNP_TABLE_HEADER.join("\t")
            )
        );
    }

    #[test]
    fn test_empty_tables_have_headers() {
        let summary = render_contig_summary(&[]).unwrap();
        assert_eq!(
            String::from_utf8(summary).unwrap(),
            format!("{}\n", CONTIG_TABLE_HEADER.join("\t"))
        );
    }
}
