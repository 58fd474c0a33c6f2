use crate::lslib::SyntenyArgs;
use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::str::FromStr;

/// Thresholds an HSP must pass to be reported
#[derive(Debug, Clone)]
pub struct HspFilter {
    /// HSPs with an e-value at or above this are dropped
    pub evalue: f64,
    pub min_identity: f64,
    pub min_query_coverage: f64,
}

impl Default for HspFilter {
    fn default() -> Self {
        Self {
            evalue: 1e-10,
            min_identity: 0.75,
            min_query_coverage: 0.75,
        }
    }
}

/// One reported query/subject alignment
#[derive(Debug, Clone, PartialEq)]
pub struct SyntenyHit {
    pub query: String,
    /// Subject name up to the first '|', the label consumed by the triage synteny column
    pub target: String,
    pub subject: String,
    pub evalue: f64,
    pub query_coverage: f64,
    pub query_length: u64,
    pub align_length: u64,
    pub identity: f64,
}

impl SyntenyHit {
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.query.clone(),
            self.target.clone(),
            self.subject.clone(),
            float_repr(self.evalue),
            float_repr(self.query_coverage),
            self.query_length.to_string(),
            self.align_length.to_string(),
            float_repr(self.identity),
        ]
    }
}

/// Shortest round-trip float text, exponent form outside [1e-4, 1e16)
fn float_repr(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        };
    }
    let text = value.to_string();
    if text.contains('.') || text.contains("inf") || text.contains("NaN") {
        text
    } else {
        format!("{}.0", text)
    }
}

#[derive(Debug, Default)]
struct HspFields {
    evalue: Option<f64>,
    query_from: Option<u64>,
    query_to: Option<u64>,
    identities: Option<u64>,
    align_length: Option<u64>,
}

fn number<T: FromStr>(tag: &[u8], text: &str) -> Result<T> {
    text.trim().parse::<T>().ok().with_context(|| {
        format!(
            "<{}> is not a number: {:?}",
            String::from_utf8_lossy(tag),
            text
        )
    })
}

/// Every HSP of a BLAST XML report that passes `filter`, in report order
pub fn parse_blast_xml<R: BufRead>(input: R, filter: &HspFilter) -> Result<Vec<SyntenyHit>> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut ret = vec![];
    let mut buf = Vec::new();
    let mut tag: Vec<u8> = vec![];

    let mut query = String::new();
    let mut query_length: Option<u64> = None;
    let mut hit_id = String::new();
    let mut hit_def = String::new();
    let mut hsp = HspFields::default();
    let mut n_hsps: u64 = 0;

    loop {
        match reader
            .read_event_into(&mut buf)
            .with_context(|| format!("malformed BLAST XML at byte {}", reader.buffer_position()))?
        {
            Event::Start(e) => {
                tag = e.name().as_ref().to_vec();
                match tag.as_slice() {
                    b"Iteration" => {
                        query.clear();
                        query_length = None;
                    }
                    b"Hit" => {
                        hit_id.clear();
                        hit_def.clear();
                    }
                    b"Hsp" => hsp = HspFields::default(),
                    _ => {}
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                match tag.as_slice() {
                    // Iteration values follow the BlastOutput ones and take over
                    b"BlastOutput_query-def" | b"Iteration_query-def" => query = text.to_string(),
                    b"BlastOutput_query-len" | b"Iteration_query-len" => {
                        query_length = Some(number(&tag, &text)?)
                    }
                    b"Hit_id" => hit_id = text.to_string(),
                    b"Hit_def" => hit_def = text.to_string(),
                    b"Hsp_evalue" => hsp.evalue = Some(number(&tag, &text)?),
                    b"Hsp_query-from" => hsp.query_from = Some(number(&tag, &text)?),
                    b"Hsp_query-to" => hsp.query_to = Some(number(&tag, &text)?),
                    b"Hsp_identity" => hsp.identities = Some(number(&tag, &text)?),
                    b"Hsp_align-len" => hsp.align_length = Some(number(&tag, &text)?),
                    _ => {}
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"Hsp" {
                    n_hsps += 1;
                    if let Some(hit) = check_hsp(&query, query_length, &hit_id, &hit_def, &hsp, filter)? {
                        ret.push(hit);
                    }
                }
                tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    debug!("{} of {} HSPs pass", ret.len(), n_hsps);
    Ok(ret)
}

fn check_hsp(
    query: &str,
    query_length: Option<u64>,
    hit_id: &str,
    hit_def: &str,
    hsp: &HspFields,
    filter: &HspFilter,
) -> Result<Option<SyntenyHit>> {
    let (Some(evalue), Some(query_from), Some(query_to), Some(identities), Some(align_length)) = (
        hsp.evalue,
        hsp.query_from,
        hsp.query_to,
        hsp.identities,
        hsp.align_length,
    ) else {
        anyhow::bail!("incomplete Hsp of {} vs {}", query, hit_id);
    };
    let qlen = match query_length {
        Some(l) if l > 0 => l,
        _ => anyhow::bail!("query {} has no length", query),
    };

    if evalue >= filter.evalue {
        return Ok(None);
    }
    let query_coverage = (query_to as f64 - query_from as f64 + 1.0) / qlen as f64;
    if query_coverage < filter.min_query_coverage {
        return Ok(None);
    }
    if align_length == 0 {
        return Ok(None);
    }
    let identity = identities as f64 / align_length as f64;
    if identity < filter.min_identity {
        return Ok(None);
    }

    // The hit title is "{Hit_id} {Hit_def}"; the subject is its second word
    let title = format!("{} {}", hit_id, hit_def);
    let Some(subject) = title.split_whitespace().nth(1) else {
        warn!("hit {} of {} has no subject name, skipping", hit_id, query);
        return Ok(None);
    };
    let target = subject.split('|').next().unwrap_or(subject);

    Ok(Some(SyntenyHit {
        query: query.to_string(),
        target: target.to_string(),
        subject: subject.to_string(),
        evalue,
        query_coverage,
        query_length: qlen,
        align_length,
        identity,
    }))
}

/// Filter a BLAST XML report down to a tab separated hit table
pub fn synteny_main(args: SyntenyArgs) -> Result<()> {
    let filter = HspFilter {
        evalue: args.evalue,
        min_identity: args.min_identity,
        min_query_coverage: args.min_query_coverage,
    };
    let input = BufReader::new(
        File::open(&args.input).with_context(|| format!("unable to open {:?}", args.input))?,
    );
    let hits = parse_blast_xml(input, &filter)
        .with_context(|| format!("reading BLAST report {:?}", args.input))?;

    let mut out = BufWriter::with_capacity(
        page_size::get() * 16,
        File::create(&args.output).with_context(|| format!("Error creating {:?}", args.output))?,
    );
    for hit in hits.iter() {
        writeln!(out, "{}", hit.fields().join("\t"))?;
    }
    out.flush()?;
    info!("wrote {} synteny hits", hits.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0"?>
<!DOCTYPE BlastOutput PUBLIC "-//NCBI//NCBI BlastOutput/EN" "http://www.ncbi.nlm.nih.gov/dtd/NCBI_BlastOutput.dtd">
<BlastOutput>
  <BlastOutput_program>blastn</BlastOutput_program>
  <BlastOutput_query-def>c1</BlastOutput_query-def>
  <BlastOutput_query-len>200</BlastOutput_query-len>
  <BlastOutput_iterations>
    <Iteration>
      <Iteration_iter-num>1</Iteration_iter-num>
      <Iteration_query-def>c1</Iteration_query-def>
      <Iteration_query-len>200</Iteration_query-len>
      <Iteration_hits>
        <Hit>
          <Hit_num>1</Hit_num>
          <Hit_id>gnl|BL_ORD_ID|0</Hit_id>
          <Hit_def>Gm01|Glyma.01G000100 pacid=1</Hit_def>
          <Hit_hsps>
            <Hsp>
              <Hsp_num>1</Hsp_num>
              <Hsp_evalue>2.5e-50</Hsp_evalue>
              <Hsp_query-from>1</Hsp_query-from>
              <Hsp_query-to>180</Hsp_query-to>
              <Hsp_identity>171</Hsp_identity>
              <Hsp_align-len>180</Hsp_align-len>
            </Hsp>
            <Hsp>
              <Hsp_num>2</Hsp_num>
              <Hsp_evalue>0.001</Hsp_evalue>
              <Hsp_query-from>1</Hsp_query-from>
              <Hsp_query-to>200</Hsp_query-to>
              <Hsp_identity>200</Hsp_identity>
              <Hsp_align-len>200</Hsp_align-len>
            </Hsp>
          </Hit_hsps>
        </Hit>
        <Hit>
          <Hit_num>2</Hit_num>
          <Hit_id>gnl|BL_ORD_ID|1</Hit_id>
          <Hit_def>Gm05|Glyma.05G000200</Hit_def>
          <Hit_hsps>
            <Hsp>
              <Hsp_num>1</Hsp_num>
              <Hsp_evalue>1e-30</Hsp_evalue>
              <Hsp_query-from>10</Hsp_query-from>
              <Hsp_query-to>60</Hsp_query-to>
              <Hsp_identity>51</Hsp_identity>
              <Hsp_align-len>51</Hsp_align-len>
            </Hsp>
          </Hit_hsps>
        </Hit>
      </Iteration_hits>
    </Iteration>
    <Iteration>
      <Iteration_iter-num>2</Iteration_iter-num>
      <Iteration_query-def>c2</Iteration_query-def>
      <Iteration_query-len>100</Iteration_query-len>
      <Iteration_hits>
        <Hit>
          <Hit_num>1</Hit_num>
          <Hit_id>gnl|BL_ORD_ID|2</Hit_id>
          <Hit_def>Gm09|Glyma.09G000300</Hit_def>
          <Hit_hsps>
            <Hsp>
              <Hsp_num>1</Hsp_num>
              <Hsp_evalue>0</Hsp_evalue>
              <Hsp_query-from>1</Hsp_query-from>
              <Hsp_query-to>100</Hsp_query-to>
              <Hsp_identity>70</Hsp_identity>
              <Hsp_align-len>100</Hsp_align-len>
            </Hsp>
          </Hit_hsps>
        </Hit>
      </Iteration_hits>
    </Iteration>
  </BlastOutput_iterations>
</BlastOutput>
"#;

    #[test]
    fn test_parse_blast_xml() {
        let hits = parse_blast_xml(REPORT.as_bytes(), &HspFilter::default()).unwrap();
        // weak evalue, low coverage and low identity HSPs drop out
        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert_eq!(hit.query, "c1");
        assert_eq!(hit.target, "Gm01");
        assert_eq!(hit.subject, "Gm01|Glyma.01G000100");
        assert_eq!(hit.query_length, 200);
        assert_eq!(
            hit.fields().join("\t"),
            "c1\tGm01\tGm01|Glyma.01G000100\t2.5e-50\t0.9\t200\t180\t0.95"
        );
    }

    #[test]
    fn test_relaxed_filter() {
        let filter = HspFilter {
            evalue: 1.0,
            min_identity: 0.5,
            min_query_coverage: 0.2,
        };
        let hits = parse_blast_xml(REPORT.as_bytes(), &filter).unwrap();
        let rows: Vec<(&str, &str)> = hits
            .iter()
            .map(|h| (h.query.as_str(), h.target.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![("c1", "Gm01"), ("c1", "Gm01"), ("c1", "Gm05"), ("c2", "Gm09")]
        );
        assert_eq!(hits[3].fields()[3], "0.0");
    }

    #[test]
    fn test_incomplete_hsp() {
        let report = "<BlastOutput><Iteration><Iteration_query-def>c1</Iteration_query-def>\
            <Iteration_query-len>10</Iteration_query-len><Hit><Hit_id>x</Hit_id>\
            <Hit_def>Gm01|a</Hit_def><Hsp><Hsp_evalue>1e-20</Hsp_evalue></Hsp></Hit>\
            </Iteration></BlastOutput>";
        assert!(parse_blast_xml(report.as_bytes(), &HspFilter::default()).is_err());
    }

    #[test]
    fn test_float_repr() {
        assert_eq!(float_repr(1e-5), "1e-05");
        assert_eq!(float_repr(2.5e-50), "2.5e-50");
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(0.9), "0.9");
        assert_eq!(float_repr(0.0), "0.0");
    }
}
