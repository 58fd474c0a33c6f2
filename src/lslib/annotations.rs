use anyhow::{Context, Result};
use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    fs::File,
    io::{self, BufRead},
    path::Path,
};

type FileHandler = io::Result<io::Lines<io::BufReader<File>>>;

pub fn read_lines<P>(filename: P) -> FileHandler
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}

/// Labels that stand in for a missing motif name
const MISSING_LABELS: [&str; 4] = ["N/A", "NA", ".", ""];

/// One motif hit reported for a contig
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum MotifHit {
    Labelled { label: String, score: String },
    Unlabelled,
}

impl MotifHit {
    pub fn new(label: &str, score: &str) -> Self {
        let label = label.trim();
        if MISSING_LABELS.contains(&label) {
            MotifHit::Unlabelled
        } else {
            MotifHit::Labelled {
                label: label.to_string(),
                score: score.trim().to_string(),
            }
        }
    }
}

impl fmt::Display for MotifHit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MotifHit::Labelled { label, score } => write!(f, "{}/{}", label, score),
            MotifHit::Unlabelled => write!(f, "NA"),
        }
    }
}

pub type SyntenyMap = HashMap<String, BTreeSet<String>>;
pub type MotifMap = HashMap<String, BTreeSet<MotifHit>>;

/// Tab split data lines of a table, skipping blank and '#' lines
fn table_rows(path: &Path) -> Result<Vec<(usize, Vec<String>)>> {
    let lines = read_lines(path).with_context(|| format!("unable to read table {:?}", path))?;
    let mut ret = vec![];
    for (idx, line) in lines.enumerate() {
        let line = line.with_context(|| format!("reading {:?}", path))?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        ret.push((idx + 1, line.split('\t').map(String::from).collect()));
    }
    Ok(ret)
}

/// contig<TAB>label rows
pub fn load_synteny(path: &Path) -> Result<SyntenyMap> {
    let mut ret = SyntenyMap::new();
    for (lineno, row) in table_rows(path)? {
        if row.len() < 2 {
            warn!("synteny line {} has fewer than 2 columns", lineno);
            continue;
        }
        ret.entry(row[0].clone())
            .or_default()
            .insert(row[1].clone());
    }
    debug!("{} contigs with synteny labels", ret.len());
    Ok(ret)
}

/// contig<TAB>label<TAB>score rows
pub fn load_motifs(path: &Path) -> Result<MotifMap> {
    let mut ret = MotifMap::new();
    for (lineno, row) in table_rows(path)? {
        if row.len() < 3 {
            warn!("motif line {} has fewer than 3 columns", lineno);
            continue;
        }
        ret.entry(row[0].clone())
            .or_default()
            .insert(MotifHit::new(&row[1], &row[2]));
    }
    debug!("{} contigs with motif hits", ret.len());
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_motif_placeholder() {
        assert_eq!(MotifHit::new("N/A", "1e-5"), MotifHit::Unlabelled);
        assert_eq!(MotifHit::new("", "3"), MotifHit::Unlabelled);
        assert_eq!(MotifHit::new("NB-ARC", "1e-20").to_string(), "NB-ARC/1e-20");
        assert_eq!(MotifHit::Unlabelled.to_string(), "NA");
    }

    #[test]
    fn test_load_synteny() {
        let file = table("#contig\tlabel\nc1\tGm01\nc1\tGm05\nc1\tGm01\nc2\tGm02\nlonely\n");
        let synteny = load_synteny(file.path()).unwrap();
        assert_eq!(synteny.len(), 2);
        assert_eq!(
            synteny["c1"].iter().collect::<Vec<_>>(),
            vec!["Gm01", "Gm05"]
        );
        assert!(!synteny.contains_key("lonely"));
    }

    #[test]
    fn test_synteny_label_verbatim() {
        let file = table("c1\t Gm01 \textra\n");
        let synteny = load_synteny(file.path()).unwrap();
        assert!(synteny["c1"].contains(" Gm01 "));
        assert_eq!(synteny["c1"].len(), 1);
    }

    #[test]
    fn test_load_motifs() {
        let file = table("# mast\nc1\tNB-ARC\t1e-20\nc1\tN/A\t0.5\nc1\tN/A\t0.7\nc2\tTIR\nc3\tTIR\t2e-3\n");
        let motifs = load_motifs(file.path()).unwrap();
        assert_eq!(motifs.len(), 2);
        // placeholder hits collapse
        assert_eq!(motifs["c1"].len(), 2);
        assert!(motifs["c1"].contains(&MotifHit::Unlabelled));
        assert!(!motifs.contains_key("c2"));
    }

    #[test]
    fn test_missing_table_is_error() {
        assert!(load_synteny(Path::new("/nonexistent/synteny.tsv")).is_err());
    }
}
