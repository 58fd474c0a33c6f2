use crate::lslib::{GenotypeClass, GenotypeCriterion};
use std::collections::{BTreeSet, HashMap};

/// A 1-based position on a contig. Orders by contig name, then numerically by position
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Site {
    pub contig: String,
    pub pos: u64,
}

impl Site {
    pub fn new(contig: &str, pos: u64) -> Self {
        Self {
            contig: contig.to_string(),
            pos,
        }
    }
}

/// One PASS call for one sample
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VariantCall {
    pub read_count: u64,
    pub alt: String,
    pub reference: String,
    pub genotype: GenotypeClass,
}

/// Every loaded call of a single sample
#[derive(Debug, Default, Clone)]
pub struct SampleVariantSet {
    pub label: String,
    pub calls: HashMap<Site, VariantCall>,
}

impl SampleVariantSet {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            calls: HashMap::new(),
        }
    }

    /// Later calls at the same site replace earlier ones
    pub fn insert(&mut self, site: Site, call: VariantCall) {
        self.calls.insert(site, call);
    }

    pub fn get(&self, site: &Site) -> Option<&VariantCall> {
        self.calls.get(site)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Sites whose genotype satisfies the criterion
    pub fn passing(&self, criterion: &GenotypeCriterion) -> BTreeSet<Site> {
        self.calls
            .iter()
            .filter(|(_, call)| criterion.matches(call.genotype))
            .map(|(site, _)| site.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(gt: &str) -> VariantCall {
        VariantCall {
            read_count: 10,
            alt: "G".to_string(),
            reference: "A".to_string(),
            genotype: GenotypeClass::from_token(gt),
        }
    }

    #[test]
    fn test_site_order_is_numeric() {
        let mut sites = vec![
            Site::new("c2", 5),
            Site::new("c1", 100),
            Site::new("c1", 20),
            Site::new("c10", 1),
        ];
        sites.sort();
        assert_eq!(
            sites,
            vec![
                Site::new("c1", 20),
                Site::new("c1", 100),
                Site::new("c10", 1),
                Site::new("c2", 5),
            ]
        );
    }

    #[test]
    fn test_passing() {
        let mut sample = SampleVariantSet::new("susP");
        sample.insert(Site::new("c1", 1), call("1/1"));
        sample.insert(Site::new("c1", 2), call("0/1"));
        sample.insert(Site::new("c1", 3), call("0/0"));
        sample.insert(Site::new("c1", 4), call("./."));

        let sus = sample.passing(&GenotypeCriterion::susceptible());
        assert_eq!(sus.into_iter().collect::<Vec<_>>(), vec![Site::new("c1", 1)]);

        let ctl = sample.passing(&GenotypeCriterion::control());
        assert_eq!(
            ctl.into_iter().collect::<Vec<_>>(),
            vec![Site::new("c1", 1), Site::new("c1", 3)]
        );
    }
}
