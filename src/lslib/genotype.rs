use bitflags::bitflags;
use std::str::FromStr;

bitflags! {
    /// One disjoint bit per genotype class
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GtFlags: u8 {
        const HOM_REF = 0b0001;  // 0/0
        const HOM_ALT = 0b0010;  // 1/1
        const HET     = 0b0100;  // 0/1
        const UNKNOWN = 0b1000;  // anything else
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum GenotypeClass {
    HomozygousRef,
    HomozygousAlt,
    Heterozygous,
    Unknown,
}

impl FromStr for GenotypeClass {
    type Err = ();

    /// Never fails; unrecognized tokens (phased, missing, multi-allelic) are Unknown
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0/0" => Ok(GenotypeClass::HomozygousRef),
            "1/1" => Ok(GenotypeClass::HomozygousAlt),
            "0/1" => Ok(GenotypeClass::Heterozygous),
            _ => Ok(GenotypeClass::Unknown),
        }
    }
}

impl GenotypeClass {
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(GenotypeClass::Unknown)
    }

    pub fn flag(&self) -> GtFlags {
        match self {
            GenotypeClass::HomozygousRef => GtFlags::HOM_REF,
            GenotypeClass::HomozygousAlt => GtFlags::HOM_ALT,
            GenotypeClass::Heterozygous => GtFlags::HET,
            GenotypeClass::Unknown => GtFlags::UNKNOWN,
        }
    }
}

/// Which genotype classes a sample's call must have to be kept
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GenotypeCriterion {
    /// Call must be exactly this class
    Exactly(GenotypeClass),
    /// Call may be any one of the flagged classes
    AnyOf(GtFlags),
}

impl GenotypeCriterion {
    /// Confident homozygous call of either allele
    pub fn control() -> Self {
        GenotypeCriterion::AnyOf(GtFlags::HOM_REF | GtFlags::HOM_ALT)
    }

    /// Homozygous alternate only
    pub fn susceptible() -> Self {
        GenotypeCriterion::Exactly(GenotypeClass::HomozygousAlt)
    }

    /// Unknown calls never satisfy a criterion, even one naming Unknown
    pub fn matches(&self, class: GenotypeClass) -> bool {
        if class == GenotypeClass::Unknown {
            return false;
        }
        match self {
            GenotypeCriterion::Exactly(wanted) => *wanted == class,
            GenotypeCriterion::AnyOf(flags) => flags.contains(class.flag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens() {
        assert_eq!(GenotypeClass::from_token("0/0"), GenotypeClass::HomozygousRef);
        assert_eq!(GenotypeClass::from_token("1/1"), GenotypeClass::HomozygousAlt);
        assert_eq!(GenotypeClass::from_token("0/1"), GenotypeClass::Heterozygous);
    }

    #[test]
    fn test_unknown_tokens() {
        for token in ["1/0", "0|1", "1|1", "./.", ".", "1/2", "", "0/0/0"] {
            assert_eq!(GenotypeClass::from_token(token), GenotypeClass::Unknown);
        }
    }

    #[test]
    fn test_unknown_never_matches() {
        let criteria = [
            GenotypeCriterion::control(),
            GenotypeCriterion::susceptible(),
            GenotypeCriterion::AnyOf(GtFlags::all()),
            GenotypeCriterion::AnyOf(GtFlags::UNKNOWN),
            GenotypeCriterion::Exactly(GenotypeClass::Unknown),
        ];
        for crit in criteria {
            assert!(!crit.matches(GenotypeClass::Unknown));
        }
    }

    #[test]
    fn test_control_is_any_homozygous() {
        let crit = GenotypeCriterion::control();
        assert!(crit.matches(GenotypeClass::HomozygousRef));
        assert!(crit.matches(GenotypeClass::HomozygousAlt));
        assert!(!crit.matches(GenotypeClass::Heterozygous));
    }

    #[test]
    fn test_susceptible_is_exact() {
        let crit = GenotypeCriterion::susceptible();
        assert!(crit.matches(GenotypeClass::HomozygousAlt));
        assert!(!crit.matches(GenotypeClass::HomozygousRef));
        assert!(!crit.matches(GenotypeClass::Heterozygous));
    }

    #[test]
    fn test_flags_disjoint() {
        let classes = [
            GenotypeClass::HomozygousRef,
            GenotypeClass::HomozygousAlt,
            GenotypeClass::Heterozygous,
            GenotypeClass::Unknown,
        ];
        for (i, a) in classes.iter().enumerate() {
            for b in classes.iter().skip(i + 1) {
                assert!((a.flag() & b.flag()).is_empty());
            }
        }
    }
}
