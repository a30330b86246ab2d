//! ISA version gates and control-flow groups.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Core architecture revisions, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IsaVersion {
    V110,
    V120,
    V130,
    V131,
    V160,
    V161,
    V162,
    V180,
}

impl IsaVersion {
    pub const ALL: [IsaVersion; 8] = [
        IsaVersion::V110,
        IsaVersion::V120,
        IsaVersion::V130,
        IsaVersion::V131,
        IsaVersion::V160,
        IsaVersion::V161,
        IsaVersion::V162,
        IsaVersion::V180,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            IsaVersion::V110 => "1.1",
            IsaVersion::V120 => "1.2",
            IsaVersion::V130 => "1.3",
            IsaVersion::V131 => "1.3.1",
            IsaVersion::V160 => "1.6",
            IsaVersion::V161 => "1.6.1",
            IsaVersion::V162 => "1.6.2",
            IsaVersion::V180 => "1.8",
        }
    }
}

impl fmt::Display for IsaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown TriCore ISA version `{0}`")]
pub struct UnknownVersion(pub String);

impl FromStr for IsaVersion {
    type Err = UnknownVersion;

    /// Accepts `1.6.1`, `v1.6.1`, `V1.6.1`, `161` and `tc161`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        let t = t.trim_start_matches("tc").trim_start_matches('v');
        let digits: String = t.chars().filter(|c| *c != '.').collect();
        let v = match digits.as_str() {
            "11" | "110" => IsaVersion::V110,
            "12" | "120" => IsaVersion::V120,
            "13" | "130" => IsaVersion::V130,
            "131" => IsaVersion::V131,
            "16" | "160" => IsaVersion::V160,
            "161" => IsaVersion::V161,
            "162" => IsaVersion::V162,
            "18" | "180" => IsaVersion::V180,
            _ => return Err(UnknownVersion(s.to_string())),
        };
        Ok(v)
    }
}

/// First feature id; ids below this are reserved.
pub const FEATURE_BASE: u16 = 128;
const UP_BASE: u16 = FEATURE_BASE + 8;
const DN_BASE: u16 = UP_BASE + 7;
/// One past the highest feature id.
pub const FEATURE_ENDING: u16 = DN_BASE + 7;

/// A version tag attached to a table entry.
///
/// `AtLeast` and `AtMost` are only defined for versions newer than 1.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// `HasVxxx`: exactly this version.
    Has(IsaVersion),
    /// `HasVxxx_UP`: this version or newer.
    AtLeast(IsaVersion),
    /// `HasVxxx_DN`: this version or older.
    AtMost(IsaVersion),
}

impl Feature {
    /// Stable numeric id. The 1.1 bound tags have none.
    pub fn id(self) -> Option<u16> {
        match self {
            Feature::Has(v) => Some(FEATURE_BASE + v as u16),
            Feature::AtLeast(IsaVersion::V110) | Feature::AtMost(IsaVersion::V110) => None,
            Feature::AtLeast(v) => Some(UP_BASE + v as u16 - 1),
            Feature::AtMost(v) => Some(DN_BASE + v as u16 - 1),
        }
    }

    pub fn from_id(id: u16) -> Option<Self> {
        let f = match id {
            FEATURE_BASE..UP_BASE => Feature::Has(IsaVersion::ALL[usize::from(id - FEATURE_BASE)]),
            UP_BASE..DN_BASE => Feature::AtLeast(IsaVersion::ALL[usize::from(id - UP_BASE) + 1]),
            DN_BASE..FEATURE_ENDING => Feature::AtMost(IsaVersion::ALL[usize::from(id - DN_BASE) + 1]),
            _ => return None,
        };
        Some(f)
    }

    pub fn all() -> impl Iterator<Item = Feature> {
        (FEATURE_BASE..FEATURE_ENDING).filter_map(Feature::from_id)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |v: IsaVersion| v.name().replace('.', "");
        match self {
            Feature::Has(v) => write!(f, "HasV{:0<3}", digits(*v)),
            Feature::AtLeast(v) => write!(f, "HasV{:0<3}_UP", digits(*v)),
            Feature::AtMost(v) => write!(f, "HasV{:0<3}_DN", digits(*v)),
        }
    }
}

impl ToPrimitive for Feature {
    fn to_i64(&self) -> Option<i64> {
        self.id().map(i64::from)
    }
    fn to_u64(&self) -> Option<u64> {
        self.id().map(u64::from)
    }
}

impl FromPrimitive for Feature {
    fn from_i64(n: i64) -> Option<Self> {
        u16::try_from(n).ok().and_then(Feature::from_id)
    }
    fn from_u64(n: u64) -> Option<Self> {
        u16::try_from(n).ok().and_then(Feature::from_id)
    }
}

/// Closed version interval an encoding is defined on. `None` bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureInterval {
    pub min: Option<IsaVersion>,
    pub max: Option<IsaVersion>,
}

impl FeatureInterval {
    /// Every version.
    pub const ANY: FeatureInterval = FeatureInterval { min: None, max: None };

    /// Intersection of all tags. An empty tag list allows every version.
    pub fn from_tags(tags: &[Feature]) -> Self {
        tags.iter().fold(Self::ANY, |acc, tag| {
            let (lo, hi) = match *tag {
                Feature::Has(v) => (Some(v), Some(v)),
                Feature::AtLeast(v) => (Some(v), None),
                Feature::AtMost(v) => (None, Some(v)),
            };
            FeatureInterval {
                min: acc.min.max(lo),
                max: match (acc.max, hi) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                },
            }
        })
    }

    pub fn contains(&self, v: IsaVersion) -> bool {
        self.min.map_or(true, |lo| v >= lo) && self.max.map_or(true, |hi| v <= hi)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// The tags that describe this interval, lower bound first.
    pub fn tags(&self) -> Vec<Feature> {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) if lo == hi => vec![Feature::Has(lo)],
            (lo, hi) => lo
                .filter(|v| *v != IsaVersion::V110)
                .map(Feature::AtLeast)
                .into_iter()
                .chain(hi.map(|v| if v == IsaVersion::V110 { Feature::Has(v) } else { Feature::AtMost(v) }))
                .collect(),
        }
    }
}

impl fmt::Display for FeatureInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => f.write_str("any"),
            (Some(lo), None) => write!(f, ">= {lo}"),
            (None, Some(hi)) => write!(f, "<= {hi}"),
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{lo}"),
            (Some(lo), Some(hi)) => write!(f, "{lo} ..= {hi}"),
        }
    }
}

/// Control-flow group ids. `0` is invalid and [`GRP_ENDING`] terminates the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Group {
    Call = 1,
    Jump = 2,
}

pub const GRP_INVALID: u8 = 0;
pub const GRP_ENDING: u8 = 3;

impl Group {
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Group::Call),
            2 => Some(Group::Jump),
            _ => None,
        }
    }
}

bitflags! {
    /// Set of [`Group`] tags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Groups: u8 {
        const CALL = 1 << 0;
        const JUMP = 1 << 1;
    }
}

impl Groups {
    pub fn has(self, g: Group) -> bool {
        self.contains(Groups::from(g))
    }

    pub fn ids(self) -> impl Iterator<Item = Group> {
        [Group::Call, Group::Jump].into_iter().filter(move |g| self.has(*g))
    }
}

impl From<Group> for Groups {
    fn from(g: Group) -> Self {
        match g {
            Group::Call => Groups::CALL,
            Group::Jump => Groups::JUMP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_ids_follow_exact_up_down_order() {
        assert_eq!(Feature::Has(IsaVersion::V110).id(), Some(128));
        assert_eq!(Feature::Has(IsaVersion::V180).id(), Some(135));
        assert_eq!(Feature::AtLeast(IsaVersion::V120).id(), Some(136));
        assert_eq!(Feature::AtLeast(IsaVersion::V180).id(), Some(142));
        assert_eq!(Feature::AtMost(IsaVersion::V120).id(), Some(143));
        assert_eq!(Feature::AtMost(IsaVersion::V180).id(), Some(149));
        assert_eq!(Feature::AtLeast(IsaVersion::V110).id(), None);
        assert_eq!(FEATURE_ENDING, 150);
        assert_eq!(Feature::all().count(), 22);
        for f in Feature::all() {
            assert_eq!(f.id().and_then(Feature::from_id), Some(f));
        }
        assert_eq!(Feature::from_id(0), None);
    }

    #[test]
    fn feature_names() {
        assert_eq!(Feature::AtLeast(IsaVersion::V160).to_string(), "HasV160_UP");
        assert_eq!(Feature::AtMost(IsaVersion::V131).to_string(), "HasV131_DN");
        assert_eq!(Feature::Has(IsaVersion::V110).to_string(), "HasV110");
    }

    #[test]
    fn interval_membership() {
        let up = FeatureInterval::from_tags(&[Feature::AtLeast(IsaVersion::V160)]);
        assert!(!up.contains(IsaVersion::V131));
        assert!(up.contains(IsaVersion::V160));
        assert!(up.contains(IsaVersion::V180));

        let band = FeatureInterval::from_tags(&[
            Feature::AtLeast(IsaVersion::V130),
            Feature::AtMost(IsaVersion::V161),
        ]);
        assert!(!band.contains(IsaVersion::V120));
        assert!(band.contains(IsaVersion::V131));
        assert!(!band.contains(IsaVersion::V162));
        assert_eq!(band.tags(), vec![Feature::AtLeast(IsaVersion::V130), Feature::AtMost(IsaVersion::V161)]);

        assert!(FeatureInterval::from_tags(&[]).is_unrestricted());
        assert_eq!(
            FeatureInterval::from_tags(&[Feature::Has(IsaVersion::V131)]).tags(),
            vec![Feature::Has(IsaVersion::V131)]
        );
    }

    #[test]
    fn version_parsing() {
        assert_eq!("1.6.1".parse::<IsaVersion>().unwrap(), IsaVersion::V161);
        assert_eq!("v1.6".parse::<IsaVersion>().unwrap(), IsaVersion::V160);
        assert_eq!("tc162".parse::<IsaVersion>().unwrap(), IsaVersion::V162);
        assert!("2.0".parse::<IsaVersion>().is_err());
    }

    #[test]
    fn group_sets() {
        let g = Groups::CALL;
        assert!(g.has(Group::Call));
        assert!(!g.has(Group::Jump));
        assert_eq!(Groups::all().ids().collect::<Vec<_>>(), vec![Group::Call, Group::Jump]);
        assert_eq!(Group::from_id(GRP_ENDING), None);
        assert_eq!(Group::from_id(GRP_INVALID), None);
    }
}
