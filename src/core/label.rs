//! Record labels as stored on results and as derived by the audit.
//!
//! Labels are nested by scope: a world record is also a continental and a
//! national record, so a result only ever carries the broadest one per metric.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Continental record tag, one per continent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContinentTag {
    Africa,
    Asia,
    Europe,
    Oceania,
    NorthAmerica,
    SouthAmerica,
}

impl ContinentTag {
    pub const ALL: [ContinentTag; 6] = [
        Self::Africa,
        Self::Asia,
        Self::Europe,
        Self::Oceania,
        Self::NorthAmerica,
        Self::SouthAmerica,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Africa => "AfR",
            Self::Asia => "AsR",
            Self::Europe => "ER",
            Self::Oceania => "OcR",
            Self::NorthAmerica => "NAR",
            Self::SouthAmerica => "SAR",
        }
    }
}

impl fmt::Display for ContinentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContinentTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown continental record tag '{}'", s))
    }
}

impl Serialize for ContinentTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContinentTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Record label for one metric of one result.
///
/// Serializes to the archive strings: `""`, `"NR"`, a continental tag such as
/// `"ER"`, or `"WR"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordLabel {
    #[default]
    None,
    National,
    Continental(ContinentTag),
    World,
}

impl RecordLabel {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::National => "NR",
            Self::Continental(tag) => tag.as_str(),
            Self::World => "WR",
        }
    }

    /// Resolve scope flags into a single label, broadest scope first.
    pub fn from_flags(world: bool, continental: Option<ContinentTag>, national: bool) -> Self {
        match (world, continental, national) {
            (true, _, _) => Self::World,
            (false, Some(tag), _) => Self::Continental(tag),
            (false, None, true) => Self::National,
            (false, None, false) => Self::None,
        }
    }
}

impl fmt::Display for RecordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::None),
            "NR" => Ok(Self::National),
            "WR" => Ok(Self::World),
            other => other
                .parse::<ContinentTag>()
                .map(Self::Continental)
                .map_err(|_| format!("unknown record label '{}'", other)),
        }
    }
}

impl Serialize for RecordLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(Self::None),
            Some(raw) => raw.parse().map_err(serde::de::Error::custom),
        }
    }
}
