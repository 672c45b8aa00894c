//! Opinion records as they arrive from the API

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of an opinion cluster.
///
/// The API hands ids out as integers, but JSON object keys (the cited-opinion
/// maps) are always strings, so a string holding an unsigned integer is
/// normalized to the numeric form. Numeric ids sort before textual ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpinionId {
    Number(u64),
    Text(String),
}

impl OpinionId {
    /// Parse a raw id, preferring the numeric form
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<u64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

impl From<u64> for OpinionId {
    fn from(number: u64) -> Self {
        Self::Number(number)
    }
}

impl From<&str> for OpinionId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for OpinionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{}", number),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for OpinionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(number) => serializer.serialize_u64(*number),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for OpinionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(number) => Self::Number(number),
            RawId::Text(text) => Self::parse(&text),
        })
    }
}

/// Per-citation metadata attached to an entry of `opinions_cited`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationMeta {
    /// Line opacity requested by the backend (it spells the key `opacitiy`)
    #[serde(default, alias = "opacitiy", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

/// Ideological direction of a decision, from the SCDB `decisionDirection` code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionDirection {
    Neutral,
    Conservative,
    Liberal,
    Unspecifiable,
    #[default]
    Unknown,
}

impl DecisionDirection {
    pub const LABELS: [&'static str; 5] =
        ["Neutral", "Conservative", "Liberal", "Unspecifiable", "Unknown"];

    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Neutral,
            Some(1) => Self::Conservative,
            Some(2) => Self::Liberal,
            Some(3) => Self::Unspecifiable,
            _ => Self::Unknown,
        }
    }

    /// Single-letter prefix used in vote split labels
    pub fn code(self) -> Option<&'static str> {
        match self {
            Self::Neutral => Some("N"),
            Self::Conservative => Some("C"),
            Self::Liberal => Some("L"),
            Self::Unspecifiable => Some("U"),
            Self::Unknown => None,
        }
    }

    pub fn label(self) -> &'static str {
        Self::LABELS[self as usize]
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    /// Two directions agree only when both are known and equal
    pub fn agrees_with(self, other: Self) -> bool {
        self.is_known() && self == other
    }
}

/// One opinion cluster with the citations it makes.
///
/// `date_filed` is kept in its wire form; the graph builder parses it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpinionRecord {
    pub id: OpinionId,
    pub date_filed: String,
    pub case_name: Option<String>,
    pub case_name_short: Option<String>,
    pub absolute_url: Option<String>,
    pub citation_count: Option<u64>,
    pub decision_direction: Option<i64>,
    pub votes_majority: Option<i64>,
    pub votes_minority: Option<i64>,
    pub scdb_id: Option<String>,
    pub cited: BTreeMap<OpinionId, CitationMeta>,
}

impl OpinionRecord {
    pub fn new(id: impl Into<OpinionId>, date_filed: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date_filed: date_filed.into(),
            case_name: None,
            case_name_short: None,
            absolute_url: None,
            citation_count: None,
            decision_direction: None,
            votes_majority: None,
            votes_minority: None,
            scdb_id: None,
            cited: BTreeMap::new(),
        }
    }

    /// Add citations with empty metadata
    pub fn citing<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OpinionId>,
    {
        for id in ids {
            self.cited.insert(id.into(), CitationMeta::default());
        }
        self
    }

    pub fn with_direction(mut self, code: i64) -> Self {
        self.decision_direction = Some(code);
        self
    }

    pub fn with_votes(mut self, majority: i64, minority: i64) -> Self {
        self.votes_majority = Some(majority);
        self.votes_minority = Some(minority);
        self
    }

    pub fn direction(&self) -> DecisionDirection {
        DecisionDirection::from_code(self.decision_direction)
    }

    /// Whether the SCDB vote count is missing (`-1` on the wire) or out of range
    pub fn votes_unknown(&self) -> bool {
        !matches!(self.votes_minority, Some(0..=9))
    }

    /// Vote split label such as `C5-4`, `N9-0` or `Unk`.
    ///
    /// The majority is derived as `9 - minority`; the recorded majority is
    /// unreliable for recused justices.
    pub fn vote_split(&self) -> String {
        let minority = match self.votes_minority {
            Some(minority @ 0..=9) => minority,
            _ => return "Unk".to_string(),
        };
        let majority = 9 - minority;
        let prefix = if majority == 9 {
            Some("N")
        } else {
            self.direction().code()
        };

        match prefix {
            Some(prefix) => format!("{}{}-{}", prefix, majority, minority),
            None => "Unk".to_string(),
        }
    }

    /// Decision label used to color Spaeth connections
    pub fn direction_label(&self) -> &'static str {
        if self.votes_unknown() {
            DecisionDirection::Unknown.label()
        } else {
            self.direction().label()
        }
    }

    /// Best available display name
    pub fn display_name(&self) -> String {
        self.case_name_short
            .clone()
            .or_else(|| self.case_name.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}
