//! JSON input handling for opinion data

use crate::error::{MapError, Result};
use crate::graph::{CitationMeta, OpinionId, OpinionRecord};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Document produced for a saved map: `{ "opinion_clusters": [...] }`
#[derive(Debug, Deserialize)]
struct ClusterDocument {
    opinion_clusters: Vec<ClusterWire>,
}

#[derive(Debug, Deserialize)]
struct ClusterWire {
    id: OpinionId,
    date_filed: String,
    #[serde(default)]
    case_name: Option<String>,
    #[serde(default)]
    case_name_short: Option<String>,
    #[serde(default)]
    absolute_url: Option<String>,
    #[serde(default)]
    citation_count: Option<u64>,
    #[serde(default)]
    decision_direction: Option<i64>,
    #[serde(default)]
    votes_majority: Option<i64>,
    #[serde(default)]
    votes_minority: Option<i64>,
    #[serde(default)]
    scdb_id: Option<String>,
    #[serde(default)]
    sub_opinions: Vec<SubOpinionWire>,
}

#[derive(Debug, Deserialize)]
struct SubOpinionWire {
    #[serde(default)]
    opinions_cited: Option<CitedWire>,
}

/// `opinions_cited` is either `{ "id": {metadata} }` or a bare list of ids
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CitedWire {
    Map(BTreeMap<OpinionId, CitationMeta>),
    List(Vec<OpinionId>),
}

impl CitedWire {
    fn into_map(self) -> BTreeMap<OpinionId, CitationMeta> {
        match self {
            CitedWire::Map(map) => map,
            CitedWire::List(ids) => ids
                .into_iter()
                .map(|id| (id, CitationMeta::default()))
                .collect(),
        }
    }
}

impl From<ClusterWire> for OpinionRecord {
    fn from(wire: ClusterWire) -> Self {
        // Only the first (combined) sub-opinion carries the citation list
        let cited = wire
            .sub_opinions
            .into_iter()
            .next()
            .and_then(|sub| sub.opinions_cited)
            .map(CitedWire::into_map)
            .unwrap_or_default();

        OpinionRecord {
            id: wire.id,
            date_filed: wire.date_filed,
            case_name: wire.case_name,
            case_name_short: wire.case_name_short,
            absolute_url: wire.absolute_url,
            citation_count: wire.citation_count,
            decision_direction: wire.decision_direction,
            votes_majority: wire.votes_majority,
            votes_minority: wire.votes_minority,
            scdb_id: wire.scdb_id.filter(|scdb| !scdb.is_empty()),
            cited,
        }
    }
}

/// Search API response: `{ "count": n, "results": [...] }`
#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(default)]
    count: Option<u64>,
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: OpinionId,
    #[serde(rename = "dateFiled")]
    date_filed: String,
    #[serde(default)]
    cites: Vec<OpinionId>,
    #[serde(rename = "caseName", default)]
    case_name: Option<String>,
    #[serde(rename = "caseNameShort", default)]
    case_name_short: Option<String>,
    #[serde(default)]
    absolute_url: Option<String>,
    #[serde(default)]
    citation: Vec<String>,
}

impl From<SearchHit> for OpinionRecord {
    fn from(hit: SearchHit) -> Self {
        let mut record = OpinionRecord::new(hit.id, hit.date_filed).citing(hit.cites);
        record.case_name = hit.case_name;
        record.case_name_short = hit
            .case_name_short
            .filter(|name| !name.is_empty())
            .or_else(|| hit.citation.into_iter().next());
        record.absolute_url = hit.absolute_url;
        record
    }
}

/// Parse opinion records from either supported document shape
pub fn parse_document(text: &str) -> Result<Vec<OpinionRecord>> {
    let value: Value = serde_json::from_str(text)?;

    if value.get("opinion_clusters").is_some() {
        let document: ClusterDocument = serde_json::from_value(value)?;
        log::info!("Parsed {} opinion clusters", document.opinion_clusters.len());
        Ok(document
            .opinion_clusters
            .into_iter()
            .map(OpinionRecord::from)
            .collect())
    } else if value.get("results").is_some() {
        let document: SearchDocument = serde_json::from_value(value)?;
        log::info!(
            "Parsed {} search results (reported count {:?})",
            document.results.len(),
            document.count
        );
        Ok(document.results.into_iter().map(OpinionRecord::from).collect())
    } else {
        Err(MapError::MalformedInput(
            "expected an `opinion_clusters` or `results` array".to_string(),
        ))
    }
}

/// Load opinion records from a JSON file
pub fn load_document(path: impl AsRef<Path>) -> Result<Vec<OpinionRecord>> {
    let path = path.as_ref();
    log::info!("Reading opinion data: {}", path.display());

    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLUSTERS: &str = r#"{
        "meta": {"version": 1.1},
        "opinion_clusters": [
            {
                "id": 111,
                "absolute_url": "/opinion/111/marbury/",
                "case_name": "Marbury v. Madison",
                "case_name_short": "Marbury",
                "citation_count": 2,
                "date_filed": "1803-02-24",
                "decision_direction": null,
                "votes_majority": 4,
                "votes_minority": 0,
                "scdb_id": "",
                "sub_opinions": [{"type": "combined", "opinions_cited": {}}]
            },
            {
                "id": 222,
                "date_filed": "1819-03-06",
                "decision_direction": 1,
                "votes_minority": -1,
                "sub_opinions": [{"opinions_cited": {"111": {"opacitiy": 1}, "999": {}}}]
            },
            {
                "id": 333,
                "date_filed": "1824-03-02",
                "sub_opinions": [{"opinions_cited": [111, 222]}]
            }
        ]
    }"#;

    #[test]
    fn test_parses_cluster_documents() {
        let records = parse_document(CLUSTERS).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].case_name_short.as_deref(), Some("Marbury"));
        assert_eq!(records[0].scdb_id, None);
        assert!(records[0].cited.is_empty());

        let second = &records[1];
        assert_eq!(second.cited.len(), 2);
        assert_eq!(second.cited[&OpinionId::Number(111)].opacity, Some(1.0));
        assert_eq!(second.vote_split(), "Unk");

        let third = &records[2];
        assert_eq!(
            third.cited.keys().cloned().collect::<Vec<_>>(),
            vec![OpinionId::Number(111), OpinionId::Number(222)]
        );
    }

    #[test]
    fn test_parses_search_results() {
        let text = r#"{
            "count": 2,
            "results": [
                {"id": 5, "dateFiled": "1954-05-17T00:00:00Z", "caseName": "Brown v. Board",
                 "cites": [4, 3], "citation": ["347 U.S. 483"]},
                {"id": 4, "dateFiled": "1896-05-18T00:00:00Z", "caseName": "Plessy v. Ferguson"}
            ]
        }"#;
        let records = parse_document(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cited.len(), 2);
        assert_eq!(records[0].case_name_short.as_deref(), Some("347 U.S. 483"));
        assert!(records[1].cited.is_empty());
    }

    #[test]
    fn test_rejects_unknown_shapes() {
        assert!(matches!(
            parse_document(r#"{"clusters": []}"#),
            Err(MapError::MalformedInput(_))
        ));
        assert!(matches!(parse_document("not json"), Err(MapError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_document("/nonexistent/opinions.json"),
            Err(MapError::Io(_))
        ));
    }
}
