//! Chart projection: point and segment records for the renderer

use crate::config::{ChartMode, Config};
use crate::data::TrimmedMap;
use crate::graph::{DecisionDirection, Degree, OpinionId};
use crate::map::CitationMap;
use serde::Serialize;
use std::collections::HashMap;

/// Vertical spread patterns, indexed by `ceil(sqrt(opinion count)) - 1`
const DISTRIBUTIONS: [&[u32]; 9] = [
    &[1],
    &[1, 2],
    &[1, 2, 3],
    &[1, 3, 2, 4],
    &[2, 10, 5, 13, 16],
    &[1, 2, 3, 4, 5, 6],
    &[1, 2, 3, 4, 5, 6, 7],
    &[1, 2, 3, 4, 5, 6, 7, 8],
    &[1, 2, 3, 4, 5, 6, 7, 8, 9],
];

/// Spaeth rows, liberal splits at the top
pub const SPAETH_ROWS: [&str; 10] = [
    "L5-4", "L6-3", "L7-2", "L8-1", "N9-0", "C8-1", "C7-2", "C6-3", "C5-4", "Unk",
];

/// Row pattern used to spread opinions vertically
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spread {
    /// Rows cycled through by the middle opinions
    pub flag: usize,
    pub distribution: Vec<u32>,
}

impl Spread {
    pub fn for_count(count: usize) -> Self {
        let flag = (count as f64).sqrt().ceil() as usize;
        let distribution = if flag > 0 && flag < DISTRIBUTIONS.len() {
            DISTRIBUTIONS[flag - 1].to_vec()
        } else {
            (1..=flag as u32 + 1).collect()
        };
        Self { flag, distribution }
    }

    /// Row reserved for the first and last opinion
    pub fn top_row(&self) -> u32 {
        self.distribution.iter().copied().max().unwrap_or(0) + 1
    }

    /// Row for a 1-based position among `count` opinions
    pub fn row(&self, position: usize, count: usize) -> u32 {
        if position <= 1 || position >= count || self.flag == 0 {
            self.top_row()
        } else {
            self.distribution[(position - 2) % self.flag]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum YValue {
    Row(u32),
    Split(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub id: OpinionId,
    /// Filing date, `YYYY-MM-DD`
    pub x: String,
    pub y: YValue,
    /// Degree category
    pub c: Degree,
    /// Citation count, used for the marker size
    pub size: u64,
    pub position: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentEnd {
    pub x: String,
    pub y: YValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub from: SegmentEnd,
    pub to: SegmentEnd,
    /// Color category: a degree label, or a decision label in Spaeth mode
    pub c: String,
    /// Opacity
    pub o: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub mode: ChartMode,
    pub limit: usize,
    pub y_domain: Vec<YValue>,
    pub legend: Vec<String>,
    pub points: Vec<ChartPoint>,
    pub segments: Vec<Segment>,
}

/// Lay out a trimmed map for the chart
pub fn project(map: &CitationMap, trimmed: &TrimmedMap, config: &Config) -> ChartData {
    let graph = map.graph();
    let count = trimmed.node_count();
    let spread = Spread::for_count(count);

    let points: Vec<ChartPoint> = trimmed
        .nodes
        .iter()
        .map(|node| {
            let opinion = graph.opinion(node.index);
            let y = match trimmed.mode {
                ChartMode::Spaeth => YValue::Split(opinion.record.vote_split()),
                ChartMode::Degrees | ChartMode::Genealogy => {
                    YValue::Row(spread.row(node.position, count))
                }
            };
            ChartPoint {
                id: opinion.id().clone(),
                x: opinion.date.format("%Y-%m-%d").to_string(),
                y,
                c: node.degree,
                size: opinion
                    .record
                    .citation_count
                    .unwrap_or(graph.in_degree(node.index) as u64),
                position: node.position,
                label: opinion.record.display_name(),
                url: opinion.record.absolute_url.clone(),
            }
        })
        .collect();

    let point_at: HashMap<usize, usize> = trimmed
        .nodes
        .iter()
        .enumerate()
        .map(|(pos, node)| (node.index, pos))
        .collect();

    // Opacity comes from whichever side made the citation
    let opacity = |src: usize, dst: usize| {
        graph
            .opinion(src)
            .record
            .cited
            .get(graph.opinion(dst).id())
            .and_then(|meta| meta.opacity)
    };
    let segment = |src: usize, dst: usize, degree: Degree| -> Option<Segment> {
        let from = &points[*point_at.get(&src)?];
        let to = &points[*point_at.get(&dst)?];

        let c = match trimmed.mode {
            ChartMode::Spaeth => graph.opinion(dst).record.direction_label().to_string(),
            ChartMode::Degrees | ChartMode::Genealogy => degree.label().to_string(),
        };
        let o = opacity(src, dst)
            .or_else(|| opacity(dst, src))
            .unwrap_or(config.edge_opacity);

        Some(Segment {
            from: SegmentEnd { x: from.x.clone(), y: from.y.clone() },
            to: SegmentEnd { x: to.x.clone(), y: to.y.clone() },
            c,
            o,
        })
    };

    let mut segments: Vec<Segment> = Vec::with_capacity(trimmed.links.len());
    for link in &trimmed.links {
        segments.extend(segment(link.from, link.to, link.degree));
        // Spaeth colors by the cited side, so each half of a mutual citation gets a line
        if trimmed.mode == ChartMode::Spaeth && graph.link(link.slot).mutual {
            segments.extend(segment(link.to, link.from, link.degree));
        }
    }

    let (y_domain, legend): (Vec<YValue>, Vec<String>) = match trimmed.mode {
        ChartMode::Spaeth => (
            SPAETH_ROWS.iter().map(|row| YValue::Split(row.to_string())).collect(),
            DecisionDirection::LABELS
                .iter()
                .take(trimmed.limit)
                .map(|label| label.to_string())
                .collect(),
        ),
        ChartMode::Degrees | ChartMode::Genealogy => (
            (1..=spread.top_row()).rev().map(YValue::Row).collect(),
            Degree::ALL[..=map.max_degree().index()]
                .iter()
                .map(|degree| degree.label().to_string())
                .collect(),
        ),
    };

    log::debug!(
        "Projected {} points and {} segments",
        points.len(),
        segments.len()
    );

    ChartData {
        mode: trimmed.mode,
        limit: trimmed.limit,
        y_domain,
        legend,
        points,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OpinionRecord;

    #[test]
    fn test_spread_table() {
        let spread = Spread::for_count(20);
        assert_eq!(spread.flag, 5);
        assert_eq!(spread.distribution, vec![2, 10, 5, 13, 16]);
        assert_eq!(spread.top_row(), 17);
        assert_eq!(spread.row(1, 20), 17);
        assert_eq!(spread.row(20, 20), 17);
        assert_eq!(spread.row(2, 20), 2);
        assert_eq!(spread.row(7, 20), 2);

        // Past the table the rows simply count up
        let wide = Spread::for_count(100);
        assert_eq!(wide.flag, 10);
        assert_eq!(wide.distribution, (1..=11).collect::<Vec<u32>>());
    }

    fn sample(mode: ChartMode) -> (CitationMap, Config) {
        let config = Config { mode, ..Config::default() };
        let mut first = OpinionRecord::new(1u64, "1900-01-01").with_direction(1).with_votes(5, 4);
        first.case_name_short = Some("First".to_string());
        let mut second = OpinionRecord::new(2u64, "1950-06-30")
            .with_direction(2)
            .with_votes(6, 3)
            .citing([1u64]);
        if let Some(meta) = second.cited.get_mut(&OpinionId::Number(1)) {
            meta.opacity = Some(1.0);
        }
        let third = OpinionRecord::new(3u64, "2000-01-01").citing([2u64]);

        let map = CitationMap::build(vec![first, second, third], &config).unwrap();
        (map, config)
    }

    #[test]
    fn test_degree_projection() {
        let (map, config) = sample(ChartMode::Degrees);
        let trimmed = map.trim(3).unwrap();
        let chart = project(&map, &trimmed, &config);

        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.points[0].x, "1900-01-01");
        assert_eq!(chart.points[0].label, "First");
        assert_eq!(chart.points[0].y, YValue::Row(3));
        assert_eq!(chart.points[1].y, YValue::Row(1));
        assert_eq!(chart.points[1].c, Degree::Second);
        assert_eq!(chart.legend, vec!["first", "second"]);
        assert_eq!(chart.y_domain, vec![YValue::Row(3), YValue::Row(2), YValue::Row(1)]);

        assert_eq!(chart.segments.len(), 2);
        let opaque = chart.segments.iter().find(|s| s.o == 1.0).unwrap();
        assert_eq!(opaque.to.x, "1900-01-01");
        assert_eq!(opaque.c, "second");
        assert!(chart.segments.iter().any(|s| s.o == 0.5));
    }

    #[test]
    fn test_spaeth_projection() {
        let (map, config) = sample(ChartMode::Spaeth);
        let trimmed = map.trim(3).unwrap();
        let chart = project(&map, &trimmed, &config);

        assert_eq!(chart.points[0].y, YValue::Split("C5-4".to_string()));
        assert_eq!(chart.points[1].y, YValue::Split("L6-3".to_string()));
        assert_eq!(chart.points[2].y, YValue::Split("Unk".to_string()));
        assert_eq!(chart.legend, vec!["Neutral", "Conservative", "Liberal"]);
        assert_eq!(chart.y_domain.len(), SPAETH_ROWS.len());

        // Colored by the decision of the cited case
        let colors: Vec<&str> = chart.segments.iter().map(|s| s.c.as_str()).collect();
        assert_eq!(colors, vec!["Conservative", "Liberal"]);
    }

    #[test]
    fn test_spaeth_draws_both_halves_of_mutual_citation() {
        // 2 and 3 cite each other
        let config = Config { mode: ChartMode::Spaeth, ..Config::default() };
        let map = CitationMap::build(
            vec![
                OpinionRecord::new(1u64, "1900-01-01").with_direction(1).with_votes(5, 4),
                OpinionRecord::new(2u64, "1950-01-01")
                    .with_direction(2)
                    .with_votes(6, 3)
                    .citing([1u64, 3]),
                OpinionRecord::new(3u64, "1950-01-01")
                    .with_direction(1)
                    .with_votes(7, 2)
                    .citing([1u64, 2]),
            ],
            &config,
        )
        .unwrap();
        let trimmed = map.trim(3).unwrap();
        let chart = project(&map, &trimmed, &config);

        assert_eq!(map.graph().stats.mutual_citations, 1);
        assert_eq!(trimmed.link_count(), 3);
        assert_eq!(chart.segments.len(), 4);
        let mut colors: Vec<&str> = chart.segments.iter().map(|s| s.c.as_str()).collect();
        colors.sort_unstable();
        assert_eq!(colors, vec!["Conservative", "Conservative", "Conservative", "Liberal"]);
    }

    #[test]
    fn test_serializes_renderer_shape() {
        let (map, config) = sample(ChartMode::Degrees);
        let chart = project(&map, &map.trim(3).unwrap(), &config);
        let value = serde_json::to_value(&chart.segments[0]).unwrap();

        assert!(value["from"]["x"].is_string());
        assert!(value["from"]["y"].is_number());
        assert!(value["c"].is_string());
        assert!(value["o"].is_number());
    }
}
