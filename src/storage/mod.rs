//! Results persistence module

use crate::data::TrimmedMap;
use crate::error::Result;
use crate::layout::ChartData;
use crate::map::CitationMap;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save map results to the specified directory
pub fn save_results(
    map: &CitationMap,
    trimmed: &TrimmedMap,
    chart: &ChartData,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} opinions to {}", trimmed.node_count(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(map, trimmed, output_dir)?;
    save_table(map, trimmed, output_dir)?;
    save_chart(chart, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(map: &CitationMap, trimmed: &TrimmedMap, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let graph = map.graph();
    let histogram: serde_json::Map<String, serde_json::Value> = map
        .degree_histogram()
        .into_iter()
        .map(|(degree, count)| (degree.label().to_string(), json!(count)))
        .collect();
    let rules: serde_json::Map<String, serde_json::Value> = map
        .genealogy()
        .rule_counts()
        .into_iter()
        .map(|(rule, count)| (json!(rule).as_str().unwrap_or_default().to_string(), json!(count)))
        .collect();

    let summary = json!({
        "graph_stats": {
            "opinion_count": graph.node_count,
            "citation_count": graph.citation_count(),
            "link_count": graph.link_count(),
            "dangling_citations": graph.stats.dangling_citations,
            "self_citations": graph.stats.self_citations,
            "mutual_citations": graph.stats.mutual_citations,
        },
        "degree_stats": {
            "max_degree": map.max_degree(),
            "histogram": histogram,
        },
        "trim": {
            "limit": trimmed.limit,
            "mode": trimmed.mode,
            "kept_opinions": trimmed.node_count(),
            "kept_links": trimmed.link_count(),
        },
        "genealogy": {
            "orphans": map.genealogy().orphan_count(),
            "rules": rules,
        },
        "warnings": map.warnings(),
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save the opinion table shown below the chart
fn save_table(map: &CitationMap, trimmed: &TrimmedMap, output_dir: &str) -> Result<()> {
    log::info!("Saving opinion table");

    let path = Path::new(output_dir).join("nodes.json");
    let mut file = File::create(path)?;

    let graph = map.graph();
    let rows: Vec<serde_json::Value> = trimmed
        .nodes
        .iter()
        .map(|node| {
            let opinion = graph.opinion(node.index);
            json!({
                "id": opinion.id(),
                "position": node.position,
                "case_name_short": opinion.record.display_name(),
                "absolute_url": opinion.record.absolute_url,
                "citation_count": opinion.record.citation_count,
                "order": node.degree,
                "date_filed": opinion.date.format("%Y-%m-%d").to_string(),
            })
        })
        .collect();

    file.write_all(to_string_pretty(&json!({ "opinions": rows }))?.as_bytes())?;

    Ok(())
}

/// Save renderer records
fn save_chart(chart: &ChartData, output_dir: &str) -> Result<()> {
    log::info!("Saving chart data");

    let path = Path::new(output_dir).join("chart.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(chart)?.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::graph::OpinionRecord;
    use crate::layout;
    use tempfile::tempdir;

    #[test]
    fn test_writes_all_files() {
        let config = Config::default();
        let map = CitationMap::build(
            vec![
                OpinionRecord::new(1u64, "1900-01-01"),
                OpinionRecord::new(2u64, "1950-01-01").citing([1u64, 404]),
                OpinionRecord::new(3u64, "2000-01-01").citing([2u64]),
            ],
            &config,
        )
        .unwrap();
        let trimmed = map.trim(config.max_degree).unwrap();
        let chart = layout::project(&map, &trimmed, &config);

        let dir = tempdir().expect("tempdir");
        let out = dir.path().join("results");
        let out = out.to_str().unwrap();
        save_results(&map, &trimmed, &chart, out).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(Path::new(out).join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["graph_stats"]["opinion_count"], 3);
        assert_eq!(summary["graph_stats"]["dangling_citations"], 1);
        assert_eq!(summary["degree_stats"]["max_degree"], "second");
        assert_eq!(summary["degree_stats"]["histogram"]["first"], 2);
        assert_eq!(summary["trim"]["mode"], "dos");
        assert_eq!(summary["genealogy"]["rules"]["latest_authority"], 2);

        let table: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(Path::new(out).join("nodes.json")).unwrap())
                .unwrap();
        assert_eq!(table["opinions"].as_array().unwrap().len(), 3);
        assert_eq!(table["opinions"][1]["order"], "second");

        assert!(Path::new(out).join("chart.json").exists());
    }
}
