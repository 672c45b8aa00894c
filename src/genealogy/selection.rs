//! Parent selection for genealogy mode

use crate::genealogy::{Genealogy, ParentLink, SelectionRule};
use crate::graph::{CitationGraph, DecisionDirection, TraversalDirection};

/// Most recent neighbor in `direction`, preferring one that agrees with `wanted`.
///
/// Neighbor lists are sorted by chronological index, so scanning from the back
/// visits the most recent opinion first.
fn latest_neighbor(
    graph: &CitationGraph,
    node: usize,
    direction: TraversalDirection,
    wanted: DecisionDirection,
) -> Option<(usize, u32, bool)> {
    let (targets, links) = graph.neighbors(node, direction);

    let agreeing = targets
        .iter()
        .zip(links)
        .rev()
        .find(|(&target, _)| wanted.agrees_with(graph.opinion(target as usize).record.direction()));
    if let Some((&target, &link)) = agreeing {
        return Some((target as usize, link, true));
    }

    targets
        .last()
        .zip(links.last())
        .map(|(&target, &link)| (target as usize, link, false))
}

/// Pick exactly one parent for every opinion that has any citation link.
///
/// Pass one gives each opinion with authorities its most recent authority,
/// same-direction first. Pass two revisits every opinion still without a
/// parent and links it to the most recent case citing it.
pub fn select_parents(graph: &CitationGraph) -> Genealogy {
    log::info!("Selecting genealogy parents for {} opinions", graph.node_count);

    let mut parents: Vec<Option<ParentLink>> = vec![None; graph.node_count];

    for child in 0..graph.node_count {
        let direction = graph.opinion(child).record.direction();
        if let Some((parent, link, agrees)) =
            latest_neighbor(graph, child, TraversalDirection::Cites, direction)
        {
            let rule = if agrees {
                SelectionRule::SameDirectionAuthority
            } else {
                SelectionRule::LatestAuthority
            };
            parents[child] = Some(ParentLink { child, parent, link, rule });
        }
    }

    let mut second_pass = 0;
    for child in 0..graph.node_count {
        if parents[child].is_some() {
            continue;
        }
        let direction = graph.opinion(child).record.direction();
        if let Some((parent, link, _)) =
            latest_neighbor(graph, child, TraversalDirection::CitedBy, direction)
        {
            parents[child] = Some(ParentLink {
                child,
                parent,
                link,
                rule: SelectionRule::LatestCitingCase,
            });
            second_pass += 1;
        }
    }

    let genealogy = Genealogy { parents };
    log::debug!(
        "Genealogy: {} parents from citing cases, {} isolated opinions",
        second_pass,
        genealogy.orphan_count()
    );

    genealogy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, OpinionRecord};

    // Directions: 1 conservative, 2 liberal
    fn sample() -> CitationGraph {
        GraphBuilder::from_records(vec![
            OpinionRecord::new(1u64, "1900-01-01").with_direction(1),
            OpinionRecord::new(2u64, "1910-01-01").with_direction(2),
            OpinionRecord::new(3u64, "1920-01-01").with_direction(1).citing([1u64, 2]),
            OpinionRecord::new(4u64, "1930-01-01").with_direction(2).citing([1u64]),
            OpinionRecord::new(5u64, "1940-01-01"),
        ])
        .unwrap()
    }

    #[test]
    fn test_prefers_same_direction_authority() {
        let genealogy = select_parents(&sample());

        let third = genealogy.parent_of(2).unwrap();
        assert_eq!(third.parent, 0);
        assert_eq!(third.rule, SelectionRule::SameDirectionAuthority);
    }

    #[test]
    fn test_falls_back_to_latest_authority() {
        let genealogy = select_parents(&sample());

        let fourth = genealogy.parent_of(3).unwrap();
        assert_eq!(fourth.parent, 0);
        assert_eq!(fourth.rule, SelectionRule::LatestAuthority);
    }

    #[test]
    fn test_uncited_authorities_link_to_citing_cases() {
        let genealogy = select_parents(&sample());

        // Opinion 1 is cited by 3 (conservative) and 4 (liberal)
        let first = genealogy.parent_of(0).unwrap();
        assert_eq!(first.parent, 2);
        assert_eq!(first.rule, SelectionRule::LatestCitingCase);

        // Opinion 2 is only cited by 3
        assert_eq!(genealogy.parent_of(1).unwrap().parent, 2);
    }

    #[test]
    fn test_every_connected_opinion_has_one_parent() {
        let graph = sample();
        let genealogy = select_parents(&graph);

        for node in 0..graph.node_count {
            assert_eq!(genealogy.parent_of(node).is_some(), !graph.is_isolated(node));
        }
        assert_eq!(genealogy.orphan_count(), 1);
        assert!(genealogy.parent_of(4).is_none());

        for link in genealogy.links() {
            assert_eq!(graph.link_between(link.child, link.parent), Some(link.link));
        }
    }

    #[test]
    fn test_rule_counts() {
        let genealogy = select_parents(&sample());

        assert_eq!(
            genealogy.rule_counts(),
            [
                (SelectionRule::SameDirectionAuthority, 1),
                (SelectionRule::LatestAuthority, 1),
                (SelectionRule::LatestCitingCase, 2),
            ]
        );
    }
}
