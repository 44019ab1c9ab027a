//! Cross-peer aggregate ranking

use super::label::LabelMap;
use crate::orchestration::value_objects::{AggregateEntry, PeerRanking};

/// Combine every peer's parsed order into a consensus ranking.
///
/// A label at 1-based position `p` in a peer's order is one vote of `p`
/// for the identity behind it. Labels the map does not know are skipped,
/// and a label repeated within one peer's order only counts at its first
/// position. Identities without votes are omitted.
///
/// Ordering: lower average rank first, then more votes, then panel order.
pub fn aggregate_rankings(rankings: &[PeerRanking], label_map: &LabelMap) -> Vec<AggregateEntry> {
    let mut positions: Vec<Vec<usize>> = vec![Vec::new(); label_map.len()];

    for ranking in rankings {
        let mut seen = vec![false; label_map.len()];
        for (offset, label) in ranking.parsed_order.iter().enumerate() {
            if label_map.resolve(*label).is_none() {
                continue;
            }
            let slot = label.index();
            if !seen[slot] {
                seen[slot] = true;
                positions[slot].push(offset + 1);
            }
        }
    }

    let mut entries: Vec<(usize, AggregateEntry)> = label_map
        .iter()
        .zip(positions)
        .filter(|(_, votes)| !votes.is_empty())
        .map(|((label, model), votes)| {
            let total: usize = votes.iter().sum();
            let entry = AggregateEntry {
                model: model.clone(),
                average_rank: total as f64 / votes.len() as f64,
                vote_count: votes.len(),
            };
            (label.index(), entry)
        })
        .collect();

    entries.sort_by(|(a_order, a), (b_order, b)| {
        a.average_rank
            .total_cmp(&b.average_rank)
            .then_with(|| b.vote_count.cmp(&a.vote_count))
            .then_with(|| a_order.cmp(b_order))
    });

    entries.into_iter().map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Model;
    use crate::council::label::{Label, anonymize};
    use crate::orchestration::value_objects::PanelAnswer;

    fn label_map(models: &[&str]) -> LabelMap {
        let answers: Vec<PanelAnswer> = models
            .iter()
            .map(|m| PanelAnswer::new(Model::new(*m), "text"))
            .collect();
        anonymize(&answers)
    }

    fn ranking(peer: &str, order: &str) -> PeerRanking {
        let parsed_order = order.chars().filter_map(Label::from_letter).collect();
        PeerRanking::new(Model::new(peer), "raw", parsed_order)
    }

    fn summary(entries: &[AggregateEntry]) -> Vec<(String, f64, usize)> {
        entries
            .iter()
            .map(|e| (e.model.to_string(), e.average_rank, e.vote_count))
            .collect()
    }

    #[test]
    fn test_average_positions_with_tie() {
        let map = label_map(&["m1", "m2", "m3"]);
        let rankings = vec![ranking("m1", "ABC"), ranking("m2", "BAC")];

        let aggregate = aggregate_rankings(&rankings, &map);
        assert_eq!(
            summary(&aggregate),
            vec![
                ("m1".to_string(), 1.5, 2),
                ("m2".to_string(), 1.5, 2),
                ("m3".to_string(), 3.0, 2),
            ]
        );
    }

    #[test]
    fn test_tie_broken_by_vote_count_then_panel_order() {
        let map = label_map(&["m1", "m2", "m3"]);
        // m3 averages 1.0 with two votes, m2 averages 1.0 with one vote
        let rankings = vec![ranking("p1", "C"), ranking("p2", "CA"), ranking("p3", "B")];

        let aggregate = aggregate_rankings(&rankings, &map);
        let order: Vec<String> = aggregate.iter().map(|e| e.model.to_string()).collect();
        assert_eq!(order, vec!["m3", "m2", "m1"]);
    }

    #[test]
    fn test_unvoted_identities_are_omitted() {
        let map = label_map(&["m1", "m2", "m3"]);
        let aggregate = aggregate_rankings(&[ranking("m1", "AB")], &map);
        assert_eq!(aggregate.len(), 2);
        assert!(aggregate.iter().all(|e| e.model != Model::new("m3")));
    }

    #[test]
    fn test_unknown_labels_are_skipped_but_keep_positions() {
        let map = label_map(&["m1", "m2"]);
        // D is not assigned in this run
        let aggregate = aggregate_rankings(&[ranking("m1", "DBA")], &map);
        assert_eq!(
            summary(&aggregate),
            vec![("m2".to_string(), 2.0, 1), ("m1".to_string(), 3.0, 1)]
        );
    }

    #[test]
    fn test_repeated_label_counts_once_per_peer() {
        let map = label_map(&["m1", "m2"]);
        let aggregate = aggregate_rankings(&[ranking("p", "ABA")], &map);
        assert_eq!(
            summary(&aggregate),
            vec![("m1".to_string(), 1.0, 1), ("m2".to_string(), 2.0, 1)]
        );
    }

    #[test]
    fn test_no_rankings() {
        let map = label_map(&["m1"]);
        assert!(aggregate_rankings(&[], &map).is_empty());
        assert!(aggregate_rankings(&[ranking("p", "")], &map).is_empty());
    }
}
