use cooc_core::aggregate::{EdgeTable, aggregate, aggregate_par};
use cooc_core::edges::{Edge, MentionPolicy, build_edges};
use cooc_core::normalize::{AliasTable, normalize};
use proptest::prelude::*;

/// Documents drawn from a small name pool so that pairs repeat.
fn arb_corpus() -> impl Strategy<Value = Vec<Vec<String>>> {
    let name = prop::sample::select(vec!["Trump", "Obama", "Clinton", "Sanders", "Cruz", "Bush"])
        .prop_map(str::to_string);
    prop::collection::vec(prop::collection::vec(name, 0..8), 0..20)
}

fn arb_table() -> impl Strategy<Value = EdgeTable> {
    arb_corpus().prop_map(|docs| {
        aggregate(docs.iter().map(|d| build_edges(d, MentionPolicy::PerMention)))
    })
}

fn table_of(docs: &[Vec<String>], policy: MentionPolicy) -> EdgeTable {
    aggregate(docs.iter().map(|d| build_edges(d, policy)))
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn aggregation_ignores_document_order(docs in arb_corpus(), seed in any::<u64>()) {
        let mut shuffled = docs.clone();
        // Deterministic rotation plus reversal stands in for a shuffle.
        if !shuffled.is_empty() {
            let k = usize::try_from(seed % shuffled.len() as u64).unwrap_or(0);
            shuffled.rotate_left(k);
            shuffled.reverse();
        }
        prop_assert_eq!(
            table_of(&docs, MentionPolicy::PerMention),
            table_of(&shuffled, MentionPolicy::PerMention)
        );
    }

    #[test]
    fn parallel_aggregation_matches_sequential(docs in arb_corpus()) {
        let parallel = aggregate_par(&docs, |d| build_edges(d, MentionPolicy::PerMention));
        prop_assert_eq!(parallel, table_of(&docs, MentionPolicy::PerMention));
    }

    #[test]
    fn merge_commutative(a in arb_table(), b in arb_table()) {
        prop_assert_eq!(a.clone().merge(b.clone()), b.merge(a));
    }

    #[test]
    fn merge_associative(a in arb_table(), b in arb_table(), c in arb_table()) {
        let left = a.clone().merge(b.clone()).merge(c.clone());
        let right = a.merge(b.merge(c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn every_edge_is_oriented_and_loop_free(docs in arb_corpus()) {
        let table = table_of(&docs, MentionPolicy::PerMention);
        for (edge, weight) in table.iter() {
            prop_assert!(edge.a() < edge.b());
            prop_assert!(weight > 0);
        }
    }

    #[test]
    fn distinct_names_give_all_pairs(docs in arb_corpus()) {
        for doc in &docs {
            let edges = build_edges(doc, MentionPolicy::PerDocument);
            let mut distinct = doc.clone();
            distinct.sort();
            distinct.dedup();
            let k = distinct.len();
            prop_assert_eq!(edges.len(), k * k.saturating_sub(1) / 2);
        }
    }

    #[test]
    fn document_weighting_never_exceeds_mention_weighting(docs in arb_corpus()) {
        let per_mention = table_of(&docs, MentionPolicy::PerMention);
        let per_document = table_of(&docs, MentionPolicy::PerDocument);
        prop_assert_eq!(per_mention.len(), per_document.len());
        for (edge, weight) in per_document.iter() {
            prop_assert!(per_mention.get(edge).unwrap_or(0) >= weight);
        }
    }

    #[test]
    fn edge_orientation_is_symmetric(x in "[A-Za-z]{1,6}", y in "[A-Za-z]{1,6}") {
        prop_assert_eq!(Edge::new(x.clone(), y.clone()), Edge::new(y, x));
    }

    #[test]
    fn normalization_is_idempotent_without_chained_aliases(raw in "[A-Za-z: ]{0,12}") {
        let aliases = AliasTable::from_pairs([("Trump", "Donald Trump"), ("Obama", "Barack Obama")])
            .expect("no conflicts");
        let once = normalize(&raw, &aliases);
        prop_assert_eq!(normalize(&once, &aliases), once.clone());
        prop_assert!(!once.contains(':'));
    }
}
