//! Corpus → edge table.
//!
//! Per document: subset check, mentions (stored or extracted), entity-type
//! filter, normalization, edge building. Documents are processed on the
//! rayon pool through [`aggregate_par_with`]; each worker keeps a partial
//! [`EdgeTable`] and a partial [`CorpusSummary`] and the partials are merged
//! at the end.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::aggregate::{EdgeTable, aggregate_par_with};
use crate::corpus::{Document, Subset};
use crate::edges::{Edge, MentionPolicy, build_edges};
use crate::extract::{EntityExtractor, PERSON, mentions_of_kind};
use crate::normalize::Normalizer;

/// Knobs for [`build_edge_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub subset: Subset,
    /// Entity type to keep, e.g. `PERSON`.
    pub kind: String,
    pub policy: MentionPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            subset: Subset::All,
            kind: PERSON.to_string(),
            policy: MentionPolicy::default(),
        }
    }
}

/// Counts gathered while building an edge table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusSummary {
    /// Documents in the corpus.
    pub documents: usize,
    /// Documents inside the subset.
    pub selected: usize,
    /// Selected documents with at least one kept mention.
    pub with_entities: usize,
    /// Kept mentions after normalization.
    pub mentions: usize,
    /// Co-occurrence events counted (sum of all edge weights).
    pub edge_instances: usize,
    /// Distinct edges in the resulting table.
    pub distinct_edges: usize,
}

impl CorpusSummary {
    /// Sum two partial summaries.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            documents: self.documents + other.documents,
            selected: self.selected + other.selected,
            with_entities: self.with_entities + other.with_entities,
            mentions: self.mentions + other.mentions,
            edge_instances: self.edge_instances + other.edge_instances,
            distinct_edges: self.distinct_edges + other.distinct_edges,
        }
    }
}

fn process_document(
    doc: &Document,
    extractor: &dyn EntityExtractor,
    normalizer: &Normalizer,
    options: &PipelineOptions,
    summary: &mut CorpusSummary,
) -> Vec<Edge> {
    if !options.subset.matches(doc) {
        return Vec::new();
    }
    summary.selected += 1;

    let mentions = doc.mentions(extractor);
    let names = normalizer.normalize_all(&mentions_of_kind(&mentions, &options.kind));
    if names.is_empty() {
        return Vec::new();
    }
    summary.with_entities += 1;
    summary.mentions += names.len();

    let edges = build_edges(&names, options.policy);
    summary.edge_instances += edges.len();
    edges
}

/// Build the weighted edge table for the selected documents of a corpus.
///
/// The result does not depend on document order or on how rayon splits
/// the work.
#[instrument(skip_all, fields(documents = documents.len(), subset = %options.subset, policy = %options.policy))]
pub fn build_edge_table(
    documents: &[Document],
    extractor: &dyn EntityExtractor,
    normalizer: &Normalizer,
    options: &PipelineOptions,
) -> (EdgeTable, CorpusSummary) {
    let (table, mut summary) = aggregate_par_with(
        documents,
        |doc, summary: &mut CorpusSummary| {
            process_document(doc, extractor, normalizer, options, summary)
        },
        CorpusSummary::merge,
    );

    summary.documents = documents.len();
    summary.distinct_edges = table.len();

    if summary.selected == 0 && !documents.is_empty() {
        warn!(subset = %options.subset, "no document matched the subset");
    }
    info!(
        selected = summary.selected,
        with_entities = summary.with_entities,
        edges = summary.distinct_edges,
        "built edge table"
    );
    (table, summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Gazetteer, Mention};
    use crate::normalize::AliasTable;

    fn normalizer() -> Normalizer {
        let aliases = AliasTable::from_pairs([
            ("Trump", "Donald Trump"),
            ("Obama", "Barack Obama"),
        ])
        .expect("no conflicts");
        Normalizer::with_default_strip(aliases)
    }

    fn gazetteer() -> Gazetteer {
        Gazetteer::new(["Trump", "Obama", "Clinton", "Donald Trump", "Barack Obama"], PERSON)
    }

    fn corpus() -> Vec<Document> {
        vec![
            Document::text("1", Some("FAKE"), "Trump attacked Obama."),
            Document::text("2", Some("REAL"), "Donald Trump and Barack Obama met Clinton."),
            Document::text("3", Some("REAL"), "Nobody here."),
            Document::annotated(
                "4",
                Some("FAKE"),
                vec![Mention::person("Obama:"), Mention::new("Ohio", "GPE"), Mention::person("Trump")],
            ),
        ]
    }

    #[test]
    fn aliases_merge_into_one_edge() {
        let (table, summary) =
            build_edge_table(&corpus(), &gazetteer(), &normalizer(), &PipelineOptions::default());
        assert_eq!(table.weight("Barack Obama", "Donald Trump"), 3);
        assert_eq!(table.weight("Clinton", "Donald Trump"), 1);
        assert_eq!(table.weight("Barack Obama", "Clinton"), 1);
        assert_eq!(table.len(), 3);
        assert_eq!(
            summary,
            CorpusSummary {
                documents: 4,
                selected: 4,
                with_entities: 3,
                mentions: 7,
                edge_instances: 5,
                distinct_edges: 3,
            }
        );
    }

    #[test]
    fn subset_restricts_documents() {
        let options = PipelineOptions {
            subset: Subset::Label("FAKE".to_string()),
            ..PipelineOptions::default()
        };
        let (table, summary) = build_edge_table(&corpus(), &gazetteer(), &normalizer(), &options);
        assert_eq!(summary.selected, 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.weight("Barack Obama", "Donald Trump"), 2);
    }

    #[test]
    fn other_entity_types_are_ignored() {
        let docs = vec![Document::annotated(
            "1",
            None,
            vec![Mention::new("Ohio", "GPE"), Mention::new("Texas", "GPE")],
        )];
        let (table, summary) =
            build_edge_table(&docs, &gazetteer(), &normalizer(), &PipelineOptions::default());
        assert!(table.is_empty());
        assert_eq!(summary.with_entities, 0);

        let gpe = PipelineOptions {
            kind: "GPE".to_string(),
            ..PipelineOptions::default()
        };
        let (table, _) = build_edge_table(&docs, &gazetteer(), &normalizer(), &gpe);
        assert_eq!(table.weight("Ohio", "Texas"), 1);
    }

    #[test]
    fn document_policy_counts_each_pair_once() {
        let docs = vec![Document::text("1", None, "Trump, Obama, Trump, Obama")];
        let mentions = PipelineOptions::default();
        let documents = PipelineOptions {
            policy: MentionPolicy::PerDocument,
            ..PipelineOptions::default()
        };
        let (per_mention, _) = build_edge_table(&docs, &gazetteer(), &normalizer(), &mentions);
        let (per_doc, _) = build_edge_table(&docs, &gazetteer(), &normalizer(), &documents);
        assert_eq!(per_mention.weight("Barack Obama", "Donald Trump"), 4);
        assert_eq!(per_doc.weight("Barack Obama", "Donald Trump"), 1);
    }

    #[test]
    fn empty_corpus_gives_empty_summary() {
        let (table, summary) =
            build_edge_table(&[], &gazetteer(), &normalizer(), &PipelineOptions::default());
        assert!(table.is_empty());
        assert_eq!(summary, CorpusSummary::default());
    }
}
