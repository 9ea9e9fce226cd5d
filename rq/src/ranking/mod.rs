//! Ranking engine - BM25 over the document corpus
//!
//! Scores are recomputed from scratch on every call: the corpus may have
//! been reloaded between calls and correctness wins over latency here.

mod tokenize;

use std::collections::BTreeMap;

use tracing::debug;

pub use tokenize::tokenize;

/// BM25 term-frequency saturation parameter
const K1: f64 = 1.5;

/// BM25 length normalization parameter
const B: f64 = 0.75;

/// Fraction of the mean IDF used as the floor for common terms
const IDF_FLOOR_FACTOR: f64 = 0.25;

/// A corpus entry eligible for ranking
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub identifier: String,
    pub content: String,
}

impl CorpusEntry {
    pub fn new(identifier: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            content: content.into(),
        }
    }
}

/// Rank a corpus against a query, best first
///
/// Returns only entries with a strictly positive score, sorted by score
/// descending with ties kept in corpus order, truncated to `top_n`.
/// An empty corpus yields an empty result.
pub fn rank(query: &str, corpus: &[CorpusEntry], top_n: usize) -> Vec<(String, f64)> {
    debug!(%query, corpus_size = corpus.len(), top_n, "rank: called");

    let entries: Vec<&CorpusEntry> = corpus.iter().filter(|e| !e.content.is_empty()).collect();
    if entries.is_empty() {
        return Vec::new();
    }

    let index = Bm25Index::build(&entries);
    let query_terms = tokenize(query);

    let mut results: Vec<(String, f64)> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.identifier.clone(), index.score(&query_terms, i)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    // Stable sort keeps corpus order for equal scores
    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(top_n);

    debug!(result_count = results.len(), "rank: complete");
    results
}

/// Per-call BM25 index
///
/// BTreeMap keeps term iteration deterministic, so the IDF mean (and with it
/// every score) is bit-for-bit reproducible across calls.
struct Bm25Index {
    doc_terms: Vec<Vec<String>>,
    idf: BTreeMap<String, f64>,
    avg_doc_len: f64,
}

impl Bm25Index {
    fn build(entries: &[&CorpusEntry]) -> Self {
        let doc_terms: Vec<Vec<String>> = entries.iter().map(|e| tokenize(&e.content)).collect();

        let doc_count = doc_terms.len() as f64;
        let total_len: usize = doc_terms.iter().map(|t| t.len()).sum();
        let avg_doc_len = if doc_terms.is_empty() {
            0.0
        } else {
            total_len as f64 / doc_count
        };

        // Document frequency per term
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for terms in &doc_terms {
            let mut seen: Vec<&String> = terms.iter().collect();
            seen.sort();
            seen.dedup();
            for term in seen {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let idf = Self::floored_idf(&df, doc_count);

        Self {
            doc_terms,
            idf,
            avg_doc_len,
        }
    }

    /// Compute IDF weights with the negative-value floor
    ///
    /// The raw formula `ln((N - df + 0.5) / (df + 0.5))` goes negative for
    /// terms occurring in more than half the corpus. Any such value is
    /// replaced with `IDF_FLOOR_FACTOR` times the mean IDF across all terms
    /// (negative contributions clamped to zero in the mean, keeping the
    /// floor strictly positive whenever any term is rare), so common terms
    /// never subtract score from a match.
    fn floored_idf(df: &BTreeMap<String, usize>, doc_count: f64) -> BTreeMap<String, f64> {
        let mut idf: BTreeMap<String, f64> = BTreeMap::new();
        for (term, freq) in df {
            let weight = ((doc_count - *freq as f64 + 0.5) / (*freq as f64 + 0.5)).ln();
            idf.insert(term.clone(), weight);
        }

        if idf.is_empty() {
            return idf;
        }

        let mean: f64 = idf.values().map(|w| w.max(0.0)).sum::<f64>() / idf.len() as f64;
        let floor = IDF_FLOOR_FACTOR * mean;
        for weight in idf.values_mut() {
            if *weight < 0.0 {
                *weight = floor;
            }
        }
        idf
    }

    fn score(&self, query_terms: &[String], doc_index: usize) -> f64 {
        let terms = &self.doc_terms[doc_index];
        let doc_len = terms.len() as f64;
        let norm = 1.0 - B + B * doc_len / self.avg_doc_len;

        let mut score = 0.0;
        for query_term in query_terms {
            let freq = terms.iter().filter(|t| *t == query_term).count() as f64;
            if freq == 0.0 {
                continue;
            }
            let idf = self.idf.get(query_term).copied().unwrap_or(0.0);
            score += idf * freq * (K1 + 1.0) / (freq + K1 * norm);
        }
        score
    }
}
