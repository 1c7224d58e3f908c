use super::index::{FieldIndex, SearchIndex};
use super::tokenize::tokenize;
use super::{BODY_FIELD, TITLE_FIELD};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Bound;

/// How query tokens combine within a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolMode {
    /// A document matches if any token matches
    #[default]
    Or,
    /// A document matches only if every token matches
    And,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBoost {
    pub field: String,
    pub boost: f64,
}

/// Weighting used when running a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub fields: Vec<FieldBoost>,
    /// Also match index terms that start with a query token
    pub expand: bool,
    pub bool: BoolMode,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldBoost {
                    field: TITLE_FIELD.to_string(),
                    boost: 2.0,
                },
                FieldBoost {
                    field: BODY_FIELD.to_string(),
                    boost: 1.0,
                },
            ],
            expand: true,
            bool: BoolMode::Or,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub uri: String,
    pub title: String,
    pub score: f64,
}

impl SearchIndex {
    /// Run a query. An empty query (or one made only of stop words) matches
    /// nothing.
    pub fn query(&self, query: &str, config: &QueryConfig) -> Vec<SearchHit> {
        let mut tokens = tokenize(query);
        let mut seen = HashSet::new();
        tokens.retain(|t| seen.insert(t.clone()));
        if tokens.is_empty() || self.is_empty() {
            return Vec::new();
        }

        let total_docs = self.documents.len() as f64;
        let mut scores: HashMap<u32, f64> = HashMap::new();

        for FieldBoost { field, boost } in &config.fields {
            let Some(field_index) = self.index.get(field) else {
                continue;
            };

            for (doc, score) in field_index.score(&tokens, total_docs, config) {
                *scores.entry(doc).or_insert(0.0) += score * boost;
            }
        }

        let mut ranked: Vec<(u32, f64)> = scores.into_iter().filter(|(_, s)| *s > 0.0).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .filter_map(|(doc, score)| {
                self.documents.get(doc as usize).map(|d| SearchHit {
                    uri: d.uri.clone(),
                    title: d.title.clone(),
                    score,
                })
            })
            .collect()
    }
}

impl FieldIndex {
    /// Per-document score of this field for the given tokens, before boosting
    fn score(&self, tokens: &[String], total_docs: f64, config: &QueryConfig) -> HashMap<u32, f64> {
        let mut scores: HashMap<u32, f64> = HashMap::new();
        let mut matched: HashMap<u32, usize> = HashMap::new();

        for token in tokens {
            let mut token_scores: HashMap<u32, f64> = HashMap::new();

            for (postings, penalty) in self.matching_terms(token, config.expand) {
                let idf = 1.0 + (total_docs / (postings.len() as f64 + 1.0)).ln();
                for &(doc, tf) in postings {
                    let norm = 1.0 / f64::from(self.length(doc)).sqrt();
                    *token_scores.entry(doc).or_insert(0.0) +=
                        f64::from(tf).sqrt() * idf * norm * penalty;
                }
            }

            for (doc, score) in token_scores {
                *scores.entry(doc).or_insert(0.0) += score;
                *matched.entry(doc).or_insert(0) += 1;
            }
        }

        let wanted = tokens.len();
        scores
            .into_iter()
            .filter_map(|(doc, score)| {
                let hits = matched.get(&doc).copied().unwrap_or(0);
                if config.bool == BoolMode::And && hits < wanted {
                    return None;
                }
                Some((doc, score * hits as f64 / wanted as f64))
            })
            .collect()
    }

    /// Postings for `token`, plus prefix expansions when `expand` is set.
    /// Expanded terms carry a penalty that grows with the extra length.
    fn matching_terms<'a>(
        &'a self,
        token: &'a str,
        expand: bool,
    ) -> Box<dyn Iterator<Item = (&'a [(u32, u32)], f64)> + 'a> {
        if !expand {
            return Box::new(
                self.terms
                    .get(token)
                    .map(|postings| (postings.as_slice(), 1.0))
                    .into_iter(),
            );
        }

        let token_len = token.chars().count();
        Box::new(
            self.terms
                .range::<str, _>((Bound::Included(token), Bound::Unbounded))
                .take_while(move |(term, _)| term.starts_with(token))
                .map(move |(term, postings)| {
                    let extra = term.chars().count().saturating_sub(token_len);
                    (postings.as_slice(), expansion_penalty(extra))
                }),
        )
    }
}

fn expansion_penalty(extra_chars: usize) -> f64 {
    if extra_chars == 0 {
        1.0
    } else {
        1.0 / (1.0 + (1.0 + extra_chars as f64).ln())
    }
}
