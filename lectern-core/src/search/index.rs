use super::tokenize::tokenize;
use super::{SearchError, BODY_FIELD, TITLE_FIELD};
use crate::page::Page;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Version of the `search_index.json` layout
pub const INDEX_VERSION: u32 = 1;

/// What a result link needs to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub uri: String,
    pub title: String,
}

/// Inverted index for a single field.
///
/// `terms` maps a term to its postings, each `(document, term frequency)`, in
/// ascending document order. `lengths[doc]` is the token count of the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldIndex {
    pub lengths: Vec<u32>,
    pub terms: BTreeMap<String, Vec<(u32, u32)>>,
}

impl FieldIndex {
    fn add(&mut self, doc: u32, text: &str) {
        let tokens = tokenize(text);
        self.lengths.push(tokens.len() as u32);

        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }

        for (term, tf) in counts {
            self.terms.entry(term).or_default().push((doc, tf));
        }
    }

    /// Token count of `doc` in this field (at least 1, so it can divide)
    pub(crate) fn length(&self, doc: u32) -> u32 {
        self.lengths.get(doc as usize).copied().unwrap_or(0).max(1)
    }
}

/// Serialized search index, as written to `search_index.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub version: u32,
    #[serde(rename = "ref")]
    pub reference: String,
    pub fields: Vec<String>,
    pub documents: Vec<DocumentRef>,
    pub index: BTreeMap<String, FieldIndex>,
}

impl Default for SearchIndex {
    fn default() -> Self {
        let fields = vec![TITLE_FIELD.to_string(), BODY_FIELD.to_string()];
        let index = fields
            .iter()
            .map(|f| (f.clone(), FieldIndex::default()))
            .collect();

        Self {
            version: INDEX_VERSION,
            reference: "uri".to_string(),
            fields,
            documents: Vec::new(),
            index,
        }
    }
}

impl SearchIndex {
    /// Build an index over the given pages; later pages with an already
    /// indexed uri are skipped.
    pub fn build(pages: &[Page]) -> Self {
        let mut index = Self::default();
        let mut seen = HashSet::new();

        for page in pages {
            if !seen.insert(page.uri.as_str()) {
                tracing::warn!("Duplicate page uri {}, keeping the first", page.uri);
                continue;
            }
            index.add(page);
        }

        tracing::debug!(
            "Indexed {} documents, {} title terms, {} body terms",
            index.documents.len(),
            index.index.get(TITLE_FIELD).map_or(0, |f| f.terms.len()),
            index.index.get(BODY_FIELD).map_or(0, |f| f.terms.len()),
        );

        index
    }

    fn add(&mut self, page: &Page) {
        let doc = self.documents.len() as u32;
        self.documents.push(DocumentRef {
            uri: page.uri.clone(),
            title: page.title.clone(),
        });

        for field in &self.fields {
            let text = match field.as_str() {
                TITLE_FIELD => page.title.as_str(),
                BODY_FIELD => page.body.as_str(),
                _ => "",
            };
            self.index.entry(field.clone()).or_default().add(doc, text);
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, SearchError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse and validate an index document
    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        let index: SearchIndex = serde_json::from_str(json)?;
        index.validate()?;
        Ok(index)
    }

    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let json = fs::read_to_string(path).map_err(|source| SearchError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Write the index next to its final path, then rename it into place so
    /// readers never see a partial document.
    pub fn write(&self, path: &Path, pretty: bool) -> Result<(), SearchError> {
        let json = self.to_json(pretty)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, json).map_err(|source| SearchError::Write {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, path).map_err(|source| SearchError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validate(&self) -> Result<(), SearchError> {
        if self.version != INDEX_VERSION {
            return Err(SearchError::UnsupportedVersion {
                found: self.version,
                expected: INDEX_VERSION,
            });
        }

        let docs = self.documents.len();
        for (name, field) in &self.index {
            if field.lengths.len() != docs {
                return Err(SearchError::Corrupt(format!(
                    "field '{}' has {} lengths for {} documents",
                    name,
                    field.lengths.len(),
                    docs
                )));
            }

            let dangling = field
                .terms
                .iter()
                .find(|(_, postings)| postings.iter().any(|&(doc, _)| doc as usize >= docs));
            if let Some((term, _)) = dangling {
                return Err(SearchError::Corrupt(format!(
                    "term '{}' in field '{}' references a missing document",
                    term, name
                )));
            }
        }

        Ok(())
    }
}
