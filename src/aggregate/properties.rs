//! Property key usage

use crate::analysis::{Extraction, PropertyScope};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyUsage {
    pub key: String,
    /// Documents using the key as a page property
    pub documents: usize,
    /// Blocks using the key
    pub block_uses: usize,
}

/// Usage per key, most used on pages first; ties keep first-seen order
pub fn property_usage(extraction: &Extraction) -> Vec<PropertyUsage> {
    let mut usage: Vec<PropertyUsage> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut page_pairs: HashSet<(String, &str)> = HashSet::new();

    for occurrence in &extraction.properties {
        let i = *index.entry(occurrence.key.as_str()).or_insert_with(|| {
            usage.push(PropertyUsage {
                key: occurrence.key.clone(),
                documents: 0,
                block_uses: 0,
            });
            usage.len() - 1
        });
        match occurrence.scope {
            PropertyScope::Page => {
                if page_pairs.insert((occurrence.document.key(), occurrence.key.as_str())) {
                    usage[i].documents += 1;
                }
            }
            PropertyScope::Block => usage[i].block_uses += 1,
        }
    }

    usage.sort_by(|a, b| b.documents.cmp(&a.documents));
    usage
}
