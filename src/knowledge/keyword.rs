use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::KnowledgeRecord;

/// Tokens this short are never indexed.
const MIN_TOKEN_CHARS: usize = 3;

/// Lowercase whitespace tokenizer shared by indexing and querying.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(|word| word.to_lowercase())
}

/// Lowercase token -> ascending record positions containing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordIndex {
    postings: BTreeMap<String, Vec<usize>>,
}

impl KeywordIndex {
    pub fn build(records: &[KnowledgeRecord]) -> Self {
        let mut postings: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (position, record) in records.iter().enumerate() {
            for token in tokenize(&record.keyword_text()) {
                if token.chars().count() < MIN_TOKEN_CHARS {
                    continue;
                }
                let list = postings.entry(token).or_default();
                if list.last() != Some(&position) {
                    list.push(position);
                }
            }
        }
        Self { postings }
    }

    /// Sorts and deduplicates postings, e.g. after loading a hand-edited file.
    pub fn normalize(&mut self) {
        for list in self.postings.values_mut() {
            list.sort_unstable();
            list.dedup();
        }
    }

    pub fn postings(&self, token: &str) -> Option<&[usize]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    pub fn max_position(&self) -> Option<usize> {
        self.postings
            .values()
            .filter_map(|list| list.iter().max())
            .max()
            .copied()
    }

    /// Scores records by query-token overlap and returns up to `k` positions.
    ///
    /// Each query token adds 1 to every record listed under it. Records are
    /// ordered by descending score, ties by ascending position; records that
    /// scored zero are never returned.
    pub fn search(&self, query: &str, record_count: usize, k: usize) -> Vec<(usize, usize)> {
        let mut scores = vec![0usize; record_count];
        for token in tokenize(query) {
            if let Some(list) = self.postings.get(&token) {
                for &position in list {
                    if let Some(score) = scores.get_mut(position) {
                        *score += 1;
                    }
                }
            }
        }

        let mut hits: Vec<(usize, usize)> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0)
            .collect();
        hits.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
        hits.truncate(k);
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(service: &str, description: &str) -> KnowledgeRecord {
        KnowledgeRecord::EmergencyContact {
            service: service.to_string(),
            number: "000".to_string(),
            description: description.to_string(),
        }
    }

    fn sample_records() -> Vec<KnowledgeRecord> {
        vec![
            contact("Police", "Emergency police services"),
            contact("Fire", "Fire and rescue emergency"),
            contact("Women Helpline", "Support for women in distress"),
        ]
    }

    #[test]
    fn build_skips_short_tokens_and_deduplicates() {
        let index = KeywordIndex::build(&[contact("Fire", "fire and rescue of fire")]);

        assert_eq!(index.postings("fire"), Some(&[0][..]));
        assert_eq!(index.postings("and"), Some(&[0][..]));
        assert_eq!(index.postings("of"), None);
    }

    #[test]
    fn search_orders_by_score_then_position() {
        let records = sample_records();
        let index = KeywordIndex::build(&records);

        let hits = index.search("fire emergency", records.len(), 3);
        assert_eq!(hits, vec![(1, 2), (0, 1)]);
    }

    #[test]
    fn search_excludes_non_matching_records() {
        let records = sample_records();
        let index = KeywordIndex::build(&records);

        assert!(index.search("tsunami", records.len(), 3).is_empty());
        assert!(index.search("", records.len(), 3).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_respects_k() {
        let records = sample_records();
        let index = KeywordIndex::build(&records);

        let hits = index.search("EMERGENCY Women", records.len(), 1);
        assert_eq!(hits, vec![(0, 1)]);
    }

    #[test]
    fn normalize_collapses_duplicate_postings() {
        let mut index: KeywordIndex =
            serde_json::from_str(r#"{"flood": [3, 1, 1, 2]}"#).unwrap();
        index.normalize();
        assert_eq!(index.postings("flood"), Some(&[1, 2, 3][..]));
        assert_eq!(index.max_position(), Some(3));
    }
}
