use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::embedding::EmbeddingStore;
use super::keyword::KeywordIndex;
use super::record::KnowledgeRecord;
use crate::core::config::RetrievalMode;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge base {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse knowledge base {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write knowledge base {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Inconsistent knowledge base: {0}")]
    Inconsistent(String),
}

/// On-disk layout of the keyword-indexed knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordFile {
    pub entries: Vec<KnowledgeRecord>,
    pub keywords: KeywordIndex,
}

/// On-disk layout of the embedding-paired knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingFile {
    pub entries: Vec<KnowledgeRecord>,
    pub texts: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub enum KnowledgeBackend {
    Keyword(KeywordIndex),
    Embedding(EmbeddingStore),
}

/// The read-only record sequence plus the one companion structure used to
/// search it. Both are built together and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    records: Vec<KnowledgeRecord>,
    backend: KnowledgeBackend,
}

impl KnowledgeBase {
    pub fn with_keyword_index(
        records: Vec<KnowledgeRecord>,
        mut index: KeywordIndex,
    ) -> Result<Self, KnowledgeError> {
        index.normalize();
        if let Some(max) = index.max_position() {
            if max >= records.len() {
                return Err(KnowledgeError::Inconsistent(format!(
                    "keyword index references entry {} but only {} entries exist",
                    max,
                    records.len()
                )));
            }
        }
        Ok(Self {
            records,
            backend: KnowledgeBackend::Keyword(index),
        })
    }

    /// Convenience for callers that only have records.
    pub fn keyword_from_records(records: Vec<KnowledgeRecord>) -> Self {
        let index = KeywordIndex::build(&records);
        Self {
            records,
            backend: KnowledgeBackend::Keyword(index),
        }
    }

    pub fn with_embeddings(
        records: Vec<KnowledgeRecord>,
        texts: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, KnowledgeError> {
        let store = EmbeddingStore::new(&texts, embeddings).map_err(KnowledgeError::Inconsistent)?;
        if store.len() != records.len() {
            return Err(KnowledgeError::Inconsistent(format!(
                "{} entries but {} embeddings",
                records.len(),
                store.len()
            )));
        }
        Ok(Self {
            records,
            backend: KnowledgeBackend::Embedding(store),
        })
    }

    pub fn load(path: &Path, mode: RetrievalMode) -> Result<Self, KnowledgeError> {
        let contents = fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source| KnowledgeError::Parse {
            path: path.to_path_buf(),
            source,
        };

        match mode {
            RetrievalMode::Keyword => {
                let file: KeywordFile = serde_json::from_str(&contents).map_err(parse_error)?;
                Self::with_keyword_index(file.entries, file.keywords)
            }
            RetrievalMode::Embedding => {
                let file: EmbeddingFile = serde_json::from_str(&contents).map_err(parse_error)?;
                Self::with_embeddings(file.entries, file.texts, file.embeddings)
            }
        }
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn backend(&self) -> &KnowledgeBackend {
        &self.backend
    }

    pub fn mode(&self) -> RetrievalMode {
        match self.backend {
            KnowledgeBackend::Keyword(_) => RetrievalMode::Keyword,
            KnowledgeBackend::Embedding(_) => RetrievalMode::Embedding,
        }
    }
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), KnowledgeError> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let body = serde_json::to_string_pretty(value).map_err(|source| KnowledgeError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, body).map_err(|source| KnowledgeError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn police() -> KnowledgeRecord {
        KnowledgeRecord::EmergencyContact {
            service: "Police".to_string(),
            number: "100".to_string(),
            description: "Emergency police services".to_string(),
        }
    }

    #[test]
    fn loads_keyword_file_written_by_indexer_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        fs::write(
            &path,
            json!({
                "data": {},
                "entries": [
                    { "type": "emergency_contact", "service": "Police", "number": "100", "description": "Emergency police services" }
                ],
                "keywords": { "police": [0, 0], "emergency": [0] }
            })
            .to_string(),
        )
        .unwrap();

        let kb = KnowledgeBase::load(&path, RetrievalMode::Keyword).unwrap();

        assert_eq!(kb.len(), 1);
        assert_eq!(kb.mode(), RetrievalMode::Keyword);
        match kb.backend() {
            KnowledgeBackend::Keyword(index) => assert_eq!(index.postings("police"), Some(&[0][..])),
            KnowledgeBackend::Embedding(_) => panic!("expected keyword backend"),
        }
    }

    #[test]
    fn rejects_index_pointing_past_the_records() {
        let index: KeywordIndex = serde_json::from_value(json!({ "police": [0, 4] })).unwrap();
        let err = KnowledgeBase::with_keyword_index(vec![police()], index).unwrap_err();
        assert!(matches!(err, KnowledgeError::Inconsistent(_)));
    }

    #[test]
    fn rejects_embedding_count_mismatch() {
        let err = KnowledgeBase::with_embeddings(
            vec![police(), police()],
            vec!["a".into()],
            vec![vec![1.0, 0.0]],
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::Inconsistent(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeBase::load(&dir.path().join("absent.json"), RetrievalMode::Keyword)
            .unwrap_err();
        assert!(matches!(err, KnowledgeError::Read { .. }));
    }

    #[test]
    fn embedding_file_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.json");
        let file = EmbeddingFile {
            entries: vec![police()],
            texts: vec![police().embedding_text()],
            embeddings: vec![vec![0.1, 0.2, 0.3]],
        };
        write_json_file(&path, &file).unwrap();

        let kb = KnowledgeBase::load(&path, RetrievalMode::Embedding).unwrap();
        match kb.backend() {
            KnowledgeBackend::Embedding(store) => assert_eq!(store.dimension(), 3),
            KnowledgeBackend::Keyword(_) => panic!("expected embedding backend"),
        }
    }
}
