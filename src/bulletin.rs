//! In-memory alert and announcement lists.

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::core::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletinKind {
    Alert,
    Announcement,
}

impl BulletinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulletinKind::Alert => "alert",
            BulletinKind::Announcement => "announcement",
        }
    }
}

#[derive(Debug, Default)]
pub struct BulletinBoard {
    alerts: RwLock<Vec<Value>>,
    announcements: RwLock<Vec<Value>>,
}

impl BulletinBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn list_for(&self, kind: BulletinKind) -> &RwLock<Vec<Value>> {
        match kind {
            BulletinKind::Alert => &self.alerts,
            BulletinKind::Announcement => &self.announcements,
        }
    }

    /// Stores `body` with `id` set to the new list length.
    pub async fn post(&self, kind: BulletinKind, body: Value) -> Result<Value, ApiError> {
        let Value::Object(fields) = body else {
            return Err(ApiError::BadRequest(format!(
                "{} body must be a JSON object",
                kind.as_str()
            )));
        };

        let mut list = self.list_for(kind).write().await;
        let id = list.len() as u64 + 1;

        let mut stored = Map::with_capacity(fields.len() + 1);
        stored.insert("id".to_string(), Value::from(id));
        for (key, value) in fields {
            if key != "id" {
                stored.insert(key, value);
            }
        }

        let stored = Value::Object(stored);
        list.push(stored.clone());
        tracing::info!("Posted {} #{}", kind.as_str(), id);
        Ok(stored)
    }

    pub async fn list(&self, kind: BulletinKind) -> Vec<Value> {
        self.list_for(kind).read().await.clone()
    }

    pub async fn count(&self, kind: BulletinKind) -> usize {
        self.list_for(kind).read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn ids_are_sequential_per_list() {
        let board = BulletinBoard::new();

        let first = board
            .post(BulletinKind::Alert, json!({ "title": "Cyclone warning" }))
            .await
            .unwrap();
        let second = board
            .post(BulletinKind::Alert, json!({ "title": "Flood watch", "id": 99 }))
            .await
            .unwrap();
        let notice = board
            .post(BulletinKind::Announcement, json!({ "text": "Shelter open" }))
            .await
            .unwrap();

        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert_eq!(notice["id"], 1);
        assert_eq!(board.count(BulletinKind::Alert).await, 2);

        let alerts = board.list(BulletinKind::Alert).await;
        assert_eq!(alerts[0]["title"], "Cyclone warning");
        assert_eq!(alerts[1]["title"], "Flood watch");
    }

    #[tokio::test]
    async fn non_object_body_is_rejected() {
        let board = BulletinBoard::new();
        let err = board
            .post(BulletinKind::Announcement, json!(["not", "an", "object"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(board.count(BulletinKind::Announcement).await, 0);
    }
}
