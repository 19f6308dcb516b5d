//! Teacher lookup by login name, used by the credential exchange.

use async_trait::async_trait;
use rollbook_core::{RecordStore, StoreError};
use rollbook_models::Teacher;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_teacher_by_username(&self, username: &str)
    -> Result<Option<Teacher>, StoreError>;
}

#[async_trait]
impl CredentialStore for crate::PgStore {
    async fn find_teacher_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Teacher>, StoreError> {
        sqlx::query_as::<_, Teacher>(
            "SELECT id, username, password, name, email, subject FROM teachers WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| crate::postgres::map_sqlx_error("Teacher", "teachers", e))
    }
}

#[async_trait]
impl CredentialStore for crate::MemoryStore<Teacher> {
    async fn find_teacher_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Teacher>, StoreError> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .find(|t| t.username == username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use rollbook_core::Resource;
    use rollbook_models::TeacherPayload;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_memory_lookup_by_username() {
        let store = MemoryStore::<Teacher>::new();
        let teacher = Teacher::from_payload(
            Uuid::new_v4(),
            TeacherPayload {
                username: Some("jdoe".to_string()),
                password: Some("password123".to_string()),
                name: Some("Jane Doe".to_string()),
                ..TeacherPayload::default()
            },
        )
        .unwrap();
        store.save(teacher.clone()).await.unwrap();

        let found = store.find_teacher_by_username("jdoe").await.unwrap();
        assert_eq!(found.map(|t| t.id), Some(teacher.id));
        assert!(store.find_teacher_by_username("nobody").await.unwrap().is_none());
    }
}
