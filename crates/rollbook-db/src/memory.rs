//! In-process record store for development and tests.
//!
//! Stores of different kinds are tied together with [`link`], which gives
//! them the same reference rules as the PostgreSQL schema: a save pointing
//! at a missing record is rejected, and deleting a record releases or
//! removes the records that pointed at it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock as SyncRwLock, Weak};

use async_trait::async_trait;
use rollbook_core::{RecordStore, Resource, StoreError};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{missing_reference, unique_conflict};

/// Key lookup on the referenced side of a link.
#[async_trait]
pub trait KeyIndex: Send + Sync {
    async fn contains_key(&self, id: Uuid) -> bool;
}

/// The referencing side of a link, told when a referenced record is gone.
#[async_trait]
pub trait ReferenceHolder: Send + Sync {
    async fn referenced_deleted(&self, column: &'static str, key: Uuid);
}

struct ParentLink {
    column: &'static str,
    parent: Arc<dyn KeyIndex>,
}

#[derive(Clone)]
struct ChildLink {
    column: &'static str,
    child: Weak<dyn ReferenceHolder>,
}

/// Records kept in insertion order. Unique fields, references and the write
/// are checked and applied under one write lock.
pub struct MemoryStore<E> {
    records: RwLock<Vec<E>>,
    calls: AtomicUsize,
    parents: SyncRwLock<Vec<ParentLink>>,
    children: SyncRwLock<Vec<ChildLink>>,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            calls: AtomicUsize::new(0),
            parents: SyncRwLock::new(Vec::new()),
            children: SyncRwLock::new(Vec::new()),
        }
    }
}

impl<E> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn parent_for(&self, column: &str) -> Option<Arc<dyn KeyIndex>> {
        self.parents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|link| link.column == column)
            .map(|link| Arc::clone(&link.parent))
    }

    fn child_links(&self) -> Vec<ChildLink> {
        self.children
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Tells every linked store that the records with these keys are gone.
    /// Must be called without holding `records`.
    async fn release_dependents(&self, removed: &[Uuid]) {
        for link in self.child_links() {
            let Some(child) = link.child.upgrade() else {
                continue;
            };
            for key in removed {
                child.referenced_deleted(link.column, *key).await;
            }
        }
    }
}

/// Declares that `column` on records of `child` holds a key of `parent`.
///
/// Saves into `child` then fail with a conflict when the key is missing, and
/// deleting from `parent` calls [`Resource::release_reference`] on the
/// records that pointed at the deleted key, removing those that refuse.
pub fn link<P: Resource, C: Resource>(
    parent: &Arc<MemoryStore<P>>,
    column: &'static str,
    child: &Arc<MemoryStore<C>>,
) {
    child
        .parents
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(ParentLink {
            column,
            parent: parent.clone(),
        });

    let holder: Arc<dyn ReferenceHolder> = child.clone();
    parent
        .children
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(ChildLink {
            column,
            child: Arc::downgrade(&holder),
        });
}

#[async_trait]
impl<E: Resource> KeyIndex for MemoryStore<E> {
    async fn contains_key(&self, id: Uuid) -> bool {
        self.records.read().await.iter().any(|r| r.id() == id)
    }
}

#[async_trait]
impl<E: Resource> ReferenceHolder for MemoryStore<E> {
    async fn referenced_deleted(&self, column: &'static str, key: Uuid) {
        let mut removed = Vec::new();
        {
            let mut records = self.records.write().await;
            records.retain_mut(|r| {
                if !r.references().contains(&(column, key)) {
                    return true;
                }
                let keep = r.release_reference(column);
                if !keep {
                    removed.push(r.id());
                }
                keep
            });
        }
        self.release_dependents(&removed).await;
    }
}

#[async_trait]
impl<E: Resource> RecordStore<E> for MemoryStore<E> {
    async fn find_all(&self) -> Result<Vec<E>, StoreError> {
        self.touch();
        Ok(self.records.read().await.clone())
    }

    async fn find_one(&self, id: Uuid) -> Result<E, StoreError> {
        self.touch();
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: E::KIND, key: id })
    }

    async fn save(&self, record: E) -> Result<E, StoreError> {
        self.touch();
        let mut records = self.records.write().await;

        let id = record.id();
        for (field, value) in record.unique_fields() {
            let taken = records.iter().filter(|r| r.id() != id).any(|r| {
                r.unique_fields()
                    .iter()
                    .any(|(other, v)| *other == field && *v == value)
            });
            if taken {
                return Err(unique_conflict(E::KIND, field));
            }
        }

        for (column, key) in record.references() {
            if let Some(parent) = self.parent_for(column) {
                if !parent.contains_key(key).await {
                    return Err(missing_reference(E::KIND));
                }
            }
        }

        match records.iter_mut().find(|r| r.id() == id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.touch();
        {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|r| r.id() != id);

            if records.len() == before {
                return Err(StoreError::NotFound { kind: E::KIND, key: id });
            }
        }

        self.release_dependents(&[id]).await;
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.touch();
        Ok(self.records.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rollbook_models::{
        Attendance, AttendancePayload, AttendanceStatus, Student, StudentPayload, Teacher,
        TeacherPayload,
    };

    fn student(username: &str, enrollment_no: &str) -> Student {
        Student::from_payload(
            Uuid::new_v4(),
            StudentPayload {
                username: Some(username.to_string()),
                password: Some("studentpass123".to_string()),
                name: Some("Sam".to_string()),
                enrollment_no: Some(enrollment_no.to_string()),
                ..StudentPayload::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let store = MemoryStore::new();
        let saved = store.save(student("s1", "E-1")).await.unwrap();

        let found = store.find_one(saved.id).await.unwrap();
        assert_eq!(found.username, "s1");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unique_violation_persists_nothing() {
        let store = MemoryStore::new();
        store.save(student("s1", "E-1")).await.unwrap();

        let err = store.save(student("s2", "E-1")).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Student with this enrollment_no already exists");
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resave_same_record_is_update() {
        let store = MemoryStore::new();
        let mut saved = store.save(student("s1", "E-1")).await.unwrap();
        saved.name = "Renamed".to_string();

        store.save(saved.clone()).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::<Student>::new();
        let err = store.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "Student", .. }));
    }

    #[tokio::test]
    async fn test_calls_are_counted() {
        let store = MemoryStore::<Student>::new();
        assert_eq!(store.calls(), 0);
        store.find_all().await.unwrap();
        store.find_one(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(store.calls(), 2);
    }

    fn teacher(username: &str) -> Teacher {
        Teacher::from_payload(
            Uuid::new_v4(),
            TeacherPayload {
                username: Some(username.to_string()),
                password: Some("password123".to_string()),
                name: Some("Tess".to_string()),
                ..TeacherPayload::default()
            },
        )
        .unwrap()
    }

    fn entry_for(student_id: Uuid) -> Attendance {
        Attendance::from_payload(
            Uuid::new_v4(),
            AttendancePayload {
                student_id: Some(student_id),
                date: NaiveDate::from_ymd_opt(2024, 9, 2),
                status: Some(AttendanceStatus::Present),
            },
        )
        .unwrap()
    }

    fn linked() -> (
        Arc<MemoryStore<Teacher>>,
        Arc<MemoryStore<Student>>,
        Arc<MemoryStore<Attendance>>,
    ) {
        let teachers = Arc::new(MemoryStore::new());
        let students = Arc::new(MemoryStore::new());
        let attendance = Arc::new(MemoryStore::new());
        link(&teachers, "teacher_id", &students);
        link(&students, "student_id", &attendance);
        (teachers, students, attendance)
    }

    #[tokio::test]
    async fn test_unknown_teacher_reference_is_conflict() {
        let (_, students, _) = linked();
        let mut orphan = student("s1", "E-1");
        orphan.teacher_id = Some(Uuid::new_v4());

        let err = students.save(orphan).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Student references a record that does not exist");
        assert!(students.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_known_teacher_reference_is_saved() {
        let (teachers, students, _) = linked();
        let owner = teachers.save(teacher("teacher1")).await.unwrap();
        let mut pupil = student("s1", "E-1");
        pupil.teacher_id = Some(owner.id);

        let saved = students.save(pupil).await.unwrap();
        assert_eq!(saved.teacher_id, Some(owner.id));
    }

    #[tokio::test]
    async fn test_unknown_student_reference_is_conflict() {
        let (_, _, attendance) = linked();
        let err = attendance
            .save(entry_for(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_teacher_delete_unassigns_students() {
        let (teachers, students, _) = linked();
        let owner = teachers.save(teacher("teacher1")).await.unwrap();
        let mut pupil = student("s1", "E-1");
        pupil.teacher_id = Some(owner.id);
        let pupil = students.save(pupil).await.unwrap();

        teachers.delete(owner.id).await.unwrap();

        let remaining = students.find_one(pupil.id).await.unwrap();
        assert_eq!(remaining.teacher_id, None);
    }

    #[tokio::test]
    async fn test_student_delete_removes_attendance() {
        let (_, students, attendance) = linked();
        let pupil = students.save(student("s1", "E-1")).await.unwrap();
        attendance.save(entry_for(pupil.id)).await.unwrap();

        students.delete(pupil.id).await.unwrap();

        assert!(attendance.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlinked_store_accepts_any_reference() {
        let students = MemoryStore::<Student>::new();
        let mut pupil = student("s1", "E-1");
        pupil.teacher_id = Some(Uuid::new_v4());
        assert!(students.save(pupil).await.is_ok());
    }
}
