// Collection operations shared by jobs and targets: list, replace-all, add,
// delete, update. Every operation runs load -> mutate -> save under the
// collection's lock, so concurrent writers to one file never lose updates.

pub mod handlers;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::models::{next_id, Record};
use crate::store::JsonFileStore;

pub struct Collection<R> {
    store: JsonFileStore<R>,
    lock: Mutex<()>,
}

impl<R: Record> Collection<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub async fn list(&self) -> Result<Vec<R>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.store.load().await?)
    }

    /// Overwrites the whole collection. Returns the number of records written.
    pub async fn replace_all(&self, records: Vec<R>) -> Result<usize, AppError> {
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(dup) = records.iter().map(Record::id).find(|id| !seen.insert(*id)) {
            return Err(AppError::Validation(format!(
                "Duplicate {} id {dup}",
                R::NAME.to_lowercase()
            )));
        }

        let _guard = self.lock.lock().await;
        self.store.save(&records).await?;
        info!("Replaced {} collection with {} records", R::NAME, records.len());
        Ok(records.len())
    }

    pub async fn add(&self, fields: R::Fields) -> Result<R, AppError> {
        let _guard = self.lock.lock().await;
        let mut records = self.store.load().await?;

        let now = Utc::now();
        let record = R::from_fields(next_id(&records, now), fields, now);
        records.push(record.clone());

        self.store.save(&records).await?;
        info!("Added {} {}", R::NAME, record.id());
        Ok(record)
    }

    /// Removes the record with `id`. Returns the removed id.
    pub async fn delete(&self, id: i64) -> Result<i64, AppError> {
        let _guard = self.lock.lock().await;
        let mut records = self.store.load().await?;

        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(not_found::<R>(id));
        }

        self.store.save(&records).await?;
        info!("Deleted {} {id}", R::NAME);
        Ok(id)
    }

    /// Overlays the fields present in `patch` onto the record with `id`.
    pub async fn update(&self, id: i64, patch: R::Fields) -> Result<R, AppError> {
        let _guard = self.lock.lock().await;
        let mut records = self.store.load().await?;

        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;
        record.apply_patch(patch);
        let updated = record.clone();

        self.store.save(&records).await?;
        info!("Updated {} {id}", R::NAME);
        Ok(updated)
    }
}

pub(crate) fn not_found<R: Record>(id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} {id} not found", R::NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobFields;
    use crate::models::target::TargetFields;
    use crate::models::{Job, Target};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn jobs(dir: &TempDir) -> Collection<Job> {
        Collection::new(dir.path().join(Job::FILE_NAME))
    }

    fn fields(company: &str, position: &str) -> JobFields {
        JobFields {
            company: Some(company.into()),
            position: Some(position.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_bootstraps_seed_record() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);

        let listed = collection.list().await.unwrap();
        assert_eq!(listed, vec![Job::seed(Utc::now())]);
        assert!(collection.path().exists());
    }

    #[tokio::test]
    async fn test_replace_all_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);
        let records = vec![
            Job::from_fields(10, fields("A", "SWE"), Utc::now()),
            Job::from_fields(11, fields("B", "SRE"), Utc::now()),
        ];

        assert_eq!(collection.replace_all(records.clone()).await.unwrap(), 2);
        let once = std::fs::read(collection.path()).unwrap();
        collection.replace_all(records.clone()).await.unwrap();
        let twice = std::fs::read(collection.path()).unwrap();

        assert_eq!(once, twice);
        assert_eq!(collection.list().await.unwrap(), records);
    }

    #[tokio::test]
    async fn test_replace_all_rejects_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);
        let records = vec![
            Job::from_fields(5, fields("A", "SWE"), Utc::now()),
            Job::from_fields(5, fields("B", "SRE"), Utc::now()),
        ];
        assert!(matches!(
            collection.replace_all(records).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_add_then_list_round_trip() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);
        collection.replace_all(Vec::new()).await.unwrap();

        let added = collection
            .add(JobFields {
                notes: Some("referral".into()),
                ..fields("Acme", "SWE")
            })
            .await
            .unwrap();

        assert_eq!(added.company, "Acme");
        assert_eq!(added.notes, "referral");
        assert_eq!(collection.list().await.unwrap(), vec![added]);
    }

    #[tokio::test]
    async fn test_sequential_adds_get_distinct_ids() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);

        let mut ids = HashSet::new();
        for i in 0..25 {
            let job = collection.add(fields(&format!("Co {i}"), "SWE")).await.unwrap();
            assert!(ids.insert(job.id), "duplicate id {}", job.id);
        }
        // 25 added + the seed record
        assert_eq!(collection.list().await.unwrap().len(), 26);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let collection = Arc::new(jobs(&dir));
        collection.replace_all(Vec::new()).await.unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let collection = Arc::clone(&collection);
                tokio::spawn(async move {
                    collection.add(fields(&format!("Co {i}"), "SWE")).await
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for task in tasks {
            ids.insert(task.await.unwrap().unwrap().id);
        }

        assert_eq!(ids.len(), 20);
        assert_eq!(collection.list().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);
        let first = collection.add(fields("A", "SWE")).await.unwrap();
        let before = collection.list().await.unwrap();

        assert_eq!(collection.delete(first.id).await.unwrap(), first.id);

        let after = collection.list().await.unwrap();
        assert_eq!(after.len(), before.len() - 1);
        assert!(after.iter().all(|j| j.id != first.id));
    }

    #[tokio::test]
    async fn test_delete_missing_id_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);
        let before = collection.list().await.unwrap();

        assert!(matches!(
            collection.delete(999).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(collection.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_merges_only_given_fields() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);
        let job = collection.add(fields("Acme", "SWE")).await.unwrap();

        let updated = collection
            .update(
                job.id,
                JobFields {
                    status: Some("interview".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            updated,
            Job {
                status: "interview".into(),
                ..job
            }
        );
        let stored = collection.list().await.unwrap();
        assert!(stored.contains(&updated));
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);
        let result = collection.update(42, JobFields::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_job_lifecycle_scenario() {
        let dir = TempDir::new().unwrap();
        let collection = jobs(&dir);
        collection.replace_all(Vec::new()).await.unwrap();

        let added = collection.add(fields("Acme", "SWE")).await.unwrap();
        assert!(added.id > 0);
        assert_eq!(added.status, "applied");
        assert_eq!(
            added.applied_date,
            Utc::now().date_naive().format("%Y-%m-%d").to_string()
        );
        assert_eq!(collection.list().await.unwrap(), vec![added.clone()]);

        collection
            .update(
                added.id,
                JobFields {
                    status: Some("interview".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let listed = collection.list().await.unwrap();
        assert_eq!(listed[0].status, "interview");
        assert_eq!(listed[0].company, "Acme");

        collection.delete(added.id).await.unwrap();
        assert!(collection.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_targets_share_the_same_operations() {
        let dir = TempDir::new().unwrap();
        let collection: Collection<Target> = Collection::new(dir.path().join(Target::FILE_NAME));

        let seeded = collection.list().await.unwrap();
        assert_eq!(seeded.len(), 1);

        let added = collection
            .add(TargetFields {
                company_name: Some("Globex".into()),
                priority: Some("high".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(added.id > seeded[0].id);
        assert_eq!(added.industry, "Technology");

        collection.delete(seeded[0].id).await.unwrap();
        assert_eq!(collection.list().await.unwrap(), vec![added]);
    }
}
