//! # adhub-store-memory
//!
//! In-memory implementation of the `Repository` and `UnitOfWork` ports.
//! Writes are staged per unit-of-work and only reach the shared table on
//! `commit`; `rollback` drops whatever is still staged, so a failed
//! command leaves no partial write behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use adhub_core::{AppError, Entity, Repository, Result, UnitOfWork};
use async_trait::async_trait;
use uuid::Uuid;

/// Shared entity table, cloneable across units of work.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<Uuid, Entity>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Entity>>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal("memory store mutex poisoned".into()))
    }

    /// Inserts directly, bypassing any unit-of-work. Meant for seeding.
    pub fn seed(&self, entity: Entity) -> Result<()> {
        self.lock()?.insert(entity.id(), entity);
        Ok(())
    }

    /// Committed view of an entity, staged writes excluded.
    pub fn get(&self, id: Uuid) -> Result<Option<Entity>> {
        Ok(self.lock()?.get(&id).cloned())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|table| table.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum StagedOp {
    Put(Entity),
    Delete(Uuid),
}

/// [`Repository`] backed by a [`MemoryStore`], with per-transaction
/// staging. Reads see this transaction's own staged writes first.
pub struct MemoryRepository {
    store: MemoryStore,
    staged: Mutex<Vec<StagedOp>>,
}

impl MemoryRepository {
    fn new(store: MemoryStore) -> Self {
        Self {
            store,
            staged: Mutex::new(Vec::new()),
        }
    }

    fn staged(&self) -> Result<MutexGuard<'_, Vec<StagedOp>>> {
        self.staged
            .lock()
            .map_err(|_| AppError::Internal("staging mutex poisoned".into()))
    }

    fn stage(&self, op: StagedOp) -> Result<()> {
        self.staged()?.push(op);
        Ok(())
    }

    fn apply_staged(&self) -> Result<()> {
        let mut ops = self.staged()?;
        let mut table = self.store.lock()?;
        for op in ops.drain(..) {
            match op {
                StagedOp::Put(entity) => {
                    table.insert(entity.id(), entity);
                }
                StagedOp::Delete(id) => {
                    table.remove(&id);
                }
            }
        }
        Ok(())
    }

    fn discard_staged(&self) -> Result<()> {
        self.staged()?.clear();
        Ok(())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create(&self, entity: Entity) -> Result<()> {
        self.stage(StagedOp::Put(entity))
    }

    async fn read(&self, id: Uuid) -> Result<Option<Entity>> {
        // Newest staged write wins over the shared table.
        let staged = self.staged()?;
        for op in staged.iter().rev() {
            match op {
                StagedOp::Put(entity) if entity.id() == id => return Ok(Some(entity.clone())),
                StagedOp::Delete(deleted) if *deleted == id => return Ok(None),
                _ => {}
            }
        }
        drop(staged);
        self.store.get(id)
    }

    async fn update(&self, entity: Entity) -> Result<()> {
        self.stage(StagedOp::Put(entity))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.stage(StagedOp::Delete(id))
    }
}

/// Scoped transaction over a [`MemoryStore`].
pub struct MemoryUnitOfWork {
    repo: MemoryRepository,
    committed: bool,
}

impl MemoryUnitOfWork {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            repo: MemoryRepository::new(store),
            committed: false,
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.repo.store
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn repo(&self) -> &dyn Repository {
        &self.repo
    }

    async fn commit(&mut self) -> Result<()> {
        self.repo.apply_staged()?;
        self.committed = true;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.repo.discard_staged()
    }

    fn committed(&self) -> bool {
        self.committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adhub_core::Comment;

    fn some_comment() -> Entity {
        Entity::Comment(Comment::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "staged",
        ))
    }

    #[tokio::test]
    async fn staged_writes_are_invisible_until_commit() {
        let store = MemoryStore::new();
        let mut uow = MemoryUnitOfWork::new(store.clone());

        let entity = some_comment();
        let id = entity.id();
        uow.repo().create(entity).await.unwrap();

        assert!(store.get(id).unwrap().is_none());
        // ...but this transaction already sees its own write.
        assert!(uow.repo().read(id).await.unwrap().is_some());

        uow.commit().await.unwrap();
        assert!(uow.committed());
        assert!(store.get(id).unwrap().is_some());
    }

    #[tokio::test]
    async fn rollback_discards_everything_staged() {
        let store = MemoryStore::new();
        let mut uow = MemoryUnitOfWork::new(store.clone());

        uow.repo().create(some_comment()).await.unwrap();
        uow.rollback().await.unwrap();
        uow.commit().await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rollback_after_commit_is_a_no_op() {
        let store = MemoryStore::new();
        let mut uow = MemoryUnitOfWork::new(store.clone());

        let entity = some_comment();
        let id = entity.id();
        uow.repo().create(entity).await.unwrap();
        uow.commit().await.unwrap();
        uow.rollback().await.unwrap();

        assert!(store.get(id).unwrap().is_some());
    }

    #[tokio::test]
    async fn staged_delete_shadows_the_shared_table() {
        let store = MemoryStore::new();
        let entity = some_comment();
        let id = entity.id();
        store.seed(entity).unwrap();

        let mut uow = MemoryUnitOfWork::new(store.clone());
        uow.repo().delete(id).await.unwrap();
        assert!(uow.repo().read(id).await.unwrap().is_none());
        assert!(store.get(id).unwrap().is_some());

        uow.commit().await.unwrap();
        assert!(store.get(id).unwrap().is_none());
    }
}
