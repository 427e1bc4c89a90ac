//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the service
//! layer. The core treats them as opaque collaborators; any blocking or
//! pooling is the implementation's business.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Entity;

/// Key-addressed persistence contract, content-agnostic across entity
/// kinds. An absent key on `read` is not an error; the caller decides
/// whether absence is fatal.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    async fn create(&self, entity: Entity) -> Result<()>;
    async fn read(&self, id: Uuid) -> Result<Option<Entity>>;
    async fn update(&self, entity: Entity) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Scoped transaction wrapping one [`Repository`].
///
/// Writes made through `repo()` must not be visible outside the scope
/// until `commit()`; `rollback()` discards anything staged since the last
/// commit and is a no-op afterwards. The service layer guarantees that
/// `rollback()` runs whenever a handler exits without committing.
#[async_trait]
pub trait UnitOfWork: Send {
    fn repo(&self) -> &dyn Repository;
    async fn commit(&mut self) -> Result<()>;
    async fn rollback(&mut self) -> Result<()>;
    /// Whether `commit()` has succeeded at least once in this scope.
    fn committed(&self) -> bool;
}

/// Outbound-message contract (e.g. an SMS gateway). Expected to fail
/// loudly rather than silently drop.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, message: &str) -> Result<()>;
}
