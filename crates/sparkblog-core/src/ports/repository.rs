use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostInput, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Owner-scoped post store.
///
/// Every call names the owner. Implementations must treat a post owned by
/// someone else exactly like a missing one (`RepoError::NotFound`).
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post. The store assigns `id`, `created_at` and `updated_at`.
    async fn insert(&self, owner_id: Uuid, input: PostInput) -> Result<Post, RepoError>;

    /// Overwrite title, content and topic of an existing post and refresh `updated_at`.
    async fn update(&self, owner_id: Uuid, id: Uuid, input: PostInput) -> Result<Post, RepoError>;

    /// Remove a post.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), RepoError>;

    /// All posts of the owner, newest `created_at` first.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError>;
}
