//! In-memory repositories - used when no database is configured and in tests.
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use sparkblog_core::domain::{Post, PostInput, User};
use sparkblog_core::error::RepoError;
use sparkblog_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Post store kept in insertion order.
#[derive(Default)]
pub struct InMemoryPostRepository {
    rows: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, owner_id: Uuid, input: PostInput) -> Result<Post, RepoError> {
        let post = Post::new(owner_id, input);
        self.rows.write().await.push(post.clone());
        tracing::debug!(post_id = %post.id, owner_id = %owner_id, "Post inserted");
        Ok(post)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, input: PostInput) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        let post = rows
            .iter_mut()
            .find(|p| p.id == id && p.owner_id == owner_id)
            .ok_or(RepoError::NotFound)?;
        post.apply(input);
        Ok(post.clone())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let position = rows
            .iter()
            .position(|p| p.id == id && p.owner_id == owner_id)
            .ok_or(RepoError::NotFound)?;
        rows.remove(position);
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.read().await;
        let mut posts: Vec<Post> = rows
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}

/// User store keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        let taken = users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
