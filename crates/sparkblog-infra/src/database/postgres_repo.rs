//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use sparkblog_core::domain::{Post, PostInput, User};
use sparkblog_core::error::RepoError;
use sparkblog_core::ports::{BaseRepository, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn query_error(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn write_error(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let exists = UserEntity::find_by_id(user.id)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .is_some();

        let active: user::ActiveModel = user.into();
        let model = if exists {
            active.update(&self.db).await
        } else {
            active.insert(&self.db).await
        }
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = match email.split_once('@') {
            Some((local, domain)) if local.chars().count() > 1 => {
                let first: String = local.chars().take(1).collect();
                format!("{first}***@{domain}")
            }
            Some((_, domain)) => format!("***@{domain}"),
            None => "***".to_string(),
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

/// PostgreSQL post repository. Every statement is filtered on the owner.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> Result<post::Model, RepoError> {
        PostEntity::find_by_id(id)
            .filter(post::Column::UserId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(query_error)?
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, owner_id: Uuid, input: PostInput) -> Result<Post, RepoError> {
        let active: post::ActiveModel = Post::new(owner_id, input).into();
        let model = active.insert(&self.db).await.map_err(write_error)?;
        tracing::debug!(post_id = %model.id, owner_id = %owner_id, "Post inserted");
        Ok(model.into())
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, input: PostInput) -> Result<Post, RepoError> {
        let mut post: Post = self.find_owned(owner_id, id).await?.into();
        post.apply(input);

        let active: post::ActiveModel = post.into();
        let model = active.update(&self.db).await.map_err(write_error)?;
        Ok(model.into())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::UserId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(owner_id))
            .order_by_desc(post::Column::CreatedAt)
            // Equal timestamps come back in the same order on every fetch.
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
