use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, Paged, UpdateUser, User, UserFilter};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All users, unpaged
    pub async fn get_users(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    pub async fn get_user_by_id(&self, id: i32) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Create a user, rejecting an email that is already taken.
    ///
    /// `input` is expected to have passed `ValidatedJson` already.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        if self.repository.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        // The unique index still catches a concurrent insert
        self.repository.create(input).await
    }

    /// Apply a partial update and return the stored user
    pub async fn update_user(&self, id: i32, input: UpdateUser) -> UserResult<User> {
        let existing = self.get_user_by_id(id).await?;

        if let Some(email) = input.email.as_deref() {
            if email != existing.email && self.repository.find_by_email(email).await?.is_some() {
                return Err(UserError::DuplicateEmail(email.to_string()));
            }
        }

        if self.repository.update(id, input).await? == 0 {
            return Err(UserError::NotFound(id));
        }

        self.get_user_by_id(id).await
    }

    pub async fn delete_user(&self, id: i32) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }

        tracing::debug!(user_id = id, "User removed");
        Ok(())
    }

    /// One page of users plus the total matching `filter`
    pub async fn get_user_with_page_and_count(
        &self,
        page: u64,
        limit: u64,
        filter: UserFilter,
    ) -> UserResult<Paged<User>> {
        self.repository.find_paged(page, limit, filter).await
    }
}
