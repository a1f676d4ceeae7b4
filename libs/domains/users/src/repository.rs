use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, Paged, UpdateUser, User, UserFilter};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, ordered by id
    async fn find_all(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// One page of users matching `filter`, ordered by id. `page` is 1-based.
    async fn find_paged(&self, page: u64, limit: u64, filter: UserFilter)
    -> UserResult<Paged<User>>;

    /// Insert a user; store defaults fill `age` and `birth_date` when absent.
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Write the fields present in `input` and refresh `updated_at`.
    ///
    /// Returns the number of rows affected.
    async fn update(&self, id: i32, input: UpdateUser) -> UserResult<u64>;

    /// Returns whether a row was deleted
    async fn delete(&self, id: i32) -> UserResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<i32, User>,
    last_id: i32,
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Enforces the unique email constraint like the real table does.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_paged(
        &self,
        page: u64,
        limit: u64,
        filter: UserFilter,
    ) -> UserResult<Paged<User>> {
        let store = self.store.read().await;
        let matching: Vec<&User> = store.users.values().filter(|u| filter.matches(u)).collect();

        let offset = page.saturating_sub(1).saturating_mul(limit);
        let rows = matching
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|u| (*u).clone())
            .collect();

        Ok(Paged::new(rows, matching.len() as u64, page, limit))
    }

    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.users.values().any(|u| u.email == input.email) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        store.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: store.last_id,
            name: input.name,
            age: input.age.unwrap_or(0),
            email: input.email,
            birth_date: input.birth_date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
            updated_at: now,
        };
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn update(&self, id: i32, input: UpdateUser) -> UserResult<u64> {
        let mut store = self.store.write().await;

        if let Some(email) = &input.email {
            if store.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(UserError::DuplicateEmail(email.clone()));
            }
        }

        let Some(user) = store.users.get_mut(&id) else {
            return Ok(0);
        };

        if let Some(name) = input.name {
            user.name = name;
        }
        if let Some(age) = input.age {
            user.age = age;
        }
        if let Some(email) = input.email {
            user.email = email;
        }
        if let Some(birth_date) = input.birth_date {
            user.birth_date = birth_date;
        }
        user.updated_at = Utc::now();

        Ok(1)
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let mut store = self.store.write().await;
        Ok(store.users.remove(&id).is_some())
    }
}
