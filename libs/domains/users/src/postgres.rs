use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Schema, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{CreateUser, MAX_QUERY_VALUE, Paged, UpdateUser, User, UserFilter},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn filter_condition(filter: UserFilter) -> Condition {
    Condition::all()
        .add_option(filter.name.map(|n| entity::Column::Name.contains(n)))
        .add_option(filter.email.map(|e| entity::Column::Email.contains(e)))
        .add_option(filter.age.map(|a| entity::Column::Age.eq(a)))
        .add_option(filter.start_date.map(|d| entity::Column::BirthDate.gte(d)))
        .add_option(filter.end_date.map(|d| entity::Column::BirthDate.lte(d)))
}

/// `(limit, offset)` for a 1-based page, saturated to what Postgres accepts.
fn page_window(page: u64, limit: u64) -> (u64, u64) {
    let limit = limit.clamp(1, MAX_QUERY_VALUE);
    let offset = page
        .saturating_sub(1)
        .saturating_mul(limit)
        .min(MAX_QUERY_VALUE);
    (limit, offset)
}

/// Unique violations surface as `DuplicateEmail`, the only unique column.
fn write_error(err: DbErr, email: Option<&str>) -> UserError {
    match (err.sql_err(), email) {
        (Some(SqlErr::UniqueConstraintViolation(_)), Some(email)) => {
            UserError::DuplicateEmail(email.to_string())
        }
        _ => err.into(),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_paged(
        &self,
        page: u64,
        limit: u64,
        filter: UserFilter,
    ) -> UserResult<Paged<User>> {
        let query = entity::Entity::find()
            .filter(filter_condition(filter))
            .order_by_asc(entity::Column::Id);

        let total = query.clone().count(&self.db).await?;
        let (limit, offset) = page_window(page, limit);
        let models = query.limit(limit).offset(offset).all(&self.db).await?;

        Ok(Paged::new(
            models.into_iter().map(Into::into).collect(),
            total,
            page,
            limit,
        ))
    }

    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let email = input.email.clone();
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            age: input.age.map_or(NotSet, Set),
            email: Set(input.email),
            birth_date: input.birth_date.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, Some(&email)))?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: UpdateUser) -> UserResult<u64> {
        let email = input.email.clone();
        let changes = entity::ActiveModel {
            id: NotSet,
            name: input.name.map_or(NotSet, Set),
            age: input.age.map_or(NotSet, Set),
            email: input.email.map_or(NotSet, Set),
            birth_date: input.birth_date.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: Set(Utc::now().fixed_offset()),
        };

        let result = entity::Entity::update_many()
            .set(changes)
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| write_error(e, email.as_deref()))?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = id, "Updated user");
        }
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Create the users table from the entity definition when it is missing.
///
/// Used when the schema is synchronised at startup instead of migrated.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let statement = schema
        .create_table_from_entity(entity::Entity)
        .if_not_exists()
        .to_owned();

    db.execute_raw(backend.build(&statement)).await?;
    tracing::info!("Users table synchronised from entity");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};
    use std::collections::BTreeMap;

    fn model(id: i32, email: &str) -> entity::Model {
        let now = Utc::now().fixed_offset();
        entity::Model {
            id,
            name: "Ada".to_string(),
            age: 36,
            email: email.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "ada@example.com")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert!(repo.find_by_id(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "ada@example.com")]])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        let created = repo
            .create(CreateUser {
                name: "Ada".to_string(),
                age: None,
                email: "ada@example.com".to_string(),
                birth_date: None,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.age, 36);
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn test_update_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let input = UpdateUser {
            age: Some(40),
            ..Default::default()
        };
        assert_eq!(repo.update(1, input.clone()).await.unwrap(), 1);
        assert_eq!(repo.update(2, input).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_row_went() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        assert!(repo.delete(1).await.unwrap());
        assert!(!repo.delete(1).await.unwrap());

        let log = db.into_transaction_log();
        assert_eq!(
            log[0],
            Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "users" WHERE "users"."id" = $1"#,
                [1i32.into()],
            )
        );
    }

    #[tokio::test]
    async fn test_query_errors_become_internal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let err = repo.find_all().await.unwrap_err();
        assert!(matches!(err, UserError::Internal(_)));
    }

    #[tokio::test]
    async fn test_find_paged_counts_then_fetches_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(3)),
            )])]])
            .append_query_results([vec![model(3, "c@example.com")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let page = repo.find_paged(2, 2, UserFilter::default()).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, 3);
    }

    #[tokio::test]
    async fn test_find_paged_with_huge_limit_saturates_offset() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(1)),
            )])]])
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        let page = repo
            .find_paged(3, u64::MAX, UserFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.rows.is_empty());

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(format!("{:?}", log[1]).contains(&i64::MAX.to_string()));
    }

    #[test]
    fn test_page_window_saturates() {
        assert_eq!(page_window(1, 10), (10, 0));
        assert_eq!(page_window(3, 10), (10, 20));
        assert_eq!(page_window(0, 0), (1, 0));
        assert_eq!(page_window(3, u64::MAX), (MAX_QUERY_VALUE, MAX_QUERY_VALUE));
        assert_eq!(page_window(u64::MAX, 2), (2, MAX_QUERY_VALUE));
    }

    #[test]
    fn test_empty_filter_has_no_conditions() {
        assert!(filter_condition(UserFilter::default()).is_empty());
    }
}
