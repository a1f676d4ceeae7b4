pub use sea_orm_migration::prelude::*;

mod m20251209_000000_create_users;
mod m20251209_000001_widen_user_name;
mod m20251209_000002_widen_user_name_again;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251209_000000_create_users::Migration),
            Box::new(m20251209_000001_widen_user_name::Migration),
            Box::new(m20251209_000002_widen_user_name_again::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_by_name() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 3);
    }
}
