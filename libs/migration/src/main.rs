//! Migration CLI for the users schema.
//!
//! Reads `DATABASE_URL`; e.g. `migration up`, `migration down -n 1`, `migration status`.

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
