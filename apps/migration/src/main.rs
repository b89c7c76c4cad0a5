//! Migration CLI tool.
//!
//! `DATABASE_URL` selects the target; run `migration up` to create the schema.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    tracing::info!("Running SparkBlog migrations");
    cli::run_cli(migration::Migrator).await;
}
