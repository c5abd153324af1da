use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub async fn connect(database_url: &str, auto_migrate: bool) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let mut opts = ConnectOptions::new(database_url.to_string());
    opts.sqlx_logging(false);
    if database_url.contains(":memory:") {
        // Every pooled connection would otherwise get its own empty database.
        opts.max_connections(1);
    }

    let db = Database::connect(opts).await?;

    if auto_migrate {
        Migrator::up(&db, None).await?;
        tracing::info!("schema migrations applied");
    }

    Ok(db)
}
