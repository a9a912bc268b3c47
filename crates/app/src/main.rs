use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "coda={level},telegram_bot={level},waitlist={level}",
            level = settings.app.level
        ))
        .init();

    let database = parse_database(&settings.database).await?;
    tracing::info!("database ready, migrations applied");

    let store = waitlist::Waitlist::new(database);

    let mut builder = telegram_bot::Bot::builder().token(&settings.telegram.token);
    if let Some(timeout) = settings.telegram.polling_timeout {
        builder = builder.polling_timeout(timeout);
    }
    builder.build().run(store).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
