use migration::{Migrator, MigratorTrait};
use providers::{AdviceClient, OcrClient, RatesClient};
use server::Collaborators;
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "gruzzolo={level},server={level},engine={level},providers={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    tracing::info!("database ready, migrations applied");

    let engine = engine::Engine::builder().database(db.clone()).build().await?;

    let http = reqwest::Client::new();
    let collaborators = Collaborators {
        ocr: OcrClient::new(
            http.clone(),
            settings.providers.ocr_url,
            settings.providers.ocr_api_key,
        ),
        rates: RatesClient::new(http.clone(), settings.providers.rates_url),
        advice: AdviceClient::new(
            http,
            settings.providers.advice_url,
            settings.providers.advice_api_key,
        ),
    };

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(engine, db, collaborators, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
