use blackcnote::{ Config, Result };
use migration::MigratorTrait;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{ cors::CorsLayer, trace::TraceLayer };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "blackcnote=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| blackcnote::AppError::Config(e.to_string()))?;

    // Initialize database connection
    let db = sea_orm::Database::connect(&config.database_url).await?;

    tracing::info!("Database connected successfully");

    if config.run_migrations {
        migration::Migrator::up(&db, None).await?;
        tracing::info!("Migrations completed successfully");
    }

    let app_state = blackcnote::api::AppState::new(db);

    // Background maturity processing
    let checker = blackcnote::maturity_checker::MaturityChecker::new(
        Arc::clone(&app_state.investment_service),
        Duration::from_secs(config.maturity_check_interval_secs)
    );
    tokio::spawn(checker.start());

    // Build application router
    let app = blackcnote::api
        ::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = config.bind_address();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| blackcnote::AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| blackcnote::AppError::Internal(e.to_string()))?;

    Ok(())
}
