use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::migrate::MigrateDatabase;
use ulid::Ulid;

/// nutriplan - diet and meal plan management for nutritionists and patients
#[derive(Parser)]
#[command(name = "nutriplan")]
#[command(about = "Diet and meal plan management platform", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Account administration
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create a nutritionist (admin) account
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = nutriplan::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    nutriplan::observability::init_observability(
        "nutriplan",
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Admin {
            command: AdminCommands::Create {
                name,
                email,
                password,
            },
        } => admin_create_command(config, name, email, password).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: nutriplan::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting nutriplan server...");

    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let pool = nutriplan::create_pool(&config.database.url, config.database.max_connections).await?;

    let email = nutriplan::email::EmailService::new(&config.email)?;

    let app = nutriplan::routes::router(nutriplan::AppState {
        pool,
        config,
        email,
    });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: nutriplan::config::Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = nutriplan::create_pool(&config.database.url, 1).await?;
    nutriplan::run_migrations(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: nutriplan::config::Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await?;

    tracing::info!("Database reset completed");

    Ok(())
}

#[tracing::instrument(skip(config, password))]
async fn admin_create_command(
    config: nutriplan::config::Config,
    name: String,
    email: String,
    password: String,
) -> Result<()> {
    let pool = nutriplan::create_pool(&config.database.url, 1).await?;

    if nutriplan::queries::admin::get_admin_by_email(&pool, &email)
        .await?
        .is_some()
    {
        tracing::error!("An admin account with email {email} already exists");
        return Ok(());
    }

    let id = Ulid::new().to_string();
    let password_hash = nutriplan_user::hash_password(&password)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    nutriplan::queries::admin::insert_admin(&pool, &id, &name, &email, &password_hash).await?;

    tracing::info!("Admin account {email} created with id {id}");

    Ok(())
}
