use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::{anyhow, bail, Context};
use blog_service::config::{Config, StorageBackend};
use blog_service::handlers::json_config;
use blog_service::models::NewGroup;
use blog_service::openapi::ApiDoc;
use blog_service::repository::{BlogRepository, InMemoryRepository, PostgresRepository};
use blog_service::{configure_routes, MIGRATOR};
use db_pool::{create_pool, parse_env_or};
use jwt_security::JwtManager;
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use validator::Validate;

const USAGE: &str = "usage: blog-service [serve | healthcheck | migrate | create-user <username> | create-group <title> <slug> [description] | issue-token <username>]";

enum Command {
    Serve,
    Healthcheck,
    Migrate,
    CreateUser { username: String },
    CreateGroup { group: NewGroup },
    IssueToken { username: String },
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let command = match args {
            [] => Command::Serve,
            [cmd] if cmd == "serve" => Command::Serve,
            [cmd] if cmd == "healthcheck" => Command::Healthcheck,
            [cmd] if cmd == "migrate" => Command::Migrate,
            [cmd, username] if cmd == "create-user" => Command::CreateUser {
                username: username.clone(),
            },
            [cmd, title, slug, rest @ ..] if cmd == "create-group" && rest.len() <= 1 => {
                Command::CreateGroup {
                    group: NewGroup {
                        title: title.clone(),
                        slug: slug.clone(),
                        description: rest.first().cloned().unwrap_or_default(),
                    },
                }
            }
            [cmd, username] if cmd == "issue-token" => Command::IssueToken {
                username: username.clone(),
            },
            _ => bail!(USAGE),
        };
        Ok(command)
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Container healthcheck: exit non-zero unless `/api/v1/health` answers 2xx
async fn healthcheck() -> anyhow::Result<()> {
    let port: u16 = parse_env_or("BLOG_SERVICE_PORT", 8080).map_err(|e| anyhow!(e))?;
    let url = format!("http://127.0.0.1:{}/api/v1/health", port);

    let resp = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .with_context(|| format!("healthcheck HTTP error for {}", url))?;

    if !resp.status().is_success() {
        bail!("healthcheck HTTP status: {}", resp.status());
    }
    Ok(())
}

async fn connect_postgres(config: &Config) -> anyhow::Result<PgPool> {
    config.database.log_config();
    create_pool(config.database.clone())
        .await
        .context("Failed to connect to PostgreSQL")
}

/// Admin commands persist data, so they need the PostgreSQL backend
async fn admin_repository(config: &Config) -> anyhow::Result<PostgresRepository> {
    if config.storage != StorageBackend::Postgres {
        bail!("admin commands require STORAGE_BACKEND=postgres");
    }
    let pool = connect_postgres(config).await?;
    Ok(PostgresRepository::new(pool))
}

fn jwt_manager(config: &Config) -> anyhow::Result<Arc<JwtManager>> {
    let manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.access_token_ttl_secs,
        config.auth.allow_weak_secret,
    )?;
    Ok(Arc::new(manager))
}

async fn open_repository(
    config: &Config,
    jwt: &JwtManager,
) -> anyhow::Result<Arc<dyn BlogRepository>> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = connect_postgres(config).await?;
            db_pool::migrate(&pool, &MIGRATOR)
                .await
                .context("Failed to run database migrations")?;
            Ok(Arc::new(PostgresRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let repo = InMemoryRepository::new();
            for username in &config.seed_users {
                let user = repo.create_user(username).await?;
                let token = jwt.generate_access_token(user.id, &user.username)?;
                tracing::info!(user_id = user.id, username = %user.username, %token, "seeded user");
            }
            Ok(Arc::new(repo))
        }
    }
}

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;

        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let jwt = jwt_manager(&config)?;
    let repo = open_repository(&config, &jwt).await?;
    tracing::info!(storage = repo.backend_name(), "Storage ready");

    let repo_data = web::Data::new(repo);
    let openapi_doc = ApiDoc::openapi();
    let allowed_origins = config.cors.allowed_origins.clone();
    let bind_address = config.bind_address();

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let jwt = jwt.clone();

        App::new()
            .app_data(web::Data::new(openapi_doc.clone()))
            .app_data(repo_data.clone())
            .app_data(json_config())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.clone()),
            )
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, jwt))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .workers(config.app.workers)
    .disable_signals()
    .run();

    tracing::info!(address = %bind_address, "HTTP server is running");

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    shutdown_signal()
        .await
        .context("Failed to install shutdown signal handlers")?;
    tracing::info!("Shutdown signal received");
    server_handle.stop(true).await;

    server_task
        .await
        .context("HTTP server task failed")?
        .context("HTTP server error")?;

    tracing::info!("Blog-service shutting down");
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    if let Command::Healthcheck = command {
        return healthcheck().await;
    }

    // `.env` is optional
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Configuration loading failed: {}", e);
        anyhow!("Failed to load configuration: {}", e)
    })?;

    match command {
        Command::Serve => serve(config).await,
        Command::Healthcheck => Ok(()),
        Command::Migrate => {
            if config.storage != StorageBackend::Postgres {
                bail!("migrate requires STORAGE_BACKEND=postgres");
            }
            let pool = connect_postgres(&config).await?;
            db_pool::migrate(&pool, &MIGRATOR).await?;
            Ok(())
        }
        Command::CreateUser { username } => {
            let repo = admin_repository(&config).await?;
            let user = repo.create_user(&username).await?;
            println!("created user {} (id {})", user.username, user.id);
            Ok(())
        }
        Command::CreateGroup { group } => {
            group.validate()?;
            let repo = admin_repository(&config).await?;
            let group = repo.create_group(&group).await?;
            println!("created group {} (id {})", group.slug, group.id);
            Ok(())
        }
        Command::IssueToken { username } => {
            let repo = admin_repository(&config).await?;
            let user = repo
                .find_user_by_username(&username)
                .await?
                .ok_or_else(|| anyhow!("user {} does not exist", username))?;
            let token = jwt_manager(&config)?.generate_access_token(user.id, &user.username)?;
            println!("{}", token);
            Ok(())
        }
    }
}
