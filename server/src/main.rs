use actix_web::{middleware::from_fn, web, App, HttpServer};

use workwizards::{
    auth_token::{AuthTokenService, TOKEN_TTL},
    config::{Credentials, ServerConfig, StoreBackend},
    db::{MemoryStore, MongoDbContext, Store},
    handlers,
    middleware::{create_cors, request_logger},
};

fn exit_with(message: String) -> ! {
    log::error!("{}", message);
    eprintln!("{}", message);
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting WorkWizards server...");

    let config = ServerConfig::load();
    let credentials = Credentials::from_env()
        .unwrap_or_else(|e| exit_with(format!("Invalid configuration: {}", e)));

    log::info!(
        "Environment: {:?}, allowed origins: {:?}",
        config.environment,
        config.cors.allowed_origins
    );

    let secret = credentials.secret_key.clone().into_bytes();
    let auth_tokens = AuthTokenService::new(secret, TOKEN_TTL)
        .unwrap_or_else(|e| exit_with(format!("Invalid SECRET_KEY: {}", e)));

    // Connect the document store
    let mut mongo_context = None;
    let store = match config.database.backend {
        StoreBackend::Mongodb => {
            let uri = config
                .database
                .connection_uri(&credentials)
                .unwrap_or_else(|e| exit_with(format!("Invalid database configuration: {}", e)));

            log::info!("Connecting to MongoDB database '{}'...", config.database.name);
            let context = MongoDbContext::connect(&uri, &config.database.name)
                .await
                .unwrap_or_else(|e| exit_with(format!("Failed to connect to MongoDB: {}", e)));

            let store = Store::new(context.clone());
            store
                .ping()
                .await
                .unwrap_or_else(|e| exit_with(format!("MongoDB ping failed: {}", e)));
            log::info!("Pinged your deployment. Connected to MongoDB");

            mongo_context = Some(context);
            store
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory document store; data is lost on exit");
            Store::new(MemoryStore::new())
        }
    };

    let environment = config.environment;
    let cors_config = config.cors.clone();

    log::info!(
        "Starting HTTP server at {}:{}...",
        config.http.host,
        config.http.port
    );

    // Start HTTP server
    let http_result = HttpServer::new(move || {
        App::new()
            // Shared state
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(auth_tokens.clone()))
            .app_data(web::Data::new(environment))
            // Middleware
            .wrap(from_fn(request_logger))
            .wrap(create_cors(&cors_config))
            .configure(handlers::configure)
    })
    .bind((config.http.host.as_str(), config.http.port))?
    .run()
    .await;

    if let Some(context) = mongo_context {
        log::info!("Closing MongoDB connections...");
        context.client().clone().shutdown().await;
        log::info!("MongoDB connections closed");
    }

    http_result
}
