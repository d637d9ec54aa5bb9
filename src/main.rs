use actix_web::{middleware::Logger, App, HttpServer};
use genframe::{
    logger::{self, LoggerConfig},
    server::{self, UploadLimits},
    BlobStorageManager, Config, Pipeline, TokenProvider, VertexImageClient,
};
use std::{io, sync::Arc};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    let tokens = TokenProvider::from_config(config.access_token.clone(), config.auth_timeout_secs)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    log::info!("🔄 Creating Vertex AI client...");
    let generator = VertexImageClient::new(config.vertex.clone(), tokens.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    log::info!("✅ Model endpoint: {}", generator.endpoint());

    let storage = BlobStorageManager::new(&config, tokens)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let pipeline = Pipeline::new(Arc::new(generator), storage.storage());
    let limits = UploadLimits {
        max_upload_bytes: config.max_upload_bytes,
    };

    let (host, port) = config.bind_addr();
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(server::cors())
            .wrap(Logger::new("%r %s %Dms"))
            .configure(server::configure(pipeline.clone(), limits))
    })
    .bind((host, port))?
    .run()
    .await
}
