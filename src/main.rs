// src/main.rs

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use teamtrack::config::{Config, StorageBackend};
use teamtrack::middleware::Authentication;
use teamtrack::routes;
use teamtrack::store::{MemoryStore, MongoStore, Store};
use teamtrack::AppState;

fn fatal(message: String) -> io::Error {
    error!("{}", message);
    io::Error::new(io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Anything that panics is a bug we cannot reason about; stop and let the
    // supervisor restart us.
    std::panic::set_hook(Box::new(|info| {
        error!("Unrecoverable fault: {}", info);
        std::process::exit(1);
    }));

    let config = Config::from_env().map_err(|e| fatal(format!("Configuration error: {}", e)))?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Mongo => {
            let mongo = MongoStore::connect(&config.mongo_uri, &config.database_name)
                .await
                .map_err(|e| fatal(format!("MongoDB connection failed: {}", e)))?;
            mongo
                .ensure_indexes()
                .await
                .map_err(|e| fatal(format!("MongoDB index setup failed: {}", e)))?;
            info!("MongoDB connected, database {}", config.database_name);
            Arc::new(mongo)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = web::Data::new(AppState::new(store, config.clone()));
    let frontend_origin = config.frontend_origin.clone();

    info!("Server running at http://{}", config.bind_addr);
    info!("Allowed CORS Origin: {}", frontend_origin);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::CONTENT_TYPE,
                http::header::ACCEPT,
                http::header::AUTHORIZATION,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Authentication)
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
