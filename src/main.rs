use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use bookshelf::auth::{CredentialService, TokenService};
use bookshelf::config::{Config, StoreBackend};
use bookshelf::routes;
use bookshelf::store::{
    create_tables, BookStore, MemoryBookStore, MemoryUserStore, PgBookStore, PgUserStore, UserStore,
};

fn to_io_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

async fn build_stores(config: &Config) -> std::io::Result<(Arc<dyn BookStore>, Arc<dyn UserStore>)> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(&config.database_url)
                .await
                .map_err(to_io_error)?;
            log::info!("connected to database");
            create_tables(&pool).await.map_err(to_io_error)?;

            let books: Arc<dyn BookStore> = Arc::new(PgBookStore::new(pool.clone()));
            let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));
            Ok((books, users))
        }
        StoreBackend::Memory => {
            log::warn!("using the in-memory store; data is lost on shutdown");
            let books: Arc<dyn BookStore> = Arc::new(MemoryBookStore::new());
            let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
            Ok((books, users))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|err| {
        log::error!("invalid configuration: {}", err);
        to_io_error(err)
    })?;

    let (books, users) = build_stores(&config).await?;
    let books = web::Data::from(books);
    let credentials = web::Data::new(CredentialService::new(users, config.bcrypt_cost));
    let tokens = web::Data::new(TokenService::new(config.jwt_secret.as_bytes()));

    log::info!("starting Bookshelf server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(books.clone())
            .app_data(credentials.clone())
            .app_data(tokens.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
