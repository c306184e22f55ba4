pub mod auth;
pub mod books;
pub mod health;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route plus the extractor settings that turn malformed JSON bodies,
/// path ids and query strings into `400 Bad Request`.
///
/// Expects `web::Data<dyn BookStore>`, `web::Data<CredentialService>` and
/// `web::Data<TokenService>` on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    }))
    .service(health::health)
    .service(auth::register)
    .service(auth::login)
    .service(
        web::scope("/books")
            .wrap(AuthMiddleware)
            .service(books::get_books)
            .service(books::create_book)
            // The search routes go before `/{id}` so "search" is never parsed as an id.
            .service(books::search_books)
            .service(books::search_first_book)
            .service(books::get_book)
            .service(books::update_book)
            .service(books::delete_book),
    );
}
