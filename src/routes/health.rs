use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::store::BookStore;

/// Health check endpoint
///
/// Reports whether the book store answers. Not behind the session check.
#[get("/health")]
pub async fn health(books: web::Data<dyn BookStore>) -> impl Responder {
    match books.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "timestamp": Utc::now()
        })),
        Err(err) => {
            log::error!("health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}
