use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{BookPatch, NewBook, SearchQuery},
    store::BookStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Lists every active book.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Book` objects in id order.
/// - `401 Unauthorized`: missing or invalid `jwt` cookie.
#[get("")]
pub async fn get_books(
    books: web::Data<dyn BookStore>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    log::debug!("user {} lists books", user.0);
    let all = books.list().await?;
    Ok(HttpResponse::Ok().json(all))
}

/// Retrieves one active book.
///
/// ## Responses:
/// - `200 OK`: the `Book` as JSON.
/// - `400 Bad Request`: the id is not an integer.
/// - `401 Unauthorized`: missing or invalid `jwt` cookie.
/// - `404 Not Found`: no active book has this id.
#[get("/{id}")]
pub async fn get_book(
    books: web::Data<dyn BookStore>,
    book_id: web::Path<i32>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let id = book_id.into_inner();
    log::debug!("user {} reads book {}", user.0, id);
    let book = books.get(id).await?;
    Ok(HttpResponse::Ok().json(book))
}

/// Creates a book.
///
/// ## Request Body:
/// - `name`, `author`: required, non-empty.
/// - `description` (optional): defaults to an empty string.
/// - `price` (optional): non-negative integer, defaults to 0.
///
/// ## Responses:
/// - `200 OK`: `{"message": ..., "id": <new id>}`.
/// - `400 Bad Request`: malformed or invalid body, or the store refused the row.
/// - `401 Unauthorized`: missing or invalid `jwt` cookie.
#[post("")]
pub async fn create_book(
    books: web::Data<dyn BookStore>,
    book_data: web::Json<NewBook>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    book_data.validate()?;

    let book = books
        .create(book_data.into_inner())
        .await
        .map_err(AppError::into_bad_request)?;

    log::info!("user {} created book {}", user.0, book.id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Create Book Successful",
        "id": book.id
    })))
}

/// Updates the fields present in the body; absent fields keep their value.
///
/// ## Responses:
/// - `200 OK`: `{"message": ...}`.
/// - `400 Bad Request`: bad id, malformed or invalid body, or no active book with this id.
/// - `401 Unauthorized`: missing or invalid `jwt` cookie.
#[put("/{id}")]
pub async fn update_book(
    books: web::Data<dyn BookStore>,
    book_id: web::Path<i32>,
    patch: web::Json<BookPatch>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    patch.validate()?;
    let id = book_id.into_inner();

    books
        .update(id, patch.into_inner())
        .await
        .map_err(AppError::into_bad_request)?;

    log::info!("user {} updated book {}", user.0, id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Update Book Successful"
    })))
}

/// Soft-deletes a book. The row is kept and hidden from every read.
///
/// ## Responses:
/// - `200 OK`: `{"message": ...}`.
/// - `400 Bad Request`: bad id, or no active book with this id.
/// - `401 Unauthorized`: missing or invalid `jwt` cookie.
#[delete("/{id}")]
pub async fn delete_book(
    books: web::Data<dyn BookStore>,
    book_id: web::Path<i32>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let id = book_id.into_inner();

    books.delete(id).await.map_err(AppError::into_bad_request)?;

    log::info!("user {} deleted book {}", user.0, id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Delete Book Successful"
    })))
}

/// Every active book named exactly `name`, cheapest first.
#[get("/search")]
pub async fn search_books(
    books: web::Data<dyn BookStore>,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, AppError> {
    let found = books.search_many(&query.name).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// The first active book (by id) named exactly `name`, or `404 Not Found`.
#[get("/search/first")]
pub async fn search_first_book(
    books: web::Data<dyn BookStore>,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, AppError> {
    let book = books.search_one(&query.name).await?;
    Ok(HttpResponse::Ok().json(book))
}
