//! Persistence for books and user accounts.
//!
//! Handlers only see the `BookStore` and `UserStore` traits. `postgres` is the production
//! backend; `memory` keeps rows in process and is what the test suite runs against.
//! Both soft-delete: a deleted row keeps existing with its tombstone set and is invisible to
//! every read.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Book, BookPatch, NewBook, User};

pub use memory::{MemoryBookStore, MemoryUserStore};
pub use postgres::{create_tables, PgBookStore, PgUserStore};

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Inserts a new book and returns the stored row.
    async fn create(&self, book: NewBook) -> Result<Book, AppError>;

    /// Fetches an active book by id. Fails with `NotFound` for missing or deleted rows.
    async fn get(&self, id: i32) -> Result<Book, AppError>;

    /// All active books in id order.
    async fn list(&self) -> Result<Vec<Book>, AppError>;

    /// Merges the present fields of `patch` into an active book.
    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, AppError>;

    /// Sets the tombstone on an active book.
    async fn delete(&self, id: i32) -> Result<(), AppError>;

    /// First active book (by id) whose name matches exactly.
    async fn search_one(&self, name: &str) -> Result<Book, AppError>;

    /// Every active book whose name matches exactly, cheapest first.
    async fn search_many(&self, name: &str) -> Result<Vec<Book>, AppError>;

    /// Checks that the backing storage answers.
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts an account. Fails with `Conflict` when the email is already taken.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

pub(crate) fn book_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}
