use async_trait::async_trait;
use sqlx::PgPool;

use super::{book_not_found, BookStore, UserStore};
use crate::error::AppError;
use crate::models::{Book, BookPatch, NewBook, User};

const BOOK_COLUMNS: &str =
    "id, name, author, description, price, created_at, updated_at, deleted_at";
const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at, deleted_at";

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS books (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        author TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price BIGINT NOT NULL CHECK (price >= 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )",
    "CREATE INDEX IF NOT EXISTS idx_books_deleted_at ON books (deleted_at)",
];

/// Creates the `users` and `books` tables when they are missing.
pub async fn create_tables(pool: &PgPool) -> Result<(), AppError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    log::info!("database schema is in place");
    Ok(())
}

#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn create(&self, book: NewBook) -> Result<Book, AppError> {
        let created = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (name, author, description, price)
             VALUES ($1, $2, $3, $4)
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(book.name)
        .bind(book.author)
        .bind(book.description)
        .bind(book.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| book_not_found(id))
    }

    async fn list(&self) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE deleted_at IS NULL ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books
             SET name = COALESCE($1, name),
                 author = COALESCE($2, author),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 updated_at = NOW()
             WHERE id = $5 AND deleted_at IS NULL
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(patch.name)
        .bind(patch.author)
        .bind(patch.description)
        .bind(patch.price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| book_not_found(id))
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE books SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(book_not_found(id));
        }
        Ok(())
    }

    async fn search_one(&self, name: &str) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books
             WHERE name = $1 AND deleted_at IS NULL
             ORDER BY id
             LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No book named {:?}", name)))
    }

    async fn search_many(&self, name: &str) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books
             WHERE name = $1 AND deleted_at IS NULL
             ORDER BY price, id"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let inserted = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            Err(err) => match AppError::from(err) {
                AppError::Conflict(_) => Err(AppError::Conflict("Email already registered".into())),
                other => Err(other),
            },
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
