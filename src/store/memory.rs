use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{book_not_found, BookStore, UserStore};
use crate::error::AppError;
use crate::models::{Book, BookPatch, NewBook, User};

#[derive(Default)]
struct BookTable {
    last_id: i32,
    rows: BTreeMap<i32, Book>,
}

impl BookTable {
    fn active(&self) -> impl Iterator<Item = &Book> {
        self.rows.values().filter(|book| !book.is_deleted())
    }

    fn active_mut(&mut self, id: i32) -> Result<&mut Book, AppError> {
        self.rows
            .get_mut(&id)
            .filter(|book| !book.is_deleted())
            .ok_or_else(|| book_not_found(id))
    }
}

/// Books held in process memory. Ids are never reused, deleted rows stay in the table.
#[derive(Default)]
pub struct MemoryBookStore {
    table: RwLock<BookTable>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a row with this id exists at all, tombstoned or not.
    pub async fn holds_row(&self, id: i32) -> bool {
        self.table.read().await.rows.contains_key(&id)
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, book: NewBook) -> Result<Book, AppError> {
        if book.price < 0 {
            return Err(AppError::DatabaseError("price must not be negative".into()));
        }

        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let created = Book {
            id: table.last_id,
            name: book.name,
            author: book.author,
            description: book.description,
            price: book.price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<Book, AppError> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .filter(|book| !book.is_deleted())
            .cloned()
            .ok_or_else(|| book_not_found(id))
    }

    async fn list(&self) -> Result<Vec<Book>, AppError> {
        Ok(self.table.read().await.active().cloned().collect())
    }

    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, AppError> {
        if patch.price.map_or(false, |price| price < 0) {
            return Err(AppError::DatabaseError("price must not be negative".into()));
        }

        let mut table = self.table.write().await;
        let book = table.active_mut(id)?;
        book.apply(patch, Utc::now());
        Ok(book.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let mut table = self.table.write().await;
        let book = table.active_mut(id)?;
        book.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn search_one(&self, name: &str) -> Result<Book, AppError> {
        let table = self.table.read().await;
        let found = table.active().find(|book| book.name == name).cloned();
        found.ok_or_else(|| AppError::NotFound(format!("No book named {:?}", name)))
    }

    async fn search_many(&self, name: &str) -> Result<Vec<Book>, AppError> {
        let table = self.table.read().await;
        let mut books: Vec<Book> = table.active().filter(|book| book.name == name).cloned().collect();
        // Rows come out in id order, so a stable sort keeps id as the tie-breaker.
        books.sort_by_key(|book| book.price);
        Ok(books)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
struct UserTable {
    last_id: i32,
    by_email: HashMap<String, User>,
}

/// Accounts held in process memory, unique by email across live and deleted rows.
#[derive(Default)]
pub struct MemoryUserStore {
    table: RwLock<UserTable>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut table = self.table.write().await;
        if table.by_email.contains_key(email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        table.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.last_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.by_email.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(email)
            .filter(|user| user.deleted_at.is_none())
            .cloned())
    }
}
