#![doc = "The `bookshelf` library crate."]
#![doc = ""]
#![doc = "Domain models, storage backends, session authentication, routing and error handling"]
#![doc = "for the Bookshelf API. The binary (`main.rs`) reads the configuration, picks a"]
#![doc = "storage backend and serves the routes from `routes::config`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
pub use crate::models::{Book, BookPatch, NewBook, User};
