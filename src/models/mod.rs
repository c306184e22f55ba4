pub mod book;
pub mod user;

pub use book::{Book, BookPatch, NewBook, SearchQuery};
pub use user::User;
