//! Catalog module - In-memory library of books and members

mod book;
pub mod demo;
mod library;
mod member;

pub use book::{Book, BookHandle};
pub use library::Library;
pub use member::{Member, MemberHandle};
