//! Library Catalog Module
//! Owns the book and member collections and applies checkout / return.
//!
//! Books and members are keyed by handles the library allocates. Lookups,
//! removal and duplicate-value entries stay unambiguous. Absent handles make
//! every mutation a silent no-op. The catalog has no failure modes.

use crate::catalog::{Book, BookHandle, Member, MemberHandle};
use indexmap::IndexMap;
use std::io::{self, Write};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Library {
    pub name: String,
    pub address: String,
    pub contact_number: String,
    books: IndexMap<BookHandle, Book>,
    members: IndexMap<MemberHandle, Member>,
    next_handle: u64,
}

impl Library {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        contact_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            contact_number: contact_number.into(),
            books: IndexMap::new(),
            members: IndexMap::new(),
            next_handle: 0,
        }
    }

    fn allocate(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    pub fn add_book(&mut self, book: Book) -> BookHandle {
        let handle = BookHandle(self.allocate());
        debug!(library = %self.name, title = %book.title, ?handle, "book added");
        self.books.insert(handle, book);
        handle
    }

    /// Remove a book from the shelf. Members who already hold it keep it.
    pub fn remove_book(&mut self, book: BookHandle) {
        match self.books.shift_remove(&book) {
            Some(removed) => debug!(library = %self.name, title = %removed.title, "book removed"),
            None => debug!(library = %self.name, handle = ?book, "remove of absent book ignored"),
        }
    }

    pub fn register_member(&mut self, member: Member) -> MemberHandle {
        let handle = MemberHandle(self.allocate());
        debug!(library = %self.name, member = %member.name, ?handle, "member registered");
        self.members.insert(handle, member);
        handle
    }

    pub fn unregister_member(&mut self, member: MemberHandle) {
        match self.members.shift_remove(&member) {
            Some(removed) => {
                debug!(library = %self.name, member = %removed.name, "member unregistered")
            }
            None => debug!(library = %self.name, handle = ?member, "unregister of absent member ignored"),
        }
    }

    /// Record that `member` holds `book`. The book does not need to be on this
    /// library's shelf and may already be held by anyone.
    pub fn checkout_book(&mut self, member: MemberHandle, book: BookHandle) {
        match self.members.get_mut(&member) {
            Some(m) => {
                m.checkout_book(book);
                debug!(member = %m.name, ?book, "book checked out");
            }
            None => debug!(handle = ?member, "checkout for unknown member ignored"),
        }
    }

    pub fn return_book(&mut self, member: MemberHandle, book: BookHandle) {
        match self.members.get_mut(&member) {
            Some(m) => {
                m.return_book(book);
                debug!(member = %m.name, ?book, "book returned");
            }
            None => debug!(handle = ?member, "return for unknown member ignored"),
        }
    }

    pub fn book(&self, handle: BookHandle) -> Option<&Book> {
        self.books.get(&handle)
    }

    pub fn member(&self, handle: MemberHandle) -> Option<&Member> {
        self.members.get(&handle)
    }

    /// Books in insertion order.
    pub fn books(&self) -> impl Iterator<Item = (BookHandle, &Book)> + '_ {
        self.books.iter().map(|(h, b)| (*h, b))
    }

    /// Members in registration order.
    pub fn members(&self) -> impl Iterator<Item = (MemberHandle, &Member)> + '_ {
        self.members.iter().map(|(h, m)| (*h, m))
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// One `"<title> - <author> (<year>)"` line per book.
    pub fn book_lines(&self) -> Vec<String> {
        self.books.values().map(|b| b.to_string()).collect()
    }

    /// One `"<name> (ID: <id>, Email: <email>)"` line per member.
    pub fn member_lines(&self) -> Vec<String> {
        self.members.values().map(|m| m.to_string()).collect()
    }

    pub fn write_books<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.book_lines() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    pub fn write_members<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.member_lines() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    pub fn print_books(&self) -> io::Result<()> {
        self.write_books(&mut io::stdout().lock())
    }

    pub fn print_members(&self) -> io::Result<()> {
        self.write_members(&mut io::stdout().lock())
    }
}
