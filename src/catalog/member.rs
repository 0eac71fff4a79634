//! Member Module

use crate::catalog::BookHandle;
use std::fmt;

/// Identity of a member within a [`Library`](super::Library).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberHandle(pub(crate) u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub member_id: String,
    pub email: String,
    checked_out: Vec<BookHandle>,
}

impl Member {
    pub fn new(name: impl Into<String>, member_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            member_id: member_id.into(),
            email: email.into(),
            checked_out: Vec::new(),
        }
    }

    /// Books held by this member, in checkout order. May contain duplicates.
    pub fn checked_out_books(&self) -> &[BookHandle] {
        &self.checked_out
    }

    /// Append `book` to the held list. Availability is not checked, so the
    /// same book may be held twice or by several members.
    pub fn checkout_book(&mut self, book: BookHandle) {
        self.checked_out.push(book);
    }

    /// Drop the first occurrence of `book`. Absent books are ignored.
    pub fn return_book(&mut self, book: BookHandle) {
        if let Some(index) = self.checked_out.iter().position(|b| *b == book) {
            self.checked_out.remove(index);
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {}, Email: {})", self.name, self.member_id, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_display() {
        let member = Member::new("John Doe", "1001", "john.doe@example.com");
        assert_eq!(member.to_string(), "John Doe (ID: 1001, Email: john.doe@example.com)");
    }

    #[test]
    fn test_checkout_return_round_trip() {
        let mut member = Member::new("Jane Smith", "1002", "jane.smith@example.com");
        let book = BookHandle(7);

        member.checkout_book(book);
        assert_eq!(member.checked_out_books(), &[book]);

        member.return_book(book);
        assert!(member.checked_out_books().is_empty());
    }

    #[test]
    fn test_return_removes_first_occurrence_only() {
        let mut member = Member::new("Jane Smith", "1002", "jane.smith@example.com");
        let (a, b) = (BookHandle(1), BookHandle(2));

        member.checkout_book(a);
        member.checkout_book(b);
        member.checkout_book(a);
        member.return_book(a);

        assert_eq!(member.checked_out_books(), &[b, a]);
    }

    #[test]
    fn test_return_absent_is_noop() {
        let mut member = Member::new("Jane Smith", "1002", "jane.smith@example.com");
        member.checkout_book(BookHandle(1));
        let before = member.clone();

        member.return_book(BookHandle(99));
        assert_eq!(member, before);
    }
}
