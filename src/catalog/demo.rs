//! Catalog Walkthrough
//! Seeds a small library and prints a scripted session of listings and
//! checkout / return operations.

use crate::catalog::{Book, Library, Member};
use std::io::{self, Write};

pub const LIBRARY_NAME: &str = "My Awesome Library";
pub const LIBRARY_ADDRESS: &str = "123 Main St, City, State";
pub const LIBRARY_CONTACT_NUMBER: &str = "555-1234";

fn write_book_listing<W: Write>(library: &Library, out: &mut W) -> io::Result<()> {
    writeln!(out, "Books in {}:", library.name)?;
    library.write_books(out)
}

fn write_member_listing<W: Write>(library: &Library, out: &mut W) -> io::Result<()> {
    writeln!(out, "Members of {}:", library.name)?;
    library.write_members(out)
}

/// Run the walkthrough, writing every line to `out`. Returns the final library state.
pub fn run<W: Write>(out: &mut W) -> io::Result<Library> {
    let mut library = Library::new(LIBRARY_NAME, LIBRARY_ADDRESS, LIBRARY_CONTACT_NUMBER);

    let book1 = library.add_book(Book::new("The Lord of the Rings", "J.R.R. Tolkien", 1954));
    let book2 = library.add_book(Book::new("To Kill a Mockingbird", "Harper Lee", 1960));
    library.add_book(Book::new("1984", "George Orwell", 1949));

    let member1 = library.register_member(Member::new("John Doe", "1001", "john.doe@example.com"));
    let member2 =
        library.register_member(Member::new("Jane Smith", "1002", "jane.smith@example.com"));

    writeln!(out, "--- Library System ---")?;
    write_book_listing(&library, out)?;
    write_member_listing(&library, out)?;

    let name = |library: &Library, m| {
        library
            .member(m)
            .map(|m| m.name.clone())
            .unwrap_or_default()
    };
    let title = |library: &Library, b| {
        library
            .book(b)
            .map(|b| b.title.clone())
            .unwrap_or_default()
    };

    writeln!(out, "--- Library Operations ---")?;
    writeln!(
        out,
        "{} checking out {}",
        name(&library, member1),
        title(&library, book1)
    )?;
    library.checkout_book(member1, book1);
    writeln!(
        out,
        "{} checking out {}",
        name(&library, member2),
        title(&library, book2)
    )?;
    library.checkout_book(member2, book2);
    writeln!(
        out,
        "{} returning {}",
        name(&library, member1),
        title(&library, book1)
    )?;
    library.return_book(member1, book1);

    writeln!(out, "--- Updated Library System ---")?;
    write_book_listing(&library, out)?;

    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkthrough_output() {
        let mut out = Vec::new();
        let library = run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "\
--- Library System ---
Books in My Awesome Library:
The Lord of the Rings - J.R.R. Tolkien (1954)
To Kill a Mockingbird - Harper Lee (1960)
1984 - George Orwell (1949)
Members of My Awesome Library:
John Doe (ID: 1001, Email: john.doe@example.com)
Jane Smith (ID: 1002, Email: jane.smith@example.com)
--- Library Operations ---
John Doe checking out The Lord of the Rings
Jane Smith checking out To Kill a Mockingbird
John Doe returning The Lord of the Rings
--- Updated Library System ---
Books in My Awesome Library:
The Lord of the Rings - J.R.R. Tolkien (1954)
To Kill a Mockingbird - Harper Lee (1960)
1984 - George Orwell (1949)
";
        assert_eq!(text, expected);

        let held: Vec<usize> = library
            .members()
            .map(|(_, m)| m.checked_out_books().len())
            .collect();
        assert_eq!(held, vec![0, 1]);
    }
}
