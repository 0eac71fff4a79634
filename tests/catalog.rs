use popchart::catalog::{demo, Book, Library, Member};

fn library() -> Library {
    Library::new(
        demo::LIBRARY_NAME,
        demo::LIBRARY_ADDRESS,
        demo::LIBRARY_CONTACT_NUMBER,
    )
}

#[test]
fn test_checkout_then_return_restores_member() {
    let mut lib = library();
    let b1 = lib.add_book(Book::new("1984", "George Orwell", 1949));
    let m1 = lib.register_member(Member::new("John Doe", "1001", "john.doe@example.com"));
    let before = lib.member(m1).unwrap().clone();

    lib.checkout_book(m1, b1);
    assert_eq!(lib.member(m1).unwrap().checked_out_books(), &[b1]);

    lib.return_book(m1, b1);
    assert_eq!(lib.member(m1).unwrap(), &before);
}

#[test]
fn test_absent_entities_leave_state_unchanged() {
    let mut lib = library();
    let kept = lib.add_book(Book::new("Dune", "Frank Herbert", 1965));
    let gone = lib.add_book(Book::new("1984", "George Orwell", 1949));
    let member = lib.register_member(Member::new("Jane Smith", "1002", "jane.smith@example.com"));
    let former = lib.register_member(Member::new("John Doe", "1001", "john.doe@example.com"));
    lib.checkout_book(member, kept);
    lib.remove_book(gone);
    lib.unregister_member(former);

    let books = lib.book_lines();
    let members = lib.member_lines();
    let holding = lib.member(member).unwrap().clone();

    lib.remove_book(gone);
    lib.unregister_member(former);
    lib.return_book(member, gone);
    lib.return_book(former, kept);

    assert_eq!(lib.book_lines(), books);
    assert_eq!(lib.member_lines(), members);
    assert_eq!(lib.member(member).unwrap(), &holding);
}

#[test]
fn test_book_listing_format_and_order() {
    let mut lib = library();
    lib.add_book(Book::new("The Lord of the Rings", "J.R.R. Tolkien", 1954));
    lib.add_book(Book::new("To Kill a Mockingbird", "Harper Lee", 1960));
    lib.add_book(Book::new("1984", "George Orwell", 1949));

    let mut out = Vec::new();
    lib.write_books(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(
        text,
        "The Lord of the Rings - J.R.R. Tolkien (1954)\n\
         To Kill a Mockingbird - Harper Lee (1960)\n\
         1984 - George Orwell (1949)\n"
    );
}

#[test]
fn test_walkthrough_leaves_one_book_checked_out() {
    let mut out = Vec::new();
    let lib = demo::run(&mut out).unwrap();

    assert_eq!(lib.book_count(), 3);
    assert_eq!(lib.member_count(), 2);

    let (_, jane) = lib.members().nth(1).unwrap();
    assert_eq!(jane.name, "Jane Smith");
    let held = jane.checked_out_books()[0];
    assert_eq!(lib.book(held).unwrap().title, "To Kill a Mockingbird");
}
