//! HTML pages.
//!
//! Pages are rendered with `format!`; every user-supplied value goes through
//! [`escape_html`].

use std::fmt::Write;

use axum::http::StatusCode;

use crate::books::{Book, BookForm};
use crate::document::ObjectId;

/// Escapes text for use in element content and quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            c => output.push(c),
        }
    }
    output
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<nav><a href=\"/\">Books</a> | <a href=\"/add\">Add book</a></nav>\n{body}</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    )
}

fn book_inputs(title: &str, author: &str, published: &str, pages: &str) -> String {
    let mut fields = String::new();
    for (name, label, value) in [
        ("title", "Title", title),
        ("author", "Author", author),
        ("published", "Published", published),
        ("pages", "Pages", pages),
    ] {
        let _ = writeln!(
            fields,
            "<label>{label} <input name=\"{name}\" value=\"{value}\"></label><br>",
            value = escape_html(value),
        );
    }
    fields
}

/// All books, or search results when `search` is set
pub fn book_list(books: &[Book], search: Option<&str>) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/\"><input name=\"search\" value=\"{}\"> <button type=\"submit\">Search</button></form>",
        escape_html(search.unwrap_or_default())
    );

    if let Some(search) = search {
        let _ = writeln!(body, "<p>Results for \"{}\"</p>", escape_html(search));
    }

    if books.is_empty() {
        body.push_str("<p>No books found.</p>\n");
        return layout("Books", &body);
    }

    body.push_str(
        "<table>\n<tr><th>Title</th><th>Author</th><th>Published</th><th>Pages</th></tr>\n",
    );
    for book in books {
        let _ = writeln!(
            body,
            "<tr><td><a href=\"/{id}\">{title}</a></td><td>{author}</td><td>{published}</td><td>{pages}</td></tr>",
            id = book.id,
            title = escape_html(&book.title),
            author = escape_html(&book.author),
            published = book.published,
            pages = book.pages,
        );
    }
    body.push_str("</table>\n");

    layout("Books", &body)
}

/// Creation form; after a successful insert it links the new book
pub fn add_form(created: Option<ObjectId>, form: &BookForm) -> String {
    let mut body = String::from("<h1>Add book</h1>\n");
    if let Some(id) = created {
        let _ = writeln!(body, "<p>Book added: <a href=\"/{id}\">{id}</a></p>");
    }
    body.push_str("<form method=\"post\" action=\"/add\">\n");
    body.push_str(&book_inputs(&form.title, &form.author, &form.published, &form.pages));
    body.push_str("<button type=\"submit\">Add</button>\n</form>\n");

    layout("Add book", &body)
}

/// Edit form for one book
pub fn book_detail(book: &Book, saved: bool) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&book.title));
    let _ = writeln!(body, "<p>Id: <code>{}</code></p>", book.id);
    if saved {
        body.push_str("<p>Saved.</p>\n");
    }
    let _ = writeln!(body, "<form method=\"post\" action=\"/{}\">", book.id);
    body.push_str(&book_inputs(
        &book.title,
        &book.author,
        &book.published.to_string(),
        &book.pages.to_string(),
    ));
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");

    layout(&book.title, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n",
        escape_html(&heading),
        escape_html(message)
    );
    layout(&heading, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> Book {
        Book {
            id: ObjectId::new(),
            title: title.to_string(),
            author: "Author1".to_string(),
            published: 2015,
            pages: 200,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_list_links_each_book() {
        let books = vec![book("Title1"), book("Title2")];
        let page = book_list(&books, None);
        for b in &books {
            assert!(page.contains(&format!("href=\"/{}\"", b.id)));
        }
        assert!(page.contains("Title2"));
    }

    #[test]
    fn test_list_escapes_titles() {
        let page = book_list(&[book("<script>")], Some("<b>"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_empty_list() {
        assert!(book_list(&[], Some("nothing")).contains("No books found."));
    }

    #[test]
    fn test_add_form_shows_created_id() {
        let id = ObjectId::new();
        let page = add_form(Some(id), &BookForm::new("T", "A", "1", "2"));
        assert!(page.contains(&id.to_hex()));
        assert!(page.contains("value=\"T\""));
    }

    #[test]
    fn test_detail_prefills_fields() {
        let b = book("Title1");
        let page = book_detail(&b, true);
        assert!(page.contains(&format!("action=\"/{}\"", b.id)));
        assert!(page.contains("value=\"2015\""));
        assert!(page.contains("Saved."));
    }

    #[test]
    fn test_error_page() {
        let page = error_page(StatusCode::NOT_FOUND, "No book with id x");
        assert!(page.contains("404 Not Found"));
    }
}
