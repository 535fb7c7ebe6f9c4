//! Genre pages

use super::{escape, layout};
use crate::{
    models::{genre::GenreForm, BookShort, Genre},
    services::validation::FieldError,
};

/// Which form page is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(i32),
}

impl FormMode {
    pub fn title(self) -> &'static str {
        match self {
            FormMode::Create => "Create Genre",
            FormMode::Update(_) => "Update Genre",
        }
    }

    fn action(self) -> String {
        match self {
            FormMode::Create => "/catalog/genre/create".to_string(),
            FormMode::Update(id) => format!("{}/update", Genre::url_for(id)),
        }
    }
}

fn book_list(books: &[BookShort]) -> String {
    let mut out = String::from("        <dl>\n");
    for book in books {
        out.push_str(&format!(
            "            <dt><a href=\"{}\">{}</a></dt>\n",
            book.url(),
            escape(&book.title)
        ));
        out.push_str(&format!(
            "            <dd>{}</dd>\n",
            escape(book.summary.as_deref().unwrap_or(""))
        ));
    }
    out.push_str("        </dl>\n");
    out
}

/// Catalog home page
pub fn catalog_index(genre_count: i64) -> String {
    layout(
        "Local Library Home",
        &format!(
            "        <p>Welcome to the local library catalog.</p>\n        <ul>\n            <li><strong>Genres:</strong> {}</li>\n        </ul>\n",
            genre_count
        ),
    )
}

pub fn genre_list(genres: &[Genre]) -> String {
    let mut body = String::new();
    if genres.is_empty() {
        body.push_str("        <p>There are no genres.</p>\n");
    } else {
        body.push_str("        <ul>\n");
        for genre in genres {
            body.push_str(&format!(
                "            <li><a href=\"{}\">{}</a></li>\n",
                genre.url(),
                genre.name
            ));
        }
        body.push_str("        </ul>\n");
    }
    layout("Genre List", &body)
}

pub fn genre_detail(genre: &Genre, books: &[BookShort]) -> String {
    let mut body = format!("        <h2>Genre: {}</h2>\n", genre.name);
    body.push_str("        <h3>Books</h3>\n");
    if books.is_empty() {
        body.push_str("        <p>This genre has no books.</p>\n");
    } else {
        body.push_str(&book_list(books));
    }
    body.push_str(&format!(
        "        <p><a href=\"{url}/delete\">Delete genre</a> | <a href=\"{url}/update\">Update genre</a></p>\n",
        url = genre.url()
    ));
    layout("Genre Detail", &body)
}

/// Create/update form, echoing the sanitized value and any field errors
pub fn genre_form(mode: FormMode, form: &GenreForm, errors: &[FieldError]) -> String {
    let mut body = format!(
        "        <form method=\"POST\" action=\"{}\">\n            <label for=\"name\">Genre:</label>\n            <input id=\"name\" type=\"text\" name=\"name\" placeholder=\"Fantasy, Poetry etc.\" required value=\"{}\">\n            <button type=\"submit\">Submit</button>\n        </form>\n",
        mode.action(),
        form.name
    );
    if !errors.is_empty() {
        body.push_str("        <ul class=\"errors\">\n");
        for error in errors {
            body.push_str(&format!("            <li>{}</li>\n", escape(&error.message)));
        }
        body.push_str("        </ul>\n");
    }
    layout(mode.title(), &body)
}

/// Delete confirmation; the confirm button only appears when no book blocks
pub fn genre_delete(genre: &Genre, books: &[BookShort]) -> String {
    let mut body = format!("        <h2>Genre: {}</h2>\n", genre.name);
    if books.is_empty() {
        body.push_str(&format!(
            "        <p>Do you really want to delete this genre?</p>\n        <form method=\"POST\" action=\"/catalog/genre/delete\">\n            <input type=\"hidden\" name=\"genreid\" value=\"{}\">\n            <button type=\"submit\">Delete</button>\n        </form>\n",
            genre.id
        ));
    } else {
        body.push_str(
            "        <p><strong>Delete the following books before attempting to delete this genre.</strong></p>\n",
        );
        body.push_str(&book_list(books));
    }
    layout("Delete Genre", &body)
}
