//! Server-side HTML views
//!
//! Genre names are stored already escaped and are printed as-is; every other
//! dynamic value goes through [`escape`].

pub mod genres;

pub use crate::services::validation::escape;

/// Wrap a page body in the shared layout
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            margin: 0;
            display: flex;
        }}
        nav {{
            min-width: 180px;
            padding: 20px;
        }}
        main {{
            padding: 20px;
        }}
        .errors {{
            color: #b00020;
        }}
    </style>
</head>
<body>
    <nav>
        <ul>
            <li><a href="/catalog">Home</a></li>
            <li><a href="/catalog/genres">All genres</a></li>
            <li><a href="/catalog/genre/create">Create new genre</a></li>
        </ul>
    </nav>
    <main>
        <h1>{title}</h1>
{body}
    </main>
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

/// Error page for failures that end a request
pub fn error_page(status: u16, message: &str) -> String {
    layout(
        "Error",
        &format!(
            "        <h2>{}</h2>\n        <p>{}</p>\n",
            status,
            escape(message)
        ),
    )
}
