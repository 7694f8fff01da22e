//! Server-rendered HTML.

use crate::app::{Analysis, AnalysisView, SongQuery};

const CSS: &str = r"
body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { font-size: 1.8rem; }
form { display: grid; gap: 0.75rem; margin-bottom: 2rem; }
label { display: grid; gap: 0.25rem; font-weight: 600; }
input { padding: 0.5rem; font-size: 1rem; }
button { padding: 0.6rem; font-size: 1rem; cursor: pointer; }
pre.lyrics { white-space: pre-wrap; background: #f6f6f6; padding: 1rem; max-height: 300px; overflow-y: auto; }
.genre { background: #e6f4ea; color: #1e7e34; padding: 0.75rem; border-radius: 4px; font-weight: 600; }
.error { background: #fdecea; color: #b71c1c; padding: 0.75rem; border-radius: 4px; }
";

/// Escapes text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The form page, with results or an error below it when `view` is set.
pub fn index_page(query: &SongQuery, view: Option<&AnalysisView>) -> String {
    let body = match view {
        None => String::new(),
        Some(AnalysisView::Ready(analysis)) => results_section(analysis),
        Some(AnalysisView::Failed { message }) => {
            format!(r#"<div class="error">{}</div>"#, escape_html(message))
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Lyrics Genre Classifier</title>
    <style>
{css}
    </style>
</head>
<body>
    <h1>Lyrics Genre Classifier</h1>
    <p>Get song lyrics, summarize them, and identify the genre.</p>

    <form method="post" action="/analyze">
        <label>Enter Song Name
            <input type="text" name="song" value="{song}" required>
        </label>
        <label>Enter Artist Name
            <input type="text" name="artist" value="{artist}" required>
        </label>
        <button type="submit">Analyze</button>
    </form>

{body}
</body>
</html>"#,
        css = CSS,
        song = escape_html(query.song()),
        artist = escape_html(query.artist()),
        body = body,
    )
}

fn results_section(analysis: &Analysis) -> String {
    format!(
        r#"    <section>
        <h2>Original Lyrics</h2>
        <pre class="lyrics">{lyrics}</pre>
    </section>
    <section>
        <h2>Summary</h2>
        <p>{summary}</p>
    </section>
    <section>
        <h2>Predicted Genre</h2>
        <div class="genre">{genre}</div>
    </section>"#,
        lyrics = escape_html(&analysis.lyrics),
        summary = escape_html(&analysis.summary),
        genre = escape_html(&analysis.genre),
    )
}
