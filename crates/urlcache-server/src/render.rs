//! HTML page rendering for the fetch form and its result states.
//!
//! The client interaction is two explicit states: the form page
//! (placeholder), and a result page that carries the cached-copy link plus a
//! `meta refresh` redirect to it. Failures render inline messages; worker
//! diagnostics appear only when the operator enabled transcript exposure.

use std::fmt::Write;

/// What the page shows for one request.
#[derive(Debug)]
pub enum PageView {
    /// No input yet: just the form.
    Form,
    /// Input rejected by validation; shown inline, non-retryable.
    Invalid,
    /// Artifact cached; `href` is the `/cache/...` reference.
    Ready { href: String },
    /// Any caching failure; deliberately generic.
    Failed,
}

/// Escapes text for embedding in HTML body or attribute context.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Renders the full page for `view`, appending the worker transcript when
/// the operator opted into exposing it.
pub fn page(view: &PageView, transcript: Option<&str>) -> String {
    let mut body = String::new();

    match view {
        PageView::Form => {}
        PageView::Invalid => {
            body.push_str("<p>Invalid URL</p>\n");
        }
        PageView::Ready { href } => {
            let href = escape(href);
            let _ = write!(
                body,
                "<p><a id=\"cached-link\" href=\"{href}\">Open cached file</a></p>\n"
            );
        }
        PageView::Failed => {
            body.push_str("<p>Could not cache the requested URL.</p>\n");
        }
    }

    if let Some(t) = transcript {
        let _ = write!(body, "<pre>{}</pre>\n", escape(t));
    }

    body.push_str(concat!(
        "<form action=\"/\" method=\"GET\">\n",
        "<input type=\"text\" name=\"user_input\" ",
        "placeholder=\"https://example.com/page.html\" size=\"60\">\n",
        "<button type=\"submit\">Fetch</button>\n",
        "</form>\n",
    ));

    let refresh = match view {
        PageView::Ready { href } => format!(
            "<meta http-equiv=\"refresh\" content=\"0;url={}\">\n",
            escape(href)
        ),
        _ => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Download &amp; Cache</title>\n{refresh}</head>\n<body>\n{body}</body>\n</html>\n"
    )
}
