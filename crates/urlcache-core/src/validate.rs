//! Request validation: user input in, absolute http(s) URL out.
//!
//! Pure and fail-closed: anything that is not a syntactically valid absolute
//! URL with a literal `http://` or `https://` prefix is rejected before the
//! worker is ever considered.

use std::fmt;

/// Scheme accepted by the gateway. Everything else (file, ftp, javascript,
/// scheme-less strings) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

/// A URL that passed validation. `url` is the trimmed input, byte for byte;
/// it is handed to the worker as a single argv element and never re-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    pub scheme: Scheme,
    pub url: String,
}

impl ValidatedUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

/// Error returned when the input is not an acceptable absolute http(s) URL.
/// Carries no detail on purpose; the caller shows a single inline message.
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidUrl;

impl fmt::Display for InvalidUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a valid absolute http or https URL")
    }
}

impl std::error::Error for InvalidUrl {}

/// Validates raw user input.
///
/// Trims surrounding whitespace, requires a case-sensitive `http://` or
/// `https://` prefix, and requires the result to parse as an absolute URL
/// with a host. The returned `url` equals the trimmed input exactly.
pub fn validate(raw: &str) -> Result<ValidatedUrl, InvalidUrl> {
    let trimmed = raw.trim();

    let scheme = if trimmed.starts_with("http://") {
        Scheme::Http
    } else if trimmed.starts_with("https://") {
        Scheme::Https
    } else {
        return Err(InvalidUrl);
    };

    let parsed = url::Url::parse(trimmed).map_err(|_| InvalidUrl)?;
    if parsed.host().is_none() {
        return Err(InvalidUrl);
    }

    Ok(ValidatedUrl {
        scheme,
        url: trimmed.to_string(),
    })
}
