// GitBrowser URL Resolver
// Turns address-bar input into something a tab can load: an internal page, a URL,
// or a search-engine query. Pure string work, no DNS or network lookups.

use crate::types::navigation::{PseudoAddress, START_PAGE};
use crate::types::settings::SearchConfig;

/// Placeholder substituted with the encoded query in search templates.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Schemes written without `//` that are still complete addresses.
const OPAQUE_SCHEMES: [&str; 4] = ["about:", "data:", "file:", "mailto:"];

/// Web schemes are kept even when the slashes are mistyped (`http:/host`, `https:host`).
const WEB_SCHEMES: [&str; 2] = ["http:", "https:"];

/// How a piece of address-bar input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Empty,
    Internal(PseudoAddress),
    Url,
    Localhost,
    Domain,
    Search,
}

/// Classifies trimmed input without building the final address.
pub fn classify(input: &str) -> InputKind {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return InputKind::Empty;
    }
    if let Some(pseudo) = PseudoAddress::parse(trimmed) {
        return InputKind::Internal(pseudo);
    }
    if has_scheme(trimmed) {
        return InputKind::Url;
    }
    if is_localhost(trimmed) {
        return InputKind::Localhost;
    }
    if trimmed.contains('.') && !trimmed.chars().any(char::is_whitespace) {
        return InputKind::Domain;
    }
    InputKind::Search
}

/// Resolves user input into a load target. Never fails.
///
/// Surrounding whitespace is trimmed first, so searches encode the trimmed query.
///
/// # Examples
/// - `"apple.com"` -> `"https://apple.com"`
/// - `"weather today"` (DuckDuckGo) -> `"https://duckduckgo.com/?q=weather%20today"`
/// - `""` -> the start page
pub fn resolve(input: &str, search: &SearchConfig) -> String {
    let trimmed = input.trim();
    match classify(trimmed) {
        InputKind::Empty => START_PAGE.to_string(),
        InputKind::Internal(_) | InputKind::Url => trimmed.to_string(),
        InputKind::Localhost => format!("http://{}", trimmed),
        InputKind::Domain => format!("https://{}", trimmed),
        InputKind::Search => search_url(trimmed, search),
    }
}

/// Builds the search URL for `query`, percent-encoding it first.
///
/// Templates without `{query}` get a `q` parameter appended.
pub fn search_url(query: &str, search: &SearchConfig) -> String {
    let encoded = urlencoding::encode(query);
    let template = search.template();

    if template.contains(QUERY_PLACEHOLDER) {
        return template.replace(QUERY_PLACEHOLDER, &encoded);
    }

    let separator = if template.ends_with('?') || template.ends_with('&') {
        ""
    } else if template.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{}{}q={}", template, separator, encoded)
}

/// True for `scheme://...`, the opaque schemes in `OPAQUE_SCHEMES`, and
/// whitespace-free input starting with a web scheme.
fn has_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    if OPAQUE_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return true;
    }
    if WEB_SCHEMES.iter().any(|s| lower.starts_with(s))
        && !input.chars().any(char::is_whitespace)
    {
        return true;
    }

    match input.find("://") {
        Some(idx) if idx > 0 => {
            let scheme = &input[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// `localhost`, `localhost:8080`, `localhost/path` and friends.
fn is_localhost(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    match lower.strip_prefix("localhost") {
        Some(rest) => rest.is_empty() || rest.starts_with(':') || rest.starts_with('/'),
        None => false,
    }
}
