// Pure navigation logic - no Tauri imports allowed.
// This module turns toolbar input into navigation targets and can be unit tested.

use crate::modules::tabs::TabError;

/// Search engine used for anything that does not look like a URL.
pub const SEARCH_URL_PREFIX: &str = "https://duckduckgo.com/?q=";

/// Homepage used until the user configures one.
pub const DEFAULT_HOMEPAGE: &str = "https://duckduckgo.com";

/// Placeholder shown in every freshly opened tab.
pub const WELCOME_HTML: &str = r#"<html>
    <head>
        <style>
            body {
                font-family: Arial, sans-serif;
                margin: 0;
                padding: 10px;
                background-color: #f4f4f4;
                display: flex;
                flex-direction: column;
                justify-content: center;
                align-items: center;
                height: 100%;
            }
            h1 {
                color: #333;
                margin-bottom: 20px;
            }
            .button-container {
                margin-top: 20px;
            }
        </style>
    </head>
    <body>
        <h1>Welcome to Browser X!</h1>
        <div class="button-container">
            <button onclick="window.location.href='https://duckduckgo.com'">Go to DuckDuckGo</button>
        </div>
    </body>
</html>
"#;

/// Base URL the placeholder page is rendered against.
pub const BLANK_URL: &str = "about:blank";

/// A toolbar command routed to the active tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    Back,
    Forward,
    Reload,
    Home,
    Load(String),
}

/// Resolve search-bar input into the URL handed to the web view.
///
/// Anything starting with `http` is taken as a URL and gets `https://` glued on
/// unless it already starts with `https`. Note that this is a plain prefix
/// check: `http://example.com` becomes `https://http://example.com`.
/// Bare domains (`example.com`) get `https://`, everything else is searched.
pub fn resolve_query(input: &str) -> Result<String, TabError> {
    let query = input.trim();
    if query.is_empty() {
        return Err(TabError::EmptyQuery);
    }

    if query.starts_with("http") {
        if query.starts_with("https") {
            return Ok(query.to_string());
        }
        return Ok(format!("https://{}", query));
    }

    // Dot implies domain, spaces imply search
    if !query.contains(' ') && query.contains('.') && !query.ends_with('.') {
        return Ok(format!("https://{}", query));
    }

    Ok(search_url(query))
}

/// Build the search-engine URL for a free-text query.
pub fn search_url(terms: &str) -> String {
    format!("{}{}", SEARCH_URL_PREFIX, terms.replace(' ', "+"))
}
