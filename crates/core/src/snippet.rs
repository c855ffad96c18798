//! Pixel URL construction and the paste-able HTML snippet.
//!
//! The snippet hides the pixel between the first character of the sender's
//! name and the rest of it, so pasting the name into an email signature
//! carries the image along without any visible change.

use crate::pixel::TOKEN_QUERY_PARAM;

/// Build the embeddable pixel URL for `token` under `base_url`.
///
/// `base_url` is the public location of the pixel endpoint, e.g.
/// `https://track.example.com/update`.
pub fn pixel_url(base_url: &str, token: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}{TOKEN_QUERY_PARAM}={token}")
}

/// Render the HTML fragment the user pastes into their outgoing email.
///
/// With a non-blank `signature_name` the image tag sits after its first
/// character; otherwise the fragment is the bare image tag.
pub fn render(pixel_url: &str, signature_name: Option<&str>) -> String {
    let img = format!(
        r#"<img src="{}" width="1" height="1" alt="" style="opacity:0" />"#,
        escape_html(pixel_url)
    );

    let Some(name) = signature_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return img;
    };

    let mut chars = name.chars();
    let first = chars.next().map(String::from).unwrap_or_default();
    let rest = chars.as_str();
    format!("{}{img}{}", escape_html(&first), escape_html(rest))
}

/// Escape the five HTML-significant characters.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
