//! Article extraction from raw HTML
//!
//! [`HtmlExtractor`] is a lightweight readability pass: it picks the title
//! from page metadata and the body text from the most specific content
//! container (`<article>`, then `<main>`, then `<body>`), dropping
//! navigation, scripts and other page chrome.

use crate::error::ExtractError;
use crate::types::ArticleData;

/// Title used when the page provides none
pub const UNTITLED_ARTICLE: &str = "Untitled Article";

/// Elements whose content is never part of the article text
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "nav", "header", "footer", "aside", "form",
    "button", "template",
];

/// Elements that start a new paragraph
const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "section",
    "article",
    "main",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "ul",
    "ol",
    "blockquote",
    "pre",
    "table",
    "tr",
    "figure",
    "figcaption",
];

/// Content containers, most specific first
const CONTENT_CONTAINERS: &[&str] = &["article", "main", "body"];

/// Derives title and text from raw document content
pub trait Extractor: Send + Sync {
    /// Extract the article; `url` is the address the content came from
    fn extract(&self, raw: &str, url: &str) -> Result<ArticleData, ExtractError>;
}

/// Built-in HTML extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HtmlExtractor {
    fn extract(&self, raw: &str, url: &str) -> Result<ArticleData, ExtractError> {
        let title = extract_title(raw).unwrap_or_else(|| UNTITLED_ARTICLE.to_string());
        let text = html_to_text(content_region(raw));
        tracing::debug!(url = %url, title = %title, chars = text.chars().count(), "Extracted article");
        ArticleData::new(title, text)
    }
}

/// Find the article title: `og:title`, then `<title>`, then the first `<h1>`
pub fn extract_title(html: &str) -> Option<String> {
    let og_title = find_meta_content(html, "og:title");
    let candidates = [
        og_title,
        element_inner(html, "title").map(inline_text),
        element_inner(html, "h1").map(inline_text),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// Return the most specific content container, or the whole document
pub fn content_region(html: &str) -> &str {
    CONTENT_CONTAINERS
        .iter()
        .find_map(|tag| container_inner(html, tag))
        .unwrap_or(html)
}

/// Convert HTML to plain text with blank lines between blocks
pub fn html_to_text(html: &str) -> String {
    let mut output = String::new();
    let mut skip_elements: Vec<String> = Vec::new();
    let mut in_pre = false;

    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '<' {
            let mut tag = String::new();
            while let Some(&next) = chars.peek() {
                chars.next();
                // Comments may contain '>' and end only at "-->"
                if next == '>' && (!tag.starts_with("!--") || tag.ends_with("--")) {
                    break;
                }
                tag.push(next);
            }

            let tag_lower = tag.to_lowercase();
            let is_closing = tag_lower.starts_with('/');
            let tag_name = tag_name(&tag_lower);

            if SKIP_TAGS.contains(&tag_name) {
                if is_closing {
                    if let Some(pos) = skip_elements.iter().rposition(|t| t == tag_name) {
                        skip_elements.remove(pos);
                    }
                } else if !tag.ends_with('/') {
                    skip_elements.push(tag_name.to_string());
                }
                continue;
            }

            if !skip_elements.is_empty() {
                continue;
            }

            if tag_name == "pre" {
                in_pre = !is_closing;
            }

            if tag_name == "br" {
                output.push('\n');
            } else if BLOCK_TAGS.contains(&tag_name) {
                output.push_str("\n\n");
            }
        } else if skip_elements.is_empty() {
            let decoded = decode_entity(c, &mut chars);
            if decoded.is_whitespace() && !in_pre {
                output.push(' ');
            } else {
                output.push(decoded);
            }
        }
    }

    clean_whitespace(&output)
}

/// Text of an inline fragment on a single line
fn inline_text(fragment: &str) -> String {
    html_to_text(fragment)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased tag name without the closing slash or attributes
fn tag_name(tag_lower: &str) -> &str {
    let name = tag_lower.strip_prefix('/').unwrap_or(tag_lower);
    name.split_whitespace()
        .next()
        .unwrap_or("")
        .trim_end_matches('/')
}

/// Inner HTML between the first `<tag ...>` and the next `</tag>`
fn element_inner<'a>(html: &'a str, tag: &str) -> Option<&'a str> {
    let lower = html.to_ascii_lowercase();
    let start = open_tag_end(&lower, tag)?;
    let end = start + lower[start..].find(&format!("</{}", tag))?;
    Some(&html[start..end])
}

/// Inner HTML between the first `<tag ...>` and the last `</tag>`
fn container_inner<'a>(html: &'a str, tag: &str) -> Option<&'a str> {
    let lower = html.to_ascii_lowercase();
    let start = open_tag_end(&lower, tag)?;
    let end = start + lower[start..].rfind(&format!("</{}", tag))?;
    Some(&html[start..end])
}

/// Byte offset just past the first `<tag ...>` in already-lowercased HTML
///
/// ASCII lowercasing keeps byte offsets aligned with the original text.
fn open_tag_end(lower: &str, tag: &str) -> Option<usize> {
    let open_pattern = format!("<{}", tag);
    let mut search_from = 0;
    loop {
        let start = search_from + lower[search_from..].find(&open_pattern)?;
        let after_name = start + open_pattern.len();
        match lower[after_name..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => {
                let tag_end = after_name + lower[after_name..].find('>')?;
                return Some(tag_end + 1);
            }
            _ => search_from = after_name,
        }
    }
}

/// Value of the `content` attribute of `<meta property|name="key">`
fn find_meta_content(html: &str, key: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let mut search_from = 0;
    while let Some(pos) = lower[search_from..].find("<meta") {
        let start = search_from + pos;
        let end = start + lower[start..].find('>')?;
        let tag = &html[start + 1..end];
        let matches_key = ["property", "name"]
            .iter()
            .filter_map(|attr| extract_attribute(tag, attr))
            .any(|value| value.eq_ignore_ascii_case(key));
        if matches_key {
            if let Some(content) = extract_attribute(tag, "content") {
                return Some(decode_entities(&content));
            }
        }
        search_from = end;
    }
    None
}

/// Extract attribute value from tag
fn extract_attribute(tag: &str, attr: &str) -> Option<String> {
    let pattern = format!("{}=", attr);
    let tag_lower = tag.to_ascii_lowercase();

    let mut search_from = 0;
    while let Some(pos) = tag_lower[search_from..].find(&pattern) {
        let start = search_from + pos;
        search_from = start + pattern.len();
        // Must be a whole attribute name, not a suffix like `data-content=`
        let preceded_by_space = tag_lower[..start]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if !preceded_by_space {
            continue;
        }

        let rest = tag[start + pattern.len()..].trim_start();

        if let Some(rest) = rest.strip_prefix('"') {
            return rest.find('"').map(|end| rest[..end].to_string());
        } else if let Some(rest) = rest.strip_prefix('\'') {
            return rest.find('\'').map(|end| rest[..end].to_string());
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .unwrap_or(rest.len());
            return Some(rest[..end].to_string());
        }
    }
    None
}

fn decode_entities(s: &str) -> String {
    let mut chars = s.chars().peekable();
    let mut out = String::with_capacity(s.len());
    while let Some(c) = chars.next() {
        out.push(decode_entity(c, &mut chars));
    }
    out
}

/// Decode HTML entity starting from ampersand
fn decode_entity(c: char, chars: &mut std::iter::Peekable<std::str::Chars>) -> char {
    if c != '&' {
        return c;
    }

    // Look ahead without consuming so an invalid entity keeps its text
    let lookahead: String = chars.clone().take(12).collect();
    let Some(end) = lookahead.find(';') else {
        return '&';
    };
    let entity = &lookahead[..end];
    if entity.is_empty() || entity.chars().any(char::is_whitespace) {
        return '&';
    }

    let decoded = match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "hellip" => Some('…'),
        "lsquo" => Some('‘'),
        "rsquo" => Some('’'),
        "ldquo" => Some('“'),
        "rdquo" => Some('”'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        _ => entity.strip_prefix('#').and_then(|num| {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };

    match decoded {
        Some(ch) => {
            for _ in 0..=entity.chars().count() {
                chars.next();
            }
            ch
        }
        None => '&',
    }
}

/// Clean whitespace: collapse runs, trim, keep max 2 newlines
fn clean_whitespace(s: &str) -> String {
    let mut result = String::new();
    let mut last_was_space = false;
    let mut newline_count = 0;

    for c in s.chars() {
        if c == '\n' {
            if last_was_space && result.ends_with(' ') {
                result.pop();
            }
            newline_count += 1;
            last_was_space = true;
            if newline_count <= 2 {
                result.push(c);
            }
        } else if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            newline_count = 0;
            last_was_space = false;
            result.push(c);
        }
    }

    result.trim().to_string()
}
