// src/utils.rs
use scraper::{ElementRef, Html, Selector};

/// Collapse all runs of whitespace (including newlines) into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters, never splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Visible text of an element, whitespace-collapsed
pub fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Strip markup from an HTML fragment
pub fn html_to_text(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    clean_text(&document.root_element().text().collect::<Vec<_>>().join(" "))
}

/// Parse a static selector list. Invalid selectors are skipped.
pub fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// First non-empty text found under `root` for the given selector
pub fn select_text(root: &ElementRef, css: &str) -> Option<String> {
    let selector = selector(css)?;
    root.select(&selector)
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty())
}

/// First matching element's attribute under `root`
pub fn select_attr(root: &ElementRef, css: &str, attr: &str) -> Option<String> {
    let selector = selector(css)?;
    root.select(&selector)
        .find_map(|el| el.value().attr(attr).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Senior \n\n  Rust\tEngineer  "), "Senior Rust Engineer");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(
            html_to_text("<p>Build <b>fast</b> systems</p><ul><li>Rust</li></ul>"),
            "Build fast systems Rust"
        );
        assert_eq!(html_to_text("plain"), "plain");
    }

    #[test]
    fn test_select_helpers() {
        let doc = Html::parse_fragment(
            r#"<div><h2 class="t"> </h2><h2 class="t">Title</h2><a href="/x">link</a></div>"#,
        );
        let root = doc.root_element();
        assert_eq!(select_text(&root, ".t").as_deref(), Some("Title"));
        assert_eq!(select_attr(&root, "a", "href").as_deref(), Some("/x"));
        assert_eq!(select_text(&root, ".missing"), None);
    }
}
