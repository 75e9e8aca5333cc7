//! Markdown rendering for message bodies.
//!
//! Raw HTML in a message is shown as text, never interpreted, and links open
//! in a new tab.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const PLAIN_ANCHOR: &str = "<a href=\"";
const NEW_TAB_ANCHOR: &str = "<a target=\"_blank\" rel=\"noopener noreferrer\" href=\"";
const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Renders `source` to an HTML fragment safe to assign to `innerHTML`.
pub fn render(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut out, events);
    // Text and code are escaped, so every remaining anchor tag came from a link.
    out.replace(PLAIN_ANCHOR, NEW_TAB_ANCHOR)
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let scheme: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    if BLOCKED_SCHEMES.iter().any(|s| scheme.starts_with(s)) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}
