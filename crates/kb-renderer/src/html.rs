//! Markdown to HTML conversion.
//!
//! Uses `pulldown-cmark` with GitHub-flavoured extensions and adjusts the
//! event stream before HTML generation:
//! - headings get `id` attributes equal to [`anchor`] of their text
//! - code blocks are wrapped in a labelled container
//! - bare `http(s)://` and `www.` URLs in text become links
//!
//! Raw HTML in the source is passed through unchanged.

use std::fmt::Write;
use std::sync::LazyLock;

use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html,
};
use regex::Regex;

use crate::headings::{Heading, anchor, scan};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:https?://|www\.)[^\s<]+").unwrap());

/// Language label for code blocks without an info string.
const PLAIN_LANGUAGE: &str = "text";

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_GFM
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Convert markdown to HTML.
///
/// # Example
///
/// ```
/// use kb_renderer::markdown_to_html;
///
/// let html = markdown_to_html("## Setup\n\n```\nnpm i\n```\n");
/// assert!(html.contains(r#"<h2 id="setup">Setup</h2>"#));
/// assert!(html.contains(r#"<code class="language-text">npm i</code>"#));
/// ```
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let annotated = annotate_headings(markdown);
    let parser = TextMergeStream::new(Parser::new_ext(&annotated, options()));
    let events = transform(parser);

    let mut out = String::with_capacity(annotated.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Append an explicit `{#id}` attribute to every scanned heading so the
/// rendered ids agree with the table of contents.
fn annotate_headings(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() + 64);
    for line in scan(markdown) {
        match line.heading {
            Some(heading) => write_heading(heading, line.text, &mut out),
            None => out.push_str(line.text),
        }
    }
    out
}

fn write_heading(heading: Heading<'_>, original: &str, out: &mut String) {
    let id = anchor(heading.title);
    let text = strip_closing_sequence(heading.title);
    for _ in 0..heading.level {
        out.push('#');
    }
    out.push(' ');
    out.push_str(text);
    // An empty block still has to be written so a trailing `{...}` in the
    // text is not taken as attributes.
    if id.is_empty() {
        out.push_str(" {}");
    } else {
        write!(out, " {{#{id}}}").unwrap();
    }
    out.push_str(line_ending(original));
}

/// Remove an ATX closing `#` run (`## Title ##`), which would otherwise end
/// up inside the heading once an attribute block follows it.
fn strip_closing_sequence(title: &str) -> &str {
    let without = title.trim_end_matches('#');
    if without.len() == title.len() {
        return title;
    }
    if without.is_empty() {
        return "";
    }
    if without.ends_with(|c: char| c.is_whitespace()) {
        without.trim_end()
    } else {
        title
    }
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Code block being collected between its start and end events.
struct PendingCode {
    language: Option<String>,
    content: String,
}

fn transform<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut code: Option<PendingCode> = None;
    let mut link_depth = 0usize;

    for event in events {
        if let Some(pending) = code.as_mut() {
            match event {
                Event::Text(text) => pending.content.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(done) = code.take() {
                        let content = done.content.strip_suffix('\n').unwrap_or(&done.content);
                        let html = code_block_html(done.language.as_deref(), content);
                        out.push(Event::Html(html.into()));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code = Some(PendingCode {
                    language: code_language(&kind),
                    content: String::new(),
                });
            }
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                link_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Text(text) if link_depth == 0 => push_autolinked(text, &mut out),
            other => out.push(other),
        }
    }
    out
}

/// Language from a fence info string: its first word, attributes excluded.
fn code_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    let CodeBlockKind::Fenced(info) = kind else {
        return None;
    };
    info.split(|c: char| c.is_whitespace() || c == '{' || c == ',')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_owned)
}

/// Render a code block inside its labelled wrapper.
///
/// ```text
/// <div class="code-block-wrapper">
///   <div class="code-block-header"><span class="code-block-language">L</span></div>
///   <pre class="language-L"><code class="language-L">...</code></pre>
/// </div>
/// ```
#[must_use]
pub fn code_block_html(language: Option<&str>, content: &str) -> String {
    let lang = escape_html(language.unwrap_or(PLAIN_LANGUAGE));
    let mut out = String::with_capacity(content.len() + 256);
    write!(
        out,
        r#"<div class="code-block-wrapper"><div class="code-block-header"><span class="code-block-language">{lang}</span></div><pre class="language-{lang}"><code class="language-{lang}">{}</code></pre></div>"#,
        escape_html(content)
    )
    .unwrap();
    out.push('\n');
    out
}

fn push_autolinked<'a>(text: CowStr<'a>, out: &mut Vec<Event<'a>>) {
    let links: Vec<(usize, usize)> = URL_RE
        .find_iter(&text)
        .filter_map(|m| {
            let url = trim_trailing_punctuation(m.as_str());
            let bare = url.strip_prefix("www.").is_some_and(|rest| !rest.is_empty())
                || url.split_once("://").is_some_and(|(_, host)| !host.is_empty());
            bare.then_some((m.start(), m.start() + url.len()))
        })
        .collect();

    if links.is_empty() {
        out.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for (start, end) in links {
        if start > last {
            out.push(Event::Text(text[last..start].to_owned().into()));
        }
        let url = &text[start..end];
        let dest = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: dest.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(url.to_owned().into()));
        out.push(Event::End(TagEnd::Link));
        last = end;
    }
    if last < text.len() {
        out.push(Event::Text(text[last..].to_owned().into()));
    }
}

/// Drop trailing punctuation that reads as sentence text rather than URL,
/// keeping a closing parenthesis when it balances an opening one.
fn trim_trailing_punctuation(url: &str) -> &str {
    let mut end = url.len();
    while let Some(c) = url[..end].chars().next_back() {
        let strip = match c {
            '?' | '!' | '.' | ',' | ':' | ';' | '*' | '_' | '~' | '\'' | '"' => true,
            ')' => {
                let s = &url[..end];
                s.matches(')').count() > s.matches('(').count()
            }
            _ => false,
        };
        if !strip {
            break;
        }
        end -= c.len_utf8();
    }
    &url[..end]
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
