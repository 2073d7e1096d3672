//! Markdown-subset renderer
//!
//! Supports exactly what the tutor persona is told to produce:
//! fenced code blocks, `**bold**`, `*italic*`, `- ` bullet lists (nesting is flattened),
//! blank-line separated paragraphs and line breaks inside a paragraph.
//!
//! Everything that came from the message is escaped before any markup is
//! introduced, so the output is safe to insert into the page as-is.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use uuid::Uuid;

use super::sanitize::escape_html;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid code fence pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"));
static LIST_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:[ \t]*- .*(?:\n|$))+").expect("valid list pattern"));
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph pattern"));

/// Render a message body to display markup.
pub fn render_markdown(text: &str) -> String {
    // The nonce keeps placeholders unforgeable from message text.
    let marker = format!("%%CODEBLOCK_{}_", Uuid::new_v4().simple());
    let placeholder = |index: usize| format!("{marker}{index}%%");

    let mut code_blocks: Vec<String> = Vec::new();
    let extracted = CODE_FENCE.replace_all(text, |caps: &Captures| {
        code_blocks.push(escape_html(caps[1].trim()));
        format!("\n{}\n", placeholder(code_blocks.len() - 1))
    });

    let escaped = escape_html(&extracted);

    let emphasized = BOLD.replace_all(&escaped, "<strong>${1}</strong>");
    let emphasized = ITALIC.replace_all(&emphasized, "<em>${1}</em>");

    let listed = LIST_RUN.replace_all(&emphasized, |caps: &Captures| {
        let items: String = caps[0]
            .trim()
            .lines()
            .map(|line| {
                let entry = line.trim_start().get(2..).unwrap_or("");
                format!("<li>{}</li>", entry.trim())
            })
            .collect();
        format!("\n\n<ul>{items}</ul>\n\n")
    });

    let mut html: String = PARAGRAPH_BREAK
        .split(&listed)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if block.starts_with("<ul>") || block.contains(marker.as_str()) {
                block.to_string()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br />"))
            }
        })
        .collect();

    for (index, block) in code_blocks.iter().enumerate() {
        let token = placeholder(index);
        let code_html = format!(r#"<pre class="code-block"><code>{block}</code></pre>"#);
        html = html
            .replacen(&format!("<p>{token}</p>"), &code_html, 1)
            .replacen(&token, &code_html, 1);
    }

    html
}
