//! HTML escaping for untrusted text

/// Escape the five markup-significant characters.
///
/// Works in a single pass over the input, so an `&` produced by one
/// replacement is never escaped again.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_no_double_encoding() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
        assert_eq!(escape_html("&&"), "&amp;&amp;");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_html("Ohm's law"), "Ohm&#039;s law");
        assert_eq!(escape_html("V = I * R"), "V = I * R");
        assert_eq!(escape_html(""), "");
    }
}
