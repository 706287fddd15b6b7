use crate::telegram::ParseMode;

const MARKDOWN_RESERVED: &[char] = &['_', '*', '`', '['];

const MARKDOWN_V2_RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape Telegram markup symbols for the given parse mode in one pass.
///
/// The whole text is escaped, so any formatting written into the template
/// itself is escaped too.
pub fn escape(mode: ParseMode, text: &str) -> String {
    let reserved = match mode {
        ParseMode::Plain => return text.to_string(),
        ParseMode::Html => return escape_html(text),
        ParseMode::Markdown => MARKDOWN_RESERVED,
        ParseMode::MarkdownV2 => MARKDOWN_V2_RESERVED,
    };

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if reserved.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
