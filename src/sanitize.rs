use std::sync::LazyLock;

use regex::Regex;

use crate::offense::Category;

/// Matches a reply that is nothing but one fenced ruby block.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A```ruby\n(.*)\n```\z").expect("fence pattern is valid"));

/// Content ready to be patched into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedEdit {
    pub category: Category,
    pub content: String,
}

/// Turn a raw model reply into the text that goes into the file.
pub fn sanitize(reply: &str, original_line: &str, category: Category) -> SanitizedEdit {
    let unfenced = strip_fence(reply.trim());
    let content = if category.reattaches_indent() {
        reindent(unfenced, original_line)
    } else {
        unfenced.trim_start().to_string()
    };
    SanitizedEdit { category, content }
}

/// Strip the fence only when it wraps the entire reply.
pub fn strip_fence(reply: &str) -> &str {
    match FENCE_RE.captures(reply).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => reply,
    }
}

/// Replace whatever indentation the model produced with the original line's.
pub fn reindent(answer: &str, original_line: &str) -> String {
    let original_line = original_line.trim_end_matches('\r');
    let indent_len = original_line.len() - original_line.trim_start().len();
    format!("{}{}", &original_line[..indent_len], answer.trim_start())
}
