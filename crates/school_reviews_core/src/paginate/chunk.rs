use crate::model::subject::Subject;

/// Largest field a rendered page accepts.
pub const DEFAULT_PAGE_LEN: usize = 1024;
pub const LIST_SEPARATOR: &str = ", ";

/// Splits `text` into consecutive chunks of exactly `max_len` chars; the last
/// chunk holds the remainder. Empty input yields no chunks.
///
/// A `max_len` of 0 is treated as 1.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for ch in text.chars() {
        current.push(ch);
        current_len += 1;
        if current_len == max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Like [`chunk_text`], but ends each chunk right after the last whitespace
/// inside the window so words stay whole. Windows without whitespace are cut
/// hard at `max_len`.
pub fn chunk_text_on_words(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let hard_end = (start + max_len).min(chars.len());
        let end = if hard_end == chars.len() || chars[hard_end].is_whitespace() {
            hard_end
        } else {
            chars[start..hard_end]
                .iter()
                .rposition(|ch| ch.is_whitespace())
                .map_or(hard_end, |pos| start + pos + 1)
        };
        chunks.push(chars[start..end].iter().collect());
        start = end;
    }

    chunks
}

/// Greedily joins `items` with `separator`, starting a new chunk whenever the
/// next item would push the current one past `max_len` chars.
///
/// An item longer than `max_len` on its own gets a chunk to itself, unmodified.
pub fn chunk_list<S: AsRef<str>>(items: &[S], max_len: usize, separator: &str) -> Vec<String> {
    let separator_len = separator.chars().count();
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut has_items = false;

    for item in items {
        let item = item.as_ref();
        let item_len = item.chars().count();

        if has_items && current_len + separator_len + item_len > max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
            has_items = false;
        }
        if has_items {
            current.push_str(separator);
            current_len += separator_len;
        }
        current.push_str(item);
        current_len += item_len;
        has_items = true;
    }
    if has_items {
        chunks.push(current);
    }

    chunks
}

/// Comma-separated subject shortcuts, split into pages of at most `max_len`.
pub fn shortcut_pages(subjects: &[Subject], max_len: usize) -> Vec<String> {
    let shortcuts: Vec<&str> = subjects
        .iter()
        .map(|subject| subject.shortcut.as_str())
        .collect();
    chunk_list(&shortcuts, max_len, LIST_SEPARATOR)
}
