//! Size-bounded chunking of text and delimited lists for page display.
//!
//! # Invariants
//! - Lengths are counted in `char`s; a chunk never splits a character.
//! - Text chunks concatenate back to the input exactly.
//! - List chunks preserve item order and never drop or truncate an item.

pub mod chunk;

pub use chunk::{
    chunk_list, chunk_text, chunk_text_on_words, shortcut_pages, DEFAULT_PAGE_LEN, LIST_SEPARATOR,
};
