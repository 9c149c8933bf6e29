//! Removable words for word-wise deletion.
//!
//! A removable word is a run of word characters (letters, digits, `_` and
//! apostrophes) or a run of punctuation, together with the whitespace between
//! it and the cursor.

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

fn run_length<I>(mut chars: std::iter::Peekable<I>) -> usize
where
    I: Iterator<Item = char>,
{
    let mut length = 0;
    while chars.next_if(|c| c.is_whitespace()).is_some() {
        length += 1;
    }
    let Some(&first) = chars.peek() else {
        return length;
    };
    let word = is_word_char(first);
    while chars
        .next_if(|c| !c.is_whitespace() && is_word_char(*c) == word)
        .is_some()
    {
        length += 1;
    }
    length
}

/// Characters to remove before the end of `text`.
pub fn backward_length(text: &str) -> usize {
    run_length(text.chars().rev().peekable())
}

/// Characters to remove from the start of `text`.
pub fn forward_length(text: &str) -> usize {
    run_length(text.chars().peekable())
}
