//! Word wrapping for transcript and footer text.
//!
//! Text is broken into rows here and rendered without `Wrap`, so the row count
//! used for scrolling always matches what is drawn.

use std::mem;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `text` at word boundaries into rows at most `width` columns wide.
/// Words wider than a row are split by character. Every source line yields at
/// least one row.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in line.split(' ') {
            let word_width = word.width();
            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + 1 + word_width
            };

            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                    current_width += 1;
                }
                current.push_str(word);
                current_width += word_width;
                continue;
            }

            if !current.is_empty() {
                rows.push(mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    rows.push(mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }

        rows.push(current);
    }

    rows
}
