//! Greedy word wrapping against a width measure.

use crate::error::Result;

/// Wrap `text` on spaces so that each line measures at most `max_width`.
///
/// Words wider than `max_width` on their own are broken between
/// characters. Always returns at least one line; empty input yields a
/// single empty line.
pub fn wrap_greedy<F>(text: &str, max_width: f32, mut measure: F) -> Result<Vec<String>>
where
    F: FnMut(&str) -> Result<f32>,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measure(&candidate)? <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure(word)? <= max_width {
            current = word.to_string();
            continue;
        }

        // Over-long word: break between characters
        for ch in word.chars() {
            current.push(ch);
            if current.chars().count() > 1 && measure(&current)? > max_width {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }

    lines.push(current);
    Ok(lines)
}
