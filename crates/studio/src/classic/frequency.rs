//! Letter-frequency counting, the usual first step in breaking a Caesar shift.

use common::protocol::LetterCount;

/// Count `a`-`z` in `text`, case-insensitively.
///
/// Returns the total number of ASCII letters and one [`LetterCount`] per
/// letter in alphabetical order. Percentages are 0.0 when `text` has no letters.
pub fn letter_frequency(text: &str) -> (usize, Vec<LetterCount>) {
    let mut counts = [0usize; 26];
    for b in text.bytes().filter(u8::is_ascii_alphabetic) {
        counts[(b.to_ascii_lowercase() - b'a') as usize] += 1;
    }
    let total: usize = counts.iter().sum();

    let letters = counts
        .iter()
        .zip(b'a'..=b'z')
        .map(|(&count, letter)| LetterCount {
            letter: letter as char,
            count,
            percent: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
        })
        .collect();

    (total, letters)
}
