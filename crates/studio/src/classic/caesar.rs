//! Caesar shift over the ASCII alphabet.

const ALPHABET_LEN: i64 = 26;

/// Rotate every ASCII letter in `text` by `amount` positions.
///
/// Case is preserved and every other character passes through unchanged.
/// Negative amounts rotate backwards, and any amount is reduced mod 26, so
/// `shift(&shift(t, n), -n) == t` for every `n`.
pub fn shift(text: &str, amount: i64) -> String {
    let offset = amount.rem_euclid(ALPHABET_LEN) as u8;
    if offset == 0 {
        return text.to_owned();
    }

    text.chars()
        .map(|c| match c {
            'a'..='z' => rotate(c, b'a', offset),
            'A'..='Z' => rotate(c, b'A', offset),
            _ => c,
        })
        .collect()
}

fn rotate(c: char, base: u8, offset: u8) -> char {
    let index = c as u8 - base;
    (base + (index + offset) % ALPHABET_LEN as u8) as char
}
