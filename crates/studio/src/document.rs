//! Upload decoding and download naming for the file endpoints.

use std::borrow::Cow;

/// Direction of a file operation, used to name the download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

impl Mode {
    fn suffix(self) -> &'static str {
        match self {
            Mode::Encrypt => "encrypted",
            Mode::Decrypt => "decrypted",
        }
    }
}

/// Decode uploaded bytes as UTF-8, falling back to latin-1.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback cannot fail.
pub fn decode_upload(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Name of the file returned for an upload called `original`.
///
/// The extension of the upload is dropped: `notes.txt` becomes
/// `notes_encrypted.txt`. Directory parts, quotes, control characters and
/// non-ASCII characters are removed so the result is always a valid
/// `Content-Disposition` header value.
/// Without a usable name the stem is `result`.
pub fn download_name(original: Option<&str>, mode: Mode) -> String {
    let stem: String = original
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .map(|name| name.rsplit_once('.').map_or(name, |(stem, _)| stem))
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"')
        .collect();
    let stem = if stem.is_empty() { "result" } else { stem.as_str() };
    format!("{stem}_{}.txt", mode.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_borrowed() {
        let decoded = decode_upload("héllo".as_bytes());
        assert!(matches!(decoded, Cow::Borrowed("héllo")));
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // "café" in latin-1.
        let decoded = decode_upload(&[0x63, 0x61, 0x66, 0xe9]);
        assert_eq!(decoded, "café");
    }

    #[test]
    fn download_name_replaces_extension() {
        assert_eq!(
            download_name(Some("notes.txt"), Mode::Encrypt),
            "notes_encrypted.txt"
        );
        assert_eq!(
            download_name(Some("archive.tar.log"), Mode::Decrypt),
            "archive.tar_decrypted.txt"
        );
    }

    #[test]
    fn download_name_without_extension() {
        assert_eq!(download_name(Some("README"), Mode::Encrypt), "README_encrypted.txt");
    }

    #[test]
    fn download_name_defaults_to_result() {
        assert_eq!(download_name(None, Mode::Encrypt), "result_encrypted.txt");
        assert_eq!(download_name(Some(""), Mode::Decrypt), "result_decrypted.txt");
        assert_eq!(download_name(Some(".txt"), Mode::Decrypt), "result_decrypted.txt");
    }

    #[test]
    fn download_name_drops_quotes_and_control_characters() {
        assert_eq!(
            download_name(Some("a\"b\r\n.txt"), Mode::Encrypt),
            "ab_encrypted.txt"
        );
    }

    #[test]
    fn download_name_drops_non_ascii() {
        assert_eq!(download_name(Some("日本.txt"), Mode::Encrypt), "result_encrypted.txt");
        assert_eq!(download_name(Some("résumé.md"), Mode::Encrypt), "rsum_encrypted.txt");
    }

    #[test]
    fn download_name_strips_directories() {
        assert_eq!(
            download_name(Some("../../etc/passwd.md"), Mode::Encrypt),
            "passwd_encrypted.txt"
        );
    }
}
