use std::borrow::Cow;
use std::io::{self, BufRead};

/// Decodes bytes as UTF-8, silently dropping invalid sequences.
pub(crate) fn decode_lossy(bytes: &[u8]) -> Cow<'_, str> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => Cow::Borrowed(text),
        Cow::Owned(text) => Cow::Owned(text.replace(char::REPLACEMENT_CHARACTER, "")),
    }
}

/// Streams the lines of `reader` one at a time, tolerating invalid UTF-8 and
/// `\r\n` endings.
pub(crate) fn lossy_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader.split(b'\n').map(|chunk| {
        chunk.map(|bytes| {
            let line = decode_lossy(&bytes);
            line.strip_suffix('\r').unwrap_or(&line).to_string()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_are_dropped() {
        assert_eq!(decode_lossy(b"a\xffb.com"), "ab.com");
        assert_eq!(decode_lossy("子域名".as_bytes()), "子域名");
    }

    #[test]
    fn crlf_endings_are_trimmed() {
        let lines: Vec<String> = lossy_lines(&b"a.com\r\nb.com\n\nc.com"[..])
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["a.com", "b.com", "", "c.com"]);
    }
}
