//! Cheap detection of text plists from a document's first bytes.

/// How many leading bytes [`looks_like_text_plist`] is meant to inspect.
pub const HEADER_LEN: usize = 32;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Guesses whether `header` (the first [`HEADER_LEN`] bytes of a document)
/// starts a text plist.
///
/// A leading `{`, `/*` or `//`, optionally after a UTF-8 byte-order mark, is a
/// match. Anything else matches only if it is not an XML plist and contains
/// an `=`. This is a heuristic; short or unusual prefixes can be misjudged.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::sniff::looks_like_text_plist;
///
/// assert!(looks_like_text_plist(b"{ key = value; }"));
/// assert!(looks_like_text_plist(b"\"greeting\" = \"hello\";"));
/// assert!(!looks_like_text_plist(b"<?xml version=\"1.0\"?>"));
/// assert!(!looks_like_text_plist(b"bplist00"));
/// ```
pub fn looks_like_text_plist(header: &[u8]) -> bool {
    let header = &header[..header.len().min(HEADER_LEN)];
    let body = header.strip_prefix(UTF8_BOM).unwrap_or(header);
    if body.starts_with(b"{") || body.starts_with(b"/*") || body.starts_with(b"//") {
        return true;
    }
    if header.starts_with(b"<?xml") || header.starts_with(b"<plist") {
        return false;
    }
    header.contains(&b'=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_prefixes() {
        assert!(looks_like_text_plist(b"{}"));
        assert!(looks_like_text_plist(b"\xEF\xBB\xBF{ a = b; }"));
        assert!(looks_like_text_plist(b"/* comment */ ( a )"));
        assert!(looks_like_text_plist(b"\xEF\xBB\xBF// header"));
    }

    #[test]
    fn test_xml_is_rejected_even_with_equals() {
        assert!(!looks_like_text_plist(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>"
        ));
        assert!(!looks_like_text_plist(b"<plist version=\"1.0\">"));
    }

    #[test]
    fn test_equals_heuristic() {
        assert!(looks_like_text_plist(b"\"a\" = \"1\";"));
        assert!(!looks_like_text_plist(b"( one, two )"));
        assert!(!looks_like_text_plist(b""));
    }

    #[test]
    fn test_only_header_is_inspected() {
        let mut input = vec![b' '; HEADER_LEN];
        input.extend_from_slice(b"=");
        assert!(!looks_like_text_plist(&input));
    }
}
