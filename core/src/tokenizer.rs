use std::io::{self, BufRead, Cursor};

/// Normalize a raw token: keep ASCII letters (lowercased) and digits, drop
/// everything else. Returns `None` when nothing survives the filter.
pub fn normalize(token: &[u8]) -> Option<String> {
    let term: String = token
        .iter()
        .filter(|b| b.is_ascii_alphanumeric())
        .map(|b| b.to_ascii_lowercase() as char)
        .collect();
    if term.is_empty() { None } else { Some(term) }
}

/// Split a stream into whitespace-delimited raw tokens.
///
/// Reads through the `BufRead` buffer so arbitrarily large documents are
/// scanned without being loaded whole. Any Unicode white space delimits a
/// token, including vertical tab and multi-byte spaces such as NBSP.
/// Tokens are returned as raw bytes; callers run them through [`normalize`].
pub fn split<R: BufRead>(reader: R) -> Words<R> {
    Words { reader }
}

pub struct Words<R> {
    reader: R,
}

impl<R: BufRead> Iterator for Words<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut word = Vec::new();
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            };
            if buf.is_empty() {
                // EOF: emit a trailing word that had no delimiter after it
                return if word.is_empty() { None } else { Some(Ok(word)) };
            }

            let mut consumed = 0;
            let mut complete = false;
            for &b in buf {
                consumed += 1;
                word.push(b);
                if let Some(len) = trailing_space_len(&word) {
                    word.truncate(word.len() - len);
                    if !word.is_empty() {
                        complete = true;
                        break;
                    }
                }
            }
            self.reader.consume(consumed);
            if complete {
                return Some(Ok(word));
            }
        }
    }
}

/// Byte length of the white space character ending `word`, if it ends in one.
/// A multi-byte character only counts once all of its bytes are present.
fn trailing_space_len(word: &[u8]) -> Option<usize> {
    let last = *word.last()?;
    if last.is_ascii() {
        return (last as char).is_whitespace().then_some(1);
    }
    // back up to the lead byte of the last (possibly partial) character
    let start = word
        .iter()
        .rposition(|b| b & 0xC0 != 0x80)
        .filter(|&start| word.len() - start <= 4)?;
    let c = std::str::from_utf8(&word[start..]).ok()?.chars().next()?;
    c.is_whitespace().then_some(word.len() - start)
}

/// Tokenize a query string into normalized terms, in order.
pub fn tokenize_text(text: &str) -> Vec<String> {
    split(Cursor::new(text.as_bytes()))
        // reading from an in-memory slice cannot fail
        .filter_map(|word| word.ok())
        .filter_map(|word| normalize(&word))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn normalize_filters_and_lowercases() {
        assert_eq!(normalize(b"Quarrel,"), Some("quarrel".to_string()));
        assert_eq!(normalize(b"R2-D2"), Some("r2d2".to_string()));
        assert_eq!(normalize(b"--"), None);
        assert_eq!(normalize(b""), None);
    }

    #[test]
    fn split_handles_small_buffers() {
        // capacity 3 forces words to straddle buffer refills
        let reader = BufReader::with_capacity(3, "Do you  quarrel,\tsir?\n".as_bytes());
        let words: Vec<Vec<u8>> = split(reader).collect::<io::Result<_>>().unwrap();
        assert_eq!(words, vec![b"Do".to_vec(), b"you".to_vec(), b"quarrel,".to_vec(), b"sir?".to_vec()]);
    }

    #[test]
    fn split_on_vertical_tab_and_unicode_spaces() {
        assert_eq!(tokenize_text("quarrel\x0Bsir"), vec!["quarrel", "sir"]);
        assert_eq!(tokenize_text("quarrel\u{00A0}sir"), vec!["quarrel", "sir"]);
        assert_eq!(tokenize_text("do\u{0085}you\u{3000}quarrel"), vec!["do", "you", "quarrel"]);
        // non-space multi-byte characters stay inside the word
        assert_eq!(tokenize_text("caf\u{00E9} sir"), vec!["caf", "sir"]);
    }

    #[test]
    fn multi_byte_space_split_across_refills() {
        // capacity 1 hands over the NBSP one byte at a time
        let reader = BufReader::with_capacity(1, "no\u{00A0}better".as_bytes());
        let words: Vec<Vec<u8>> = split(reader).collect::<io::Result<_>>().unwrap();
        assert_eq!(words, vec![b"no".to_vec(), b"better".to_vec()]);
    }

    #[test]
    fn control_separators_are_not_spaces() {
        // U+001F is not white space, so the bytes stay joined
        assert_eq!(tokenize_text("quarrel\x1Fsir"), vec!["quarrelsir"]);
    }

    #[test]
    fn empty_text_yields_no_terms() {
        assert!(tokenize_text("").is_empty());
        assert!(tokenize_text("   \n ").is_empty());
        assert!(tokenize_text("!!! ??").is_empty());
    }
}
