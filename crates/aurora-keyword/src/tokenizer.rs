//! Code-aware tokenization.
//!
//! Text is split on anything that is not alphanumeric or `_`. Each word
//! that is a compound identifier (`parse_config`, `getUserName`,
//! `HTTPServer`, `utf8Decode`) yields its lowercased compound with
//! underscores removed, followed by its parts. Plain words yield themselves.
//! Tokens shorter than the minimum length are dropped. Order is preserved
//! and repeats are kept, since they are term frequencies.

use aurora_core::config::defaults::DEFAULT_MIN_TOKEN_LEN;

/// Tokenize with the default minimum token length.
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with(text, DEFAULT_MIN_TOKEN_LEN)
}

/// Tokenize, dropping tokens shorter than `min_len` characters.
pub fn tokenize_with(text: &str, min_len: usize) -> Vec<String> {
    let mut out = Vec::new();
    for word in text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
    {
        let parts = split_identifier(word);
        if parts.is_empty() {
            continue;
        }
        if parts.len() > 1 {
            let compound: String = parts.concat();
            if compound.chars().count() >= min_len {
                out.push(compound);
            }
        }
        out.extend(parts.into_iter().filter(|p| p.chars().count() >= min_len));
    }
    out
}

/// Split one identifier into lowercased parts on `_`, case and digit boundaries.
pub fn split_identifier(word: &str) -> Vec<String> {
    word.split('_')
        .filter(|s| !s.is_empty())
        .flat_map(split_case)
        .collect()
}

fn split_case(segment: &str) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut parts = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let cur = chars[i];
        let next = chars.get(i + 1).copied();

        let lower_to_upper = prev.is_lowercase() && cur.is_uppercase();
        // "HTTPServer": split before the 'S' that starts the next word.
        let acronym_end = prev.is_uppercase()
            && cur.is_uppercase()
            && next.is_some_and(|n| n.is_lowercase());
        let digit_edge = prev.is_ascii_digit() != cur.is_ascii_digit();

        if lower_to_upper || acronym_end || digit_edge {
            parts.push(chars[start..i].iter().collect::<String>().to_lowercase());
            start = i;
        }
    }
    if start < chars.len() {
        parts.push(chars[start..].iter().collect::<String>().to_lowercase());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        tokenize(s)
    }

    #[test]
    fn camel_case_keeps_compound_then_parts() {
        assert_eq!(toks("getUserName"), vec!["getusername", "get", "user", "name"]);
    }

    #[test]
    fn snake_case_matches_camel_case_compound() {
        assert_eq!(toks("get_user_name")[0], toks("getUserName")[0]);
    }

    #[test]
    fn acronyms_split_at_word_start() {
        assert_eq!(toks("HTTPServer"), vec!["httpserver", "http", "server"]);
        assert_eq!(toks("parseXML"), vec!["parsexml", "parse", "xml"]);
    }

    #[test]
    fn digits_split_and_short_parts_drop() {
        assert_eq!(toks("utf8Decode"), vec!["utf8decode", "utf", "decode"]);
        assert_eq!(toks("v2"), vec!["v2"]);
    }

    #[test]
    fn plain_words_lowercase_and_punctuation_splits() {
        assert_eq!(toks("Hello, world! a b"), vec!["hello", "world"]);
        assert_eq!(toks("fn parse(path: &Path)"), vec!["fn", "parse", "path", "path"]);
    }

    #[test]
    fn leading_and_trailing_underscores_are_ignored() {
        assert_eq!(toks("__init__"), vec!["init"]);
        assert!(toks("___").is_empty());
    }

    #[test]
    fn min_len_is_configurable() {
        assert_eq!(tokenize_with("a bb ccc", 3), vec!["ccc"]);
        assert_eq!(tokenize_with("a bb", 1), vec!["a", "bb"]);
    }
}
