use std::sync::LazyLock;

use bstr::{ByteSlice, Utf8Error};
use regex::bytes::Regex;

use crate::keyword::{Error, Result};

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\$#").expect("Invalid comment regex"));
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*([A-Z_]+)").expect("Invalid header regex"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("Invalid line break regex"));

#[derive(Debug, PartialEq)]
pub(crate) enum Line<'a> {
    Comment,
    Header(&'a str),
    Data(&'a str),
}

/// Classifies a single raw line, without its terminator.
pub(crate) fn classify(line: &[u8]) -> std::result::Result<Line<'_>, Utf8Error> {
    if COMMENT.is_match(line) {
        return Ok(Line::Comment);
    }
    if let Some(name) = HEADER.captures(line).and_then(|caps| caps.get(1)) {
        return name.as_bytes().to_str().map(Line::Header);
    }
    line.trim().to_str().map(Line::Data)
}

/// Splits on `\n`, `\r\n` and a bare `\r`. A trailing terminator does not
/// start another line.
pub(crate) fn split_lines(buffer: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut lines = LINE_BREAK.split(buffer).collect::<Vec<_>>();
    if lines.last().map_or(false, |line| line.is_empty()) {
        lines.pop();
    }
    lines.into_iter()
}

/// Classified lines of a buffer with their 1-based line numbers.
pub(crate) fn keyword_lines(buffer: &[u8]) -> impl Iterator<Item = Result<(usize, Line<'_>)>> {
    split_lines(buffer).enumerate().map(|(i, line)| {
        let number = i + 1;
        classify(line)
            .map(|l| (number, l))
            .map_err(|e| Error::Utf8(number, e))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(b"$# comment").unwrap(), Line::Comment);
        assert_eq!(classify(b"   $#    nid x y z").unwrap(), Line::Comment);
        assert_eq!(classify(b"*NODE").unwrap(), Line::Header("NODE"));
        assert_eq!(
            classify(b"*SET_NODE_LIST_TITLE extra").unwrap(),
            Line::Header("SET_NODE_LIST_TITLE")
        );
        assert_eq!(
            classify(b"   1   0.0   1.0 \r").unwrap(),
            Line::Data("1   0.0   1.0")
        );
        assert_eq!(classify(b"").unwrap(), Line::Data(""));
    }

    #[test]
    fn plain_dollar_is_data() {
        assert_eq!(
            classify(b"$ not a comment").unwrap(),
            Line::Data("$ not a comment")
        );
    }

    #[test]
    fn header_needs_column_one_and_uppercase() {
        assert_eq!(classify(b" *NODE").unwrap(), Line::Data("*NODE"));
        assert_eq!(classify(b"*node").unwrap(), Line::Data("*node"));
    }

    #[test]
    fn lines_are_numbered_from_one() {
        let lines = keyword_lines(b"*NODE\r\n1 0 0 0\n$# c")
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![
                (1, Line::Header("NODE")),
                (2, Line::Data("1 0 0 0")),
                (3, Line::Comment),
            ]
        );
    }

    #[test]
    fn line_breaks() {
        fn split(buffer: &[u8]) -> Vec<&[u8]> {
            split_lines(buffer).collect()
        }
        let expected = vec![&b"a"[..], &b"b"[..], &b"c"[..], &b"d"[..]];
        assert_eq!(split(b"a\rb\r\nc\nd"), expected);
        let expected = vec![&b"a"[..], &b""[..]];
        assert_eq!(split(b"a\r\r"), expected);
        assert_eq!(split(b"a\n").len(), 1);
        assert!(split(b"").is_empty());
    }

    #[test]
    fn invalid_utf8_reports_line() {
        let err = keyword_lines(b"*NODE\n\xff\xfe\n")
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        assert!(matches!(err, Error::Utf8(2, _)));
    }
}
