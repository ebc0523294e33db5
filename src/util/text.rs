use std::borrow::Cow;

const ESC: char = '\u{1b}';
const BEL: char = '\u{07}';
const LINE_BREAKS: &[char] = &['\n', '\r', '\t'];

fn is_stripped_control(c: char) -> bool {
    c == '\u{7f}' || (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r'))
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Removes:
/// - ASCII control chars other than tab, newline and carriage return
/// - CSI sequences: `ESC [` ... final byte in `0x40..=0x7e`
/// - OSC sequences: `ESC ]` ... terminated by BEL or `ESC \`
/// - a bare ESC
///
/// Returns `Cow::Borrowed` when nothing needs removing.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ESC {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for n in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&n) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(n) = chars.next() {
                        if n == BEL {
                            break;
                        }
                        if n == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !is_stripped_control(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

/// Fold line breaks and tabs (with the spaces around them) into single
/// spaces, after stripping control characters.
///
/// Used for the report file, where one article must occupy exactly one line.
pub fn single_line(s: &str) -> Cow<'_, str> {
    let stripped = strip_control_chars(s);
    if !stripped.contains(LINE_BREAKS) {
        return stripped;
    }

    let mut out = String::with_capacity(stripped.len());
    for segment in stripped.split(LINE_BREAKS) {
        let segment = segment.trim_matches(' ');
        if segment.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(segment);
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_is_borrowed() {
        let input = "Plain title with unicode: 日本語";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
        assert!(matches!(single_line(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_csi_sequence() {
        assert_eq!(strip_control_chars("\u{1b}[31mred\u{1b}[0m text"), "red text");
    }

    #[test]
    fn test_strip_osc_sequence_bel_and_st() {
        assert_eq!(strip_control_chars("a\u{1b}]0;title\u{07}b"), "ab");
        assert_eq!(strip_control_chars("a\u{1b}]8;;http://x\u{1b}\\b"), "ab");
    }

    #[test]
    fn test_strip_bare_esc_and_controls() {
        assert_eq!(strip_control_chars("a\u{1b}b\u{00}c\u{7f}d"), "abcd");
    }

    #[test]
    fn test_strip_keeps_whitespace_controls() {
        assert_eq!(strip_control_chars("a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn test_single_line_folds_breaks() {
        assert_eq!(single_line("first line\nsecond line"), "first line second line");
        assert_eq!(single_line("a \r\n  b"), "a b");
        assert_eq!(single_line("tab\tseparated"), "tab separated");
    }

    #[test]
    fn test_single_line_trailing_break() {
        assert_eq!(single_line("title\n"), "title");
    }

    #[test]
    fn test_single_line_strips_controls_too() {
        assert_eq!(single_line("\u{1b}[1mbold\u{1b}[0m\nnext"), "bold next");
    }
}
