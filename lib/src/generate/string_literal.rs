use std::fmt::{Display, Formatter, Result, Write};

/// Wrapper struct whose [`Display`] implementation renders as a Java string literal
///
/// Characters outside of ASCII are written out as-is, since the generated script is UTF-8. Other
/// ASCII control characters become `\uXXXX` escapes.
pub struct StringLiteral<'a>(pub &'a str);

impl Display for StringLiteral<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                '\t' => f.write_str("\\t")?,
                '\x08' => f.write_str("\\b")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\x0c' => f.write_str("\\f")?,
                '"' => f.write_str("\\\"")?,
                '\x00'..='\x1f' | '\x7f' => write!(f, "\\u{:04x}", c as u32)?,
                _ => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ascii_only() {
        assert_eq!(
            StringLiteral("hello world!").to_string(),
            "\"hello world!\""
        );
        assert_eq!(StringLiteral("it's").to_string(), "\"it's\"");
    }

    #[test]
    fn special_escapes() {
        assert_eq!(
            StringLiteral("\"hel\\o\tworld!\n\"").to_string(),
            "\"\\\"hel\\\\o\\tworld!\\n\\\"\""
        );
        assert_eq!(
            StringLiteral("\x08\x0c\r").to_string(),
            "\"\\b\\f\\r\""
        );
    }

    #[test]
    fn other_characters() {
        assert_eq!(StringLiteral("a\x15b").to_string(), "\"a\\u0015b\"");
        assert_eq!(
            StringLiteral("h\u{e9}\u{2764}\u{101234}").to_string(),
            "\"h\u{e9}\u{2764}\u{101234}\""
        );
    }
}
