//! HTML Attribute Parsing
//!
//! Parses attributes from the inside of a start tag. Lenient: quoted,
//! unquoted and valueless (boolean) attributes are all accepted, and
//! garbage between attributes is skipped rather than reported.

use super::entities::decode_text;
use super::scanner::is_whitespace;
use std::borrow::Cow;

/// A parsed attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name, lowercased
    pub name: Cow<'a, str>,
    /// Attribute value (entities decoded); empty for boolean attributes
    pub value: Cow<'a, str>,
}

impl<'a> Attribute<'a> {
    /// Create a new attribute
    pub fn new(name: &'a str, value: Cow<'a, str>) -> Self {
        Attribute {
            name: lowercase(name),
            value,
        }
    }
}

/// Lowercase an ASCII name, borrowing when it is already lowercase
#[inline]
pub fn lowercase(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between the element name and '>' or '/>'
pub fn parse_attributes(input: &str) -> Vec<Attribute<'_>> {
    let bytes = input.as_bytes();
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && (is_whitespace(bytes[pos]) || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        let name_start = pos;
        while pos < bytes.len() && is_attr_name_char(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            // Stray '=' or quote: skip it
            pos += 1;
            continue;
        }
        let name = &input[name_start..pos];

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        if bytes.get(pos) != Some(&b'=') {
            attrs.push(Attribute::new(name, Cow::Borrowed("")));
            continue;
        }
        pos += 1;
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        let raw_value = match bytes.get(pos) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = pos + 1;
                let value_end = memchr::memchr(quote, &bytes[value_start..])
                    .map(|i| value_start + i)
                    .unwrap_or(bytes.len());
                pos = (value_end + 1).min(bytes.len());
                &input[value_start..value_end]
            }
            _ => {
                let value_start = pos;
                while pos < bytes.len() && !is_whitespace(bytes[pos]) {
                    pos += 1;
                }
                &input[value_start..pos]
            }
        };

        attrs.push(Attribute::new(name, decode_text(raw_value)));
    }

    attrs
}

#[inline]
fn is_attr_name_char(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'/' | b'>' | b'=' | b'"' | b'\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_attributes() {
        let attrs = parse_attributes(r#" id="main" class='container'"#);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "id");
        assert_eq!(attrs[0].value, "main");
        assert_eq!(attrs[1].name, "class");
        assert_eq!(attrs[1].value, "container");
    }

    #[test]
    fn test_unquoted_and_boolean() {
        let attrs = parse_attributes(" type=checkbox checked disabled");
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].value, "checkbox");
        assert_eq!(attrs[1].name, "checked");
        assert_eq!(attrs[1].value, "");
        assert_eq!(attrs[2].name, "disabled");
    }

    #[test]
    fn test_names_lowercased_values_decoded() {
        let attrs = parse_attributes(r#" HREF="/a?x=1&amp;y=2""#);
        assert_eq!(attrs[0].name, "href");
        assert_eq!(attrs[0].value, "/a?x=1&y=2");
    }

    #[test]
    fn test_spaces_around_equals() {
        let attrs = parse_attributes(r#" alt = "a picture" "#);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value, "a picture");
    }

    #[test]
    fn test_unterminated_quote() {
        let attrs = parse_attributes(r#" title="never closed"#);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value, "never closed");
    }
}
