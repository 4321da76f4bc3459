//! HTML Entity Decoding
//!
//! Handles decoding of character references in text and attribute values:
//! - XML built-ins: &lt; &gt; &amp; &quot; &apos;
//! - Common HTML named entities (&nbsp; &copy; &mdash; ...)
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present. Unknown or
//! unterminated references are kept verbatim, the way browsers render them.

use memchr::memchr;
use std::borrow::Cow;

/// Longest reference body we try to resolve (`&` and `;` excluded)
const MAX_ENTITY_LEN: usize = 32;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode_text(input: &str) -> Cow<'_, str> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode all entity references in the input
pub fn decode_entities(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(amp_offset) = memchr(b'&', &bytes[pos..]) else {
            result.push_str(&input[pos..]);
            break;
        };
        result.push_str(&input[pos..pos + amp_offset]);
        pos += amp_offset;

        let window_end = (pos + 2 + MAX_ENTITY_LEN).min(bytes.len());
        let decoded = memchr(b';', &bytes[pos + 1..window_end]).and_then(|semi_offset| {
            let body = &input[pos + 1..pos + 1 + semi_offset];
            decode_entity(body).map(|c| (c, semi_offset + 2))
        });

        match decoded {
            Some((c, consumed)) => {
                result.push(c);
                pos += consumed;
            }
            None => {
                result.push('&');
                pos += 1;
            }
        }
    }

    result
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        return decode_numeric_entity(numeric);
    }

    let c = match entity {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "laquo" => '\u{00AB}',
        "raquo" => '\u{00BB}',
        "hellip" => '\u{2026}',
        "bull" => '\u{2022}',
        "middot" => '\u{00B7}',
        "sect" => '\u{00A7}',
        "para" => '\u{00B6}',
        "deg" => '\u{00B0}',
        "times" => '\u{00D7}',
        "divide" => '\u{00F7}',
        "euro" => '\u{20AC}',
        "pound" => '\u{00A3}',
        "yen" => '\u{00A5}',
        "cent" => '\u{00A2}',
        "shy" => '\u{00AD}',
        "agrave" => '\u{00E0}',
        "aacute" => '\u{00E1}',
        "auml" => '\u{00E4}',
        "ccedil" => '\u{00E7}',
        "egrave" => '\u{00E8}',
        "eacute" => '\u{00E9}',
        "ecirc" => '\u{00EA}',
        "iacute" => '\u{00ED}',
        "ntilde" => '\u{00F1}',
        "oacute" => '\u{00F3}',
        "ouml" => '\u{00F6}',
        "uacute" => '\u{00FA}',
        "uuml" => '\u{00FC}',
        "szlig" => '\u{00DF}',
        _ => return None,
    };
    Some(c)
}

/// Decode a numeric character reference body (after `#`)
fn decode_numeric_entity(entity: &str) -> Option<char> {
    let codepoint = match entity.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => entity.parse::<u32>().ok()?,
    };

    match codepoint {
        // NUL and out-of-range references render as the replacement character
        0 => Some('\u{FFFD}'),
        cp => Some(char::from_u32(cp).unwrap_or('\u{FFFD}')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities_is_borrowed() {
        let result = decode_text("hello world");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test_builtin_entities() {
        assert_eq!(decode_text("a &lt; b &amp;&amp; c &gt; d"), "a < b && c > d");
        assert_eq!(decode_text("&quot;hi&apos;"), "\"hi'");
    }

    #[test]
    fn test_html_named_entities() {
        assert_eq!(decode_text("a&nbsp;b"), "a\u{00A0}b");
        assert_eq!(decode_text("&copy; 2024 &mdash; x"), "\u{00A9} 2024 \u{2014} x");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_text("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_text("&#128640;"), "\u{1F680}");
    }

    #[test]
    fn test_invalid_numeric_becomes_replacement() {
        assert_eq!(decode_text("&#0;"), "\u{FFFD}");
        assert_eq!(decode_text("&#xD800;"), "\u{FFFD}");
    }

    #[test]
    fn test_unknown_and_unterminated_kept() {
        assert_eq!(decode_text("&bogus; & &amp"), "&bogus; & &amp");
        assert_eq!(decode_text("AT&T"), "AT&T");
    }

    #[test]
    fn test_multibyte_neighbours() {
        assert_eq!(decode_text("é&amp;ü"), "é&ü");
    }
}
