//! Entity codec for XML text and attribute values
//!
//! Only a fixed entity set is understood. `unescape(escape(s)) == s` holds for
//! every string because decoding is a single left-to-right pass.

use tracing::warn;

/// Longest entity name we will look for between `&` and `;`
const MAX_ENTITY_LEN: usize = 8;

/// Escapes `'`, `"` (unless `ignore_quotes`), `<`, `>`, `&`, newline and `~`.
pub fn escape(text: &str, ignore_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\'' => result.push_str("&apos;"),
            '"' if !ignore_quotes => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '\n' => result.push_str("&#xD;"),
            '~' => result.push_str("&#126;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Same as [`escape`] but accepts an absent value, which escapes to `""`.
pub fn escape_opt(text: Option<&str>, ignore_quotes: bool) -> String {
    text.map(|t| escape(t, ignore_quotes)).unwrap_or_default()
}

/// Reverses [`escape`]. Unknown `&name;` sequences are kept verbatim.
pub fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        let (before, tail) = rest.split_at(amp);
        result.push_str(before);

        let decoded = tail
            .get(1..)
            .and_then(|after| {
                after
                    .bytes()
                    .take(MAX_ENTITY_LEN + 1)
                    .position(|b| b == b';')
            })
            .and_then(|end| {
                let name = tail.get(1..=end)?;
                let ch = match name {
                    "amp" => '&',
                    "apos" => '\'',
                    "quot" => '"',
                    "lt" => '<',
                    "gt" => '>',
                    "#xD" => '\n',
                    "#126" => '~',
                    _ => {
                        if !name.is_empty()
                            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '#')
                        {
                            warn!("unrecognized entity &{};", name);
                        }
                        return None;
                    }
                };
                Some((ch, end + 2))
            });

        match decoded {
            Some((ch, consumed)) => {
                result.push(ch);
                rest = tail.get(consumed..).unwrap_or_default();
            }
            None => {
                result.push('&');
                rest = tail.get(1..).unwrap_or_default();
            }
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_fixed_set() {
        assert_eq!(
            escape("a'b\"c<d>e&f\ng~h", false),
            "a&apos;b&quot;c&lt;d&gt;e&amp;f&#xD;g&#126;h"
        );
    }

    #[test]
    fn test_escape_ignore_quotes() {
        assert_eq!(escape("say \"hi\" 'you'", true), "say \"hi\" &apos;you&apos;");
    }

    #[test]
    fn test_escape_absent() {
        assert_eq!(escape_opt(None, false), "");
        assert_eq!(escape_opt(Some("<"), false), "&lt;");
    }

    #[test]
    fn test_unescape_fixed_set() {
        assert_eq!(
            unescape("&amp;&apos;&quot;&lt;&gt;&#xD;&#126;"),
            "&'\"<>\n~"
        );
    }

    #[test]
    fn test_unescape_unknown_passes_through() {
        assert_eq!(unescape("&nbsp; &copy;"), "&nbsp; &copy;");
        assert_eq!(unescape("fish & chips"), "fish & chips");
        assert_eq!(unescape("trailing &"), "trailing &");
        assert_eq!(unescape("&#10;"), "&#10;");
    }

    #[test]
    fn test_unescape_does_not_double_decode() {
        assert_eq!(unescape("&amp;lt;"), "&lt;");
        assert_eq!(unescape(&escape("&amp;", false)), "&amp;");
    }

    #[test]
    fn test_entity_search_is_bounded() {
        assert_eq!(unescape("&ampersand;"), "&ampersand;");
        assert_eq!(unescape("&amp ;"), "&amp ;");

        let ampersands = "&".repeat(1_000_000);
        let start = std::time::Instant::now();
        assert_eq!(unescape(&ampersands), ampersands);
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_unicode_untouched() {
        let text = "größe → 10 µm ✓";
        assert_eq!(escape(text, false), text);
        assert_eq!(unescape(text), text);
    }
}
