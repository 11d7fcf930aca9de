//! HTML character reference decoding for dump text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([A-Za-z][A-Za-z0-9]{1,31}));").unwrap()
});

/// Decode numeric and common named character references in a single pass.
///
/// Unknown names and invalid code points are left as written.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    ENTITY.replace_all(input, |caps: &Captures<'_>| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            caps.get(3).and_then(|name| named_entity(name.as_str()))
        };

        match decoded {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "laquo" => '«',
        "raquo" => '»',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "bull" => '•',
        "middot" => '·',
        "times" => '×',
        "divide" => '÷',
        "deg" => '°',
        "plusmn" => '±',
        "sect" => '§',
        "para" => '¶',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "euro" => '€',
        "pound" => '£',
        "yen" => '¥',
        "cent" => '¢',
        "shy" => '\u{ad}',
        "Tab" => '\t',
        "NewLine" => '\n',
        "lbrack" => '[',
        "rbrack" => ']',
        "lbrace" => '{',
        "rbrace" => '}',
        "colon" => ':',
        "comma" => ',',
        "period" => '.',
        "excl" => '!',
        "quest" => '?',
        "num" => '#',
        "dollar" => '$',
        "percnt" => '%',
        "lpar" => '(',
        "rpar" => ')',
        "ast" => '*',
        "plus" => '+',
        "equals" => '=',
        "sol" => '/',
        "bsol" => '\\',
        "verbar" => '|',
        "lowbar" => '_',
        "grave" => '`',
        "Hat" => '^',
        "semi" => ';',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ampersand_borrows() {
        assert!(matches!(decode_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_named_and_numeric() {
        assert_eq!(
            decode_entities("a &amp; b &lt;c&gt; &#039;d&#039; &#x263A; &hellip;"),
            "a & b <c> 'd' ☺ …"
        );
    }

    #[test]
    fn test_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_unknown_entities_are_kept() {
        assert_eq!(decode_entities("&bogus; &#xFFFFFF; AT&T"), "&bogus; &#xFFFFFF; AT&T");
    }
}
