//! Character reference decoding for parsed HTML text.

/// Decode an entity reference name (without `&` and `;`) to its text.
///
/// Numeric references (`#39`, `#x27`) and the named entities common in
/// rendered Markdown are decoded. Anything else is preserved verbatim as
/// `&name;` so no text is silently dropped.
pub(crate) fn decode_entity(name: &str) -> String {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = if let Some(hex) = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'))
        {
            u32::from_str_radix(hex, 16).ok()
        } else {
            numeric.parse::<u32>().ok()
        };
        return code
            .and_then(char::from_u32)
            .map_or_else(|| format!("&{name};"), |c| c.to_string());
    }

    named_entity(name).map_or_else(|| format!("&{name};"), str::to_owned)
}

/// Map a named entity to its Unicode text.
fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{00a0}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "bull" => "\u{2022}",
        "hellip" => "\u{2026}",
        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",
        "harr" => "\u{2194}",
        "uarr" => "\u{2191}",
        "darr" => "\u{2193}",
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "ne" => "\u{2260}",
        "plusmn" => "\u{00b1}",
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "euro" => "\u{20ac}",
        "pound" => "\u{00a3}",
        "yen" => "\u{00a5}",
        "cent" => "\u{00a2}",
        "deg" => "\u{00b0}",
        "para" => "\u{00b6}",
        "sect" => "\u{00a7}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "middot" => "\u{00b7}",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic_entities() {
        assert_eq!(decode_entity("lt"), "<");
        assert_eq!(decode_entity("amp"), "&");
        assert_eq!(decode_entity("quot"), "\"");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entity("#x27"), "'");
        assert_eq!(decode_entity("#39"), "'");
        assert_eq!(decode_entity("#X2014"), "\u{2014}");
    }

    #[test]
    fn test_decode_named_entity() {
        assert_eq!(decode_entity("nbsp"), "\u{00a0}");
    }

    #[test]
    fn test_unknown_entity_preserved() {
        assert_eq!(decode_entity("bogus"), "&bogus;");
        assert_eq!(decode_entity("#xZZ"), "&#xZZ;");
    }
}
