//! Primitive literal emitters.

/// Double-quoted JavaScript string literal.
///
/// Escaping follows `JSON.stringify`; U+2028 and U+2029 are escaped as well so
/// the literal also parses on engines that predate ES2019.
pub fn emit_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// JavaScript `Number.prototype.toString` form: shortest round-trip digits,
/// positional between 1e-6 and 1e21, exponent form (`1e+21`, `5e-324`)
/// outside that range.
pub fn emit_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `1.2345e20`.
    let sci = format!("{:e}", n.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exp: i32 = exp.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let point = exp + 1;
    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, sign, exp.abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, sign, exp.abs())
        }
    };

    if n < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

pub fn emit_bool(b: bool) -> String {
    if b { "true" } else { "false" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal JS string-literal reader used to check the round-trip law.
    fn parse_js_string(literal: &str) -> String {
        let inner = &literal[1..literal.len() - 1];
        let mut out = String::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next().unwrap() {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'b' => out.push('\u{08}'),
                'f' => out.push('\u{0C}'),
                'u' => {
                    let hex: String = chars.by_ref().take(4).collect();
                    out.push(char::from_u32(u32::from_str_radix(&hex, 16).unwrap()).unwrap());
                }
                other => out.push(other),
            }
        }
        out
    }

    #[test]
    fn test_string_round_trip() {
        let inputs = [
            "",
            "plain",
            "He said \"hi\"\n",
            "back\\slash",
            "tab\tand\rcr",
            "nul\u{0}bell\u{7}",
            "line\u{2028}sep\u{2029}",
            "unicode ✓ 漢字",
            "'single'",
        ];
        for s in inputs {
            let emitted = emit_string(s);
            assert!(emitted.starts_with('"') && emitted.ends_with('"'));
            assert!(!emitted[1..emitted.len() - 1].contains('\n'));
            assert_eq!(parse_js_string(&emitted), s, "round trip of {:?}", s);
        }
    }

    #[test]
    fn test_string_matches_json_for_common_input() {
        let s = "He said \"hi\"\n";
        assert_eq!(emit_string(s), serde_json::to_string(s).unwrap());
    }

    #[test]
    fn test_number_canonical_forms() {
        assert_eq!(emit_number(1.0), "1");
        assert_eq!(emit_number(-42.0), "-42");
        assert_eq!(emit_number(2.5), "2.5");
        assert_eq!(emit_number(-0.0), "0");
        assert_eq!(emit_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(emit_number(123.456), "123.456");
        assert_eq!(emit_number(0.000001), "0.000001");
        assert_eq!(emit_number(f64::INFINITY), "Infinity");
        assert_eq!(emit_number(f64::NAN), "NaN");
        assert_eq!(emit_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_number_large_and_small_magnitudes() {
        assert_eq!(emit_number(1.2345678901234568e20), "123456789012345680000");
        assert_eq!(emit_number(9007199254740993.0), "9007199254740992");
        assert_eq!(emit_number(1e21), "1e+21");
        assert_eq!(emit_number(-1.5e300), "-1.5e+300");
        assert_eq!(emit_number(1e-7), "1e-7");
        assert_eq!(emit_number(1.25e-7), "1.25e-7");
        assert_eq!(emit_number(5e-324), "5e-324");
        assert_eq!(emit_number(f64::MAX), "1.7976931348623157e+308");
    }

    #[test]
    fn test_bool() {
        assert_eq!(emit_bool(true), "true");
        assert_eq!(emit_bool(false), "false");
    }
}
