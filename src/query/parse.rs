//! Request string tokenizer and value parsers.

use alloc::string::String;
use alloc::vec::Vec;

use super::ParseWarning;
use super::color::parse_color;
use super::instructions::Instructions;
use crate::resolve::Anchor;

/// Parse a request string into Instructions + warnings.
pub(crate) fn parse_query(query: &str) -> (Instructions, Vec<ParseWarning>) {
    let mut inst = Instructions::new();
    let mut warnings = Vec::new();

    for pair in split_query(query) {
        let (raw_key, raw_value) = split_pair(pair);
        let key = percent_decode(raw_key).to_ascii_lowercase();
        let value = percent_decode(raw_value);

        dispatch_key(&key, &value, &mut inst, &mut warnings);
    }

    (inst, warnings)
}

fn dispatch_key(key: &str, value: &str, inst: &mut Instructions, warnings: &mut Vec<ParseWarning>) {
    match key {
        "w" | "width" => match parse_dimension(value) {
            Some(w) => set_or_warn(&mut inst.w, w, key, value, warnings),
            None => invalid(key, value, "expected a positive integer", warnings),
        },
        "h" | "height" => match parse_dimension(value) {
            Some(h) => set_or_warn(&mut inst.h, h, key, value, warnings),
            None => invalid(key, value, "expected a positive integer", warnings),
        },

        "crop" => match parse_bool(value) {
            Some(c) => set_or_warn(&mut inst.crop, c, key, value, warnings),
            None => invalid(key, value, "expected true|false|1|0|yes|no|on|off", warnings),
        },

        "anchor" | "far" => match Anchor::from_code(value) {
            Some(a) => set_or_warn(&mut inst.anchor, a, key, value, warnings),
            None => invalid(key, value, "expected L|R|T|B|TL|TR|BL|BR|C or a position name", warnings),
        },

        "iar" | "ignoreaspect" | "ignoreaspectratio" => match parse_bool(value) {
            Some(b) => set_or_warn(&mut inst.ignore_aspect_ratio, b, key, value, warnings),
            None => invalid(key, value, "expected true|false|1|0|yes|no|on|off", warnings),
        },
        // Legacy shortcut for iar=true; shares its field.
        "stretch" => {
            if value.trim().eq_ignore_ascii_case("fill") {
                set_or_warn(&mut inst.ignore_aspect_ratio, true, key, value, warnings);
            } else {
                invalid(key, value, "expected fill", warnings);
            }
        }

        "bgcolor" | "bg" => match parse_color(value) {
            Some(c) => set_or_warn(&mut inst.bgcolor, c, key, value, warnings),
            None => invalid(key, value, "expected #RGB, #RRGGBB, r,g,b or a color name", warnings),
        },

        _ => warnings.push(ParseWarning::KeyNotRecognized {
            key: String::from(key),
            value: String::from(value),
        }),
    }
}

/// Set a field, warning on duplicate.
fn set_or_warn<T>(
    field: &mut Option<T>,
    parsed: T,
    key: &str,
    value: &str,
    warnings: &mut Vec<ParseWarning>,
) {
    if field.is_some() {
        warnings.push(ParseWarning::DuplicateKey {
            key: String::from(key),
            value: String::from(value),
        });
    }
    *field = Some(parsed);
}

fn invalid(key: &str, value: &str, reason: &'static str, warnings: &mut Vec<ParseWarning>) {
    warnings.push(ParseWarning::ValueInvalid {
        key: canonical_key(key),
        value: String::from(value),
        reason,
    });
}

// ---- Value parsers ----

fn parse_dimension(s: &str) -> Option<i32> {
    s.trim().parse::<i32>().ok().filter(|&v| v > 0)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---- Query string tokenizer ----

/// Split query string on '&'.
fn split_query(query: &str) -> impl Iterator<Item = &str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').filter(|s| !s.is_empty())
}

/// Split a single "key=value" pair on the first '='.
fn split_pair(pair: &str) -> (&str, &str) {
    pair.split_once('=').unwrap_or((pair, ""))
}

/// Percent-decode a URL component. Also handles '+' as space.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    out.push(hi << 4 | lo);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Static name for a recognized key, used in warnings.
fn canonical_key(key: &str) -> &'static str {
    match key {
        "w" | "width" => "w",
        "h" | "height" => "h",
        "crop" => "crop",
        "anchor" | "far" => "anchor",
        "iar" | "ignoreaspect" | "ignoreaspectratio" => "iar",
        "stretch" => "stretch",
        "bgcolor" | "bg" => "bgcolor",
        _ => "unknown",
    }
}
