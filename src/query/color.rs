//! Background color parsing: hex (`#RGB`, `#RRGGBB`), `r,g,b` triples and a
//! few names.

use crate::canvas::Background;

/// Parse a color string into a [`Background`].
///
/// Accepts:
/// - `#RGB` / `RGB`: 3-digit hex
/// - `#RRGGBB` / `RRGGBB`: 6-digit hex
/// - `r,g,b`: decimal components 0–255
/// - names (case-insensitive): `white`, `black`, `red`, `green`, `blue`,
///   `gray`/`grey`, `silver`
pub(crate) fn parse_color(s: &str) -> Option<Background> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains(',') {
        return parse_triple(s);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if let Some(c) = parse_hex(hex) {
        return Some(c);
    }

    lookup_named(s)
}

fn parse_hex(hex: &str) -> Option<Background> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let b = hex.as_bytes();
    match b.len() {
        3 => Some(Background::rgb(
            expand_nibble(b[0])?,
            expand_nibble(b[1])?,
            expand_nibble(b[2])?,
        )),
        6 => Some(Background::rgb(
            parse_byte(b[0], b[1])?,
            parse_byte(b[2], b[3])?,
            parse_byte(b[4], b[5])?,
        )),
        _ => None,
    }
}

fn parse_triple(s: &str) -> Option<Background> {
    let mut parts = s.split(',').map(|p| p.trim().parse::<u8>().ok());
    let r = parts.next()??;
    let g = parts.next()??;
    let b = parts.next()??;
    if parts.next().is_some() {
        return None;
    }
    Some(Background::rgb(r, g, b))
}

/// Expand a single hex nibble: 'f' → 0xFF, 'a' → 0xAA.
fn expand_nibble(ch: u8) -> Option<u8> {
    let n = hex_val(ch)?;
    Some(n << 4 | n)
}

fn parse_byte(hi: u8, lo: u8) -> Option<u8> {
    Some(hex_val(hi)? << 4 | hex_val(lo)?)
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn lookup_named(name: &str) -> Option<Background> {
    NAMED
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, rgb)| Background::from(rgb))
}

const NAMED: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_expands() {
        assert_eq!(parse_color("#fa0"), Some(Background::rgb(0xff, 0xaa, 0x00)));
        assert_eq!(parse_color("FFF"), Some(Background::WHITE));
    }

    #[test]
    fn long_hex() {
        assert_eq!(parse_color("#102030"), Some(Background::rgb(16, 32, 48)));
        assert_eq!(parse_color("  0a0B0c "), Some(Background::rgb(10, 11, 12)));
    }

    #[test]
    fn decimal_triple() {
        assert_eq!(parse_color("1, 2,3"), Some(Background::rgb(1, 2, 3)));
        assert_eq!(parse_color("1,2"), None);
        assert_eq!(parse_color("1,2,3,4"), None);
        assert_eq!(parse_color("1,2,256"), None);
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(parse_color("Black"), Some(Background::BLACK));
        assert_eq!(parse_color("GREY"), Some(Background::rgb(128, 128, 128)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }
}
