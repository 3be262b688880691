// Copyright (c) 2026 rezky_nightky

use std::char;

use crate::config::ConfigError;

/// Forest glyphs: trees, flowers, clovers and leaves.
const FOREST_CODE_POINTS: [u32; 18] = [
    985, 1126, 9035, 9062, 9753, 9872, 9880, 9906, 9910, 10047, 10048, 10086, 10087, 11439,
    11801, 128598, 128782, 129990,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    Forest,
    Leaves,
    Runic,
    Katakana,
    Binary,
    AsciiSafe,
}

pub fn charset_from_str(spec: &str, default_to_ascii: bool) -> Result<Charset, ConfigError> {
    match spec.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(if default_to_ascii {
            Charset::AsciiSafe
        } else {
            Charset::Forest
        }),
        "forest" | "trees" => Ok(Charset::Forest),
        "leaves" | "flora" => Ok(Charset::Leaves),
        "runic" | "runes" => Ok(Charset::Runic),
        "katakana" => Ok(Charset::Katakana),
        "bin" | "binary" | "01" => Ok(Charset::Binary),
        "ascii" => Ok(Charset::AsciiSafe),
        _ => Err(ConfigError::UnknownCharset(spec.to_string())),
    }
}

pub fn parse_user_hex_chars(s: &str) -> Result<Vec<char>, ConfigError> {
    let mut out = Vec::new();
    for (i, part) in s.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let v = u32::from_str_radix(part, 16).map_err(|_| ConfigError::InvalidChar {
            index: i + 1,
            reason: "invalid hex",
        })?;
        let ch = char::from_u32(v).ok_or(ConfigError::InvalidChar {
            index: i + 1,
            reason: "invalid unicode scalar",
        })?;
        out.push(ch);
    }
    Ok(out)
}

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    for v in start..=end {
        if let Some(ch) = char::from_u32(v) {
            out.push(ch);
        }
    }
}

/// Glyphs for `charset`, or `custom` verbatim when it is non-empty.
pub fn build_chars(charset: Charset, custom: &[char]) -> Vec<char> {
    if !custom.is_empty() {
        return custom.to_vec();
    }

    let mut out: Vec<char> = Vec::new();
    match charset {
        Charset::Forest => {
            out.extend(FOREST_CODE_POINTS.iter().filter_map(|&v| char::from_u32(v)));
        }
        Charset::Leaves => out.extend("♣♧⚘❀❁❦❧✿⸙⍋⍦ϙѦ".chars()),
        Charset::Runic => push_range(&mut out, 0x16A0, 0x16EA),
        Charset::Katakana => push_range(&mut out, 0xFF66, 0xFF9D),
        Charset::Binary => push_range(&mut out, 0x30, 0x31),
        Charset::AsciiSafe => {
            push_range(&mut out, 0x41, 0x5A);
            push_range(&mut out, 0x30, 0x39);
        }
    }

    if out.is_empty() {
        out.push('0');
        out.push('1');
    }

    out
}

pub fn print_list_charsets() {
    println!("VALUE        DESCRIPTION");
    println!("auto         Auto-select (ascii when the locale is not UTF-8, otherwise forest)");
    println!("forest       Trees, flowers, clovers and leaves (alias: trees)");
    println!("leaves       Single-width flora only (alias: flora)");
    println!("runic        Runic");
    println!("katakana     Half-width katakana");
    println!("binary       0 and 1 (aliases: bin, 01)");
    println!("ascii        Letters and digits");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_user_hex_chars_parses_hex_codepoints() {
        let v = parse_user_hex_chars("2663, 2698").unwrap();
        assert_eq!(v, vec!['♣', '⚘']);
    }

    #[test]
    fn parse_user_hex_chars_reports_bad_index() {
        let err = parse_user_hex_chars("30,zz").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChar { index: 2, .. }));
    }

    #[test]
    fn charset_auto_selects_ascii_when_non_utf() {
        assert_eq!(charset_from_str("auto", true).unwrap(), Charset::AsciiSafe);
        assert_eq!(charset_from_str("auto", false).unwrap(), Charset::Forest);
    }

    #[test]
    fn forest_has_every_code_point() {
        let out = build_chars(Charset::Forest, &[]);
        assert_eq!(out.len(), FOREST_CODE_POINTS.len());
        assert!(out.contains(&'⚘'));
        assert!(out.contains(&'❦'));
    }

    #[test]
    fn custom_chars_replace_preset() {
        assert_eq!(build_chars(Charset::Forest, &['a', 'b']), vec!['a', 'b']);
    }
}
