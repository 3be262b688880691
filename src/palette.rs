// Copyright (c) 2026 rezky_nightky

use crate::config::ConfigError;

/// 256-colour indices used by the rain. Drops flicker between the `head`
/// colours, then walk `lit` followed by `fade` towards the tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub head: Vec<u8>,
    pub lit: Vec<u8>,
    pub flash: u8,
    pub hidden: u8,
    gradient: Vec<u8>,
}

impl Palette {
    pub fn new(head: &[u8], lit: &[u8], fade: &[u8], flash: u8, hidden: u8) -> Self {
        let mut gradient = Vec::with_capacity(lit.len() + fade.len());
        gradient.extend_from_slice(lit);
        gradient.extend_from_slice(fade);
        Self {
            head: head.to_vec(),
            lit: lit.to_vec(),
            flash,
            hidden,
            gradient,
        }
    }

    /// Lit colours followed by fade colours, brightest first.
    pub fn gradient(&self) -> &[u8] {
        &self.gradient
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Forest,
    Moss,
    Autumn,
    Frost,
}

pub fn theme_from_str(s: &str) -> Result<Theme, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "forest" | "green" => Ok(Theme::Forest),
        "moss" | "swamp" => Ok(Theme::Moss),
        "autumn" | "fall" => Ok(Theme::Autumn),
        "frost" | "winter" | "snow" => Ok(Theme::Frost),
        _ => Err(ConfigError::UnknownTheme(s.to_string())),
    }
}

pub fn build_palette(theme: Theme) -> Palette {
    match theme {
        Theme::Forest => Palette::new(&[231, 195, 194], &[48, 41, 35], &[238], 231, 16),
        Theme::Moss => Palette::new(&[230, 194, 193], &[148, 107, 71, 65], &[239, 236], 230, 16),
        Theme::Autumn => Palette::new(&[231, 230, 223], &[214, 208, 166, 130], &[94, 238], 229, 16),
        Theme::Frost => Palette::new(&[231, 255, 195], &[159, 117, 75, 67], &[60, 238], 231, 16),
    }
}

pub fn print_list_themes() {
    println!("VALUE        DESCRIPTION");
    println!("forest       Bright greens over grey (alias: green)");
    println!("moss         Olive and moss greens (alias: swamp)");
    println!("autumn       Amber leaves turning brown (alias: fall)");
    println!("frost        Icy blues (aliases: winter, snow)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_is_lit_then_fade() {
        let p = build_palette(Theme::Forest);
        assert_eq!(p.gradient(), &[48, 41, 35, 238]);
    }

    #[test]
    fn theme_aliases_parse() {
        assert_eq!(theme_from_str("Winter").unwrap(), Theme::Frost);
        assert_eq!(theme_from_str(" green ").unwrap(), Theme::Forest);
        assert!(theme_from_str("plaid").is_err());
    }

    #[test]
    fn every_theme_has_head_and_gradient_colours() {
        for t in [Theme::Forest, Theme::Moss, Theme::Autumn, Theme::Frost] {
            let p = build_palette(t);
            assert!(!p.head.is_empty());
            assert!(p.gradient().len() >= 2);
        }
    }
}
