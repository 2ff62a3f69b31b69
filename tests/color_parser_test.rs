use ratatui::style::Color;
use thinkboard::config::{rgb_to_256_color, rgb_to_basic_ansi, ColorParser, Theme, ThemeConfig};

// NO_COLOR turns every color into Reset
fn ensure_colors_enabled() {
    std::env::remove_var("NO_COLOR");
}

#[test]
fn test_parse_named_colors() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    assert_eq!(parser.parse("red").unwrap(), Color::Red);
    assert_eq!(parser.parse("Cyan").unwrap(), Color::Cyan);
    assert_eq!(parser.parse("  green ").unwrap(), Color::Green);
    assert_eq!(parser.parse("bright red").unwrap(), Color::Indexed(9));
    assert_eq!(parser.parse("BRIGHT_RED").unwrap(), Color::Indexed(9));
    assert_eq!(parser.parse("dark_grey").unwrap(), Color::Indexed(8));
    assert_eq!(parser.parse("light_gray").unwrap(), Color::Indexed(7));
}

#[test]
fn test_parse_reset_aliases() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    for name in ["reset", "default", "none"] {
        assert_eq!(parser.parse(name).unwrap(), Color::Reset);
    }
}

#[test]
fn test_parse_hex_colors() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    // the concrete color depends on the terminal's capabilities
    assert!(parser.parse("#dc2626").is_ok());
    assert!(parser.parse("#EA580C").is_ok());

    assert!(parser.parse("#dc26").is_err());
    assert!(parser.parse("#dc262600").is_err());
    assert!(parser.parse("dc2626").is_err());
    assert!(parser.parse("#gggggg").is_err());
}

#[test]
fn test_parse_indexed_colors() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    assert_eq!(parser.parse("indexed(0)").unwrap(), Color::Indexed(0));
    assert_eq!(parser.parse("INDEXED(234)").unwrap(), Color::Indexed(234));

    assert!(parser.parse("indexed(-1)").is_err());
    assert!(parser.parse("indexed()").is_err());
    assert!(parser.parse("indexed(256)").is_err());
}

#[test]
fn test_parse_unknown_color_name() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    let err = parser.parse("crimson").unwrap_err();
    assert!(err.to_string().contains("Unknown color name"));
}

#[test]
fn test_rgb_fallbacks() {
    assert_eq!(rgb_to_256_color(0, 0, 0), 16);
    assert_eq!(rgb_to_256_color(255, 255, 255), 231);
    assert_eq!(rgb_to_256_color(255, 0, 0), 196);
    assert_eq!(rgb_to_basic_ansi(220, 38, 38), Color::Red);
    assert_eq!(rgb_to_basic_ansi(10, 10, 10), Color::Black);
    assert_eq!(rgb_to_basic_ansi(0, 200, 200), Color::Cyan);
}

#[test]
fn test_theme_from_default_config() {
    ensure_colors_enabled();
    let theme = Theme::from_config(&ThemeConfig::default()).unwrap();

    assert_eq!(theme.get("success"), Color::Green);
    assert_eq!(theme.get("surface"), Color::Indexed(234));
    assert_eq!(theme.get("background"), Color::Reset);
    assert_eq!(theme.get("no_such_key"), Color::Reset);
    assert!(theme.get_optional("chart_series_color_1").is_some());
}

#[test]
fn test_theme_rejects_bad_color() {
    ensure_colors_enabled();
    let mut config = ThemeConfig::default();
    config.colors.error = "#12345".to_string();

    assert!(Theme::from_config(&config).is_err());
}
