/// Tunables for the drawing screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub publish_interval_ms: i32,
    pub publish_padding: f64,
    pub image_mime: &'static str,
    pub image_quality: f64,
    pub image_filename: &'static str,
    pub brush_sizes: [f64; 3],
    pub eraser_size: f64,
    pub eraser_color: &'static str,
    pub default_color: &'static str,
    pub reconnect: ReconnectConfig,
    /// Fetch and show the word as soon as the screen starts.
    pub reveal_word_on_start: bool,
    pub debug: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u32,
    pub max_delay_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            publish_interval_ms: 1_500,
            publish_padding: 18.0,
            image_mime: "image/webp",
            image_quality: 0.1,
            image_filename: "image.webp",
            brush_sizes: [3.0, 6.0, 12.0],
            eraser_size: 12.0,
            eraser_color: "#ffffff",
            default_color: "#000000",
            reconnect: ReconnectConfig {
                max_attempts: 5,
                base_delay_ms: 2_000,
                max_delay_ms: 10_000,
            },
            reveal_word_on_start: false,
            debug: false,
        }
    }
}

impl Config {
    /// Applies page query flags (`?debug=1`, `?log=true`, `?reveal=1`) on top
    /// of the defaults.
    pub fn from_query(search: &str) -> Self {
        let mut config = Config::default();
        for pair in search.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let enabled = matches!(value, "1" | "true");
            match key {
                "debug" | "log" if enabled => config.debug = true,
                "reveal" if enabled => config.reveal_word_on_start = true,
                _ => {}
            }
        }
        config
    }

    pub fn log_level(&self) -> log::Level {
        if self.debug {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_screen_constants() {
        let config = Config::default();
        assert_eq!(config.publish_interval_ms, 1_500);
        assert_eq!(config.publish_padding, 18.0);
        assert_eq!(config.brush_sizes, [3.0, 6.0, 12.0]);
        assert_eq!(config.eraser_color, "#ffffff");
        assert!(!config.debug);
    }

    #[test]
    fn debug_flag_from_query() {
        assert!(Config::from_query("?debug=1").debug);
        assert!(Config::from_query("?tgWebAppStartParam=abc&log=true").debug);
        assert!(!Config::from_query("?debug=0").debug);
        assert!(!Config::from_query("").debug);
    }

    #[test]
    fn reveal_flag_from_query() {
        assert!(Config::from_query("?reveal=1").reveal_word_on_start);
        assert!(!Config::from_query("?debug=1").reveal_word_on_start);
    }

    #[test]
    fn debug_raises_log_level() {
        assert_eq!(Config::from_query("?debug=true").log_level(), log::Level::Debug);
        assert_eq!(Config::default().log_level(), log::Level::Info);
    }
}
