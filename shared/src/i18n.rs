use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

const EN: &[(&str, &str)] = &[
    ("close", "Close"),
    ("word", "Word"),
    ("not_host", "You`re not the host"),
    ("ended", "Game ended"),
    ("not_auth", "No authorization"),
    ("already_connected", "The host is already connected"),
    ("error", "Error"),
];

const RU: &[(&str, &str)] = &[
    ("close", "Закрыть"),
    ("word", "Слово"),
    ("not_host", "Вы не ведущий"),
    ("ended", "Игра закончилась"),
    ("not_auth", "Нет авторизации"),
    ("already_connected", "Ведущий уже подключен"),
    ("error", "Ошибка"),
];

impl Locale {
    /// Picks a supported locale from a code like `ru` or `en-US`.
    pub fn from_code(code: &str) -> Option<Self> {
        let language = code.split('-').next()?.trim().to_ascii_lowercase();
        match language.as_str() {
            "en" => Some(Locale::En),
            "ru" => Some(Locale::Ru),
            _ => None,
        }
    }

    /// The user's language from the host wins over the platform one.
    pub fn resolve(user_language: Option<&str>, platform_language: Option<&str>) -> Self {
        user_language
            .and_then(Locale::from_code)
            .or_else(|| platform_language.and_then(Locale::from_code))
            .unwrap_or_default()
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Locale::En => EN,
            Locale::Ru => RU,
        }
    }

    /// Looks up `key`, falling back to the key itself.
    pub fn tr<'a>(self, key: &'a str) -> &'a str {
        self.table()
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, text)| *text)
            .unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_suffix_is_ignored() {
        assert_eq!(Locale::from_code("ru-RU"), Some(Locale::Ru));
        assert_eq!(Locale::from_code("EN-gb"), Some(Locale::En));
    }

    #[test]
    fn unsupported_locale_falls_back_to_english() {
        assert_eq!(Locale::resolve(None, Some("de-DE")), Locale::En);
        assert_eq!(Locale::resolve(None, None), Locale::En);
    }

    #[test]
    fn user_language_overrides_platform() {
        assert_eq!(Locale::resolve(Some("ru"), Some("en-US")), Locale::Ru);
        assert_eq!(Locale::resolve(Some("pt-br"), Some("ru")), Locale::Ru);
    }

    #[test]
    fn known_keys_translate() {
        assert_eq!(Locale::En.tr("ended"), "Game ended");
        assert_eq!(Locale::Ru.tr("close"), "Закрыть");
    }

    #[test]
    fn unknown_key_falls_back_to_itself() {
        assert_eq!(Locale::Ru.tr("banned"), "banned");
    }

    #[test]
    fn every_locale_has_every_key() {
        for locale in [Locale::En, Locale::Ru] {
            for (key, _) in EN {
                assert_ne!(locale.tr(key), *key, "{locale:?} misses {key}");
            }
        }
    }
}
