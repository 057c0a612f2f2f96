use ratatui::style::Color;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

/// Colours the UI is drawn with for a given preference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub error: Color,
}

impl ThemePreference {
    pub fn parse(text: &str) -> Option<ThemePreference> {
        return ThemePreference::iter().find(|e| return e.to_string() == text);
    }

    pub fn toggle(self) -> ThemePreference {
        match self {
            ThemePreference::Light => return ThemePreference::Dark,
            ThemePreference::Dark => return ThemePreference::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemePreference::Dark => {
                return Palette {
                    background: Color::Rgb(30, 30, 36),
                    foreground: Color::Rgb(224, 224, 230),
                    muted: Color::Rgb(128, 128, 140),
                    accent: Color::Rgb(97, 175, 239),
                    user: Color::Rgb(152, 195, 121),
                    error: Color::Rgb(224, 108, 117),
                };
            }
            ThemePreference::Light => {
                return Palette {
                    background: Color::Rgb(250, 250, 250),
                    foreground: Color::Rgb(36, 41, 47),
                    muted: Color::Rgb(110, 119, 129),
                    accent: Color::Rgb(9, 105, 218),
                    user: Color::Rgb(26, 127, 55),
                    error: Color::Rgb(207, 34, 46),
                };
            }
        }
    }
}
