// Light/dark palettes applied to the browser chrome.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Colors the toolbar page paints with. `None` means "use the system palette".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub theme: Theme,
    pub window: Option<String>,
    pub window_text: Option<String>,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                theme: self,
                window: None,
                window_text: None,
            },
            Self::Dark => Palette {
                theme: self,
                window: Some(Rgb(53, 53, 53).css()),
                window_text: Some(Rgb(255, 255, 255).css()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_palette() {
        let palette = Theme::from_dark_mode(true).palette();
        assert_eq!(palette.window.as_deref(), Some("rgb(53, 53, 53)"));
        assert_eq!(palette.window_text.as_deref(), Some("rgb(255, 255, 255)"));

        let json = serde_json::to_value(&palette).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["windowText"], "rgb(255, 255, 255)");
    }

    #[test]
    fn test_light_uses_system_palette() {
        let palette = Theme::Light.palette();
        assert!(!Theme::Light.is_dark());
        assert_eq!(palette.window, None);
        assert_eq!(palette.window_text, None);
    }
}
