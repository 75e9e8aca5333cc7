use serde::{Deserialize, Serialize};

/// One rendered and persisted conversation entry.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub id: u64,
    pub role: String,
    pub content: String,
    /// ISO-8601 creation time.
    pub created_at: String,
    #[serde(default)]
    pub reactions: Vec<String>,
}

impl ChatTurn {
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }

    pub fn to_wire(&self) -> WireTurn {
        WireTurn {
            role: self.role.clone(),
            content: self.content.clone(),
        }
    }
}

/// Matches the backend `ChatTurn` model.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WireTurn {
    pub role: String,
    pub content: String,
}

/// Request body for `POST /api/chat`.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<WireTurn>,
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Blue,
    Purple,
    Emerald,
    Rose,
    Amber,
}

impl Accent {
    pub const ALL: [Accent; 5] = [
        Accent::Blue,
        Accent::Purple,
        Accent::Emerald,
        Accent::Rose,
        Accent::Amber,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Accent::Blue => "blue",
            Accent::Purple => "purple",
            Accent::Emerald => "emerald",
            Accent::Rose => "rose",
            Accent::Amber => "amber",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Accent::Blue => "Blue",
            Accent::Purple => "Purple",
            Accent::Emerald => "Emerald",
            Accent::Rose => "Rose",
            Accent::Amber => "Amber",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum FontSize {
    #[serde(rename = "text-sm")]
    Small,
    #[default]
    #[serde(rename = "text-[15px]")]
    Normal,
    #[serde(rename = "text-lg")]
    Large,
    #[serde(rename = "text-xl")]
    ExtraLarge,
}

impl FontSize {
    pub const ALL: [FontSize; 4] = [
        FontSize::Small,
        FontSize::Normal,
        FontSize::Large,
        FontSize::ExtraLarge,
    ];

    /// Persisted value.
    pub fn as_str(self) -> &'static str {
        match self {
            FontSize::Small => "text-sm",
            FontSize::Normal => "text-[15px]",
            FontSize::Large => "text-lg",
            FontSize::ExtraLarge => "text-xl",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FontSize::Small => "Small",
            FontSize::Normal => "Normal",
            FontSize::Large => "Large",
            FontSize::ExtraLarge => "Extra Large",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            FontSize::Small => "font-small",
            FontSize::Normal => "font-normal",
            FontSize::Large => "font-large",
            FontSize::ExtraLarge => "font-xlarge",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub accent: Accent,
    pub font_size: FontSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_uses_camel_case_and_defaults_reactions() {
        let turn: ChatTurn = serde_json::from_str(
            r#"{"id":1,"role":"user","content":"hi","createdAt":"2024-01-01T00:00:00.000Z"}"#,
        )
        .unwrap();
        assert!(turn.reactions.is_empty());
        assert!(serde_json::to_string(&turn).unwrap().contains("\"createdAt\""));
    }

    #[test]
    fn settings_serialize_to_stored_values() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Accent::Emerald).unwrap(), "\"emerald\"");
        assert_eq!(serde_json::to_string(&FontSize::Normal).unwrap(), "\"text-[15px]\"");
        assert_eq!(FontSize::parse("text-xl"), Some(FontSize::ExtraLarge));
        assert_eq!(Accent::parse("teal"), None);
    }
}
