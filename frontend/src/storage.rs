use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::Storage;

use crate::models::{ChatTurn, Settings};
use crate::state::ChatState;

const MESSAGES_KEY: &str = "chat_messages";
const THEME_KEY: &str = "chat_theme";
const ACCENT_KEY: &str = "chat_accent";
const FONT_SIZE_KEY: &str = "chat_fontSize";

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Parses a stored JSON value, falling back to `default` when it is missing
/// or unreadable.
pub fn decode_or<T: DeserializeOwned>(raw: Option<String>, default: T) -> T {
    raw.and_then(|s| serde_json::from_str::<Option<T>>(&s).ok().flatten())
        .unwrap_or(default)
}

/// Restores the persisted conversation and settings.
pub fn load() -> ChatState {
    let Some(storage) = local_storage() else {
        return ChatState::default();
    };
    let get = |key: &str| storage.get_item(key).ok().flatten();

    let turns: Vec<ChatTurn> = decode_or(get(MESSAGES_KEY), Vec::new());
    let defaults = Settings::default();
    let settings = Settings {
        theme: decode_or(get(THEME_KEY), defaults.theme),
        accent: decode_or(get(ACCENT_KEY), defaults.accent),
        font_size: decode_or(get(FONT_SIZE_KEY), defaults.font_size),
    };
    ChatState::new(turns, settings)
}

pub fn save(turns: &[ChatTurn], settings: &Settings) {
    let Some(storage) = local_storage() else {
        return;
    };
    write(&storage, MESSAGES_KEY, &turns);
    write(&storage, THEME_KEY, &settings.theme);
    write(&storage, ACCENT_KEY, &settings.accent);
    write(&storage, FONT_SIZE_KEY, &settings.font_size);
}

fn write<T: Serialize + ?Sized>(storage: &Storage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => {
            if let Err(e) = storage.set_item(key, &json) {
                log::warn!("Failed to persist {key}: {e:?}");
            }
        }
        Err(e) => log::warn!("Failed to encode {key}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Accent, Theme};

    #[test]
    fn decode_falls_back_on_missing_null_or_garbage() {
        assert_eq!(decode_or(None, Theme::Dark), Theme::Dark);
        assert_eq!(decode_or(Some("null".into()), Accent::Blue), Accent::Blue);
        assert_eq!(decode_or(Some("{broken".into()), Accent::Blue), Accent::Blue);
        assert_eq!(decode_or(Some("\"teal\"".into()), Accent::Blue), Accent::Blue);
    }

    #[test]
    fn decode_reads_stored_values() {
        assert_eq!(decode_or(Some("\"light\"".into()), Theme::Dark), Theme::Light);
        let turns: Vec<ChatTurn> = decode_or(
            Some(r#"[{"id":7,"role":"assistant","content":"yo","createdAt":"x","reactions":["🔥"]}]"#.into()),
            Vec::new(),
        );
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].reactions, vec!["🔥".to_string()]);
    }
}
