use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::models::ChatTurn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain",
        }
    }
}

pub fn to_json(turns: &[ChatTurn]) -> Result<String, String> {
    serde_json::to_string_pretty(turns).map_err(|e| format!("Serialize error: {e}"))
}

/// Plain transcript: `ROLE [time]:` header, content, a 50-dash rule, and a
/// blank line between turns. `format_time` renders the stored ISO timestamp.
pub fn to_transcript(turns: &[ChatTurn], format_time: impl Fn(&str) -> String) -> String {
    let rule = "-".repeat(50);
    turns
        .iter()
        .map(|t| {
            format!(
                "{} [{}]:\n{}\n{rule}",
                t.role.to_uppercase(),
                format_time(&t.created_at),
                t.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `chat-export-YYYY-MM-DD.<ext>` from an ISO-8601 timestamp.
pub fn file_name(iso_now: &str, format: ExportFormat) -> String {
    let date = iso_now.split('T').next().unwrap_or(iso_now);
    format!("chat-export-{date}.{}", format.extension())
}

/// Renders the stored timestamp in the browser's locale.
pub fn local_time(iso: &str) -> String {
    js_sys::Date::new(&JsValue::from_str(iso))
        .to_locale_string("default", &JsValue::UNDEFINED)
        .into()
}

/// Serializes `turns` and hands the file to the browser as a download.
pub fn download(turns: &[ChatTurn], format: ExportFormat, iso_now: &str) -> Result<(), String> {
    let content = match format {
        ExportFormat::Json => to_json(turns)?,
        ExportFormat::Text => to_transcript(turns, local_time),
    };
    trigger_download(&file_name(iso_now, format), format.mime_type(), &content)
        .map_err(|e| format!("Download failed: {e:?}"))
}

fn trigger_download(name: &str, mime: &str, content: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(JsValue::from)?;
    anchor.set_href(&url);
    anchor.set_download(name);
    anchor.click();

    Url::revoke_object_url(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(id: u64, role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            id,
            role: role.to_string(),
            content: content.to_string(),
            created_at: format!("2024-05-01T10:00:0{id}.000Z"),
            reactions: Vec::new(),
        }
    }

    #[test]
    fn transcript_layout() {
        let turns = [turn(1, "user", "hi"), turn(2, "assistant", "Hello\nthere")];
        let text = to_transcript(&turns, |iso| iso.to_string());
        let rule = "-".repeat(50);
        assert_eq!(
            text,
            format!(
                "USER [2024-05-01T10:00:01.000Z]:\nhi\n{rule}\n\nASSISTANT [2024-05-01T10:00:02.000Z]:\nHello\nthere\n{rule}"
            )
        );
    }

    #[test]
    fn json_export_is_pretty_and_complete() {
        let json = to_json(&[turn(1, "user", "hi")]).unwrap();
        assert!(json.starts_with("[\n  {"));
        assert!(json.contains("\"createdAt\": \"2024-05-01T10:00:01.000Z\""));
    }

    #[test]
    fn empty_conversation_exports_empty() {
        assert_eq!(to_transcript(&[], |s| s.to_string()), "");
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn file_name_uses_date_part() {
        assert_eq!(
            file_name("2024-05-01T10:00:00.000Z", ExportFormat::Text),
            "chat-export-2024-05-01.txt"
        );
        assert_eq!(
            file_name("2024-05-01T10:00:00.000Z", ExportFormat::Json),
            "chat-export-2024-05-01.json"
        );
    }
}
