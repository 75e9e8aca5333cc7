use gloo_net::http::Request;
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStreamDefaultReader, TextDecodeOptions, TextDecoder};

use crate::models::{ChatRequest, WireTurn};

/// Base URL of the relay server; empty means same origin. Set at build time,
/// e.g. `CHAT_API_BASE=http://localhost:3000 trunk serve`.
const API_BASE: &str = match option_env!("CHAT_API_BASE") {
    Some(base) => base,
    None => "",
};

/// Sends the conversation to the relay and feeds every decoded piece of the
/// streamed reply to `on_fragment` as it arrives.
pub async fn stream_chat(
    messages: Vec<WireTurn>,
    mut on_fragment: impl FnMut(String),
) -> Result<(), String> {
    let body = ChatRequest { messages };

    let resp = Request::post(&format!("{API_BASE}/api/chat"))
        .json(&body)
        .map_err(|e| format!("Serialize error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;

    if !resp.ok() {
        return Err(format!("Server error: {}", resp.status()));
    }

    let stream = resp.body().ok_or_else(|| "Response has no body".to_string())?;
    let reader: ReadableStreamDefaultReader = stream.get_reader().unchecked_into();
    // Streaming mode holds a character split across reads until it completes.
    let decoder = TextDecoder::new().map_err(|e| format!("Decoder error: {e:?}"))?;
    let options = TextDecodeOptions::new();
    options.set_stream(true);

    loop {
        let result = JsFuture::from(reader.read())
            .await
            .map_err(|e| format!("Stream error: {e:?}"))?;

        let done = Reflect::get(&result, &JsValue::from_str("done"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if done {
            break;
        }

        let value = Reflect::get(&result, &JsValue::from_str("value"))
            .map_err(|e| format!("Stream error: {e:?}"))?;
        let text = decoder
            .decode_with_buffer_source_and_options(&Uint8Array::new(&value), &options)
            .map_err(|e| format!("Decode error: {e:?}"))?;
        if !text.is_empty() {
            on_fragment(text);
        }
    }

    let rest = decoder.decode().map_err(|e| format!("Decode error: {e:?}"))?;
    if !rest.is_empty() {
        on_fragment(rest);
    }
    Ok(())
}
