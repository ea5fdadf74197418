//! Backend calls: the one-shot grid fetch and the streamed chat response.

use gloo_net::http::Request;
use js_sys::{Reflect, Uint8Array};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::model::{Grid, Highlight, Rgba, TileKey};

pub const GRID_PATH: &str = "/api/grid";
pub const CHAT_PATH: &str = "/api/chat";

pub async fn fetch_grid(config: &ViewerConfig) -> Result<Grid, ViewerError> {
    let url = config.endpoint(GRID_PATH);
    log::debug!("fetching grid from {}", url);
    let resp = Request::get(&url).send().await?;
    let status = resp.status();
    let payload: Value = match resp.json().await {
        Ok(v) => v,
        Err(_) if !resp.ok() => return Err(ViewerError::Http { status }),
        Err(e) => return Err(e.into()),
    };
    let grid = Grid::from_json(payload)?;
    log::info!("loaded {} cells (max score {:.3})", grid.len(), grid.max_score());
    Ok(grid)
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    thread_id: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChatEvent {
    Text(String),
    Highlight(Vec<Highlight>),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Text { content: String },
    Highlight { tiles: Vec<Value> },
}

/// Parses one NDJSON record. Blank lines yield `Ok(None)`.
pub fn parse_chat_line(line: &str) -> Result<Option<ChatEvent>, ViewerError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let event = match serde_json::from_str::<WireEvent>(line)? {
        WireEvent::Text { content } => ChatEvent::Text(content),
        WireEvent::Highlight { tiles } => ChatEvent::Highlight(highlights_from_wire(&tiles)),
    };
    Ok(Some(event))
}

/// Tiles lacking an in-range integer `row` or `col` are dropped; a malformed `color`
/// falls back to the default highlight colour.
pub fn highlights_from_wire(tiles: &[Value]) -> Vec<Highlight> {
    let coord = |tile: &Value, key: &str| -> Option<i32> {
        let v = tile.get(key)?;
        let wide = v
            .as_i64()
            .or_else(|| {
                v.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .or_else(|| v.as_str().and_then(|s| s.trim().parse::<i64>().ok()))?;
        i32::try_from(wide).ok()
    };
    tiles
        .iter()
        .filter_map(|tile| {
            let (Some(row), Some(col)) = (coord(tile, "row"), coord(tile, "col")) else {
                log::warn!("dropping highlight tile without row/col: {}", tile);
                return None;
            };
            let color = tile
                .get("color")
                .and_then(Value::as_array)
                .and_then(|arr| arr.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>())
                .and_then(|c| Rgba::from_components(&c));
            Some(Highlight { key: TileKey::new(row, col), color })
        })
        .collect()
}

/// Splits a byte stream into newline-delimited records. Partial lines stay
/// buffered until their terminator arrives.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buf: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let text = text.trim_end_matches('\r');
            if !text.trim().is_empty() {
                lines.push(text.to_string());
            }
        }
        lines
    }

    /// Whatever is left once the stream ends, if it is not blank.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buf);
        let text = String::from_utf8_lossy(&rest).trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

/// Feeds one body chunk through `decoder` and dispatches every completed line.
/// Malformed lines are logged and skipped; later lines still arrive.
pub fn dispatch_chunk(decoder: &mut NdjsonDecoder, chunk: &[u8], on_event: &mut impl FnMut(ChatEvent)) {
    for line in decoder.push(chunk) {
        dispatch_line(&line, on_event);
    }
}

/// Dispatches the unterminated tail once the body is exhausted.
pub fn dispatch_tail(decoder: &mut NdjsonDecoder, on_event: &mut impl FnMut(ChatEvent)) {
    if let Some(line) = decoder.finish() {
        dispatch_line(&line, on_event);
    }
}

fn dispatch_line(line: &str, on_event: &mut impl FnMut(ChatEvent)) {
    match parse_chat_line(line) {
        Ok(Some(event)) => on_event(event),
        Ok(None) => {}
        Err(err) => log::warn!("skipping malformed chat line ({}): {}", err, line),
    }
}

/// Sends a chat message and feeds each streamed record to `on_event` in
/// arrival order. Returns once the stream is exhausted.
pub async fn stream_chat(
    config: &ViewerConfig,
    message: &str,
    thread_id: u64,
    mut on_event: impl FnMut(ChatEvent),
) -> Result<(), ViewerError> {
    let url = config.endpoint(CHAT_PATH);
    let resp = Request::post(&url)
        .json(&ChatRequest { message, thread_id })?
        .send()
        .await?;
    if !resp.ok() {
        return Err(ViewerError::Http { status: resp.status() });
    }
    let body = resp.body().ok_or(ViewerError::MissingBody)?;
    let reader: ReadableStreamDefaultReader = body
        .get_reader()
        .dyn_into()
        .map_err(|_| ViewerError::Stream("body reader is not a default reader".into()))?;

    let mut decoder = NdjsonDecoder::default();
    loop {
        let chunk = JsFuture::from(reader.read())
            .await
            .map_err(|e| ViewerError::Stream(format!("{:?}", e)))?;
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value = Reflect::get(&chunk, &JsValue::from_str("value"))?;
        let bytes = Uint8Array::new(&value).to_vec();
        dispatch_chunk(&mut decoder, &bytes, &mut on_event);
    }
    dispatch_tail(&mut decoder, &mut on_event);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decoder_buffers_partial_lines() {
        let mut d = NdjsonDecoder::default();
        assert!(d.push(b"{\"type\":\"te").is_empty());
        assert_eq!(
            d.push(b"xt\",\"content\":\"Hi\"}\n{\"type\""),
            vec!["{\"type\":\"text\",\"content\":\"Hi\"}".to_string()]
        );
        assert_eq!(d.push(b":\"text\",\"content\":\"!\"}\r\n\n"), vec![
            "{\"type\":\"text\",\"content\":\"!\"}".to_string()
        ]);
        assert_eq!(d.finish(), None);
    }

    #[test]
    fn decoder_keeps_multibyte_chars_split_across_chunks() {
        let mut d = NdjsonDecoder::default();
        let bytes = "\"Tiefsee 🌊\"\n".as_bytes();
        let (a, b) = bytes.split_at(11);
        assert!(d.push(a).is_empty());
        assert_eq!(d.push(b), vec!["\"Tiefsee 🌊\"".to_string()]);
    }

    #[test]
    fn decoder_flushes_unterminated_tail() {
        let mut d = NdjsonDecoder::default();
        assert!(d.push(b"{\"type\":\"text\",\"content\":\"end\"}").is_empty());
        assert_eq!(d.finish(), Some("{\"type\":\"text\",\"content\":\"end\"}".to_string()));
    }

    #[test]
    fn parses_text_and_highlight_events() {
        assert_eq!(
            parse_chat_line(r#"{"type":"text","content":"Deep trench ahead"}"#).unwrap(),
            Some(ChatEvent::Text("Deep trench ahead".into()))
        );
        let event = parse_chat_line(
            r#"{"type":"highlight","tiles":[{"row":1,"col":1,"color":[9,9,9]},{"row":2,"col":3},{"col":4}]}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            Some(ChatEvent::Highlight(vec![
                Highlight::new(1, 1).with_color(Rgba::rgb(9, 9, 9)),
                Highlight::new(2, 3),
            ]))
        );
        assert_eq!(parse_chat_line("   ").unwrap(), None);
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert!(matches!(parse_chat_line("{not json"), Err(ViewerError::Decode(_))));
        assert!(parse_chat_line(r#"{"type":"tool_call","name":"x"}"#).is_err());
    }

    #[test]
    fn bad_line_mid_stream_is_skipped() {
        let mut decoder = NdjsonDecoder::default();
        let mut events = Vec::new();
        let mut collect = |e: ChatEvent| events.push(e);
        dispatch_chunk(
            &mut decoder,
            b"{\"type\":\"text\",\"content\":\"one\"}\n{bad\n{\"type\":\"te",
            &mut collect,
        );
        dispatch_chunk(&mut decoder, b"xt\",\"content\":\"two\"}", &mut collect);
        dispatch_tail(&mut decoder, &mut collect);
        assert_eq!(events, vec![ChatEvent::Text("one".into()), ChatEvent::Text("two".into())]);
    }

    #[test]
    fn out_of_range_tile_coordinates_are_dropped() {
        let tiles = vec![
            json!({ "row": 4294967297_i64, "col": 1 }),
            json!({ "row": 1, "col": -4294967295.0 }),
            json!({ "row": "99999999999", "col": 1 }),
            json!({ "row": 2, "col": 3 }),
        ];
        assert_eq!(highlights_from_wire(&tiles), vec![Highlight::new(2, 3)]);
    }

    #[test]
    fn wire_tiles_accept_loose_numbers() {
        let tiles = vec![
            json!({ "row": 4.0, "col": "7", "color": [1, 2, 3, 40] }),
            json!({ "row": 1, "col": 1, "color": "red" }),
        ];
        assert_eq!(
            highlights_from_wire(&tiles),
            vec![
                Highlight::new(4, 7).with_color(Rgba::new(1, 2, 3, 40)),
                Highlight::new(1, 1),
            ]
        );
    }
}
