//! Core data models for the abyssal survey grid.
//! Cells arrive once from `/api/grid` and are never mutated afterwards;
//! interaction state (selection, highlights, view mode) lives in `state::view`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::error::ViewerError;

/// Deepest depth rendered; elevation is measured up from here.
pub const MAX_DEPTH: f64 = 7000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKey {
    pub row: i32,
    pub col: i32,
}

impl TileKey {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Slope,
    Seamount,
    Plain,
    Trench,
    Hydrothermal,
    Unknown,
}

impl Biome {
    pub const KNOWN: [Biome; 5] = [
        Biome::Slope,
        Biome::Seamount,
        Biome::Plain,
        Biome::Trench,
        Biome::Hydrothermal,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "slope" => Biome::Slope,
            "seamount" => Biome::Seamount,
            "plain" => Biome::Plain,
            "trench" => Biome::Trench,
            "hydrothermal" => Biome::Hydrothermal,
            _ => Biome::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Biome::Slope => "slope",
            Biome::Seamount => "seamount",
            Biome::Plain => "plain",
            Biome::Trench => "trench",
            Biome::Hydrothermal => "hydrothermal",
            Biome::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Biome,
    Score,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Biome => ViewMode::Score,
            ViewMode::Score => ViewMode::Biome,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Biome => "Biome",
            ViewMode::Score => "Mining score",
        }
    }
}

/// RGBA colour with wide channels. Channels may leave 0..=255 when the score
/// gradient extrapolates; they are only clamped when turned into CSS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl Rgba {
    pub const fn new(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: i32, g: i32, b: i32) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn with_alpha(self, a: i32) -> Self {
        Self { a, ..self }
    }

    /// `[r, g, b]` is opaque, `[r, g, b, a]` keeps its alpha. Anything shorter is rejected.
    pub fn from_components(components: &[f64]) -> Option<Self> {
        let channel = |v: f64| v.round() as i32;
        match components {
            [r, g, b] => Some(Self::rgb(channel(*r), channel(*g), channel(*b))),
            [r, g, b, a, ..] => Some(Self::new(channel(*r), channel(*g), channel(*b), channel(*a))),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Highlight {
    pub key: TileKey,
    pub color: Option<Rgba>,
}

impl Highlight {
    pub fn new(row: i32, col: i32) -> Self {
        Self { key: TileKey::new(row, col), color: None }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}

/// Ordered set of highlighted tiles. The first entry for a key wins lookups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightSet {
    tiles: Vec<Highlight>,
    index: HashMap<TileKey, usize>,
}

impl HighlightSet {
    pub fn new(tiles: Vec<Highlight>) -> Self {
        let mut index = HashMap::with_capacity(tiles.len());
        for (i, h) in tiles.iter().enumerate() {
            index.entry(h.key).or_insert(i);
        }
        Self { tiles, index }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn contains(&self, key: TileKey) -> bool {
        self.index.contains_key(&key)
    }

    pub fn get(&self, key: TileKey) -> Option<&Highlight> {
        self.index.get(&key).map(|&i| &self.tiles[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Highlight> {
        self.tiles.iter()
    }
}

/// One value of a cell's source record, as shown in the sidebar and CSV export.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    Null,
}

impl RecordValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => RecordValue::Null,
            Value::Bool(b) => RecordValue::Text(b.to_string()),
            Value::Number(n) => n
                .as_f64()
                .map(RecordValue::Number)
                .unwrap_or_else(|| RecordValue::Text(n.to_string())),
            Value::String(s) => RecordValue::Text(s.clone()),
            Value::Array(items) => RecordValue::List(items.iter().map(list_item_text).collect()),
            Value::Object(_) => RecordValue::Text(value.to_string()),
        }
    }
}

fn list_item_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub key: TileKey,
    pub lon: f64,
    pub lat: f64,
    pub depth: f64,
    pub biome: Biome,
    /// Biome tag exactly as received, for display.
    pub biome_tag: String,
    pub score: f64,
    pub elevation: f64,
    pub full_data: BTreeMap<String, RecordValue>,
}

impl Cell {
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, ViewerError> {
        let row = integer_field(record, "row")
            .ok_or_else(|| ViewerError::Decode("cell without integer `row`".into()))?;
        let col = integer_field(record, "col")
            .ok_or_else(|| ViewerError::Decode("cell without integer `col`".into()))?;
        let depth = number_field(record, "depth")
            .or_else(|| number_field(record, "depth_m"))
            .unwrap_or(0.0);
        let biome_tag = record
            .get("biome")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        // Display attributes travel in a nested `full_data` object; flat
        // records (no such key) are shown whole.
        let source = match record.get("full_data") {
            Some(Value::Object(nested)) => nested,
            _ => record,
        };
        let full_data = source
            .iter()
            .map(|(k, v)| (k.clone(), RecordValue::from_json(v)))
            .collect();
        Ok(Self {
            key: TileKey::new(row, col),
            lon: number_field(record, "lon").unwrap_or(0.0),
            lat: number_field(record, "lat").unwrap_or(0.0),
            depth,
            biome: Biome::from_tag(&biome_tag),
            biome_tag,
            score: number_field(record, "score").unwrap_or(0.0),
            elevation: MAX_DEPTH - depth,
            full_data,
        })
    }
}

fn number_field(record: &Map<String, Value>, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer_field(record: &Map<String, Value>, key: &str) -> Option<i32> {
    let value = number_field(record, key)?;
    if value.is_finite() && value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// The immutable cell dataset plus the lookups derived from it at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cells: Vec<Cell>,
    index: HashMap<TileKey, usize>,
    /// Indices into `cells` ordered back-to-front for drawing.
    draw_order: Vec<usize>,
    max_score: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self::from_cells(Vec::new())
    }
}

impl Grid {
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let mut index = HashMap::with_capacity(cells.len());
        for (i, c) in cells.iter().enumerate() {
            index.entry(c.key).or_insert(i);
        }
        let mut draw_order: Vec<usize> = (0..cells.len()).collect();
        draw_order.sort_by_key(|&i| cells[i].key);
        let max_score = max_score(&cells);
        Self { cells, index, draw_order, max_score }
    }

    /// Decodes the `/api/grid` payload: either an array of records or `{ "error": ... }`.
    pub fn from_json(payload: Value) -> Result<Self, ViewerError> {
        match payload {
            Value::Array(records) => {
                let mut cells = Vec::with_capacity(records.len());
                for record in &records {
                    let Value::Object(map) = record else {
                        return Err(ViewerError::Decode("grid entry is not an object".into()));
                    };
                    cells.push(Cell::from_record(map)?);
                }
                Ok(Self::from_cells(cells))
            }
            Value::Object(map) => match map.get("error") {
                Some(err) => Err(ViewerError::Api(
                    err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string()),
                )),
                None => Err(ViewerError::Decode("grid payload is an object without cells".into())),
            },
            _ => Err(ViewerError::Decode("grid payload is not an array".into())),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, key: TileKey) -> Option<&Cell> {
        self.index.get(&key).map(|&i| &self.cells[i])
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn in_draw_order(&self) -> impl DoubleEndedIterator<Item = &Cell> {
        self.draw_order.iter().map(|&i| &self.cells[i])
    }

    /// `(min_row, max_row, min_col, max_col)` of the loaded cells.
    pub fn extent(&self) -> Option<(i32, i32, i32, i32)> {
        let first = self.cells.first()?.key;
        Some(self.cells.iter().fold(
            (first.row, first.row, first.col, first.col),
            |(r0, r1, c0, c1), c| {
                (r0.min(c.key.row), r1.max(c.key.row), c0.min(c.key.col), c1.max(c.key.col))
            },
        ))
    }
}

/// Largest score in the set, floored to 1 so normalisation never divides by zero.
pub fn max_score(cells: &[Cell]) -> f64 {
    let max = cells.iter().map(|c| c.score).fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 { max } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn cell_derives_elevation_and_falls_back_on_biome() {
        let cell = Cell::from_record(&record(json!({
            "row": 2, "col": 5, "lat": -12.5, "lon": 140.25,
            "depth": 1500.0, "biome": "abyssal_mud"
        })))
        .unwrap();
        assert_eq!(cell.key, TileKey::new(2, 5));
        assert_eq!(cell.elevation, 5500.0);
        assert_eq!(cell.biome, Biome::Unknown);
        assert_eq!(cell.biome_tag, "abyssal_mud");
        assert_eq!(cell.score, 0.0);
    }

    #[test]
    fn cell_reads_depth_m_column() {
        let cell = Cell::from_record(&record(json!({
            "row": 0, "col": 0, "depth_m": "2500", "biome": "trench", "score": 4.5
        })))
        .unwrap();
        assert_eq!(cell.depth, 2500.0);
        assert_eq!(cell.biome, Biome::Trench);
        assert_eq!(cell.score, 4.5);
    }

    #[test]
    fn cell_requires_coordinates() {
        let err = Cell::from_record(&record(json!({ "col": 1 }))).unwrap_err();
        assert!(matches!(err, ViewerError::Decode(_)));
    }

    #[test]
    fn full_data_keeps_every_field_tagged() {
        let cell = Cell::from_record(&record(json!({
            "row": 1, "col": 1, "hazards": ["vent", "slide"], "note": null,
            "protected": true, "temp": 2.5
        })))
        .unwrap();
        assert_eq!(
            cell.full_data.get("hazards"),
            Some(&RecordValue::List(vec!["vent".into(), "slide".into()]))
        );
        assert_eq!(cell.full_data.get("note"), Some(&RecordValue::Null));
        assert_eq!(cell.full_data.get("protected"), Some(&RecordValue::Text("true".into())));
        assert_eq!(cell.full_data.get("temp"), Some(&RecordValue::Number(2.5)));
    }

    #[test]
    fn nested_full_data_is_used_for_display() {
        let cell = Cell::from_record(&record(json!({
            "row": 1, "col": 1, "depth": 3000.5, "score": 2,
            "full_data": { "depth_m": 3000.5, "pressure_atm": 301.2, "hazard_type": ["vent"] }
        })))
        .unwrap();
        assert_eq!(cell.depth, 3000.5);
        assert_eq!(cell.full_data.len(), 3);
        assert_eq!(cell.full_data.get("pressure_atm"), Some(&RecordValue::Number(301.2)));
        assert_eq!(cell.full_data.get("hazard_type"), Some(&RecordValue::List(vec!["vent".into()])));
        assert_eq!(cell.full_data.get("full_data"), None);
        assert_eq!(cell.full_data.get("score"), None);
    }

    #[test]
    fn grid_error_payload_is_an_api_error() {
        let err = Grid::from_json(json!({ "error": "merged.csv not found" })).unwrap_err();
        assert_eq!(err, ViewerError::Api("merged.csv not found".into()));
    }

    #[test]
    fn max_score_is_floored_to_one() {
        let grid = Grid::from_json(json!([
            { "row": 0, "col": 0, "score": -3.0 },
            { "row": 0, "col": 1, "score": 0.0 }
        ]))
        .unwrap();
        assert_eq!(grid.max_score(), 1.0);
        assert_eq!(Grid::default().max_score(), 1.0);

        let grid = Grid::from_json(json!([
            { "row": 0, "col": 0, "score": 12.5 },
            { "row": 0, "col": 1, "score": 3.0 }
        ]))
        .unwrap();
        assert_eq!(grid.max_score(), 12.5);
    }

    #[test]
    fn grid_draws_back_to_front() {
        let grid = Grid::from_json(json!([
            { "row": 3, "col": 0 }, { "row": 1, "col": 4 }, { "row": 1, "col": 2 }
        ]))
        .unwrap();
        let order: Vec<TileKey> = grid.in_draw_order().map(|c| c.key).collect();
        assert_eq!(order, vec![TileKey::new(1, 2), TileKey::new(1, 4), TileKey::new(3, 0)]);
        assert_eq!(grid.extent(), Some((1, 3, 0, 4)));
    }

    #[test]
    fn highlight_set_first_entry_wins() {
        let set = HighlightSet::new(vec![
            Highlight::new(1, 1).with_color(Rgba::rgb(1, 2, 3)),
            Highlight::new(1, 1).with_color(Rgba::rgb(9, 9, 9)),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(TileKey::new(1, 1)).and_then(|h| h.color), Some(Rgba::rgb(1, 2, 3)));
        assert!(!set.contains(TileKey::new(0, 0)));
    }

    #[test]
    fn rgba_components_keep_explicit_alpha() {
        assert_eq!(Rgba::from_components(&[9.0, 9.0, 9.0]), Some(Rgba::new(9, 9, 9, 255)));
        assert_eq!(Rgba::from_components(&[9.0, 9.0, 9.0, 128.0]), Some(Rgba::new(9, 9, 9, 128)));
        assert_eq!(Rgba::from_components(&[9.0, 9.0]), None);
    }
}
