//! Per-cell render resolution: fill colour, extrusion elevation and outline,
//! derived from the cell and the current interaction state. Everything here is
//! pure; callers pass the state in.

use crate::model::{Biome, Cell, HighlightSet, MAX_DEPTH, Rgba, TileKey, ViewMode};

pub const SELECTED_COLOR: Rgba = Rgba::rgb(255, 255, 255);
pub const HIGHLIGHT_COLOR: Rgba = Rgba::rgb(255, 0, 255);
pub const SELECTED_OUTLINE: Rgba = Rgba::rgb(255, 215, 0);
pub const DIM_ALPHA: i32 = 60;
pub const OUTLINE_WIDTH: f64 = 3.0;

const DARK_BLUE: [f64; 3] = [0.0, 0.0, 139.0];
const CYAN: [f64; 3] = [0.0, 255.0, 255.0];
const LIME: [f64; 3] = [0.0, 255.0, 0.0];
const YELLOW: [f64; 3] = [255.0, 255.0, 0.0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outline {
    pub color: Rgba,
    pub width: f64,
}

impl Outline {
    pub const NONE: Outline = Outline { color: Rgba::rgb(0, 0, 0), width: 0.0 };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStyle {
    pub fill: Rgba,
    pub elevation: f64,
    pub outline: Outline,
}

pub fn biome_color(biome: Biome) -> Rgba {
    match biome {
        Biome::Slope => Rgba::rgb(205, 133, 63),
        Biome::Seamount => Rgba::rgb(139, 69, 19),
        Biome::Plain => Rgba::rgb(70, 130, 180),
        Biome::Trench => Rgba::rgb(25, 25, 112),
        Biome::Hydrothermal => Rgba::rgb(255, 69, 0),
        Biome::Unknown => Rgba::rgb(128, 128, 128),
    }
}

/// Three-segment gradient dark blue -> cyan -> lime -> yellow over `score / max_score`.
/// The top segment is not clamped: normalised scores above 1 push red past 255.
pub fn score_color(score: f64, max_score: f64) -> Rgba {
    let n = (score / max_score).max(0.0);
    let (from, to, t) = if n < 0.33 {
        (DARK_BLUE, CYAN, n / 0.33)
    } else if n < 0.66 {
        (CYAN, LIME, (n - 0.33) / 0.33)
    } else {
        (LIME, YELLOW, (n - 0.66) / 0.34)
    };
    let lerp = |i: usize| (from[i] + (to[i] - from[i]) * t).round() as i32;
    Rgba::rgb(lerp(0), lerp(1), lerp(2))
}

pub fn base_color(cell: &Cell, mode: ViewMode, max_score: f64) -> Rgba {
    match mode {
        ViewMode::Biome => biome_color(cell.biome),
        ViewMode::Score => score_color(cell.score, max_score),
    }
}

fn marked_or_dimmed(cell: &Cell, highlights: &HighlightSet, mode: ViewMode, max_score: f64) -> Rgba {
    match highlights.get(cell.key) {
        Some(h) => h.color.unwrap_or(HIGHLIGHT_COLOR),
        None => base_color(cell, mode, max_score).with_alpha(DIM_ALPHA),
    }
}

pub fn resolve_color(
    cell: &Cell,
    selection: Option<TileKey>,
    highlights: &HighlightSet,
    mode: ViewMode,
    max_score: f64,
) -> Rgba {
    match selection {
        Some(sel) if sel == cell.key => SELECTED_COLOR,
        Some(_) => marked_or_dimmed(cell, highlights, mode, max_score),
        None if !highlights.is_empty() => marked_or_dimmed(cell, highlights, mode, max_score),
        None => base_color(cell, mode, max_score),
    }
}

/// Selected and highlighted cells pop up to full height.
pub fn resolve_elevation(cell: &Cell, selection: Option<TileKey>, highlights: &HighlightSet) -> f64 {
    if selection == Some(cell.key) || highlights.contains(cell.key) {
        MAX_DEPTH
    } else {
        cell.elevation
    }
}

pub fn resolve_outline(cell: &Cell, selection: Option<TileKey>, highlights: &HighlightSet) -> Outline {
    if selection == Some(cell.key) {
        return Outline { color: SELECTED_OUTLINE, width: OUTLINE_WIDTH };
    }
    match highlights.get(cell.key) {
        Some(h) => Outline { color: h.color.unwrap_or(HIGHLIGHT_COLOR), width: OUTLINE_WIDTH },
        None => Outline::NONE,
    }
}

pub fn resolve_style(
    cell: &Cell,
    selection: Option<TileKey>,
    highlights: &HighlightSet,
    mode: ViewMode,
    max_score: f64,
) -> CellStyle {
    CellStyle {
        fill: resolve_color(cell, selection, highlights, mode, max_score),
        elevation: resolve_elevation(cell, selection, highlights),
        outline: resolve_outline(cell, selection, highlights),
    }
}

pub fn tooltip_text(cell: &Cell, mode: ViewMode) -> String {
    let TileKey { row, col } = cell.key;
    match mode {
        ViewMode::Biome => format!(
            "Biome: {}\nDepth: {:.0} m\nTile ({}, {})",
            cell.biome_tag, cell.depth, row, col
        ),
        ViewMode::Score => format!(
            "Score: {:.2}\nDepth: {:.0} m\nTile ({}, {})",
            cell.score, cell.depth, row, col
        ),
    }
}

/// Swatches shown by the legend for the active mode.
pub fn legend_entries(mode: ViewMode, max_score: f64) -> Vec<(String, Rgba)> {
    match mode {
        ViewMode::Biome => Biome::KNOWN
            .iter()
            .chain(std::iter::once(&Biome::Unknown))
            .map(|b| (b.as_str().to_string(), biome_color(*b)))
            .collect(),
        ViewMode::Score => [0.0, 0.33, 0.66, 1.0]
            .iter()
            .map(|n| (format!("{:.1}", n * max_score), score_color(n * max_score, max_score)))
            .collect(),
    }
}
