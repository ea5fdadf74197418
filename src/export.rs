//! CSV export of the highlighted tiles.

use thiserror::Error;

use crate::error::ViewerError;
use crate::model::{Cell, Grid, HighlightSet, RecordValue};
use crate::util;

/// Exported columns, in order. Fixed so exports line up across sessions
/// regardless of which fields a given grid carries.
pub const EXPORT_COLUMNS: [&str; 41] = [
    "row",
    "col",
    "lat",
    "lon",
    "depth_m",
    "biome",
    "pressure_atm",
    "temperature_c",
    "coral_coral_cover_pct",
    "current_u",
    "current_v",
    "current_speed",
    "current_stability",
    "current_flow_direction",
    "hazard_type",
    "hazard_severity",
    "hazard_notes",
    "life_species",
    "life_avg_depth_m",
    "life_density",
    "life_threat_level",
    "life_behavior",
    "life_trophic_level",
    "life_prey_species",
    "poi_id",
    "poi_category",
    "poi_label",
    "poi_description",
    "poi_research_value",
    "resource_type",
    "resource_family",
    "resource_abundance",
    "resource_purity",
    "resource_extraction_difficulty",
    "resource_environmental_impact",
    "resource_economic_value",
    "resource_description",
    "biome_predators",
    "biome_prey",
    "biome_interaction_strengths",
    "score",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("No highlighted tiles to export.")]
    NoHighlights,
    #[error("None of the highlighted tiles are in the loaded grid.")]
    NoMatchingCells,
}

pub fn csv_value(value: Option<&RecordValue>) -> String {
    match value {
        None | Some(RecordValue::Null) => String::new(),
        Some(RecordValue::Number(n)) => n.to_string(),
        Some(RecordValue::Text(s)) => s.clone(),
        Some(RecordValue::List(items)) => items.join(","),
    }
}

pub fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// `full_data` value for a column; `row`/`col` fall back to the tile key.
fn cell_field(cell: &Cell, column: &str) -> String {
    match (cell.full_data.get(column), column) {
        (None, "row") => cell.key.row.to_string(),
        (None, "col") => cell.key.col.to_string(),
        (value, _) => csv_value(value),
    }
}

/// Header plus one row per highlighted tile that exists in `grid`, in highlight order.
pub fn build_highlight_csv(grid: &Grid, highlights: &HighlightSet) -> Result<String, ExportError> {
    if highlights.is_empty() {
        return Err(ExportError::NoHighlights);
    }
    let mut lines = vec![EXPORT_COLUMNS.join(",")];
    for cell in highlights.iter().filter_map(|h| grid.get(h.key)) {
        let fields: Vec<String> = EXPORT_COLUMNS
            .iter()
            .map(|col| escape_csv(&cell_field(cell, col)))
            .collect();
        lines.push(fields.join(","));
    }
    if lines.len() == 1 {
        return Err(ExportError::NoMatchingCells);
    }
    Ok(lines.join("\n"))
}

pub fn export_filename(iso_timestamp: &str) -> String {
    format!("abyssal_highlights_{}.csv", iso_timestamp.replace([':', '.'], "-"))
}

/// Builds the CSV and hands it to the browser as a download. Returns the file name.
pub fn export_highlights(grid: &Grid, highlights: &HighlightSet) -> Result<String, ViewerError> {
    let csv = build_highlight_csv(grid, highlights)?;
    let filename = export_filename(&util::now_iso());
    util::download_text(&filename, "text/csv", &csv)?;
    log::info!("exported {} highlighted tiles to {}", highlights.len(), filename);
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Highlight;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn grid() -> Grid {
        Grid::from_json(json!([
            { "row": 1, "col": 1, "depth_m": 3000.5, "biome": "plain",
              "hazard_type": ["vent", "slide"], "poi_description": "say \"hi\"", "score": 2 },
            { "row": 1, "col": 2, "biome": "trench", "hazard_notes": null }
        ]))
        .unwrap()
    }

    #[test]
    fn quoting() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn rows_follow_highlight_order_and_fixed_columns() {
        let hl = HighlightSet::new(vec![Highlight::new(1, 2), Highlight::new(9, 9), Highlight::new(1, 1)]);
        let csv = build_highlight_csv(&grid(), &hl).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], EXPORT_COLUMNS.join(","));
        assert!(lines[1].starts_with("1,2,,,,trench,"));
        assert!(lines[2].starts_with("1,1,,,3000.5,plain,"));
        assert!(lines[2].contains(",\"vent,slide\","));
        assert!(lines[2].contains(",\"say \"\"hi\"\"\","));
        assert!(lines[2].ends_with(",2"));
        assert_eq!(lines[1].split(',').count(), EXPORT_COLUMNS.len());
    }

    #[test]
    fn survey_columns_come_from_nested_full_data() {
        let grid = Grid::from_json(json!([{
            "row": 1, "col": 1, "depth": 3000.5, "biome": "plain", "score": 2,
            "full_data": {
                "depth_m": 3000.5, "biome": "plain", "pressure_atm": 301.2,
                "hazard_type": ["vent"], "score": 2
            }
        }]))
        .unwrap();
        let csv = build_highlight_csv(&grid, &HighlightSet::new(vec![Highlight::new(1, 1)])).unwrap();
        let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
        let field = |name: &str| row[EXPORT_COLUMNS.iter().position(|c| *c == name).unwrap()];
        assert_eq!(row.len(), EXPORT_COLUMNS.len());
        assert_eq!(field("row"), "1");
        assert_eq!(field("col"), "1");
        assert_eq!(field("depth_m"), "3000.5");
        assert_eq!(field("pressure_atm"), "301.2");
        assert_eq!(field("hazard_type"), "vent");
        assert_eq!(field("score"), "2");
        assert_eq!(field("lat"), "");
    }

    #[test]
    fn empty_or_unmatched_highlights_fail() {
        assert_eq!(
            build_highlight_csv(&grid(), &HighlightSet::default()),
            Err(ExportError::NoHighlights)
        );
        let hl = HighlightSet::new(vec![Highlight::new(40, 40)]);
        assert_eq!(build_highlight_csv(&grid(), &hl), Err(ExportError::NoMatchingCells));
    }

    #[test]
    fn filename_is_sanitised() {
        assert_eq!(
            export_filename("2026-10-18T22:05:31.123Z"),
            "abyssal_highlights_2026-10-18T22-05-31-123Z.csv"
        );
    }
}
