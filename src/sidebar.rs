//! Sidebar table formatting for a cell's source record.

use std::collections::BTreeMap;

use crate::model::RecordValue;

pub const SIGNIFICANT_FIGURES: usize = 8;

/// How numbers are written in the sidebar. Both policies have shipped; the
/// choice is a viewer setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberFormat {
    /// Round to eight significant figures and print the shortest form.
    #[default]
    SignificantFigures,
    /// Two decimals for depth/pressure/temperature fields, four for lat/lon,
    /// natural form for everything else.
    FieldDecimals,
}

impl NumberFormat {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sigfig" | "significant" => Some(NumberFormat::SignificantFigures),
            "fixed" | "decimals" => Some(NumberFormat::FieldDecimals),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NumberFormat::SignificantFigures => "8 significant figures",
            NumberFormat::FieldDecimals => "Fixed decimals by field",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarRow {
    pub label: String,
    pub value: String,
}

pub fn format_record(record: &BTreeMap<String, RecordValue>, policy: NumberFormat) -> Vec<SidebarRow> {
    record
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                RecordValue::List(items) if items.is_empty() => return None,
                RecordValue::List(items) => items.join(", "),
                RecordValue::Number(n) => format_number(key, *n, policy),
                RecordValue::Text(s) => s.clone(),
                RecordValue::Null => "null".to_string(),
            };
            Some(SidebarRow { label: key.clone(), value })
        })
        .collect()
}

pub fn format_number(key: &str, value: f64, policy: NumberFormat) -> String {
    match policy {
        NumberFormat::SignificantFigures => round_significant(value, SIGNIFICANT_FIGURES).to_string(),
        NumberFormat::FieldDecimals => {
            let key = key.to_ascii_lowercase();
            if ["depth", "pressure", "temp"].iter().any(|k| key.contains(k)) {
                format!("{:.2}", value)
            } else if key.contains("lat") || key.contains("lon") {
                format!("{:.4}", value)
            } else {
                value.to_string()
            }
        }
    }
}

pub fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }
    format!("{:.*e}", digits - 1, value).parse().unwrap_or(value)
}
