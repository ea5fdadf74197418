use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub cells: usize,
    pub highlighted: usize,
    pub selection: Option<(i32, i32)>,
    pub max_score: f64,
    pub mode_label: &'static str,
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;";
    let label_style = "flex:1; font-weight:500; color:#8b949e;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let selection = match props.selection {
        Some((r, c)) => format!("({}, {})", r, c),
        None => "none".to_string(),
    };
    let row = |label: &'static str, value: String, color: &'static str| {
        html! {
            <div style={row_style}>
                <span style={label_style}>{ label }</span>
                <span style={format!("{} color:{};", value_style, color)}>{ value }</span>
            </div>
        }
    };
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:210px; display:flex; flex-direction:column; gap:6px; font-size:13px;">
            { row("Cells", props.cells.to_string(), "#c9d1d9") }
            { row("Highlighted", props.highlighted.to_string(), "#ff00ff") }
            { row("Selected", selection, "#ffd700") }
            { row("Max score", format!("{:.2}", props.max_score), "#58a6ff") }
            { row("View", props.mode_label.to_string(), "#2ea043") }
        </div>
    }
}
