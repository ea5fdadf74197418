use crate::model::Cell;
use crate::sidebar::{NumberFormat, format_record};
use yew::prelude::*;

pub const PLACEHOLDER: &str = "Hover over a tile to inspect it, click to pin it.";

#[derive(Properties, PartialEq, Clone)]
pub struct SidebarPanelProps {
    pub cell: Option<Cell>,
    pub pinned: bool,
    pub number_format: NumberFormat,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn SidebarPanel(props: &SidebarPanelProps) -> Html {
    let panel_style = "position:absolute; right:12px; top:12px; bottom:200px; \
        background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:8px; \
        padding:12px 16px; width:280px; overflow-y:auto; font-size:13px; color:#c9d1d9;";
    let header_style = "font-weight:600; font-size:15px; margin-bottom:8px; display:flex; align-items:center; justify-content:space-between; gap:8px;";
    let stat_row_style =
        "display:flex; justify-content:space-between; gap:10px; margin:4px 0; font-size:12px;";
    let stat_label_style = "color:#8b949e; word-break:break-all;";
    let stat_value_style = "font-weight:500; text-align:right; word-break:break-word;";

    let Some(cell) = &props.cell else {
        return html! {
            <div style={panel_style}>
                <div style="color:#8b949e; font-style:italic;">{ PLACEHOLDER }</div>
            </div>
        };
    };

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let rows = format_record(&cell.full_data, props.number_format);

    html! {
        <div style={panel_style}>
            <div style={header_style}>
                <span>{ format!("Tile ({}, {})", cell.key.row, cell.key.col) }</span>
                { if props.pinned { html!{ <button onclick={close_cb} style="padding:2px 8px;">{"×"}</button> } } else { html!{} } }
            </div>
            <div style="font-size:11px; color:#8b949e; margin-bottom:6px;">
                { format!("{} · {:.0} m", cell.biome_tag, cell.depth) }
            </div>
            <div style="padding-top:8px; border-top:1px solid #30363d;">
                { for rows.into_iter().map(|row| html! {
                    <div style={stat_row_style}>
                        <span style={stat_label_style}>{ row.label }</span>
                        <span style={stat_value_style}>{ row.value }</span>
                    </div>
                }) }
            </div>
        </div>
    }
}
