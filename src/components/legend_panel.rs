use super::legend::LegendRow;
use crate::model::ViewMode;
use crate::resolve::{HIGHLIGHT_COLOR, SELECTED_COLOR, legend_entries};
use crate::util::css_rgba;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LegendPanelProps {
    pub mode: ViewMode,
    pub max_score: f64,
    #[prop_or(false)]
    pub has_highlights: bool,
}

#[function_component]
pub fn LegendPanel(props: &LegendPanelProps) -> Html {
    let rows = legend_entries(props.mode, props.max_score)
        .into_iter()
        .map(|(label, color)| html! { <LegendRow color={css_rgba(color)} label={label} /> });
    html! {<div style="position:absolute; right:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:170px;">
        <div style="font-weight:600; margin-bottom:4px;">{ format!("Legend: {}", props.mode.label()) }</div>
        { for rows }
        <div style="margin-top:6px; padding-top:6px; border-top:1px solid #30363d;">
            <LegendRow color={css_rgba(SELECTED_COLOR)} label="Selected" />
            { if props.has_highlights { html!{ <LegendRow color={css_rgba(HIGHLIGHT_COLOR)} label="Highlighted" /> } } else { html!{} } }
        </div>
    </div>}
}
