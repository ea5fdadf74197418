use crate::model::ViewMode;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub view_mode: ViewMode,
    pub on_view_mode: Callback<ViewMode>,
    /// Emitted with the raw `(row, col)` input text.
    pub on_search: Callback<(String, String)>,
    pub on_export: Callback<()>,
    pub on_clear_highlights: Callback<()>,
    pub on_open_settings: Callback<()>,
    pub feedback: Option<String>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let row_ref = use_node_ref();
    let col_ref = use_node_ref();

    let submit = {
        let cb = props.on_search.clone();
        let row_ref = row_ref.clone();
        let col_ref = col_ref.clone();
        move || {
            let read = |r: &NodeRef| r.cast::<HtmlInputElement>().map(|i| i.value()).unwrap_or_default();
            cb.emit((read(&row_ref), read(&col_ref)));
        }
    };
    let go_cb = {
        let submit = submit.clone();
        Callback::from(move |_| submit())
    };
    let enter_cb = Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            submit();
        }
    });
    let mode_button = |mode: ViewMode| {
        let cb = props.on_view_mode.clone();
        let active = props.view_mode == mode;
        let style = if active { "border-color:#58a6ff; color:#58a6ff;" } else { "" };
        html! { <button style={style} onclick={Callback::from(move |_| cb.emit(mode))}>{ mode.label() }</button> }
    };
    let export_cb = {
        let cb = props.on_export.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let clear_cb = {
        let cb = props.on_clear_highlights.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let settings_cb = {
        let cb = props.on_open_settings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let input_style = "width:56px; background:#0d1117; color:#c9d1d9; border:1px solid #30363d; border-radius:4px; padding:3px 5px;";
    html! {<div style="position:absolute; top:12px; left:50%; transform:translateX(-50%); background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; flex-direction:column; gap:6px; min-width:360px;">
        <div style="display:flex; gap:6px; align-items:center;">
            { mode_button(ViewMode::Biome) }
            { mode_button(ViewMode::Score) }
            <span style="width:6px;"></span>
            <input ref={row_ref} type="number" placeholder="row" style={input_style} onkeydown={enter_cb.clone()} />
            <input ref={col_ref} type="number" placeholder="col" style={input_style} onkeydown={enter_cb} />
            <button onclick={go_cb}>{"Go"}</button>
        </div>
        <div style="display:flex; gap:6px; align-items:center;">
            <button onclick={export_cb}>{"Export CSV"}</button>
            <button onclick={clear_cb}>{"Clear highlights"}</button>
            <button onclick={settings_cb}>{"Settings"}</button>
        </div>
        <div style="font-size:11px; opacity:0.7;">{"Hotkeys: 'V' switch view, Esc deselect"}</div>
        { if let Some(txt) = &props.feedback { if !txt.is_empty() { html!{ <div style="font-size:11px; line-height:1.2; background:#1c2128; border:1px solid #30363d; padding:4px 6px; border-radius:6px;">{ txt.clone() }</div> } } else { html!{} } } else { html!{} } }
    </div>}
}
