use crate::sidebar::NumberFormat;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub on_close: Callback<()>,
    pub number_format: NumberFormat,
    pub on_number_format: Callback<NumberFormat>,
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let option = |format: NumberFormat| {
        let cb = props.on_number_format.clone();
        let onclick = Callback::from(move |_| cb.emit(format));
        html! {
            <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
                <input type="radio" name="number-format" checked={props.number_format == format} onclick={onclick} />
                <span>{ format.label() }</span>
            </label>
        }
    };

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Settings"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:10px;">
                <div style="font-weight:600;">{"Sidebar numbers"}</div>
                { option(NumberFormat::SignificantFigures) }
                { option(NumberFormat::FieldDecimals) }
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{"Applies to this session only. Use ?numbers=fixed in the URL to start with fixed decimals."}</div>
            <div style="display:flex; justify-content:flex-end;">
                <button onclick={close_cb}>{"Done"}</button>
            </div>
        </div>
    </div>}
}
