use crate::state::{ChatLog, ChatRole};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ChatPanelProps {
    pub log: ChatLog,
    pub on_send: Callback<String>,
}

#[function_component]
pub fn ChatPanel(props: &ChatPanelProps) -> Html {
    let input_ref = use_node_ref();
    let list_ref = use_node_ref();

    // Keep the newest message in view as text streams in.
    {
        let list_ref = list_ref.clone();
        use_effect_with(props.log.clone(), move |_| {
            if let Some(el) = list_ref.cast::<web_sys::Element>() {
                el.set_scroll_top(el.scroll_height());
            }
            || ()
        });
    }

    let send = {
        let cb = props.on_send.clone();
        let input_ref = input_ref.clone();
        let busy = props.log.busy;
        move || {
            if busy {
                return;
            }
            let Some(input) = input_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let text = input.value().trim().to_string();
            if text.is_empty() {
                return;
            }
            input.set_value("");
            cb.emit(text);
        }
    };
    let send_cb = {
        let send = send.clone();
        Callback::from(move |_| send())
    };
    let enter_cb = Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            send();
        }
    });

    let bubble = |role: ChatRole, text: &str| {
        let (align, bg) = match role {
            ChatRole::User => ("flex-end", "#1f6feb"),
            ChatRole::Assistant => ("flex-start", "#21262d"),
        };
        let body = if text.is_empty() { "…".to_string() } else { text.to_string() };
        html! {
            <div style={format!("align-self:{}; background:{}; border-radius:8px; padding:6px 9px; max-width:85%; white-space:pre-wrap; font-size:12px; line-height:1.35;", align, bg)}>
                { body }
            </div>
        }
    };

    html! {<div style="position:absolute; left:12px; bottom:64px; width:340px; height:300px; background:rgba(22,27,34,0.92); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; flex-direction:column; gap:6px;">
        <div style="font-weight:600;">{"Survey assistant"}</div>
        <div ref={list_ref} style="flex:1; overflow-y:auto; display:flex; flex-direction:column; gap:6px;">
            { for props.log.messages.iter().map(|m| bubble(m.role, &m.text)) }
        </div>
        <div style="display:flex; gap:6px;">
            <input
                ref={input_ref}
                type="text"
                placeholder={if props.log.busy { "Waiting for reply…" } else { "Ask about the seafloor…" }}
                disabled={props.log.busy}
                onkeydown={enter_cb}
                style="flex:1; background:#0d1117; color:#c9d1d9; border:1px solid #30363d; border-radius:4px; padding:4px 6px;"
            />
            <button onclick={send_cb} disabled={props.log.busy}>{"Send"}</button>
        </div>
    </div>}
}
