use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::chat_panel::ChatPanel;
use super::controls_panel::ControlsPanel;
use super::grid_view::GridView;
use super::legend_panel::LegendPanel;
use super::settings_modal::SettingsModal;
use super::sidebar_panel::SidebarPanel;
use super::stats_panel::StatsPanel;
use crate::api::{self, ChatEvent};
use crate::config::ViewerConfig;
use crate::export;
use crate::model::{TileKey, ViewMode};
use crate::sidebar::NumberFormat;
use crate::state::{ChatAction, ChatLog, SendGate, ViewAction, ViewState};
use crate::util;

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: ViewerConfig,
}

#[derive(Clone, PartialEq)]
enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let config = use_memo(props.config.clone(), |c| c.clone());
    let view = use_reducer(ViewState::default);
    let chat = use_reducer(ChatLog::default);
    let send_gate = use_mut_ref(SendGate::default);
    let status = use_state(|| LoadStatus::Loading);
    let feedback = use_state(|| None::<String>);
    let number_format = use_state(|| props.config.number_format);
    let show_settings = use_state(|| false);
    let focus = use_state(|| (None::<TileKey>, 0_u64));
    // One conversation per page session.
    let thread_id = use_memo((), |_| js_sys::Date::now() as u64);

    // Load the grid once on mount.
    {
        let view = view.clone();
        let status = status.clone();
        let config = config.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api::fetch_grid(&config).await {
                    Ok(grid) => {
                        view.dispatch(ViewAction::LoadGrid(Rc::new(grid)));
                        status.set(LoadStatus::Ready);
                    }
                    Err(err) => {
                        log::error!("grid load failed: {}", err);
                        if !err.is_silent_on_load() {
                            util::alert(&format!("Could not load the seafloor grid: {}", err));
                        }
                        status.set(LoadStatus::Failed(err.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let on_send = {
        let chat = chat.clone();
        let view = view.clone();
        let config = config.clone();
        let thread_id = *thread_id;
        let send_gate = send_gate.clone();
        Callback::from(move |message: String| {
            if !send_gate.borrow_mut().try_acquire() {
                log::debug!("chat request already in flight; ignoring send");
                return;
            }
            chat.dispatch(ChatAction::Send(message.clone()));
            let chat = chat.clone();
            let view = view.clone();
            let config = config.clone();
            let send_gate = send_gate.clone();
            spawn_local(async move {
                let result = api::stream_chat(&config, &message, thread_id, |event| match event {
                    ChatEvent::Text(chunk) => chat.dispatch(ChatAction::Append(chunk)),
                    ChatEvent::Highlight(tiles) => {
                        log::debug!("assistant highlighted {} tiles", tiles.len());
                        view.dispatch(ViewAction::SetHighlights(tiles));
                    }
                })
                .await;
                if let Err(err) = result {
                    log::error!("chat request failed: {}", err);
                    chat.dispatch(ChatAction::Failed);
                }
                send_gate.borrow_mut().release();
                chat.dispatch(ChatAction::Settled);
            });
        })
    };

    let on_search = {
        let view = view.clone();
        let feedback = feedback.clone();
        let focus = focus.clone();
        Callback::from(move |(row, col): (String, String)| {
            let (Ok(row), Ok(col)) = (row.trim().parse::<i32>(), col.trim().parse::<i32>()) else {
                feedback.set(Some("Enter whole-number row and column values.".to_string()));
                return;
            };
            match view.search(row, col) {
                Some(key) => {
                    view.dispatch(ViewAction::SelectTile(key));
                    focus.set((Some(key), focus.1.wrapping_add(1)));
                    feedback.set(None);
                }
                None => feedback.set(Some(format!("Tile ({}, {}) not found", row, col))),
            }
        })
    };

    let on_export = {
        let view = view.clone();
        let feedback = feedback.clone();
        Callback::from(move |_| {
            match export::export_highlights(&view.grid, &view.highlights) {
                Ok(name) => feedback.set(Some(format!("Saved {}", name))),
                Err(err) => {
                    log::warn!("export aborted: {}", err);
                    feedback.set(Some(err.to_string()));
                }
            }
        })
    };

    let on_view_mode = {
        let view = view.clone();
        Callback::from(move |mode: ViewMode| view.dispatch(ViewAction::SetViewMode(mode)))
    };
    let on_clear = {
        let view = view.clone();
        let feedback = feedback.clone();
        Callback::from(move |_| {
            view.dispatch(ViewAction::ClearHighlights);
            feedback.set(None);
        })
    };
    let on_deselect = {
        let view = view.clone();
        Callback::from(move |_| view.dispatch(ViewAction::DeselectTile))
    };
    let open_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(true))
    };
    let close_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(false))
    };
    let on_number_format = {
        let number_format = number_format.clone();
        Callback::from(move |f: NumberFormat| {
            log::debug!("sidebar number format -> {}", f.label());
            number_format.set(f);
        })
    };

    let root_style = "position:fixed; inset:0; background:#04121f; color:#c9d1d9; \
        font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif; overflow:hidden;";

    match &*status {
        LoadStatus::Loading => {
            return html! {
                <div style={root_style}>
                    <div style="position:absolute; top:50%; left:50%; transform:translate(-50%,-50%); opacity:0.7;">{"Loading seafloor grid…"}</div>
                </div>
            };
        }
        LoadStatus::Failed(reason) => {
            return html! {
                <div style={root_style}>
                    <div style="position:absolute; top:24px; left:50%; transform:translateX(-50%); background:#3d1214; border:1px solid #f85149; border-radius:8px; padding:10px 16px; max-width:520px;">
                        <div style="font-weight:600; margin-bottom:4px;">{"The grid could not be loaded."}</div>
                        <div style="font-size:12px; opacity:0.8;">{ reason.clone() }</div>
                    </div>
                </div>
            };
        }
        LoadStatus::Ready => {}
    }

    let pinned = view.selection.is_some();
    let sidebar_cell = view.sidebar_cell().cloned();

    html! {
        <div style={root_style}>
            <GridView view={view.clone()} focus={focus.0} focus_seq={focus.1} />
            <StatsPanel
                cells={view.grid.len()}
                highlighted={view.highlights.len()}
                selection={view.selection.map(|k| (k.row, k.col))}
                max_score={view.grid.max_score()}
                mode_label={view.view_mode.label()}
            />
            <ControlsPanel
                view_mode={view.view_mode}
                on_view_mode={on_view_mode}
                on_search={on_search}
                on_export={on_export}
                on_clear_highlights={on_clear}
                on_open_settings={open_settings}
                feedback={(*feedback).clone()}
            />
            <SidebarPanel
                cell={sidebar_cell}
                pinned={pinned}
                number_format={*number_format}
                on_close={on_deselect}
            />
            <LegendPanel
                mode={view.view_mode}
                max_score={view.grid.max_score()}
                has_highlights={!view.highlights.is_empty()}
            />
            <ChatPanel log={(*chat).clone()} on_send={on_send} />
            <SettingsModal
                show={*show_settings}
                on_close={close_settings}
                number_format={*number_format}
                on_number_format={on_number_format}
            />
        </div>
    }
}
