use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement};
use yew::prelude::*;

use super::camera_controls::CameraControls;
use crate::model::TileKey;
use crate::resolve::tooltip_text;
use crate::state::camera::column_height;
use crate::state::{Camera, ViewAction, ViewState};
use crate::util::{css_rgba, shade};

const BACKGROUND: &str = "#04121f";
const SIDE_SHADE: f64 = 0.55;

#[derive(Properties, PartialEq, Clone)]
pub struct GridViewProps {
    pub view: UseReducerHandle<ViewState>,
    /// Tile to centre on; a new `focus_seq` re-applies it.
    pub focus: Option<TileKey>,
    pub focus_seq: u64,
}

#[derive(Clone, PartialEq)]
struct Tooltip {
    text: String,
    x: f64,
    y: f64,
}

fn canvas_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
    (canvas.width() as f64, canvas.height() as f64)
}

fn fit_canvas_to_window(canvas: &HtmlCanvasElement) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>, fallback: f64| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
    };
    canvas.set_width(dim(window.inner_width(), 800.0).max(0.0) as u32);
    canvas.set_height(dim(window.inner_height(), 600.0).max(0.0) as u32);
}

type Listeners = Vec<(web_sys::EventTarget, &'static str, Closure<dyn FnMut(web_sys::Event)>)>;

fn attach(
    listeners: &mut Listeners,
    target: &web_sys::EventTarget,
    name: &'static str,
    f: Box<dyn FnMut(web_sys::Event)>,
) {
    let cb = Closure::wrap(f);
    if target
        .add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("could not attach {} listener", name);
    }
    listeners.push((target.clone(), name, cb));
}

fn draw(canvas: &HtmlCanvasElement, cam: &Camera, view: &ViewState) {
    if !canvas.is_connected() {
        return;
    }
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return;
    };
    let (w, h) = canvas_size(canvas);
    let s = cam.scale_px();
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_transform(s, 0.0, 0.0, s, cam.offset_x, cam.offset_y).ok();

    let mut outlined = Vec::new();
    for cell in view.grid.in_draw_order() {
        let style = view.style_for(cell);
        let x = cell.key.col as f64;
        let col_h = column_height(style.elevation);
        let top = cell.key.row as f64 - col_h;
        if col_h > 0.0 {
            ctx.set_fill_style_str(&css_rgba(shade(style.fill, SIDE_SHADE)));
            ctx.fill_rect(x, top + 1.0, 1.0, col_h);
        }
        ctx.set_fill_style_str(&css_rgba(style.fill));
        ctx.fill_rect(x, top, 1.0, 1.0);
        if style.outline.width > 0.0 {
            outlined.push((x, top, col_h, style.outline));
        }
    }
    // Outlines go on top so marked columns stay visible behind taller neighbours.
    for (x, top, col_h, outline) in outlined {
        ctx.set_stroke_style_str(&css_rgba(outline.color));
        ctx.set_line_width(outline.width / s);
        ctx.stroke_rect(x, top, 1.0, 1.0 + col_h);
    }
}

#[function_component(GridView)]
pub fn grid_view(props: &GridViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let camera = use_mut_ref(Camera::default);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let view_ref = use_mut_ref(|| props.view.clone());
    let hover_ref = use_mut_ref(|| None::<TileKey>);
    let tooltip = use_state(|| None::<Tooltip>);
    let zoom_pct = use_state(|| 100_u32);

    let redraw = {
        let draw_ref = draw_ref.clone();
        move || {
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
        }
    };

    // Effect: refresh the handle on every state change; fit once cells exist.
    {
        let view_ref = view_ref.clone();
        let handle = props.view.clone();
        let camera = camera.clone();
        let canvas_ref = canvas_ref.clone();
        let redraw = redraw.clone();
        let zoom_pct = zoom_pct.clone();
        use_effect_with(props.view.version, move |_| {
            *view_ref.borrow_mut() = handle.clone();
            if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                let mut cam = camera.borrow_mut();
                if !cam.initialized {
                    if let Some(extent) = handle.grid.extent() {
                        fit_canvas_to_window(&canvas);
                        let (w, h) = canvas_size(&canvas);
                        cam.fit(extent, w, h);
                        zoom_pct.set((cam.zoom * 100.0).round() as u32);
                    }
                }
            }
            redraw();
            || ()
        });
    }

    // Effect: centre on a searched tile.
    {
        let camera = camera.clone();
        let canvas_ref = canvas_ref.clone();
        let redraw = redraw.clone();
        let focus = props.focus;
        use_effect_with(props.focus_seq, move |_| {
            if let (Some(key), Some(canvas)) = (focus, canvas_ref.cast::<HtmlCanvasElement>()) {
                let (w, h) = canvas_size(&canvas);
                camera
                    .borrow_mut()
                    .center_on(key.col as f64 + 0.5, key.row as f64, w, h);
                redraw();
            }
            || ()
        });
    }

    // Mount: canvas sizing, draw closure and pointer/keyboard listeners.
    {
        let canvas_ref = canvas_ref.clone();
        let camera = camera.clone();
        let draw_ref = draw_ref.clone();
        let view_ref = view_ref.clone();
        let hover_ref = hover_ref.clone();
        let tooltip = tooltip.clone();
        let zoom_pct = zoom_pct.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let canvas = canvas_ref.cast::<HtmlCanvasElement>();
            let mut listeners: Listeners = Vec::new();

            if let (Some(window), Some(canvas)) = (window, canvas) {
                fit_canvas_to_window(&canvas);

                let draw_closure: Rc<dyn Fn()> = {
                    let canvas = canvas.clone();
                    let camera = camera.clone();
                    let view_ref = view_ref.clone();
                    Rc::new(move || {
                        let handle = view_ref.borrow().clone();
                        draw(&canvas, &camera.borrow(), &handle);
                    })
                };
                *draw_ref.borrow_mut() = Some(draw_closure.clone());
                draw_closure();

                // Wheel zoom around the pointer.
                {
                    let camera = camera.clone();
                    let draw = draw_closure.clone();
                    let zoom_pct = zoom_pct.clone();
                    attach(&mut listeners, &canvas, "wheel", Box::new(move |e: web_sys::Event| {
                        let Some(e) = e.dyn_ref::<web_sys::WheelEvent>() else {
                            return;
                        };
                        e.prevent_default();
                        let factor = (-e.delta_y() * 0.001).exp();
                        let mut cam = camera.borrow_mut();
                        cam.zoom_at(e.offset_x() as f64, e.offset_y() as f64, factor);
                        zoom_pct.set((cam.zoom * 100.0).round() as u32);
                        drop(cam);
                        draw();
                    }));
                }
                // Press starts a potential drag.
                {
                    let camera = camera.clone();
                    attach(&mut listeners, &canvas, "mousedown", Box::new(move |e: web_sys::Event| {
                        if let Some(e) = e.dyn_ref::<web_sys::MouseEvent>() {
                            camera
                                .borrow_mut()
                                .begin_drag(e.client_x() as f64, e.client_y() as f64);
                        }
                    }));
                }
                // Move: pan while dragging, otherwise hover preview + tooltip.
                {
                    let camera = camera.clone();
                    let draw = draw_closure.clone();
                    let view_ref = view_ref.clone();
                    let hover_ref = hover_ref.clone();
                    let tooltip = tooltip.clone();
                    attach(&mut listeners, &canvas, "mousemove", Box::new(move |e: web_sys::Event| {
                        let Some(e) = e.dyn_ref::<web_sys::MouseEvent>() else {
                            return;
                        };
                        let mut cam = camera.borrow_mut();
                        if cam.panning {
                            cam.drag_to(e.client_x() as f64, e.client_y() as f64);
                            drop(cam);
                            tooltip.set(None);
                            draw();
                            return;
                        }
                        let (wx, wy) = cam.screen_to_world(e.offset_x() as f64, e.offset_y() as f64);
                        drop(cam);
                        let handle = view_ref.borrow().clone();
                        let hovered = handle.pick(wx, wy);
                        if *hover_ref.borrow() != hovered {
                            *hover_ref.borrow_mut() = hovered;
                            handle.dispatch(ViewAction::Hover(hovered));
                        }
                        // Anchor the tooltip to the top-right corner of the hovered column.
                        let next = hovered.and_then(|k| handle.grid.get(k)).map(|cell| {
                            let top = cell.key.row as f64 - column_height(handle.style_for(cell).elevation);
                            let (x, y) = camera.borrow().world_to_screen(cell.key.col as f64 + 1.0, top);
                            Tooltip {
                                text: tooltip_text(cell, handle.view_mode),
                                x: x + 6.0,
                                y: y.max(4.0),
                            }
                        });
                        tooltip.set(next);
                    }));
                }
                // Release over the canvas: a click selects, or deselects on empty water.
                {
                    let camera = camera.clone();
                    let view_ref = view_ref.clone();
                    attach(&mut listeners, &canvas, "mouseup", Box::new(move |e: web_sys::Event| {
                        let Some(e) = e.dyn_ref::<web_sys::MouseEvent>() else {
                            return;
                        };
                        let mut cam = camera.borrow_mut();
                        if !cam.end_drag() || e.button() != 0 {
                            return;
                        }
                        let (wx, wy) = cam.screen_to_world(e.offset_x() as f64, e.offset_y() as f64);
                        drop(cam);
                        let handle = view_ref.borrow().clone();
                        match handle.pick(wx, wy) {
                            Some(key) => handle.dispatch(ViewAction::SelectTile(key)),
                            None => handle.dispatch(ViewAction::DeselectTile),
                        }
                    }));
                }
                {
                    let tooltip = tooltip.clone();
                    let hover_ref = hover_ref.clone();
                    attach(&mut listeners, &canvas, "mouseleave", Box::new(move |_e: web_sys::Event| {
                        *hover_ref.borrow_mut() = None;
                        tooltip.set(None);
                    }));
                }
                attach(&mut listeners, &canvas, "contextmenu", Box::new(|e: web_sys::Event| e.prevent_default()));
                // Releases outside the canvas still end a pan.
                {
                    let camera = camera.clone();
                    attach(&mut listeners, &window, "mouseup", Box::new(move |_e: web_sys::Event| {
                        camera.borrow_mut().panning = false;
                    }));
                }
                {
                    let canvas = canvas.clone();
                    let draw = draw_closure.clone();
                    attach(&mut listeners, &window, "resize", Box::new(move |_e: web_sys::Event| {
                        fit_canvas_to_window(&canvas);
                        draw();
                    }));
                }
                // Escape drops the selection, `v` flips the view mode.
                {
                    let view_ref = view_ref.clone();
                    attach(&mut listeners, &window, "keydown", Box::new(move |e: web_sys::Event| {
                        let Some(ke) = e.dyn_ref::<web_sys::KeyboardEvent>() else {
                            return;
                        };
                        let typing = e
                            .target()
                            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                            .is_some();
                        if typing {
                            return;
                        }
                        let handle = view_ref.borrow().clone();
                        match ke.key().as_str() {
                            "Escape" => handle.dispatch(ViewAction::DeselectTile),
                            "v" | "V" => handle.dispatch(ViewAction::ToggleViewMode),
                            _ => {}
                        }
                    }));
                }
            } else {
                log::error!("grid canvas is not mounted");
            }

            move || {
                for (target, name, cb) in &listeners {
                    let _ = target.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
                }
                drop(listeners);
            }
        });
    }

    let on_zoom = |factor: f64| {
        let camera = camera.clone();
        let canvas_ref = canvas_ref.clone();
        let zoom_pct = zoom_pct.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                let (w, h) = canvas_size(&canvas);
                let mut cam = camera.borrow_mut();
                cam.zoom_at(w * 0.5, h * 0.5, factor);
                zoom_pct.set((cam.zoom * 100.0).round() as u32);
            }
            redraw();
        })
    };
    let on_fit = {
        let camera = camera.clone();
        let canvas_ref = canvas_ref.clone();
        let view = props.view.clone();
        let zoom_pct = zoom_pct.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            if let (Some(canvas), Some(extent)) = (canvas_ref.cast::<HtmlCanvasElement>(), view.grid.extent()) {
                let (w, h) = canvas_size(&canvas);
                let mut cam = camera.borrow_mut();
                cam.fit(extent, w, h);
                zoom_pct.set((cam.zoom * 100.0).round() as u32);
            }
            redraw();
        })
    };

    html! {
        <div style="position:absolute; inset:0; overflow:hidden;">
            <canvas ref={canvas_ref.clone()} style="display:block; cursor:crosshair;"></canvas>
            {
                if let Some(t) = &*tooltip {
                    html! {
                        <div style={format!("position:absolute; left:{}px; top:{}px; pointer-events:none; white-space:pre; \
                            background:rgba(13,17,23,0.92); border:1px solid #30363d; border-radius:6px; \
                            padding:4px 8px; font-size:12px; color:#c9d1d9;", t.x, t.y)}>
                            { t.text.clone() }
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            <CameraControls
                zoom_pct={*zoom_pct}
                on_zoom_in={on_zoom(1.25)}
                on_zoom_out={on_zoom(0.8)}
                on_fit={on_fit}
            />
        </div>
    }
}
