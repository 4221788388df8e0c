use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::map::projection::ScreenPoint;
use crate::map::render::draw_surface;
use crate::map::MapSurface;
use crate::model::ViewerEvent;
use crate::state::camera::WHEEL_ZOOM_RATE;

/// Wheel events closer together than this belong to one gesture.
const WHEEL_SETTLE_MS: i32 = 150;
/// Degrees of bearing per pixel of right-button drag.
const ROTATE_DEG_PER_PX: f64 = 0.4;

/// Shared map surface; compared by identity.
#[derive(Clone)]
pub struct SurfaceHandle(pub Rc<RefCell<MapSurface>>);

impl PartialEq for SurfaceHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub surface: SurfaceHandle,
    pub on_event: Callback<ViewerEvent>,
    /// Changes whenever the viewer state changed and the canvas is stale.
    pub version: u64,
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);

    // Redraw after every applied viewer change
    {
        let draw_ref = draw_ref.clone();
        use_effect_with(props.version, move |_| {
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }
    // Main mount effect (events)
    {
        let canvas_ref = canvas_ref.clone();
        let surface = props.surface.0.clone();
        let on_event = props.on_event.clone();
        let draw_ref_setup = draw_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let canvas: HtmlCanvasElement = canvas_ref.cast::<HtmlCanvasElement>().expect("canvas");
            let compute_and_apply_canvas_size = {
                let canvas = canvas.clone();
                let window = window.clone();
                let surface = surface.clone();
                move || {
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0);
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0);
                    canvas.set_width(width.max(0.0) as u32);
                    canvas.set_height(height.max(0.0) as u32);
                    surface
                        .borrow_mut()
                        .camera
                        .resize(canvas.width() as f64, canvas.height() as f64);
                }
            };
            compute_and_apply_canvas_size();
            // Draw closure
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let surface = surface.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                    {
                        Some(c) => c,
                        None => return,
                    };
                    draw_surface(&ctx, &surface.borrow());
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());
            // the viewport size is only known now
            on_event.emit(ViewerEvent::MoveEnd);
            (draw_closure)();

            // Wheel zoom; move end fires once the wheel has been quiet for a moment
            let wheel_timer: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
            let wheel_settled = {
                let on_event = on_event.clone();
                let wheel_timer = wheel_timer.clone();
                Closure::wrap(Box::new(move || {
                    wheel_timer.borrow_mut().take();
                    on_event.emit(ViewerEvent::MoveEnd);
                }) as Box<dyn FnMut()>)
            };
            let wheel_cb = {
                let surface = surface.clone();
                let draw_ref = draw_ref_setup.clone();
                let on_event = on_event.clone();
                let window = window.clone();
                let wheel_timer = wheel_timer.clone();
                let settled_fn: js_sys::Function = wheel_settled.as_ref().unchecked_ref::<js_sys::Function>().clone();
                Closure::wrap(Box::new(move |e: web_sys::WheelEvent| {
                    e.prevent_default();
                    let anchor = ScreenPoint::new(e.offset_x() as f64, e.offset_y() as f64);
                    surface
                        .borrow_mut()
                        .camera
                        .zoom_at(anchor, -e.delta_y() * WHEEL_ZOOM_RATE);
                    if let Some(f) = &*draw_ref.borrow() {
                        f();
                    }
                    on_event.emit(ViewerEvent::CursorMove { point: anchor });
                    if let Some(id) = wheel_timer.borrow_mut().take() {
                        window.clear_timeout_with_handle(id);
                    }
                    if let Ok(id) = window
                        .set_timeout_with_callback_and_timeout_and_arguments_0(&settled_fn, WHEEL_SETTLE_MS)
                    {
                        *wheel_timer.borrow_mut() = Some(id);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .unwrap();
            // Left drag pans, right drag rotates
            let mousedown_cb = {
                let surface = surface.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let mut s = surface.borrow_mut();
                    let cam = &mut s.camera;
                    match e.button() {
                        0 => cam.panning = true,
                        2 => cam.rotating = true,
                        _ => return,
                    }
                    cam.last_x = e.client_x() as f64;
                    cam.last_y = e.client_y() as f64;
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                )
                .unwrap();
            let mousemove_cb = {
                let surface = surface.clone();
                let draw_ref = draw_ref_setup.clone();
                let on_event = on_event.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let moved = {
                        let mut s = surface.borrow_mut();
                        let cam = &mut s.camera;
                        let x = e.client_x() as f64;
                        let y = e.client_y() as f64;
                        let dx = x - cam.last_x;
                        let dy = y - cam.last_y;
                        cam.last_x = x;
                        cam.last_y = y;
                        if cam.panning {
                            cam.pan_by(dx, dy);
                            true
                        } else if cam.rotating {
                            cam.rotate_by(dx * ROTATE_DEG_PER_PX);
                            true
                        } else {
                            false
                        }
                    };
                    if moved {
                        if let Some(f) = &*draw_ref.borrow() {
                            f();
                        }
                    }
                    on_event.emit(ViewerEvent::CursorMove {
                        point: ScreenPoint::new(e.offset_x() as f64, e.offset_y() as f64),
                    });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                )
                .unwrap();
            let mouseup_cb = {
                let surface = surface.clone();
                let on_event = on_event.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    let was_moving = {
                        let mut s = surface.borrow_mut();
                        let cam = &mut s.camera;
                        let was_moving = cam.panning || cam.rotating;
                        cam.panning = false;
                        cam.rotating = false;
                        was_moving
                    };
                    if was_moving {
                        on_event.emit(ViewerEvent::MoveEnd);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .unwrap();
            let contextmenu_cb = {
                Closure::wrap(Box::new(move |e: web_sys::Event| {
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                )
                .unwrap();
            let resize_cb = {
                let compute_and_apply_canvas_size = compute_and_apply_canvas_size.clone();
                let on_event = on_event.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    compute_and_apply_canvas_size();
                    on_event.emit(ViewerEvent::MoveEnd);
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .unwrap();
            // Cleanup
            let window_clone = window.clone();
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                if let Some(id) = wheel_timer.borrow_mut().take() {
                    window_clone.clear_timeout_with_handle(id);
                }
                let _keep_alive = (&wheel_settled, &wheel_cb, &mousedown_cb, &mousemove_cb, &mouseup_cb);
            }
        });
    }

    html! {
        <canvas ref={canvas_ref} id="map" style="position:absolute; inset:0; display:block; cursor:crosshair;"></canvas>
    }
}
