use std::rc::Rc;
use yew::prelude::*;

use super::{
    camera_controls::CameraControls, dropdown::Dropdown, layer_panel::LayerPanel,
    map_view::{MapView, SurfaceHandle},
};
use crate::config::{read_page_config, ViewerConfig};
use crate::features::{load_datasets, DatasetId};
use crate::map::MapSurface;
use crate::model::{Viewer, ViewerEvent};
use crate::state::{Camera, CameraAction};

#[function_component(App)]
pub fn app() -> Html {
    let config: Rc<ViewerConfig> = use_memo((), |_| read_page_config());
    let viewer = use_mut_ref(|| Viewer::new((*config).clone()));
    let surface = {
        let config = config.clone();
        use_mut_ref(move || MapSurface::new(Camera::new(config.center, config.zoom)))
    };
    let snapshot = {
        let viewer = viewer.clone();
        use_state(move || viewer.borrow().snapshot())
    };

    // Single entry point for state changes: mutate, recount, publish.
    let dispatch = {
        let viewer = viewer.clone();
        let surface = surface.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |event: ViewerEvent| {
            let mut v = viewer.borrow_mut();
            if v.apply(&mut *surface.borrow_mut(), event) {
                snapshot.set(v.snapshot());
            }
        })
    };

    // Load both datasets once
    {
        let dispatch = dispatch.clone();
        let config = config.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match load_datasets(&config.primary.url, &config.secondary.url).await {
                    Ok(datasets) => dispatch.emit(ViewerEvent::Loaded(datasets)),
                    Err(err) => {
                        log::error!("error loading datasets: {}", error_chain(&err));
                        dispatch.emit(ViewerEvent::LoadFailed);
                    }
                }
            });
            || ()
        });
    }

    let on_toggle = {
        let dispatch = dispatch.clone();
        Callback::from(move |(dataset, visible): (DatasetId, bool)| {
            dispatch.emit(ViewerEvent::ToggleDataset { dataset, visible })
        })
    };
    let on_toggle_reveal = {
        let dispatch = dispatch.clone();
        Callback::from(move |_| dispatch.emit(ViewerEvent::ToggleReveal))
    };
    let on_camera = {
        let dispatch = dispatch.clone();
        let surface = surface.clone();
        Callback::from(move |action: CameraAction| {
            surface.borrow_mut().camera.apply(action);
            dispatch.emit(ViewerEvent::MoveEnd);
        })
    };

    let snap = *snapshot;
    html! {
        <div id="root" style="position:relative; width:100vw; height:100vh; overflow:hidden;">
            <MapView surface={SurfaceHandle(surface.clone())} on_event={dispatch.clone()} version={snap.version} />
            <div id="sidebar" style="position:absolute; top:12px; left:12px; width:260px; display:flex; flex-direction:column; gap:8px;">
                <LayerPanel
                    primary_label={config.primary.label.clone()}
                    primary_color={config.primary.color.clone()}
                    secondary_label={config.secondary.label.clone()}
                    secondary_color={config.secondary.color.clone()}
                    visibility={snap.visibility}
                    counts={snap.counts}
                    load={snap.load}
                    on_toggle={on_toggle}
                    on_toggle_reveal={on_toggle_reveal}
                />
                <Dropdown target_id="about" title="About">
                    <p style="margin:0;">{"Counts show the points of each checked dataset inside the current view. They refresh once a pan or zoom settles."}</p>
                </Dropdown>
                <Dropdown target_id="reveal-help" title="Reveal lens">
                    <p style="margin:0;">{ format!(
                        "Reveal hides the {} layer and shows only its points under a {}px square that follows the cursor. The {} count then reflects the square.",
                        config.primary.label, (config.lens_half_size_px * 2.0).round(), config.primary.label
                    ) }</p>
                </Dropdown>
            </div>
            <CameraControls on_action={on_camera} />
        </div>
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
