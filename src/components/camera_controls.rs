use yew::prelude::*;

use crate::state::camera::{PAN_STEP_PX, ROTATE_STEP_DEG};
use crate::state::CameraAction;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub on_action: Callback<CameraAction>,
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    let button = |label: &'static str, title: &'static str, action: CameraAction| {
        let cb = props.on_action.clone();
        let onclick = Callback::from(move |_| cb.emit(action));
        html! { <button title={title} onclick={onclick}>{ label }</button> }
    };
    html! {<div style="position:absolute; right:12px; bottom:12px; background:rgba(255,255,255,0.94); border:1px solid #c9c4b8; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        { button("-", "Zoom out", CameraAction::ZoomOut) }
        { button("+", "Zoom in", CameraAction::ZoomIn) }
        <span style="width:8px;"></span>
        { button("←", "Pan west", CameraAction::Pan { dx: PAN_STEP_PX, dy: 0.0 }) }
        { button("↑", "Pan north", CameraAction::Pan { dx: 0.0, dy: PAN_STEP_PX }) }
        { button("↓", "Pan south", CameraAction::Pan { dx: 0.0, dy: -PAN_STEP_PX }) }
        { button("→", "Pan east", CameraAction::Pan { dx: -PAN_STEP_PX, dy: 0.0 }) }
        <span style="width:8px;"></span>
        { button("⟲", "Rotate left", CameraAction::Rotate { degrees: -ROTATE_STEP_DEG }) }
        { button("⟳", "Rotate right", CameraAction::Rotate { degrees: ROTATE_STEP_DEG }) }
        <span style="width:8px;"></span>
        { button("Reset", "Reset view", CameraAction::Reset) }
    </div>}
}
