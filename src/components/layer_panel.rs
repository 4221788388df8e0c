use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::legend::LegendSwatch;
use crate::features::DatasetId;
use crate::model::{CountDisplay, LoadStatus, VisibilityState};
use crate::util::format_count;

#[derive(Properties, PartialEq, Clone)]
pub struct LayerPanelProps {
    pub primary_label: String,
    pub primary_color: String,
    pub secondary_label: String,
    pub secondary_color: String,
    pub visibility: VisibilityState,
    pub counts: CountDisplay,
    pub load: LoadStatus,
    pub on_toggle: Callback<(DatasetId, bool)>,
    pub on_toggle_reveal: Callback<()>,
}

#[function_component]
pub fn LayerPanel(props: &LayerPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px; cursor:pointer;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:60px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    // toggles are wired only once the overlay layers exist
    let ready = props.load == LoadStatus::Ready;

    let row = |dataset: DatasetId, label: &str, color: &str, input_id: &'static str, count_id: &'static str| {
        let cb = props.on_toggle.clone();
        let onchange = Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit((dataset, input.checked()));
        });
        html! {
            <label style={row_style}>
                <input type="checkbox" id={input_id} disabled={!ready}
                    checked={props.visibility.is_visible(dataset)} onchange={onchange} />
                <LegendSwatch color={color.to_string()} />
                <span style={label_style}>{ label.to_string() }</span>
                <span id={count_id} style={value_style}>{ format_count(props.counts.get(dataset)) }</span>
            </label>
        }
    };
    let reveal_cb = {
        let cb = props.on_toggle_reveal.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let reveal_on = props.visibility.reveal.is_on();

    html! {
        <div style="background:rgba(255,255,255,0.94); border:1px solid #c9c4b8; border-radius:8px; padding:10px 14px; display:flex; flex-direction:column; gap:10px; font-size:14px;">
            { row(DatasetId::Primary, &props.primary_label, &props.primary_color, "toggle-primary", "primary-count") }
            { row(DatasetId::Secondary, &props.secondary_label, &props.secondary_color, "toggle-secondary", "secondary-count") }
            <div style="display:flex; align-items:center; gap:8px; border-top:1px solid #e2ded5; padding-top:8px;">
                <span style={label_style}>{"Total in view"}</span>
                <span id="total-count" style={value_style}>{
                    props.counts.total_in_view(props.visibility.reveal).map_or_else(|| "–".to_string(), format_count)
                }</span>
            </div>
            <button id="toggle-reveal" disabled={!ready}
                class={classes!("reveal-toggle", reveal_on.then_some("active"))}
                onclick={reveal_cb}>
                { if reveal_on { "Reveal lens: on" } else { "Reveal lens: off" } }
            </button>
            { match props.load {
                LoadStatus::Loading => html!{ <div style="font-size:11px; opacity:0.7;">{"Loading datasets…"}</div> },
                _ => html!{},
            } }
        </div>
    }
}
