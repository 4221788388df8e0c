use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LegendSwatchProps {
    pub color: String,
}

/// Small circle in a dataset's point colour.
#[function_component(LegendSwatch)]
pub fn legend_swatch(props: &LegendSwatchProps) -> Html {
    html! { <span style={format!("display:inline-block; width:10px; height:10px; background:{}; border:1px solid #555; border-radius:50%; flex-shrink:0;", props.color)}></span> }
}
