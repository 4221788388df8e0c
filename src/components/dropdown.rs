use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct DropdownProps {
    /// Id of the collapsible content element.
    pub target_id: AttrValue,
    pub title: AttrValue,
    #[prop_or_default]
    pub children: Html,
}

/// Collapsible section; each one opens and closes on its own.
#[function_component(Dropdown)]
pub fn dropdown(props: &DropdownProps) -> Html {
    let open = use_state(|| false);
    let toggle_cb = {
        let open = open.clone();
        Callback::from(move |_| open.set(!*open))
    };
    html! {<div style="background:rgba(255,255,255,0.94); border:1px solid #c9c4b8; border-radius:8px; font-size:13px;">
        <button class={classes!("dropdown-toggle", (*open).then_some("open"))}
            data-target={props.target_id.clone()}
            onclick={toggle_cb}
            style="width:100%; text-align:left; background:none; border:none; padding:8px 12px; font-weight:600; cursor:pointer;">
            { if *open { "▾ " } else { "▸ " } }{ props.title.clone() }
        </button>
        <div id={props.target_id.clone()} style={if *open { "display:block; padding:0 12px 10px;" } else { "display:none;" }}>
            { props.children.clone() }
        </div>
    </div>}
}
