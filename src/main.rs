mod components;
mod config;
mod counter;
mod features;
mod map;
mod model;
mod state;
mod util;

use components::App;

fn main() {
    console_error_panic_hook::set_once();
    util::init_logging();
    yew::Renderer::<App>::new().render();
}
