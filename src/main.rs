mod api;
mod components;
mod config;
mod error;
mod export;
mod model;
mod resolve;
mod sidebar;
mod state;
mod util;

use components::{App, AppProps};
use config::ViewerConfig;

fn main() {
    let config = ViewerConfig::from_location();
    util::init_logging(config.log_level);
    log::info!("abyssal grid viewer starting (api base {:?})", config.api_base);
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
