mod boundary;
mod components;
mod config;
mod error;
mod model;
mod profile;
mod session;
mod util;
mod world;

use components::app::App;
use log::LevelFilter;
use util::ConsoleLogger;

fn main() {
    console_error_panic_hook::set_once();
    ConsoleLogger::install(if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info });
    yew::Renderer::<App>::new().render();
}
