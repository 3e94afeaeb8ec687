//! Ledger Frontend Entry Point

mod api;
mod app;
mod auth_form;
mod components;
mod config;
mod context;
mod error;
mod list_model;
mod models;
mod resources;
mod session;
mod sort;
mod store;
mod sync;

use app::App;
use config::Config;
use leptos::prelude::*;
use log::{error, LevelFilter};

fn main() {
    console_error_panic_hook::set_once();

    // Capture everything in the buffer; the configured level is applied below
    let log_handle = console_logger::init(LevelFilter::Trace, console_logger::DEFAULT_CAPACITY).ok();

    let config = Config::load().unwrap_or_else(|e| {
        error!("[APP] Invalid configuration, using defaults: {}", e);
        Config::default()
    });
    log::set_max_level(config.log_level);

    mount_to_body(move || {
        if let Some(handle) = log_handle.clone() {
            provide_context(handle);
        }
        view! { <App config=config.clone() /> }
    });
}
