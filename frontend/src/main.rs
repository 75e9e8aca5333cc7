mod api;
mod clipboard;
mod components;
mod export;
mod markdown;
mod models;
mod state;
mod storage;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatArea;
use components::toolbar::{ToastView, Toolbar};
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();

    let class = move || {
        state.chat.with(|s| {
            format!(
                "app-container theme-{} accent-{} {}",
                s.settings.theme.as_str(),
                s.settings.accent.as_str(),
                s.settings.font_size.css_class()
            )
        })
    };

    view! {
        <div class=class>
            <Toolbar />
            <ChatArea />
            <ToastView />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
