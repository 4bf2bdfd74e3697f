mod api;
mod components;
mod state;
mod storage;

use chat_client_core::ClientConfig;
use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatArea;
use components::sidebar::Sidebar;
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide(ClientConfig::default());

    // Resolve the session and load its history once, on mount
    state.start();

    view! {
        <div class=move || format!("app-container {}", state.theme.get().root_class())>
            <Sidebar />
            <ChatArea />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
