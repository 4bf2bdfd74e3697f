use chat_client_core::Theme;
use leptos::prelude::*;

use crate::state::AppState;

/// Sidebar with the "New Chat" button and the theme switch.
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <aside class="sidebar">
            <div class="sidebar-header">
                <h2>"Newsroom Chat"</h2>
                <button class="theme-btn" on:click=move |_| state.toggle_theme()>
                    {move || match state.theme.get() {
                        Theme::Dark => "Light mode",
                        Theme::Light => "Dark mode",
                    }}
                </button>
            </div>
            <button class="new-chat-btn" on:click=move |_| state.reset_session()>
                "+ New Chat"
            </button>
        </aside>
    }
}
