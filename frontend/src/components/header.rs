//! Top bar

use leptos::*;

#[component]
pub fn Header(is_processing: ReadSignal<bool>) -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">"REVSPLIT"</a>
                <span class="badge">"Reservation Revenue"</span>
            </div>
            <div class="header-right">
                <div class="status" class:busy=move || is_processing.get()>
                    <span class="status-dot" class:busy=move || is_processing.get()></span>
                    <span>{move || if is_processing.get() { "Processing" } else { "Ready" }}</span>
                </div>
            </div>
        </header>
    }
}
