//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Reservation Revenue Split"</h1>
            <p class="subtitle">
                "Upload a reservations export to get a summary sheet: dates as Excel serial numbers, "
                "revenue columns as numbers, Channel renamed to Sub Channel and a fixed column order."
            </p>
        </div>
    }
}
