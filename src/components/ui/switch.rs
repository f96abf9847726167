use leptos::prelude::*;
use tw_merge::tw_merge;

/// On/off toggle (`role="switch"`). Clicking reports the flipped value.
#[component]
pub fn Switch(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into)] checked: Signal<bool>,
    #[prop(default = false.into(), into)] disabled: Signal<bool>,
    on_change: Callback<bool>,
) -> impl IntoView {
    let track_class = move || {
        tw_merge!(
            "peer inline-flex h-5 w-9 shrink-0 items-center rounded-full border border-transparent shadow-xs transition-colors outline-none focus-visible:ring-2 focus-visible:ring-ring/50 disabled:cursor-not-allowed disabled:opacity-50",
            if checked.get() { "bg-primary" } else { "bg-input" },
            class.clone()
        )
    };
    let thumb_class = move || {
        if checked.get() {
            "pointer-events-none block size-4 rounded-full bg-background shadow-sm transition-transform translate-x-4"
        } else {
            "pointer-events-none block size-4 rounded-full bg-background shadow-sm transition-transform translate-x-0.5"
        }
    };

    view! {
        <button
            data-name="Switch"
            type="button"
            role="switch"
            id=id
            class=track_class
            aria-checked=move || checked.get().to_string()
            disabled=move || disabled.get()
            on:click=move |_| on_change.run(!checked.get_untracked())
        >
            <span class=thumb_class></span>
        </button>
    }
}
