use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;

/// Inline red banner. Renders nothing for `None`.
#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some() fallback=|| ().into_view()>
            <Alert class="border-destructive/30" attr:role="alert">
                <AlertDescription class="text-destructive text-xs">
                    {move || message.get().unwrap_or_default()}
                </AlertDescription>
            </Alert>
        </Show>
    }
}
