use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use leptos::prelude::*;
use leptos_router::hooks::use_location;

pub(crate) const NAV_ITEMS: [(&str, &str); 4] = [
    ("/dashboard", "Overview"),
    ("/dashboard/listings", "Listings"),
    ("/dashboard/leads", "Leads"),
    ("/dashboard/notifications", "Notifications"),
];

/// The overview link only matches exactly; the rest also match their sub-routes.
pub(crate) fn is_nav_active(pathname: &str, href: &str) -> bool {
    let p = pathname.trim_end_matches('/');
    if href == "/dashboard" {
        return p == href;
    }
    p == href || p.starts_with(&format!("{href}/"))
}

#[component]
pub fn DashboardHeader(
    #[prop(into)] business_name: Signal<String>,
    #[prop(into)] locale: Signal<String>,
    on_toggle_sidebar: Callback<()>,
    on_logout: Callback<()>,
) -> impl IntoView {
    view! {
        <header class="flex h-14 items-center gap-3 border-b border-border bg-background px-4">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:aria-label="Toggle sidebar"
                on:click=move |_| on_toggle_sidebar.run(())
            >
                "☰"
            </Button>
            <a href="/dashboard" class="text-sm font-semibold">"Pawdir"</a>
            <span class="text-xs text-muted-foreground">"Business dashboard"</span>

            <div class="ml-auto flex items-center gap-3">
                <span class="max-w-48 truncate text-sm">{move || business_name.get()}</span>
                <span class="rounded border border-border px-1.5 py-0.5 text-xs uppercase text-muted-foreground">
                    {move || locale.get()}
                </span>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| on_logout.run(())
                >
                    "Sign out"
                </Button>
            </div>
        </header>
    }
}

#[component]
pub fn DashboardSidebar(#[prop(into)] collapsed: Signal<bool>) -> impl IntoView {
    let location = use_location();
    let pathname = location.pathname;

    let width_class = move || {
        if collapsed.get() {
            "hidden"
        } else {
            "w-56 shrink-0 border-r border-border bg-surface px-2 py-4"
        }
    };

    view! {
        <nav class=width_class aria-label="Dashboard">
            <ul class="flex flex-col gap-1">
                {NAV_ITEMS
                    .into_iter()
                    .map(|(href, label)| {
                        let active = move || is_nav_active(&pathname.get(), href);
                        view! {
                            <li>
                                <a
                                    href=href
                                    aria-current=move || if active() { Some("page") } else { None }
                                    class=move || {
                                        if active() {
                                            "block rounded-md bg-accent px-3 py-2 text-sm font-medium text-accent-foreground"
                                        } else {
                                            "block rounded-md px-3 py-2 text-sm text-muted-foreground hover:bg-surface-hover"
                                        }
                                    }
                                >
                                    {label}
                                </a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_only_active_on_exact_path() {
        assert!(is_nav_active("/dashboard", "/dashboard"));
        assert!(is_nav_active("/dashboard/", "/dashboard"));
        assert!(!is_nav_active("/dashboard/leads", "/dashboard"));
    }

    #[test]
    fn test_section_active_on_sub_routes() {
        assert!(is_nav_active("/dashboard/listings/12", "/dashboard/listings"));
        assert!(is_nav_active("/dashboard/leads", "/dashboard/leads"));
        assert!(!is_nav_active("/dashboard/leadsx", "/dashboard/leads"));
    }
}
