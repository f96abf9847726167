use crate::analytics::track;
use crate::api::ApiClient;
use crate::components::ui::{Button, ButtonVariant, Label, NativeSelect, Spinner};
use crate::download::save_bytes_as_file;
use crate::leads::{
    filter_change, run_export, ExportState, FilterKey, LeadsFilterState, LeadsPeriod, ALL_VALUE,
    EXPORT_MIME,
};
use crate::models::ListingSummary;
use crate::util::{alert, today_iso_local};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};

/// Listing/period selects plus the CSV export button.
///
/// Holds no lead data: a change navigates to the same route with a new query
/// string, and the page re-fetches.
#[component]
pub fn LeadsFilters(
    #[prop(into)] listings: Signal<Vec<ListingSummary>>,
    /// Count currently on screen; reported with filter events.
    #[prop(into)] result_count: Signal<usize>,
    #[prop(into)] api_client: Signal<ApiClient>,
) -> impl IntoView {
    let navigate = StoredValue::new(use_navigate());
    let location = use_location();
    let pathname = location.pathname;
    let search = location.search;

    let filter = Memo::new(move |_| LeadsFilterState::from_query(&search.get()));
    let export_state = RwSignal::new(ExportState::default());

    let update_filter = move |key: FilterKey, value: String| {
        let change = filter_change(
            &pathname.get_untracked(),
            &search.get_untracked(),
            key,
            &value,
            result_count.get_untracked(),
        );
        track(change.event);
        navigate.with_value(|nav| nav(&change.href, Default::default()));
    };

    let handle_export = move |_: web_sys::MouseEvent| {
        if !export_state.try_update(|s| s.try_start()).unwrap_or(false) {
            return;
        }

        let current = filter.get_untracked();
        let client = api_client.get_untracked();
        spawn_local(async move {
            let res = run_export(
                &current,
                &today_iso_local(),
                track,
                move |q| async move { client.export_leads(q).await },
                |bytes, name| save_bytes_as_file(bytes, name, EXPORT_MIME),
            )
            .await;

            if let Err(e) = &res {
                alert(e);
            }
            export_state.update(|s| s.finish(&res));
        });
    };

    let listing_options = Signal::derive(move || {
        let mut out = vec![(ALL_VALUE.to_string(), "All listings".to_string())];
        out.extend(listings.get().into_iter().map(|l| (l.id, l.name)));
        out
    });

    let period_options = Signal::derive(|| {
        LeadsPeriod::ALL
            .iter()
            .map(|p| (p.to_string(), p.label().to_string()))
            .collect::<Vec<_>>()
    });

    let exporting = Signal::derive(move || export_state.with(|s| s.is_exporting()));

    view! {
        <div class="flex flex-wrap items-end gap-4">
            <div class="grid gap-2">
                <Label html_for="leads-listing">"Listing"</Label>
                <NativeSelect
                    id="leads-listing"
                    class="min-w-48"
                    options=listing_options
                    value=Signal::derive(move || {
                        filter.get().listing_id.unwrap_or_else(|| ALL_VALUE.to_string())
                    })
                    on_value=Callback::new(move |v: String| update_filter(FilterKey::ListingId, v))
                />
            </div>

            <div class="grid gap-2">
                <Label html_for="leads-period">"Period"</Label>
                <NativeSelect
                    id="leads-period"
                    options=period_options
                    value=Signal::derive(move || filter.get().period.to_string())
                    on_value=Callback::new(move |v: String| update_filter(FilterKey::Period, v))
                />
            </div>

            <Button
                variant=ButtonVariant::Outline
                class="ml-auto"
                attr:disabled=move || exporting.get()
                on:click=handle_export
            >
                <span class="inline-flex items-center gap-2">
                    <Show when=move || exporting.get() fallback=|| ().into_view()>
                        <Spinner />
                    </Show>
                    {move || if exporting.get() { "Exporting..." } else { "Export CSV" }}
                </span>
            </Button>
            {move || {
                export_state
                    .with(|s| s.last_error().map(str::to_string))
                    .map(|e| view! { <p class="w-full text-right text-xs text-destructive">{e}</p> })
            }}
        </div>
    }
}
