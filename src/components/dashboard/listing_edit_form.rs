use crate::analytics::{track, AnalyticsEvent};
use crate::api::ApiClient;
use crate::components::ui::{Alert, AlertDescription, Button, Input, Label, Spinner, Textarea};
use crate::listings::{FormBanner, ListingField, ListingFormModel, SUCCESS_BANNER_MS};
use crate::models::Listing;
use crate::util::{now_ms, set_timeout_once};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ListingEditForm(
    listing: Listing,
    #[prop(into)] api_client: Signal<ApiClient>,
    /// Called after a successful save so server-backed views re-fetch.
    on_saved: Callback<()>,
    /// Called when the server rejects the session.
    on_unauthorized: Callback<()>,
) -> impl IntoView {
    let listing_id = listing.id.clone();
    let model = RwSignal::new(ListingFormModel::new(&listing));
    let submitting = Signal::derive(move || model.with(|m| m.is_submitting()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if model.with_untracked(|m| m.is_submitting()) {
            return;
        }

        let Some(Ok(req)) = model.try_update(|m| m.begin_submit()) else {
            return;
        };

        let client = api_client.get_untracked();
        spawn_local(async move {
            let outcome = match client.update_listing(&req).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    tracing::warn!(listing_id = %req.listing_id, error = %e, "listing update failed");
                    if e.is_unauthorized() {
                        on_unauthorized.run(());
                    }
                    Err(e.to_string())
                }
            };
            let saved = outcome.is_ok();
            model.update(|m| m.finish_submit(outcome, now_ms()));

            if saved {
                track(AnalyticsEvent::ListingUpdated {
                    listing_id: req.listing_id.clone(),
                });
                on_saved.run(());
                set_timeout_once(SUCCESS_BANNER_MS as i32, move || {
                    model.update(|m| m.expire_banner(now_ms()));
                });
            }
        });
    };

    let field_row = move |field: ListingField| {
        let value = Signal::derive(move || model.with(|m| m.fields().get(field).to_string()));
        let on_value = Callback::new(move |v: String| model.update(|m| m.set_field(field, &v)));

        let control = if field == ListingField::Description {
            view! {
                <Textarea
                    id=field.id()
                    maxlength=field.max_len()
                    disabled=submitting
                    value=value
                    on_value=on_value
                />
            }
            .into_any()
        } else {
            view! {
                <Input
                    id=field.id()
                    r#type=field.input_type()
                    maxlength=field.max_len()
                    required={field == ListingField::Name}
                    disabled=submitting
                    value=value
                    on_value=on_value
                />
            }
            .into_any()
        };

        view! {
            <div class="flex flex-col gap-2">
                <Label html_for=field.id()>{field.label()}</Label>
                {control}
            </div>
        }
    };

    let banner = move || match model.with(|m| m.banner().clone()) {
        FormBanner::None => ().into_any(),
        FormBanner::Error(msg) => view! {
            <Alert class="border-destructive/30" attr:role="alert">
                <AlertDescription class="text-destructive text-xs">{msg}</AlertDescription>
            </Alert>
        }
        .into_any(),
        FormBanner::Success { .. } => view! {
            <Alert class="border-success/30" attr:role="status">
                <AlertDescription class="text-success text-xs">"Listing updated."</AlertDescription>
            </Alert>
        }
        .into_any(),
    };

    view! {
        <form class="flex flex-col gap-4" data-listing-id=listing_id on:submit=on_submit>
            {banner}
            {ListingField::ALL.into_iter().map(field_row).collect_view()}
            <div>
                <Button attr:disabled=move || submitting.get()>
                    <span class="inline-flex items-center gap-2">
                        <Show when=move || submitting.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        {move || if submitting.get() { "Saving..." } else { "Save changes" }}
                    </span>
                </Button>
            </div>
        </form>
    }
}
