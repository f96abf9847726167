use crate::api::settings_update_outcome;
use crate::components::dashboard::{
    DashboardHeader, DashboardSidebar, LeadsFilters, ListingEditForm, NotificationSettingsPanel,
    UpdateSettingsFn,
};
use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle,
    ErrorBanner, Input, Label, Spinner,
};
use crate::leads::LeadsFilterState;
use crate::models::{LeadsPage as LeadsResult, Listing};
use crate::settings::{NotificationSettingsData, NotificationSettingsPatch};
use crate::state::AppContext;
use crate::storage::{save_flag, save_user_to_storage, SIDEBAR_COLLAPSED_KEY};
use crate::util::short_timestamp;
use futures::FutureExt;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_params};
use leptos_router::params::Params;
use std::rc::Rc;

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get();
        let password_val = password.get();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.login(&email_val, &password_val).await {
                Ok(response) => {
                    api_client.set_token(response.token);
                    api_client.save_to_storage();
                    save_user_to_storage(&response.account);
                    if let Some(locale) = response.account.locale() {
                        app_state.0.locale.set(locale);
                    }
                    app_state.0.api_client.set(api_client);
                    app_state.0.current_user.set(Some(response.account));
                    tracing::info!("signed in");
                    let _ = window().location().set_href("/dashboard");
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Pawdir"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Business sign in"</CardTitle>
                        <CardDescription class="text-xs">"Manage your listings, leads and notifications."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@example.com"
                                    value=email
                                    on_value=Callback::new(move |v: String| email.set(v))
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    value=password
                                    on_value=Callback::new(move |v: String| password.set(v))
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <ErrorBanner message=error />

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Continue" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

/// Header, sidebar and the shared listings load for every dashboard route.
#[component]
pub fn DashboardLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;

    // Listings feed the overview, the sidebar-independent selects and the
    // leads filter. Re-fetched whenever a save bumps `data_version`.
    let listings_request = RwSignal::new(0u64);
    Effect::new(move |_| {
        let _ = state.data_version.get();
        let client = state.api_client.get();
        if !client.is_authenticated() {
            return;
        }

        let rid = listings_request.get_untracked() + 1;
        listings_request.set(rid);
        state.listings_loading.set(true);
        state.listings_error.set(None);

        spawn_local(async move {
            let res = client.get_listings().await;
            if listings_request.get_untracked() != rid {
                return;
            }
            match res {
                Ok(list) => state.listings.set(list),
                Err(e) => state.handle_error(e, state.listings_error),
            }
            state.listings_loading.set(false);
        });
    });

    let business_name = Signal::derive(move || {
        state
            .current_user
            .get()
            .map(|u| u.business_name())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Your business".to_string())
    });

    let on_toggle_sidebar = Callback::new(move |_| {
        let next = !state.sidebar_collapsed.get_untracked();
        state.sidebar_collapsed.set(next);
        save_flag(SIDEBAR_COLLAPSED_KEY, next);
    });

    let on_logout = Callback::new(move |_| {
        tracing::info!("signed out");
        state.force_login();
    });

    view! {
        <div class="flex min-h-screen flex-col bg-background text-foreground">
            <DashboardHeader
                business_name=business_name
                locale=state.locale
                on_toggle_sidebar=on_toggle_sidebar
                on_logout=on_logout
            />
            <div class="flex flex-1">
                <DashboardSidebar collapsed=state.sidebar_collapsed />
                <main class="min-w-0 flex-1 px-6 py-6">
                    {children()}
                </main>
            </div>
        </div>
    }
}

#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <DashboardLayout>
                {move || children.with_value(|c| c())}
            </DashboardLayout>
        </Show>
    }
}

#[component]
pub fn RootPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let target = if app_state.0.api_client.get_untracked().is_authenticated() {
        "/dashboard"
    } else {
        "/login"
    };
    let _ = window().location().replace(target);

    view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Redirecting..."</div> }
}

#[component]
fn PageHeading(#[prop(into)] title: String, #[prop(into, optional)] description: String) -> impl IntoView {
    view! {
        <div class="mb-6">
            <h1 class="text-xl font-semibold">{title}</h1>
            {(!description.is_empty())
                .then(|| view! { <p class="mt-1 text-sm text-muted-foreground">{description}</p> })}
        </div>
    }
}

/// Listings overview with links to edit each listing and see its leads.
#[component]
pub fn OverviewPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;

    view! {
        <PageHeading title="Your listings" description="Keep your details current so pet owners can reach you." />
        <ErrorBanner message=state.listings_error />

        <Show
            when=move || !state.listings_loading.get() || !state.listings.with(|l| l.is_empty())
            fallback=|| view! { <div class="flex items-center gap-2 text-sm text-muted-foreground"><Spinner />"Loading listings..."</div> }
        >
            <Show
                when=move || !state.listings.with(|l| l.is_empty())
                fallback=|| view! { <p class="text-sm text-muted-foreground">"No listings are linked to this account yet."</p> }
            >
                <div class="grid gap-4 sm:grid-cols-2 xl:grid-cols-3">
                    <For
                        each=move || state.listings.get()
                        key=|l| l.id.clone()
                        children=move |l| {
                            let edit_href = format!("/dashboard/listings/{}", l.id);
                            let leads_href = format!("/dashboard/leads?listingId={}", urlencoding::encode(&l.id));
                            view! {
                                <Card>
                                    <CardHeader>
                                        <CardTitle class="text-base">{l.name}</CardTitle>
                                        <CardDescription class="text-xs">{l.city}</CardDescription>
                                    </CardHeader>
                                    <CardContent class="flex gap-4 text-sm">
                                        <a class="text-primary underline-offset-4 hover:underline" href=edit_href>"Edit listing"</a>
                                        <a class="text-primary underline-offset-4 hover:underline" href=leads_href>"View leads"</a>
                                    </CardContent>
                                </Card>
                            }
                        }
                    />
                </div>
            </Show>
        </Show>
    }
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct ListingRouteParams {
    pub listing_id: Option<String>,
}

#[component]
pub fn ListingEditPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;
    let params = use_params::<ListingRouteParams>();
    let listing_id = Memo::new(move |_| {
        params
            .get()
            .ok()
            .and_then(|p| p.listing_id)
            .unwrap_or_default()
    });

    let listing: RwSignal<Option<Listing>> = RwSignal::new(None);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    // Keyed on the route only. A save refreshes shared data through
    // `data_version` without rebuilding the form and losing its banner.
    Effect::new(move |_| {
        let id = listing_id.get();
        if id.is_empty() {
            return;
        }
        let client = state.api_client.get_untracked();
        loading.set(true);
        error.set(None);
        listing.set(None);

        spawn_local(async move {
            match client.get_listing(&id).await {
                Ok(l) => listing.set(Some(l)),
                Err(e) => state.handle_error(e, error),
            }
            loading.set(false);
        });
    });

    let on_saved = Callback::new(move |_| state.refresh());
    let on_unauthorized = Callback::new(move |_| state.force_login());

    view! {
        <PageHeading title="Edit listing" />
        <ErrorBanner message=error />

        <Show when=move || loading.get() fallback=|| ().into_view()>
            <div class="flex items-center gap-2 text-sm text-muted-foreground"><Spinner />"Loading listing..."</div>
        </Show>

        {move || {
            listing.get().map(|l| {
                let title = l.name.clone();
                let leads_href = format!("/dashboard/leads?listingId={}", urlencoding::encode(&l.id));
                view! {
                    <Card class="max-w-2xl">
                        <CardHeader>
                            <CardTitle class="text-base">{title}</CardTitle>
                            <CardDescription class="text-xs">"Changes are visible on your public listing after saving."</CardDescription>
                        </CardHeader>
                        <CardContent>
                            <ListingEditForm
                                listing=l
                                api_client=state.api_client
                                on_saved=on_saved
                                on_unauthorized=on_unauthorized
                            />
                        </CardContent>
                        <CardFooter class="border-t text-sm">
                            <a class="text-primary underline-offset-4 hover:underline" href="/dashboard">"Back to listings"</a>
                            <a
                                class="text-primary underline-offset-4 hover:underline"
                                href=leads_href
                            >
                                "View leads"
                            </a>
                        </CardFooter>
                    </Card>
                }
            })
        }}
    }
}

/// Leads table driven entirely by the query string.
#[component]
pub fn LeadsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;
    let location = use_location();
    let search = location.search;

    let page: RwSignal<LeadsResult> = RwSignal::new(LeadsResult::default());
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let request_id = RwSignal::new(0u64);

    Effect::new(move |_| {
        let query = LeadsFilterState::from_query(&search.get()).query_string();
        let _ = state.data_version.get();
        let client = state.api_client.get_untracked();

        let rid = request_id.get_untracked() + 1;
        request_id.set(rid);
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let res = client.get_leads(&query).await;
            // A newer filter change superseded this request.
            if request_id.get_untracked() != rid {
                return;
            }
            match res {
                Ok(p) => page.set(p),
                Err(e) => state.handle_error(e, error),
            }
            loading.set(false);
        });
    });

    let result_count = Signal::derive(move || page.with(|p| p.total));

    view! {
        <PageHeading title="Leads" description="Enquiries sent to your listings." />

        <Card class="mb-4">
            <CardContent class="pt-6">
                <LeadsFilters
                    listings=state.listings
                    result_count=result_count
                    api_client=state.api_client
                />
            </CardContent>
        </Card>

        <ErrorBanner message=error />

        <div class="mb-2 flex items-center gap-2 text-xs text-muted-foreground">
            <Show when=move || loading.get() fallback=|| ().into_view()>
                <Spinner />
            </Show>
            {move || match result_count.get() {
                1 => "1 lead".to_string(),
                n => format!("{n} leads"),
            }}
        </div>

        <Show
            when=move || !page.with(|p| p.leads.is_empty())
            fallback=move || view! {
                <p class="text-sm text-muted-foreground">
                    {move || {
                        if loading.get() {
                            ""
                        } else if LeadsFilterState::from_query(&search.get()).is_filtered() {
                            "No leads match these filters."
                        } else {
                            "No leads yet. New enquiries will show up here."
                        }
                    }}
                </p>
            }
        >
            <div class="overflow-x-auto rounded-lg border border-border">
                <table class="w-full text-left text-sm">
                    <thead class="bg-surface text-xs uppercase text-muted-foreground">
                        <tr>
                            <th class="px-3 py-2">"Received"</th>
                            <th class="px-3 py-2">"Listing"</th>
                            <th class="px-3 py-2">"Name"</th>
                            <th class="px-3 py-2">"Contact"</th>
                            <th class="px-3 py-2">"Message"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || page.get().leads
                            key=|lead| lead.id.clone()
                            children=move |lead| {
                                let contact = [lead.email.clone(), lead.phone.clone()]
                                    .into_iter()
                                    .flatten()
                                    .collect::<Vec<_>>()
                                    .join(" · ");
                                view! {
                                    <tr class="border-t border-border align-top">
                                        <td class="whitespace-nowrap px-3 py-2 text-xs text-muted-foreground">
                                            {short_timestamp(&lead.created_at)}
                                        </td>
                                        <td class="px-3 py-2">{lead.listing_name}</td>
                                        <td class="px-3 py-2 font-medium">{lead.name}</td>
                                        <td class="px-3 py-2 text-xs">{contact}</td>
                                        <td class="max-w-md px-3 py-2 text-xs text-muted-foreground">
                                            {lead.message.unwrap_or_default()}
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </Show>
    }
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;

    let settings: RwSignal<Option<NotificationSettingsData>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        let client = state.api_client.get_untracked();
        spawn_local(async move {
            match client.get_notification_settings().await {
                Ok(s) => settings.set(Some(s)),
                Err(e) => state.handle_error(e, error),
            }
        });
    });

    let make_update = move || -> UpdateSettingsFn {
        Rc::new(move |patch: NotificationSettingsPatch| {
            let client = state.api_client.get_untracked();
            async move {
                let res = client.update_notification_settings(&patch).await;
                settings_update_outcome(res, || state.force_login())
            }
            .boxed_local()
        })
    };

    view! {
        <PageHeading title="Notifications" />
        <ErrorBanner message=error />

        {move || match settings.get() {
            Some(initial) => view! {
                <NotificationSettingsPanel
                    initial=initial
                    locale=state.locale
                    update=make_update()
                />
            }
            .into_any(),
            None if error.with(|e| e.is_none()) => view! {
                <div class="flex items-center gap-2 text-sm text-muted-foreground"><Spinner />"Loading settings..."</div>
            }
            .into_any(),
            None => ().into_any(),
        }}
    }
}
