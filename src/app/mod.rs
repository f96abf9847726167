use crate::pages::{
    LeadsPage, ListingEditPage, LoginPage, NotificationsPage, OverviewPage, RootAuthed, RootPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("dashboard") view=move || view! {
                    <RootAuthed>
                        <OverviewPage />
                    </RootAuthed>
                } />
                <Route path=path!("dashboard/listings") view=move || view! {
                    <RootAuthed>
                        <OverviewPage />
                    </RootAuthed>
                } />
                <Route path=path!("dashboard/listings/:listing_id") view=move || view! {
                    <RootAuthed>
                        <ListingEditPage />
                    </RootAuthed>
                } />
                <Route path=path!("dashboard/leads") view=move || view! {
                    <RootAuthed>
                        <LeadsPage />
                    </RootAuthed>
                } />
                <Route path=path!("dashboard/notifications") view=move || view! {
                    <RootAuthed>
                        <NotificationsPage />
                    </RootAuthed>
                } />
                <Route path=path!("") view=RootPage />
            </Routes>
        </Router>
    }
}
