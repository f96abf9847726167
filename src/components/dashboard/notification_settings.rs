use crate::analytics::{track, AnalyticsEvent};
use crate::components::ui::{
    Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label, NativeSelect,
    Separator, Spinner, Switch,
};
use crate::settings::{
    format_hour, labels_for, NotificationChannel, NotificationSettingsData,
    NotificationSettingsPatch, PendingUpdate, SaveStatus, SettingsPanelModel, UpdateResult,
    COMMON_TIMEZONES, HOURS_PER_DAY, SAVED_INDICATOR_MS, SUPPORTED_LOCALES, WEEKLY_CAP_MAX,
    WEEKLY_CAP_MIN,
};
use crate::util::{now_ms, set_timeout_once};
use futures::future::LocalBoxFuture;
use icons::Check;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

/// Persists a partial settings update. Supplied by the page so the panel
/// does not know about auth or transport.
pub(crate) type UpdateSettingsFn =
    Rc<dyn Fn(NotificationSettingsPatch) -> LocalBoxFuture<'static, UpdateResult>>;

fn hour_options() -> Vec<(String, String)> {
    let mut out = vec![(String::new(), "--:--".to_string())];
    out.extend((0..HOURS_PER_DAY).map(|h| (h.to_string(), format_hour(h))));
    out
}

#[component]
pub fn NotificationSettingsPanel(
    initial: NotificationSettingsData,
    #[prop(into)] locale: Signal<String>,
    update: UpdateSettingsFn,
) -> impl IntoView {
    let model = RwSignal::new(SettingsPanelModel::new(initial));
    let update = StoredValue::new_local(update);
    let labels = move || labels_for(&locale.get());

    // Phase two runs when the update future resolves; the optimistic value is
    // already on screen by then.
    let commit = move |pending: Option<PendingUpdate>| {
        let Some(pending) = pending else {
            return;
        };

        track(AnalyticsEvent::NotificationSettingChanged {
            keys: pending.patch.keys().into_iter().map(String::from).collect(),
        });

        let fut = update.with_value(|f| f(pending.patch.clone()));
        spawn_local(async move {
            let outcome = fut.await.into_result();
            if let Err(e) = &outcome {
                tracing::warn!(seq = pending.seq, error = %e, "notification settings update failed");
            }

            let now = now_ms();
            model.update(|m| m.finish(pending, outcome, now));

            if model.with_untracked(|m| m.saved_indicator_visible(now)) {
                set_timeout_once(SAVED_INDICATOR_MS as i32, move || {
                    model.update(|m| m.expire_status(now_ms()));
                });
            }
        });
    };

    let channel_rows = NotificationChannel::ALL
        .into_iter()
        .map(|ch| {
            let checked = Signal::derive(move || model.with(|m| ch.is_enabled(m.settings())));
            view! {
                <div class="flex items-start justify-between gap-4 py-3">
                    <div class="space-y-1">
                        <Label html_for=ch.input_id()>{move || labels().channel(ch).0}</Label>
                        <p class="text-xs text-muted-foreground">{move || labels().channel(ch).1}</p>
                    </div>
                    <Switch
                        id=ch.input_id()
                        checked=checked
                        on_change=Callback::new(move |v: bool| {
                            commit(model.try_update(|m| m.toggle_channel(ch, v)).flatten());
                        })
                    />
                </div>
            }
        })
        .collect_view();

    let locale_options = Signal::derive(|| {
        SUPPORTED_LOCALES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect::<Vec<_>>()
    });
    let email_locale = Signal::derive(move || {
        model
            .with(|m| m.settings().locale.clone())
            .unwrap_or_else(|| locale.get())
    });

    let timezone_options = Signal::derive(move || {
        let current = model.with(|m| m.settings().timezone.clone());
        let mut out = vec![(String::new(), labels().timezone_auto.to_string())];
        out.extend(COMMON_TIMEZONES.iter().map(|z| (z.to_string(), z.to_string())));
        if let Some(tz) = current {
            if !COMMON_TIMEZONES.contains(&tz.as_str()) {
                out.push((tz.clone(), tz));
            }
        }
        out
    });

    let hour_value = move |end: bool| {
        Signal::derive(move || {
            model.with(|m| {
                let s = m.settings();
                if end { s.quiet_hours_end } else { s.quiet_hours_start }
            })
            .map(|h| h.to_string())
            .unwrap_or_default()
        })
    };

    let weekly_cap_value = Signal::derive(move || {
        model
            .with(|m| m.settings().max_emails_per_week)
            .map(|n| n.to_string())
            .unwrap_or_default()
    });

    let status_line = move || {
        let saving = model.with(|m| m.is_saving());
        let status = model.with(|m| m.status().clone());
        let l = labels();
        match status {
            _ if saving => view! {
                <span class="inline-flex items-center gap-2 text-xs text-muted-foreground">
                    <Spinner />
                    {l.saving}
                </span>
            }
            .into_any(),
            SaveStatus::Saved { .. } => view! {
                <span class="inline-flex items-center gap-1 text-xs text-success" role="status">
                    <Check class="size-3" />
                    {l.saved}
                </span>
            }
            .into_any(),
            SaveStatus::Failed(msg) => view! {
                <span class="text-xs text-destructive" role="alert">
                    {format!("{}: {}", l.save_failed, msg)}
                </span>
            }
            .into_any(),
            SaveStatus::Idle | SaveStatus::Saving => ().into_any(),
        }
    };

    view! {
        <Card>
            <CardHeader>
                <div class="flex w-full items-start justify-between gap-4">
                    <div class="space-y-1.5">
                        <CardTitle>{move || labels().title}</CardTitle>
                        <CardDescription>{move || labels().description}</CardDescription>
                    </div>
                    <div class="min-h-5">{status_line}</div>
                </div>
            </CardHeader>

            <CardContent class="space-y-6">
                <section>
                    <h3 class="mb-1 text-sm font-medium">{move || labels().channels_heading}</h3>
                    <div class="divide-y divide-border">{channel_rows}</div>
                </section>

                <Separator />

                <section class="grid gap-2 sm:max-w-xs">
                    <Label html_for="notify-locale">{move || labels().language}</Label>
                    <NativeSelect
                        id="notify-locale"
                        options=locale_options
                        value=email_locale
                        on_value=Callback::new(move |v: String| {
                            commit(model.try_update(|m| m.set_locale(&v)).flatten());
                        })
                    />
                </section>

                <Separator />

                <section class="space-y-4">
                    <div class="flex items-start justify-between gap-4">
                        <div class="space-y-1">
                            <Label html_for="notify-quiet-hours">{move || labels().quiet_hours}</Label>
                            <p class="text-xs text-muted-foreground">{move || labels().quiet_hours_description}</p>
                        </div>
                        <Switch
                            id="notify-quiet-hours"
                            checked=Signal::derive(move || model.with(|m| m.show_quiet_hours()))
                            on_change=Callback::new(move |v: bool| {
                                commit(model.try_update(|m| m.set_quiet_hours_enabled(v)).flatten());
                            })
                        />
                    </div>

                    <Show when=move || model.with(|m| m.show_quiet_hours()) fallback=|| ().into_view()>
                        <div class="grid gap-4 sm:grid-cols-3" data-testid="quiet-hours">
                            <div class="grid gap-2">
                                <Label html_for="quiet-start">{move || labels().quiet_start}</Label>
                                <NativeSelect
                                    id="quiet-start"
                                    options=Signal::derive(hour_options)
                                    value=hour_value(false)
                                    on_value=Callback::new(move |v: String| {
                                        commit(model.try_update(|m| m.set_quiet_hours_start(&v)).flatten());
                                    })
                                />
                            </div>
                            <div class="grid gap-2">
                                <Label html_for="quiet-end">{move || labels().quiet_end}</Label>
                                <NativeSelect
                                    id="quiet-end"
                                    options=Signal::derive(hour_options)
                                    value=hour_value(true)
                                    on_value=Callback::new(move |v: String| {
                                        commit(model.try_update(|m| m.set_quiet_hours_end(&v)).flatten());
                                    })
                                />
                            </div>
                            <div class="grid gap-2">
                                <Label html_for="quiet-timezone">{move || labels().timezone}</Label>
                                <NativeSelect
                                    id="quiet-timezone"
                                    options=timezone_options
                                    value=Signal::derive(move || {
                                        model.with(|m| m.settings().timezone.clone()).unwrap_or_default()
                                    })
                                    on_value=Callback::new(move |v: String| {
                                        commit(model.try_update(|m| m.set_timezone(&v)).flatten());
                                    })
                                />
                            </div>
                        </div>
                        {move || {
                            model
                                .with(|m| m.settings().effective_quiet_hours())
                                .map(|(start, end)| {
                                    view! {
                                        <p class="text-xs text-muted-foreground">
                                            {format!("{} → {}", format_hour(start), format_hour(end))}
                                        </p>
                                    }
                                })
                        }}
                    </Show>
                </section>

                <Separator />

                <section class="grid gap-2 sm:max-w-xs">
                    <Label html_for="notify-weekly-cap">{move || labels().weekly_cap}</Label>
                    <Input
                        id="notify-weekly-cap"
                        r#type="number"
                        min=WEEKLY_CAP_MIN.to_string()
                        max=WEEKLY_CAP_MAX.to_string()
                        value=weekly_cap_value
                        on_value=Callback::new(move |v: String| {
                            commit(model.try_update(|m| m.set_weekly_cap(&v)).flatten());
                        })
                    />
                    <p class="text-xs text-muted-foreground">{move || labels().weekly_cap_hint}</p>
                </section>
            </CardContent>
        </Card>
    }
}
