use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const FIELD_CLASS: &str = "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground dark:bg-input/30 border-input w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50 md:text-sm focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2 aria-invalid:border-destructive";

fn event_value(ev: &web_sys::Event) -> Option<String> {
    let target = ev.target()?;
    if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = target.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return Some(area.value());
    }
    target
        .dyn_ref::<web_sys::HtmlSelectElement>()
        .map(|s| s.value())
}

/// Controlled text input: shows `value`, reports every keystroke to `on_value`.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] name: String,
    #[prop(into, optional)] id: String,
    #[prop(default = false.into(), into)] disabled: Signal<bool>,
    #[prop(optional)] required: bool,
    #[prop(optional)] maxlength: Option<usize>,
    #[prop(into, optional)] min: Option<String>,
    #[prop(into, optional)] max: Option<String>,
    #[prop(into)] value: Signal<String>,
    on_value: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!("flex h-9", FIELD_CLASS, class);

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            name=name
            id=id
            disabled=move || disabled.get()
            required=required
            maxlength=maxlength.map(|n| n.to_string())
            min=min
            max=max
            prop:value=move || value.get()
            on:input=move |ev| {
                if let Some(v) = event_value(&ev) {
                    on_value.run(v);
                }
            }
        />
    }
}

#[component]
pub fn Textarea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(default = false.into(), into)] disabled: Signal<bool>,
    #[prop(optional)] maxlength: Option<usize>,
    #[prop(default = 5)] rows: u32,
    #[prop(into)] value: Signal<String>,
    on_value: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!("flex min-h-24", FIELD_CLASS, class);

    view! {
        <textarea
            data-name="Textarea"
            class=merged_class
            id=id
            rows=rows.to_string()
            disabled=move || disabled.get()
            maxlength=maxlength.map(|n| n.to_string())
            prop:value=move || value.get()
            on:input=move |ev| {
                if let Some(v) = event_value(&ev) {
                    on_value.run(v);
                }
            }
        ></textarea>
    }
}

/// Native `<select>`. Options are `(value, label)` pairs.
#[component]
pub fn NativeSelect(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(default = false.into(), into)] disabled: Signal<bool>,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    #[prop(into)] value: Signal<String>,
    on_value: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!("flex h-9 pr-8", FIELD_CLASS, class);

    view! {
        <select
            data-name="NativeSelect"
            class=merged_class
            id=id
            disabled=move || disabled.get()
            on:change=move |ev| {
                if let Some(v) = event_value(&ev) {
                    on_value.run(v);
                }
            }
        >
            {move || {
                let current = value.get();
                options
                    .get()
                    .into_iter()
                    .map(|(v, label)| {
                        let selected = v == current;
                        view! { <option value=v selected=selected>{label}</option> }
                    })
                    .collect_view()
            }}
        </select>
    }
}
