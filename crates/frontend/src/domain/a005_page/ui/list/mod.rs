use contracts::domain::a005_page::{Page, PageKind, PageStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_utils::get_json;
use crate::shared::date_utils::format_datetime;

/// Новости и страницы; содержимое уже очищено сервером
#[component]
pub fn PageList() -> impl IntoView {
    let (items, set_items) = signal::<Vec<Page>>(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        spawn_local(async move {
            match get_json::<Vec<Page>>("/api/pages").await {
                Ok(v) => set_items.set(v),
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    view! {
        <section class="page-list">
            <h1>"Новости"</h1>
            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}
            <For
                each=move || items.get()
                key=|p| p.base.id.value()
                children=move |page| {
                    let date = page.published_at.map(format_datetime).unwrap_or_default();
                    let draft = page.status == PageStatus::Draft;
                    let kind = match page.kind {
                        PageKind::News => "Новость",
                        PageKind::Page => "Страница",
                    };
                    view! {
                        <article class="page-item">
                            <h2>{page.base.description.clone()}</h2>
                            <div class="page-meta">
                                {kind} " " {date}
                                {draft.then(|| view! { <span class="badge">"Черновик"</span> })}
                            </div>
                            <div class="page-content" inner_html=page.content.clone()></div>
                        </article>
                    }
                }
            />
        </section>
    }
}
