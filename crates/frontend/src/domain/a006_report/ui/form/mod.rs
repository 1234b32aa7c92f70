use contracts::domain::a006_report::{Report, ReportDto, ReportEnvelope, ReportTarget};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;

use crate::shared::api_utils::post_json;

const TARGETS: &[(ReportTarget, &str)] = &[
    (ReportTarget::Memorial, "Мемориал"),
    (ReportTarget::Company, "Компания"),
    (ReportTarget::Product, "Товар"),
    (ReportTarget::Page, "Страница"),
];

fn target_from_str(raw: &str) -> ReportTarget {
    TARGETS
        .iter()
        .map(|(t, _)| *t)
        .find(|t| t.as_str() == raw)
        .unwrap_or(ReportTarget::Memorial)
}

/// Форма жалобы; `?kind=memorial&id=...` подставляет объект
#[component]
pub fn ReportForm() -> impl IntoView {
    let query = use_query_map();
    let (kind, set_kind) = signal(
        query
            .read_untracked()
            .get("kind")
            .map(|k| target_from_str(&k))
            .unwrap_or(ReportTarget::Memorial),
    );
    let (target_id, set_target_id) = signal(query.read_untracked().get("id").unwrap_or_default());
    let (reason, set_reason) = signal(String::new());
    let (details, set_details) = signal(String::new());
    let (message, set_message) = signal::<Option<String>>(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let body = ReportEnvelope {
            report: ReportDto {
                target_kind: kind.get(),
                target_id: target_id.get(),
                reason: reason.get(),
                details: details.get(),
            },
        };
        spawn_local(async move {
            match post_json::<_, Report>("/api/reports", &body).await {
                Ok(report) => {
                    set_reason.set(String::new());
                    set_details.set(String::new());
                    set_message.set(Some(format!("Жалоба {} принята", report.base.code)));
                }
                Err(e) => set_message.set(Some(e)),
            }
        });
    };

    view! {
        <section class="report-form">
            <h1>"Пожаловаться"</h1>
            <form on:submit=on_submit>
                <div class="form-group">
                    <label>"Объект"</label>
                    <select
                        prop:value=move || kind.get().as_str()
                        on:change=move |ev| set_kind.set(target_from_str(&event_target_value(&ev)))
                    >
                        {TARGETS
                            .iter()
                            .map(|(t, label)| view! { <option value=t.as_str()>{*label}</option> })
                            .collect_view()}
                    </select>
                </div>
                <div class="form-group">
                    <label>"Идентификатор"</label>
                    <input type="text" prop:value=move || target_id.get()
                        on:input=move |ev| set_target_id.set(event_target_value(&ev)) required />
                </div>
                <div class="form-group">
                    <label>"Причина"</label>
                    <input type="text" prop:value=move || reason.get()
                        on:input=move |ev| set_reason.set(event_target_value(&ev)) required />
                </div>
                <div class="form-group">
                    <label>"Подробности"</label>
                    <textarea prop:value=move || details.get()
                        on:input=move |ev| set_details.set(event_target_value(&ev))></textarea>
                </div>
                <button type="submit" class="btn-primary">"Отправить"</button>
            </form>
            {move || message.get().map(|m| view! { <div class="form-message">{m}</div> })}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_str() {
        assert_eq!(target_from_str("company"), ReportTarget::Company);
        assert_eq!(target_from_str("unknown"), ReportTarget::Memorial);
    }
}
