//! Форма товара, построенная по реестру полей
//!
//! Поля не перечисляются здесь: `build_form(PRODUCT_FIELDS)` даёт список
//! элементов, и та же запись проверяется `validate_record` до отправки.

use contracts::domain::a003_product::{ProductDto, ProductEnvelope, PRODUCT_FIELDS};
use contracts::shared::metadata::{
    build_form, validate_record, FieldError, FormControl, InputKind, Locale,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use std::collections::{BTreeMap, HashMap};

use crate::shared::api_utils::post_json;

/// Тело запроса из введённых значений; пустые поля не отправляются
pub fn to_dto(company_id: &str, values: &HashMap<String, String>) -> ProductDto {
    let attributes = values
        .iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.trim().to_string())))
        .collect();
    ProductDto {
        company_id: company_id.to_string(),
        attributes,
        ..Default::default()
    }
}

#[component]
pub fn ProductForm() -> impl IntoView {
    let params = use_params_map();
    let company_id = move || params.read().get("id").unwrap_or_default();

    let controls = build_form(PRODUCT_FIELDS, Locale::Ru, &BTreeMap::new());
    let values = RwSignal::new(HashMap::<String, String>::new());
    let (errors, set_errors) = signal::<Vec<FieldError>>(Vec::new());
    let (message, set_message) = signal::<Option<String>>(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_message.set(None);
        let current = values.get();
        if let Err(field_errors) = validate_record(PRODUCT_FIELDS, &current, Locale::Ru) {
            set_errors.set(field_errors);
            return;
        }
        set_errors.set(Vec::new());

        let body = ProductEnvelope {
            product: to_dto(&company_id(), &current),
        };
        spawn_local(async move {
            match post_json::<_, serde_json::Value>("/api/products", &body).await {
                Ok(_) => {
                    values.set(HashMap::new());
                    set_message.set(Some("Товар добавлен".into()));
                }
                Err(e) => set_message.set(Some(e)),
            }
        });
    };

    view! {
        <section class="product-form">
            <h1>"Новый товар"</h1>
            <form on:submit=on_submit>
                {controls
                    .into_iter()
                    .map(|control| view! { <FieldControl control=control values=values errors=errors /> })
                    .collect_view()}
                <button type="submit" class="btn-primary">"Сохранить"</button>
            </form>
            {move || message.get().map(|m| view! { <div class="form-message">{m}</div> })}
        </section>
    }
}

#[component]
fn FieldControl(
    control: FormControl,
    values: RwSignal<HashMap<String, String>>,
    errors: ReadSignal<Vec<FieldError>>,
) -> impl IntoView {
    let label = control.display_label();
    let key = control.key.clone();
    let value = {
        let key = key.clone();
        move || values.with(|v| v.get(&key).cloned().unwrap_or_default())
    };
    let set_value = {
        let key = key.clone();
        move |raw: String| values.update(|v| {
            v.insert(key.clone(), raw);
        })
    };
    let error = {
        let key = key.clone();
        move || errors.with(|e| e.iter().find(|f| f.key == key).map(|f| f.message.clone()))
    };

    let input = match control.input {
        InputKind::Select => {
            let options = control.options.clone();
            view! {
                <select prop:value=value on:change=move |ev| set_value(event_target_value(&ev))>
                    <option value="">"-"</option>
                    {options
                        .into_iter()
                        .map(|o| view! { <option value=o.clone()>{o.clone()}</option> })
                        .collect_view()}
                </select>
            }
            .into_any()
        }
        InputKind::TextArea => view! {
            <textarea prop:value=value on:input=move |ev| set_value(event_target_value(&ev))></textarea>
        }
        .into_any(),
        InputKind::Number => view! {
            <input
                type="text"
                inputmode="decimal"
                prop:value=value
                on:input=move |ev| set_value(event_target_value(&ev))
            />
        }
        .into_any(),
        InputKind::Text => view! {
            <input type="text" prop:value=value on:input=move |ev| set_value(event_target_value(&ev)) />
        }
        .into_any(),
    };

    view! {
        <div class="form-group">
            <label>{label}</label>
            {input}
            {control.hint.clone().map(|h| view! { <small class="hint">{h}</small> })}
            {move || error().map(|e| view! { <div class="field-error">{e}</div> })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_dto_skips_empty_values() {
        let values: HashMap<String, String> = [
            ("name".to_string(), " Ограда ".to_string()),
            ("sku".to_string(), "  ".to_string()),
        ]
        .into_iter()
        .collect();
        let dto = to_dto("c1", &values);
        assert_eq!(dto.company_id, "c1");
        assert_eq!(dto.attributes.get("name"), Some(&serde_json::json!("Ограда")));
        assert!(!dto.attributes.contains_key("sku"));
    }

    #[test]
    fn test_form_covers_registry() {
        let controls = build_form(PRODUCT_FIELDS, Locale::Ru, &BTreeMap::new());
        assert_eq!(controls.len(), PRODUCT_FIELDS.len());
        assert!(controls.iter().any(|c| c.key == "price" && c.input == InputKind::Number));
    }
}
