use contracts::domain::a002_company::{Company, CompanyStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::shared::api_utils::get_json;
use crate::system::auth::context::use_auth;

#[derive(Clone, Debug)]
pub struct CompanyRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub logo: Option<String>,
    pub hidden: bool,
    pub rating: Option<f64>,
    pub manageable: bool,
}

impl CompanyRow {
    fn new(c: Company, manageable: bool) -> Self {
        let rating = average_rating(c.reviews.iter().map(|r| r.rating));
        Self {
            id: c.base.id.value().to_string(),
            name: c.base.description,
            address: c.address,
            phone: c.phone,
            logo: c.logo,
            hidden: c.status == CompanyStatus::Hidden,
            rating,
            manageable,
        }
    }
}

/// Средняя оценка с одним знаком после запятой
pub fn average_rating(ratings: impl Iterator<Item = u8>) -> Option<f64> {
    let (sum, count) = ratings.fold((0u32, 0u32), |(s, n), r| (s + u32::from(r), n + 1));
    (count > 0).then(|| (f64::from(sum) / f64::from(count) * 10.0).round() / 10.0)
}

#[component]
pub fn CompanyList() -> impl IntoView {
    let (items, set_items) = signal::<Vec<CompanyRow>>(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (auth_state, _) = use_auth();

    Effect::new(move |_| {
        let state = auth_state.get();
        spawn_local(async move {
            match get_json::<Vec<Company>>("/api/companies").await {
                Ok(v) => {
                    let identity = state.identity();
                    let rows = v
                        .into_iter()
                        .map(|c| {
                            let manageable = c.can_manage(identity.as_ref(), state.is_admin());
                            CompanyRow::new(c, manageable)
                        })
                        .collect();
                    set_items.set(rows);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    view! {
        <section class="company-list">
            <h1>"Компании"</h1>
            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}
            <table class="table">
                <thead>
                    <tr>
                        <th></th>
                        <th>"Название"</th>
                        <th>"Адрес"</th>
                        <th>"Телефон"</th>
                        <th>"Рейтинг"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || items.get()
                        key=|row| row.id.clone()
                        children=move |row| {
                            let product_href = format!("/companies/{}/products/new", row.id);
                            view! {
                                <tr class=("hidden-row", row.hidden)>
                                    <td>{row.logo.clone().map(|src| view! { <img class="logo" src=src alt="" /> })}</td>
                                    <td>{row.name.clone()}</td>
                                    <td>{row.address.clone()}</td>
                                    <td>{row.phone.clone()}</td>
                                    <td>{row.rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".into())}</td>
                                    <td>
                                        {row.manageable.then(|| view! { <A href=product_href.clone()>"Добавить товар"</A> })}
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating([5u8, 4, 4].into_iter()), Some(4.3));
        assert_eq!(average_rating(std::iter::empty()), None);
    }
}
