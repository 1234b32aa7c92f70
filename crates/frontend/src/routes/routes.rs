use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::domain::a001_memorial::ui::details::MemorialDetails;
use crate::domain::a001_memorial::ui::list::MemorialList;
use crate::domain::a002_company::ui::list::CompanyList;
use crate::domain::a003_product::ui::form::ProductForm;
use crate::domain::a005_page::ui::list::PageList;
use crate::domain::a006_report::ui::form::ReportForm;
use crate::layout::Header;
use crate::system::pages::login::LoginPage;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Header />
            <main class="content">
                <Routes fallback=|| view! { <p>"Страница не найдена"</p> }>
                    <Route path=path!("/") view=MemorialList />
                    <Route path=path!("/memorials/:id") view=MemorialDetails />
                    <Route path=path!("/companies") view=CompanyList />
                    <Route path=path!("/companies/:id/products/new") view=ProductForm />
                    <Route path=path!("/pages") view=PageList />
                    <Route path=path!("/report") view=ReportForm />
                    <Route path=path!("/login") view=LoginPage />
                </Routes>
            </main>
        </Router>
    }
}
