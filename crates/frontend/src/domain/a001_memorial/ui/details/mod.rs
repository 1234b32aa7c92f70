//! Карточка мемориала
//!
//! - view_model.rs: состояние, команды сохранения и удаления, права
//! - view.rs: компоненты Leptos

mod view;
mod view_model;

pub use view::MemorialDetails;
pub use view_model::MemorialDetailsViewModel;
