//! Field-schema registry types
//!
//! A registry is a `&'static [FieldDescriptor]`. The same slice drives the
//! dynamic form (`build_form`) and the import validator (`validate_record`),
//! so adding a descriptor is enough to add a field everywhere.
//!
//! ```rust,ignore
//! use contracts::domain::a003_product::PRODUCT_FIELDS;
//! use contracts::shared::metadata::{build_form, Locale};
//!
//! for control in build_form(PRODUCT_FIELDS, Locale::Ru, &Default::default()) {
//!     println!("{}: {:?}", control.display_label(), control.input);
//! }
//! ```

mod field_type;
mod form;
mod import;
mod types;
mod validation;

pub use field_type::{FieldKind, Locale};
pub use form::{build_form, FormControl, InputKind};
pub use import::{
    parse_number, validate_json_record, validate_record, FieldError, FieldValue, RowError,
    ValidatedRecord,
};
pub use types::{check_registry, find_field, FieldDescriptor, LocalizedText};
pub use validation::ValidationRules;
