pub mod access;
pub mod aggregate;

pub use access::{can_delete, can_edit, can_manage_access, can_view, visible_to};
pub use aggregate::{Memorial, MemorialAccessDto, MemorialDto, MemorialEnvelope, MemorialId};
