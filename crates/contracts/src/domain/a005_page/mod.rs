pub mod aggregate;

pub use aggregate::{slugify, Page, PageDto, PageEnvelope, PageId, PageKind, PageStatus};
