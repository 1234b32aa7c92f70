pub mod aggregate;

pub use aggregate::{
    Company, CompanyDocument, CompanyDto, CompanyEnvelope, CompanyId, CompanyReview,
    CompanyStatus, DocumentsEnvelope, GalleryEnvelope, GalleryItem, ReviewDto, ReviewEnvelope,
    UploadedFile,
};
