pub mod aggregate;
pub mod fields;

pub use aggregate::{
    CsvImportRequest, ImportResult, Product, ProductDto, ProductEnvelope, ProductId,
    ProductStatus, ProductsEnvelope,
};
pub use fields::PRODUCT_FIELDS;
