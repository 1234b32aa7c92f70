pub mod a001_memorial;
pub mod a002_company;
pub mod a003_product;
pub mod a004_order;
pub mod a005_page;
pub mod a006_report;
