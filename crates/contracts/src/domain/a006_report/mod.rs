pub mod aggregate;

pub use aggregate::{
    Report, ReportDto, ReportEnvelope, ReportId, ReportPatch, ReportStatus, ReportTarget,
};
