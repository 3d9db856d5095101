pub mod classification;
pub mod protection;
pub mod status_codes;

pub use classification::{ClassificationResult, Verdict};
pub use protection::ProtectionNumber;
