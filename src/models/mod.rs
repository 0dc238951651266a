pub mod enums;
pub mod patient;

pub use enums::{RiskTier, Sex};
pub use patient::{PatientInput, Vitals};
