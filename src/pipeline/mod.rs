pub mod image;
pub mod remote;
pub mod triage;
