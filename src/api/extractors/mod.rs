//! Custom request extractors.

mod submission;

pub use submission::RawSubmission;
