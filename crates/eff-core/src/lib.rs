#![deny(missing_docs)]
#![doc = "Core error, hashing and provenance types shared by the efficacy analysis crates."]

mod arms;
pub mod errors;
/// Canonical hashing helpers.
pub mod hash;
pub mod provenance;
/// Canonical JSON serde helpers.
pub mod serde;

pub use arms::TreatmentArms;
pub use errors::{EffError, ErrorInfo};
pub use hash::stable_hash_string;
pub use provenance::{RunProvenance, SchemaVersion};

/// Subject identifier (`USUBJID`).
pub type SubjectId = String;

/// Ordinal visit index (`AVISITN`), in weeks from randomisation.
pub type VisitIndex = i64;
