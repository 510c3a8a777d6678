//! # Admission Policy
//!
//! Tunable behaviour of the pipeline, fixed at construction.

/// Pipeline configuration.
///
/// The default matches the established behaviour: strictness is checked
/// when data is submitted, not when a type is registered. A non-strict
/// schema can therefore be registered, and every later submission against
/// it is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Also reject non-strict schemas at registration time.
    pub strict_on_register: bool,
}

impl AdmissionPolicy {
    /// Policy that checks strictness at registration as well as submission.
    pub fn strict_on_register() -> Self {
        Self {
            strict_on_register: true,
        }
    }
}
