use crate::field::FieldKind;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Configuration slot not resolved: {slot}")]
    NotConfigured { slot: &'static str },

    #[error("Field for slot {slot} has incompatible type {kind:?}")]
    IncompatibleField { slot: &'static str, kind: FieldKind },

    #[error("Host configuration error: {0}")]
    UpstreamConfiguration(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// Whether the error means "the operator has not finished configuring
    /// the extension" rather than a real failure.
    pub fn is_configuration_incomplete(&self) -> bool {
        matches!(
            self,
            CoreError::NotConfigured { .. } | CoreError::IncompatibleField { .. }
        )
    }
}
