use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_UNKNOWN_KIND: &str = "CG-ERR-CLASSIFY-001";
pub const ERR_DEPTH_EXCEEDED: &str = "CG-ERR-DEPTH-001";
pub const ERR_MISSING_NODE_GENERATOR: &str = "CG-ERR-SLOT-001";
pub const ERR_INVALID_EXPRESSION: &str = "CG-ERR-EXPR-001";
pub const ERR_HOOK_FAILED: &str = "CG-ERR-HOOK-001";
pub const ERR_INVALID_CONFIG: &str = "CG-ERR-CONFIG-001";

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATE ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors that can occur while generating code for a composite value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    /// The value does not match any recognized kind.
    #[error("unknown composite value kind: {0}")]
    Classification(String),

    #[error("composite value nesting exceeds maximum depth of {max}")]
    DepthExceeded { max: usize },

    #[error("JSSlot encountered but no node generator is configured")]
    MissingNodeGenerator,

    #[error("invalid expression `{code}`: {message}")]
    Expression { code: String, message: String },

    /// Raised by user interceptors; carried through the dispatcher unchanged.
    #[error("hook for `{kind}` failed: {message}")]
    Hook { kind: String, message: String },

    #[error("invalid generator config: {0}")]
    Config(String),
}

impl GenerateError {
    pub fn classification(detail: impl Into<String>) -> Self {
        GenerateError::Classification(detail.into())
    }

    pub fn hook(kind: impl Into<String>, message: impl Into<String>) -> Self {
        GenerateError::Hook {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Stable diagnostic code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::Classification(_) => ERR_UNKNOWN_KIND,
            GenerateError::DepthExceeded { .. } => ERR_DEPTH_EXCEEDED,
            GenerateError::MissingNodeGenerator => ERR_MISSING_NODE_GENERATOR,
            GenerateError::Expression { .. } => ERR_INVALID_EXPRESSION,
            GenerateError::Hook { .. } => ERR_HOOK_FAILED,
            GenerateError::Config(_) => ERR_INVALID_CONFIG,
        }
    }

    pub fn is_classification(&self) -> bool {
        matches!(self, GenerateError::Classification(_))
    }
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            GenerateError::classification("x").code(),
            "CG-ERR-CLASSIFY-001"
        );
        assert_eq!(
            GenerateError::DepthExceeded { max: 4 }.code(),
            "CG-ERR-DEPTH-001"
        );
        assert_eq!(GenerateError::MissingNodeGenerator.code(), "CG-ERR-SLOT-001");
    }

    #[test]
    fn test_classification_message() {
        let err = GenerateError::classification("JSExpression without string `value`");
        assert_eq!(
            err.to_string(),
            "unknown composite value kind: JSExpression without string `value`"
        );
        assert!(err.is_classification());
    }
}
