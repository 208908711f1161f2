use std::sync::Arc;

use derivex_core_types::ResolutionId;
use thiserror::Error;

use crate::model::Category;

/// Result type alias using ResolveError
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Boxed failure returned by a producer's underlying transformation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Registration
    InvalidProducer,
    DuplicateProducer,
    CyclicDependency,

    // Invocation
    ArityMismatch,
    TypeMismatch,
    OutputTypeMismatch,
    MissingInput,
    ProducerFailure,

    // Search / execution
    TargetUnreachable,
    ResolutionFailed,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidProducer => "ERR_INVALID_PRODUCER",
            ExErrorKind::DuplicateProducer => "ERR_DUPLICATE_PRODUCER",
            ExErrorKind::CyclicDependency => "ERR_CYCLIC_DEPENDENCY",
            ExErrorKind::ArityMismatch => "ERR_ARITY_MISMATCH",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::OutputTypeMismatch => "ERR_OUTPUT_TYPE_MISMATCH",
            ExErrorKind::MissingInput => "ERR_MISSING_INPUT",
            ExErrorKind::ProducerFailure => "ERR_PRODUCER_FAILURE",
            ExErrorKind::TargetUnreachable => "ERR_TARGET_UNREACHABLE",
            ExErrorKind::ResolutionFailed => "ERR_RESOLUTION_FAILED",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging. Built from a [`ResolveError`] at logging and API boundaries.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    producer: Option<String>,
    category: Option<String>,
    resolution_id: Option<ResolutionId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            producer: None,
            category: None,
            resolution_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add producer name context
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    /// Add category context
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Add resolution ID context
    pub fn with_resolution_id(mut self, resolution_id: ResolutionId) -> Self {
        self.resolution_id = Some(resolution_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the producer name context, if any
    pub fn producer(&self) -> Option<&str> {
        self.producer.as_deref()
    }

    /// Get the category context, if any
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Get the resolution ID context, if any
    pub fn resolution_id(&self) -> Option<&ResolutionId> {
        self.resolution_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(producer) = &self.producer {
            write!(f, " (producer: {})", producer)?;
        }
        if let Some(category) = &self.category {
            write!(f, " (category: {})", category)?;
        }
        if let Some(resolution_id) = &self.resolution_id {
            write!(f, " (resolution_id: {})", resolution_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Why a producer failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProducerDefect {
    /// A producer without inputs is a constant, not a production rule
    #[error("producer takes no inputs")]
    NoInputs,

    /// The same category appears more than once among the inputs
    #[error("input category {category} is required more than once")]
    DuplicateInput { category: Category },
}

/// Error taxonomy for registration, search and execution
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    // ===== Registration Errors =====
    /// Producer is malformed and can never be registered
    #[error("Invalid producer {producer}: {defect}")]
    InvalidProducer {
        producer: String,
        defect: ProducerDefect,
    },

    /// An identical producer is already registered for this output
    #[error("Producer {producer} is already registered for {output}")]
    DuplicateProducer { producer: String, output: Category },

    /// Registering the producer would close a dependency cycle
    #[error("Producer {producer} would introduce a circular dependency on {output}")]
    CyclicDependency { producer: String, output: Category },

    // ===== Invocation Errors =====
    /// Wrong number of values supplied to a producer
    #[error("Producer {producer} expects {expected} inputs, got {found}")]
    ArityMismatch {
        producer: String,
        expected: usize,
        found: usize,
    },

    /// A supplied value has the wrong category for its position
    #[error("Producer {producer} expects input {position} to be {expected}, got {found}")]
    TypeMismatch {
        producer: String,
        position: usize,
        expected: Category,
        found: Category,
    },

    /// The transformation produced a value of an undeclared category
    #[error("Producer {producer} declared output {expected}, produced {found}")]
    OutputTypeMismatch {
        producer: String,
        expected: Category,
        found: Category,
    },

    /// No value of a required category is present in the pool
    #[error("Producer {producer} could not find a value of category {category}")]
    MissingInput { producer: String, category: Category },

    /// The underlying transformation reported failure
    #[error("Producer {producer} failed: {source}")]
    ProducerFailure {
        producer: String,
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    // ===== Search / Execution Errors =====
    /// No chain of registered producers reaches the category
    #[error("No derivation reaches {target}")]
    TargetUnreachable { target: Category },

    /// Resolution stopped at the first error; no partial result
    #[error("Could not resolve {target}: {source}")]
    ResolutionFailed {
        target: Category,
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Get the canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            ResolveError::InvalidProducer { .. } => ExErrorKind::InvalidProducer,
            ResolveError::DuplicateProducer { .. } => ExErrorKind::DuplicateProducer,
            ResolveError::CyclicDependency { .. } => ExErrorKind::CyclicDependency,
            ResolveError::ArityMismatch { .. } => ExErrorKind::ArityMismatch,
            ResolveError::TypeMismatch { .. } => ExErrorKind::TypeMismatch,
            ResolveError::OutputTypeMismatch { .. } => ExErrorKind::OutputTypeMismatch,
            ResolveError::MissingInput { .. } => ExErrorKind::MissingInput,
            ResolveError::ProducerFailure { .. } => ExErrorKind::ProducerFailure,
            ResolveError::TargetUnreachable { .. } => ExErrorKind::TargetUnreachable,
            ResolveError::ResolutionFailed { .. } => ExErrorKind::ResolutionFailed,
        }
    }

    /// Innermost error of a `ResolutionFailed` chain (or `self`)
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            ResolveError::ResolutionFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Conversion from ResolveError to ExError
impl From<ResolveError> for ExError {
    fn from(err: ResolveError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            ResolveError::InvalidProducer { producer, defect } => {
                let ex = ExError::new(kind).with_producer(producer);
                match defect {
                    ProducerDefect::DuplicateInput { category } => ex.with_category(category),
                    ProducerDefect::NoInputs => ex,
                }
                .with_message(message)
            }
            ResolveError::DuplicateProducer { producer, output }
            | ResolveError::CyclicDependency { producer, output } => ExError::new(kind)
                .with_op("registry_add")
                .with_producer(producer)
                .with_category(output)
                .with_message(message),
            ResolveError::ArityMismatch { producer, .. } => ExError::new(kind)
                .with_op("apply")
                .with_producer(producer)
                .with_message(message),
            ResolveError::TypeMismatch {
                producer, found, ..
            }
            | ResolveError::OutputTypeMismatch {
                producer, found, ..
            } => ExError::new(kind)
                .with_op("apply")
                .with_producer(producer)
                .with_category(found)
                .with_message(message),
            ResolveError::MissingInput { producer, category } => ExError::new(kind)
                .with_op("fit_inputs")
                .with_producer(producer)
                .with_category(category)
                .with_message(message),
            ResolveError::ProducerFailure { producer, .. } => ExError::new(kind)
                .with_op("apply")
                .with_producer(producer)
                .with_message(message),
            ResolveError::TargetUnreachable { target } => ExError::new(kind)
                .with_category(target)
                .with_message(message),
            ResolveError::ResolutionFailed { target, source } => ExError::new(kind)
                .with_op("resolve")
                .with_category(target)
                .with_message(message)
                .with_source((*source).into()),
        }
    }
}

impl From<&ResolveError> for ExError {
    fn from(err: &ResolveError) -> Self {
        err.clone().into()
    }
}
