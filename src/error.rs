use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::io;

/// Convenience alias for results returned by stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// An error raised by a [`MutationEngine`] while producing a mutated buffer.
///
/// The stream never inspects or rewrites these; they reach the caller wrapped
/// in [`StreamError::Engine`] with the original value available through
/// [`Error::source`].
///
/// [`MutationEngine`]: crate::MutationEngine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineError {
    /// A description of what the engine could not do.
    pub context: String,
}

impl EngineError {
    /// Creates a new engine error with the given description.
    #[must_use]
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mutation engine error: {}", self.context)
    }
}

impl Error for EngineError {}

/// This enum contains all error messages this library can return. Every stream operation
/// that can fail returns a [`StreamResult<T>`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StreamError {
    /// The stream has been closed. Closed streams are inert; every operation fails.
    Closed {
        /// The operation that was attempted on the closed stream.
        operation: &'static str,
    },
    /// You made an invalid request, usually by passing a negative absolute seek target
    /// or an unknown whence value.
    InvalidArgument {
        /// Further specifies why the argument was invalid.
        info: String,
    },
    /// The operation is permanently unsupported. Fuzz streams are read-only.
    NotSupported {
        /// The unsupported operation.
        operation: &'static str,
    },
    /// The mutation engine failed. The engine's error is passed through untouched.
    Engine(EngineError),
    /// Encoding, decoding or validating a [`StreamSnapshot`] failed.
    ///
    /// [`StreamSnapshot`]: crate::StreamSnapshot
    Snapshot {
        /// A description of what failed.
        context: String,
    },
}

impl StreamError {
    pub(crate) const fn closed(operation: &'static str) -> Self {
        Self::Closed { operation }
    }

    /// Returns true if this error was caused by using a closed stream.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

impl Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Closed { operation } => {
                write!(f, "I/O operation on closed stream: {}", operation)
            }
            StreamError::InvalidArgument { info } => {
                write!(f, "Invalid argument: {}", info)
            }
            StreamError::NotSupported { operation } => {
                write!(f, "{} is not supported on a read-only fuzz stream", operation)
            }
            StreamError::Engine(err) => Display::fmt(err, f),
            StreamError::Snapshot { context } => {
                write!(f, "Snapshot error: {}", context)
            }
        }
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for StreamError {
    fn from(err: EngineError) -> Self {
        StreamError::Engine(err)
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match &err {
            StreamError::Closed { .. } => io::ErrorKind::BrokenPipe,
            StreamError::InvalidArgument { .. } => io::ErrorKind::InvalidInput,
            StreamError::NotSupported { .. } => io::ErrorKind::Unsupported,
            StreamError::Engine(_) | StreamError::Snapshot { .. } => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
