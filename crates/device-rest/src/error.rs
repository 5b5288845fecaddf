use std::borrow::Cow;

use tracing::error;

/// All possible error kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The end device protocol block is missing.
    ProtocolNotConfigured,
    /// A required protocol parameter is missing.
    MissingParameter,
    /// A protocol parameter is not a string.
    WrongParameterType,
    /// The requested device resource does not exist.
    ResourceNotFound,
    /// The requested device does not exist.
    DeviceNotFound,
    /// The requested device is administratively locked.
    DeviceLocked,
    /// The content type does not match the expected media type.
    ContentTypeMismatch,
    /// A reading cannot be converted into the declared value type.
    CastError,
    /// A reading does not fit the declared value type.
    RangeError,
    /// A reading cannot be decoded as a `JSON` object.
    DecodeError,
    /// The value type is not supported by the operation.
    UnsupportedType,
    /// A request arrived without a body.
    EmptyBody,
    /// A value cannot be sent to an end device.
    InvalidPayload,
    /// An end device answered with data that cannot be coerced.
    InvalidResponseData,
    /// An end device answered with a non-successful status.
    UpstreamError {
        /// Status code returned by the end device.
        status: u16,
    },
    /// Errors encountered while sending a request to an end device.
    TransportError,
    /// The async values sink is closed.
    Sink,
    /// The async values sink did not accept a value in time.
    SinkTimeout,
    /// Invalid configuration.
    Configuration,
    /// Errors encountered while running the server.
    Server,
}

impl ErrorKind {
    pub(crate) const fn description(self) -> &'static str {
        match self {
            Self::ProtocolNotConfigured => "Protocol Not Configured",
            Self::MissingParameter => "Missing Parameter",
            Self::WrongParameterType => "Wrong Parameter Type",
            Self::ResourceNotFound => "Resource Not Found",
            Self::DeviceNotFound => "Device Not Found",
            Self::DeviceLocked => "Device Locked",
            Self::ContentTypeMismatch => "Content Type Mismatch",
            Self::CastError => "Cast Error",
            Self::RangeError => "Range Error",
            Self::DecodeError => "Decode Error",
            Self::UnsupportedType => "Unsupported Type",
            Self::EmptyBody => "Empty Body",
            Self::InvalidPayload => "Invalid Payload",
            Self::InvalidResponseData => "Invalid Response Data",
            Self::UpstreamError { .. } => "Upstream Error",
            Self::TransportError => "Transport Error",
            Self::Sink => "Sink",
            Self::SinkTimeout => "Sink Timeout",
            Self::Configuration => "Configuration",
            Self::Server => "Server",
        }
    }

    /// Returns the `HTTP` status code used to report an error of this kind
    /// to a client.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::DeviceNotFound | Self::ResourceNotFound => 404,
            Self::DeviceLocked => 423,
            Self::ContentTypeMismatch
            | Self::CastError
            | Self::RangeError
            | Self::DecodeError
            | Self::UnsupportedType
            | Self::EmptyBody
            | Self::InvalidPayload => 400,
            Self::UpstreamError { .. } | Self::InvalidResponseData | Self::TransportError => 502,
            Self::SinkTimeout => 503,
            Self::ProtocolNotConfigured
            | Self::MissingParameter
            | Self::WrongParameterType
            | Self::Sink
            | Self::Configuration
            | Self::Server => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpstreamError { status } => write!(f, "{} ({status})", self.description()),
            _ => self.description().fmt(f),
        }
    }
}

/// A device service error.
#[derive(PartialEq)]
pub struct Error {
    kind: ErrorKind,
    description: Cow<'static, str>,
    cause: Option<Box<Error>>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.format(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.format(f)?;
        if let Some(cause) = &self.cause {
            write!(f, "\nCause: {cause:?}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates an [`Error`] from an [`ErrorKind`] and a description.
    #[inline]
    pub fn new(kind: ErrorKind, description: impl Into<Cow<'static, str>>) -> Self {
        let description = description.into();
        error!("{}", description.as_ref());
        Self {
            kind,
            description,
            cause: None,
        }
    }

    /// Creates an [`Error`] which wraps the [`Error`] that caused it.
    #[inline]
    pub fn with_cause(
        kind: ErrorKind,
        description: impl Into<Cow<'static, str>>,
        cause: Error,
    ) -> Self {
        let mut error = Self::new(kind, description);
        error.cause = Some(Box::new(cause));
        error
    }

    /// Returns the [`ErrorKind`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the [`Error`] which caused this one.
    ///
    /// If [`None`], the error has no underlying cause.
    #[must_use]
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_deref()
    }

    fn format(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.description)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::DecodeError, e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Server, e.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// A specialized [`Result`] type for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
