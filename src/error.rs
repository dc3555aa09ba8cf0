use thiserror::Error;

/// Coarse classification of a [`RouterError`].
///
/// Configuration errors surface while routes are being built and should abort
/// startup. The other two kinds are raised to callers of
/// [`Router::assemble`](crate::router::Router::assemble) and are recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    RouteNotFound,
    Assembly,
}

/// Errors raised while constructing routes or assembling URIs.
///
/// A failed match is not an error: matching returns `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A required construction option is absent
    #[error("missing \"{option}\" in options for route type \"{route_type}\"")]
    MissingOption {
        route_type: String,
        option: &'static str,
    },
    /// An option is present but has the wrong shape
    #[error("invalid \"{option}\" option for route type \"{route_type}\": {reason}")]
    InvalidOption {
        route_type: String,
        option: String,
        reason: String,
    },
    #[error("unknown route type \"{0}\"")]
    UnknownRouteType(String),
    /// A route pattern or regular expression failed to compile
    #[error("invalid route pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("route with name \"{0}\" not found")]
    RouteNotFound(String),
    #[error("route with name \"{0}\" does not have child routes")]
    NoChildRoutes(String),
    /// An aggregate route was asked to assemble without a child name
    #[error("missing route name")]
    MissingRouteName,
    #[error("missing parameter \"{0}\"")]
    MissingParameter(String),
    #[error("part route may not terminate")]
    PartMayNotTerminate,
    /// An absolute URI was requested but the scheme or host is unknown
    #[error("request URI has not been set; cannot complete an absolute URI")]
    MissingRequestUri,
}

impl RouterError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::MissingOption { .. }
            | RouterError::InvalidOption { .. }
            | RouterError::UnknownRouteType(_)
            | RouterError::InvalidPattern { .. } => ErrorKind::Configuration,
            RouterError::RouteNotFound(_)
            | RouterError::NoChildRoutes(_)
            | RouterError::MissingRouteName => ErrorKind::RouteNotFound,
            RouterError::MissingParameter(_)
            | RouterError::PartMayNotTerminate
            | RouterError::MissingRequestUri => ErrorKind::Assembly,
        }
    }

    pub(crate) fn missing_option(route_type: &str, option: &'static str) -> Self {
        RouterError::MissingOption {
            route_type: route_type.to_string(),
            option,
        }
    }

    pub(crate) fn invalid_option(
        route_type: &str,
        option: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        RouterError::InvalidOption {
            route_type: route_type.to_string(),
            option: option.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_pattern(pattern: &str, reason: impl std::fmt::Display) -> Self {
        RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}
