//! Error taxonomy and cause chains shared by every Warden crate.
//!
//! An [`AppError`] is one node in a singly linked chain: each wrap creates a
//! new node that owns the previous error as its [`Cause`]. Callers at the edge
//! narrow with [`AppError::as_kind`] (nearest classified node) or test identity
//! with [`AppError::is`] (any depth) without knowing how many layers wrapped it.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Semantic classification carried by every [`AppError`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller supplied invalid input.
    Validation,
    /// Requested entity is absent.
    NotFound,
    /// Caller lacks rights.
    Unauthorized,
    /// Unexpected state inside handled logic.
    Internal,
    /// Abnormal termination converted at a fault boundary.
    Fault,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::Unauthorized,
        ErrorKind::Internal,
        ErrorKind::Fault,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal",
            ErrorKind::Fault => "fault",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

/// A process-wide error identity.
///
/// Sentinels live in `static`s and compare by address: two sentinels with the
/// same message are still different identities.
#[derive(Debug)]
pub struct Sentinel {
    kind: ErrorKind,
    message: &'static str,
}

impl Sentinel {
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl PartialEq for Sentinel {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Sentinel {}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl StdError for Sentinel {}

pub static NOT_FOUND: Sentinel = Sentinel::new(ErrorKind::NotFound, "not found");
pub static UNAUTHORIZED: Sentinel = Sentinel::new(ErrorKind::Unauthorized, "unauthorized");
pub static ALREADY_COMMITTED: Sentinel = Sentinel::new(ErrorKind::Internal, "already committed");
pub static ALREADY_ROLLED_BACK: Sentinel =
    Sentinel::new(ErrorKind::Internal, "already rolled back");

// ---------------------------------------------------------------------------
// Cause
// ---------------------------------------------------------------------------

/// The owned predecessor of an [`AppError`] node.
#[derive(Debug)]
pub enum Cause {
    App(Box<AppError>),
    Sentinel(&'static Sentinel),
    Opaque(Box<dyn StdError + Send + Sync + 'static>),
}

impl Cause {
    /// Box any foreign error as a chain link.
    pub fn opaque<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Cause::Opaque(Box::new(err))
    }

    /// Kind a wrapping node inherits when no explicit kind is given.
    ///
    /// Boxed `AppError`s and sentinels keep their kind; other foreign errors
    /// are `Internal`.
    pub fn kind(&self) -> ErrorKind {
        self.link().kind().unwrap_or(ErrorKind::Internal)
    }

    pub fn link(&self) -> Link<'_> {
        match self {
            Cause::App(e) => Link::App(e),
            Cause::Sentinel(s) => Link::Sentinel(s),
            Cause::Opaque(e) => Link::from_dyn(&**e),
        }
    }
}

impl From<AppError> for Cause {
    fn from(err: AppError) -> Self {
        Cause::App(Box::new(err))
    }
}

impl From<&'static Sentinel> for Cause {
    fn from(sentinel: &'static Sentinel) -> Self {
        Cause::Sentinel(sentinel)
    }
}

impl From<Box<dyn StdError + Send + Sync + 'static>> for Cause {
    fn from(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Cause::Opaque(err)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::App(e) => fmt::Display::fmt(e, f),
            Cause::Sentinel(s) => fmt::Display::fmt(s, f),
            Cause::Opaque(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl StdError for Cause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Cause::App(e) => e.source(),
            Cause::Sentinel(_) => None,
            Cause::Opaque(e) => e.source(),
        }
    }
}

// ---------------------------------------------------------------------------
// Chain links
// ---------------------------------------------------------------------------

/// A borrowed view of one node in an error chain.
#[derive(Debug, Clone, Copy)]
pub enum Link<'a> {
    App(&'a AppError),
    Sentinel(&'a Sentinel),
    Opaque(&'a (dyn StdError + 'static)),
}

impl<'a> Link<'a> {
    /// Classify a foreign error reference, recognising our own node types.
    pub fn from_dyn(err: &'a (dyn StdError + 'static)) -> Self {
        if let Some(app) = err.downcast_ref::<AppError>() {
            Link::App(app)
        } else if let Some(sentinel) = err.downcast_ref::<Sentinel>() {
            Link::Sentinel(sentinel)
        } else if let Some(cause) = err.downcast_ref::<Cause>() {
            cause.link()
        } else {
            Link::Opaque(err)
        }
    }

    /// The next link toward the root, if any.
    pub fn cause(self) -> Option<Link<'a>> {
        match self {
            Link::App(e) => e.cause.as_ref().map(Cause::link),
            Link::Sentinel(_) => None,
            Link::Opaque(e) => e.source().map(Link::from_dyn),
        }
    }

    /// Declared kind, `None` for foreign errors.
    pub fn kind(self) -> Option<ErrorKind> {
        match self {
            Link::App(e) => Some(e.kind),
            Link::Sentinel(s) => Some(s.kind),
            Link::Opaque(_) => None,
        }
    }
}

impl fmt::Display for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::App(e) => f.write_str(&e.message),
            Link::Sentinel(s) => f.write_str(s.message),
            Link::Opaque(e) => fmt::Display::fmt(e, f),
        }
    }
}

/// Iterator from an error toward its root cause.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<Link<'a>>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = Link<'a>;

    fn next(&mut self) -> Option<Link<'a>> {
        let current = self.next.take()?;
        self.next = current.cause();
        Some(current)
    }
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Classified error node. Immutable once returned to a caller.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    details: Vec<(&'static str, String)>,
    #[source]
    cause: Option<Cause>,
}

impl AppError {
    /// A root error with no cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
            cause: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fault, message)
    }

    /// Add context on top of `cause`, inheriting its kind.
    pub fn wrap(cause: impl Into<Cause>, message: impl Into<String>) -> Self {
        let cause = cause.into();
        Self::wrap_as(cause.kind(), cause, message)
    }

    /// Add context on top of `cause` under an explicit kind.
    ///
    /// Reclassifies without dropping the cause: `is` still finds sentinels
    /// below this node.
    pub fn wrap_as(kind: ErrorKind, cause: impl Into<Cause>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
            cause: Some(cause.into()),
        }
    }

    /// Attach a kind-specific field such as `field` or `resource`.
    pub fn with_detail(mut self, key: &'static str, value: impl ToString) -> Self {
        self.details.push((key, value.to_string()));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[(&'static str, String)] {
        &self.details
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The immediate predecessor in the chain.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Every link from this node to the root, this node first.
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: Some(Link::App(self)),
        }
    }

    pub fn root_cause(&self) -> Link<'_> {
        self.chain().last().unwrap_or(Link::App(self))
    }

    /// True if `target` appears anywhere in the chain, compared by identity.
    pub fn is(&self, target: &Sentinel) -> bool {
        self.chain()
            .any(|link| matches!(link, Link::Sentinel(s) if std::ptr::eq(s, target)))
    }

    /// Nearest node (this one included) classified as `kind`.
    pub fn as_kind(&self, kind: ErrorKind) -> Option<&AppError> {
        self.chain().find_map(|link| match link {
            Link::App(e) if e.kind == kind => Some(e),
            _ => None,
        })
    }

    /// Nearest foreign error of concrete type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.chain().find_map(|link| match link {
            Link::Opaque(e) => e.downcast_ref::<E>(),
            _ => None,
        })
    }

    /// `"outer: middle: root"` for logging the full causal path.
    pub fn render_chain(&self) -> String {
        self.chain()
            .map(|link| link.to_string())
            .collect::<Vec<_>>()
            .join(": ")
    }
}

/// Wrap an optional cause. With no cause this builds an `Internal` root.
pub fn wrap(cause: Option<Cause>, message: impl Into<String>) -> AppError {
    match cause {
        Some(cause) => AppError::wrap(cause, message),
        None => AppError::internal(message),
    }
}

pub type AppResult<T> = Result<T, AppError>;
