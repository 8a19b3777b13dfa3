//! Navigation outcomes and router errors.
//!
//! Two kinds of values come out of a navigation:
//!
//! - [`NavigationResult`]: the normal outcome of a navigation. Unmatched
//!   paths and vetoed navigations are *outcomes*, not errors. The former
//!   renders the not-found page, the latter leaves the frame untouched.
//! - [`RouterError`]: a configuration or programming defect such as a
//!   malformed route pattern or a redirect chain that never settles. These
//!   are surfaced loudly instead of being rendered.
//!
//! # Examples
//!
//! ```
//! use frame_navigator::NavigationResult;
//!
//! let result = NavigationResult::Success { path: "/home".into() };
//! assert!(result.is_success());
//!
//! let vetoed = NavigationResult::Suppressed { path: "/admin".into() };
//! assert!(vetoed.is_suppressed());
//! assert_eq!(vetoed.path(), Some("/admin"));
//! ```

use crate::config::ConfigId;
use crate::frame::FrameId;
use crate::router::RouterId;
use thiserror::Error;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// A builder was scheduled (or run) for the path.
    Success { path: String },
    /// No route matched; the not-found page was rendered instead.
    NotFound { path: String },
    /// A navigation hook vetoed the request, or the resolved target was invalid.
    Suppressed { path: String },
    /// Only the anchor changed; the browser was told to scroll, nothing was rebuilt.
    Anchor { fragment: String },
    /// The path is outside the frame's masks; the browser performs a full load.
    External { path: String },
}

impl NavigationResult {
    /// Check if content was (re)built for a matched route.
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if the not-found page was rendered.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if navigation was vetoed.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, NavigationResult::Suppressed { .. })
    }

    /// Check if only an in-page anchor jump happened.
    pub fn is_anchor(&self) -> bool {
        matches!(self, NavigationResult::Anchor { .. })
    }

    /// The path this outcome refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationResult::Success { path }
            | NavigationResult::NotFound { path }
            | NavigationResult::Suppressed { path }
            | NavigationResult::External { path } => Some(path),
            NavigationResult::Anchor { .. } => None,
        }
    }
}

// ============================================================================
// Router Errors
// ============================================================================

/// Configuration and programming errors raised by the router.
///
/// Pattern errors are raised when a route tree is built, so a malformed
/// declaration never reaches a live session. The remaining variants are
/// raised while navigating and indicate a broken hook or tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A registered path contains malformed parameter syntax.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A `*` segment appears somewhere other than the end of a pattern.
    #[error("wildcard must be the last segment in '{pattern}'")]
    WildcardNotLast { pattern: String },

    /// The same `{name}` is captured twice in one pattern.
    #[error("parameter '{name}' appears more than once in '{pattern}'")]
    DuplicateParam { pattern: String, name: String },

    /// Two views share a route name.
    #[error("route name '{name}' is registered twice")]
    DuplicateName { name: String },

    /// Hooks kept rewriting the target path.
    #[error("redirect chain exceeded {limit} steps while resolving '{path}'")]
    RedirectLoop { path: String, limit: usize },

    /// Walking parent routers did not reach a root.
    #[error("ancestor chain of router {router} exceeded {limit} levels")]
    AncestorCycle { router: RouterId, limit: usize },

    /// A frame was asked to resolve a path but has neither an owning router
    /// nor a resolve hook.
    #[error("frame {frame} has no resolver for '{path}'")]
    MissingResolver { frame: FrameId, path: String },

    /// The router id does not belong to this session (or was torn down).
    #[error("unknown router {0}")]
    UnknownRouter(RouterId),

    /// The frame id does not belong to this session (or was torn down).
    #[error("unknown frame {0}")]
    UnknownFrame(FrameId),

    /// The config id does not belong to the session's route tree.
    #[error("unknown router config {0}")]
    UnknownConfig(ConfigId),

    /// A nested outlet was mounted from a scope that is not inside a router frame.
    #[error("outlet mounted outside of a router frame")]
    OutsideRouter,

    /// The session was used before [`Session::open`](crate::Session::open).
    #[error("session has not been opened")]
    NotOpen,

    /// A named route lookup failed.
    #[error("no route named '{0}'")]
    UnknownRoute(String),

    /// Building a URL from a pattern without a value for one of its parameters.
    #[error("missing value for parameter '{name}' of '{pattern}'")]
    MissingParam { pattern: String, name: String },
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// `true` for errors raised while declaring routes rather than navigating.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            RouterError::InvalidPattern { .. }
                | RouterError::WildcardNotLast { .. }
                | RouterError::DuplicateParam { .. }
                | RouterError::DuplicateName { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_result_success() {
        let result = NavigationResult::Success {
            path: "/home".to_string(),
        };
        assert!(result.is_success());
        assert!(!result.is_not_found());
        assert!(!result.is_suppressed());
        assert!(!result.is_anchor());
    }

    #[test]
    fn test_navigation_result_anchor_has_no_path() {
        let result = NavigationResult::Anchor {
            fragment: "faq".to_string(),
        };
        assert!(result.is_anchor());
        assert_eq!(result.path(), None);
    }

    #[test]
    fn test_router_error_display() {
        let error = RouterError::RedirectLoop {
            path: "/a".to_string(),
            limit: 16,
        };
        assert_eq!(
            error.to_string(),
            "redirect chain exceeded 16 steps while resolving '/a'"
        );
    }

    #[test]
    fn test_registration_errors() {
        assert!(RouterError::invalid_pattern("/{x", "unterminated").is_registration_error());
        assert!(!RouterError::UnknownRoute("home".into()).is_registration_error());
    }
}
