//! Content builders.
//!
//! A [`Builder`] is a tagged capability: the function that renders a page plus
//! the set of keyword names it accepts. The set is fixed when the builder is
//! created, and the merged navigation context is filtered down to it before
//! every call.
//!
//! Builders come in two flavours:
//!
//! - synchronous builders render straight into the [`Scope`] they are given;
//! - asynchronous builders first await their data and then hand back a
//!   [`Mount`] closure. The closure only runs if the frame is still showing
//!   the navigation that started the build.
//!
//! ```
//! use frame_navigator::{mount, Builder, Element};
//!
//! let page = Builder::new(|scope, kwargs| {
//!     let id = kwargs.get_str("id").unwrap_or("?");
//!     scope.add(Element::label(format!("user {id}")));
//! })
//! .accepts(["id"]);
//! assert!(page.params().accepts("id"));
//!
//! let slow = Builder::new_async(|kwargs| async move {
//!     let name = kwargs.get_str("name").unwrap_or_default().to_string();
//!     mount(move |scope| scope.add(Element::label(name)))
//! });
//! assert!(slow.is_async());
//! ```

use crate::kwargs::{Kwargs, ParamSet};
use crate::session::Scope;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Deferred mount step produced by an asynchronous builder.
pub type Mount = Box<dyn FnOnce(&mut Scope<'_>) + Send>;

type SyncBuild = dyn Fn(&mut Scope<'_>, &Kwargs) + Send + Sync;
type AsyncBuild = dyn Fn(Kwargs) -> BoxFuture<'static, Mount> + Send + Sync;

/// Box a mount closure.
pub fn mount<F>(f: F) -> Mount
where
    F: FnOnce(&mut Scope<'_>) + Send + 'static,
{
    Box::new(f)
}

/// The callable part of a [`Builder`].
#[derive(Clone)]
pub enum BuildFn {
    Sync(Arc<SyncBuild>),
    Async(Arc<AsyncBuild>),
}

/// A content function plus the keyword names it accepts.
#[derive(Clone)]
pub struct Builder {
    params: ParamSet,
    func: BuildFn,
}

impl Builder {
    /// Synchronous builder accepting the whole context.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Scope<'_>, &Kwargs) + Send + Sync + 'static,
    {
        Self {
            params: ParamSet::Any,
            func: BuildFn::Sync(Arc::new(f)),
        }
    }

    /// Asynchronous builder accepting the whole context.
    pub fn new_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Kwargs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Mount> + Send + 'static,
    {
        Self {
            params: ParamSet::Any,
            func: BuildFn::Async(Arc::new(move |kwargs| f(kwargs).boxed())),
        }
    }

    /// Restrict the accepted keyword names.
    #[must_use]
    pub fn accepts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = ParamSet::only(names);
        self
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn is_async(&self) -> bool {
        matches!(self.func, BuildFn::Async(_))
    }

    /// Filter `kwargs` down to the accepted names.
    pub fn prepare(&self, kwargs: &Kwargs) -> Kwargs {
        kwargs.filtered(&self.params)
    }

    pub(crate) fn func(&self) -> &BuildFn {
        &self.func
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("params", &self.params)
            .field("async", &self.is_async())
            .finish()
    }
}
