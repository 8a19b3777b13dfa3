//! Nested frame routing for server-driven single page applications.
//!
//! Navigation swaps the content of *router frames* in place while the shared
//! layout around them stays mounted. Routes are declared as a tree of
//! [`Outlet`]s holding [`View`]s; every outlet becomes a [`Router`] with its
//! own frame once the page is opened, and nested outlets take over every
//! navigation below their base path.
//!
//! # Quick start
//!
//! ```
//! use frame_navigator::{Builder, Element, Kwargs, Layout, MemoryBackend, Outlet, RouteTree, Session, View};
//!
//! let tree = RouteTree::build(
//!     Outlet::new("/")
//!         .layout(Layout::new(|scope, _| {
//!             scope.add(Element::label("menu"));
//!             Kwargs::new()
//!         }))
//!         .add(View::new("/", Builder::new(|scope, _| scope.label("home"))).title("Home"))
//!         .outlet(
//!             Outlet::new("/users")
//!                 .view("/", Builder::new(|scope, _| scope.label("all users")))
//!                 .add(
//!                     View::new(
//!                         "/{id}",
//!                         Builder::new(|scope, kwargs| {
//!                             let id = kwargs.get_str("id").unwrap_or_default();
//!                             scope.label(format!("user {id}"));
//!                         })
//!                         .accepts(["id"]),
//!                     )
//!                     .title("User"),
//!                 ),
//!         ),
//! )
//! .unwrap();
//!
//! let backend = MemoryBackend::new();
//! let mut session = Session::new(tree, backend.clone());
//! session.open("/users/7").unwrap();
//!
//! assert_eq!(backend.render(), vec!["menu", "user 7"]);
//! assert_eq!(backend.title().as_deref(), Some("User"));
//! ```
//!
//! # Features
//!
//! - `log` (default): log through the `log` crate.
//! - `tracing`: log through `tracing` instead.
//! - `cache` (default): LRU cache of route table matches.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

pub mod backend;
pub mod builder;
#[cfg(feature = "cache")]
pub mod cache;
pub mod config;
pub mod error;
pub mod frame;
pub mod history;
pub mod hooks;
pub mod kwargs;
pub mod mask;
pub mod params;
pub mod pattern;
pub mod router;
pub mod session;
pub mod table;
pub mod target;

pub use backend::{Element, MemoryBackend, Slot, UiBackend};
pub use builder::{mount, BuildFn, Builder, Mount};
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ResolveCache};
pub use config::{ConfigId, Outlet, RouteTree, RouterConfig, View};
pub use error::{NavigationResult, RouterError};
pub use frame::{FrameId, FrameOptions, FrameOwner, RouterFrame};
pub use hooks::{
    InstanceHook, Layout, NavigateHook, OpenHook, PageTemplate, ResolveHook, UpdateHook,
};
pub use kwargs::{Kwargs, ParamSet, Value};
pub use mask::{Mask, MaskSet};
pub use params::{QueryParams, RouteParams};
pub use pattern::{join_path, normalize_path, split_path, PatternMatch, RoutePattern, Segment};
pub use router::{
    NavigateOptions, NavigationTarget, Router, RouterId, DEFAULT_MAX_REDIRECTS,
    MAX_ANCESTOR_DEPTH, NOT_FOUND_TITLE,
};
pub use session::{Scope, Session, SessionOptions};
pub use table::{RouteEntry, RouteTable};
pub use target::{ParsedUrl, Target};
