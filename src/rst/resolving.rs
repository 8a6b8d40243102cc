//! Name resolution
//!
//!     Parsing leaves references dangling: a `[#]_` does not know its number, `Python_` does
//!     not know its URL and a section does not know its anchor. Resolution runs once over the
//!     finished tree and answers those questions in lookup tables keyed by [NodeId], leaving
//!     the tree untouched. Running it twice on the same tree gives equal results.
//!
//!     The phases and the naming rules are described in [resolver]. [names] holds the
//!     normalization shared by all of them.
//!
//! Extension
//!
//!     Plugins reach the resolver through [ResolverHooks]: a custom name for a node, and a
//!     post-parse hook that registers extra bindings in the [NameTable].
//!
//! Failures
//!
//!     A reference nobody defines is a warning delivered to the [WarningSink] the caller
//!     passes in. A name bound to two different destinations is a [ResolveError].
//!
//! [NodeId]: crate::rst::ast::NodeId

pub mod hooks;
pub mod names;
pub mod resolver;
pub mod warnings;

pub use hooks::{OnParseHook, ResolverHooks, SimpleNameHook};
pub use names::{footnote_symbol, normalize_simple_name, sanitize_simple_name};
pub use resolver::{resolve, ForwardTarget, NameTable, Resolution, ResolveError, Resolver};
pub use warnings::{IgnoreWarnings, WarningCallback, WarningSink};
