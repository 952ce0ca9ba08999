//! `hbs_core` is the core library for [hbs](https://github.com/ifiokjr/hbs). It
//! finds handlebars partial references, their inline arguments and template
//! delimiters in markup documents, groups them into decoration buckets for
//! editors to style, and resolves partial names to files on disk.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Document text
//!   → Pattern matcher (partial references, bindings, delimiters)
//!   → Classifier (names, variable/value bindings with absolute offsets)
//!   → Line table (byte offsets → zero-based line / UTF-16 character)
//!   → Aggregator (partial, brace, variable and value buckets)
//! ```
//!
//! Partial lookups run separately, on demand, through [`PartialResolver`].
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `hbs.toml` (partials directory,
//!   lookup depth, styles).
//! - [`patterns`]: Token families and the lazy matcher over them.
//! - [`comment`]: Wrapping and unwrapping `{{!-- ... --}}` comments.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hbs_core::HbsConfig;
//! use hbs_core::scan;
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = HbsConfig::load_or_default(root).unwrap();
//! let decorations = scan("{{> card title='Hello' }}", &config.styles);
//!
//! for decoration in decorations.partial.iter() {
//!     if let Some(hbs_core::Action::OpenPartial { name }) = &decoration.action {
//!         println!("{name}: {:?}", config.resolver(root).resolve(name));
//!     }
//! }
//! ```

pub use classifier::*;
pub use config::*;
pub use decorations::*;
pub use error::*;
pub use partials::*;
pub use position::*;
pub use resolver::*;

mod classifier;
pub mod comment;
pub mod config;
mod decorations;
#[allow(unused_assignments)]
mod error;
mod partials;
pub mod patterns;
mod position;
mod resolver;

#[cfg(test)]
mod __tests;
