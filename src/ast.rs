//! # Constraint expressions
//!
//! This module defines the tree a check constraint is written as, before it
//! is bound to a model.
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[path]** - Key paths into JSON documents
//! - **[lookups]** - Lookup names (`isnull`, `exact`, `gt`, ...)
//! - **[expressions]** - Lookup leaves and boolean connectives, plus the
//!   [`F`] builder
//!
//! ## Textual form
//!
//! ```text
//! data__owner__isnull = false and (price__gte = 0 or price__isnull = true)
//! ```
//!
//! A lookup is a `__`-separated path followed by `=` and a literal. The first
//! segment names a field. For JSON fields the following segments walk into the
//! document (digit-only segments index arrays). If the last segment is a known
//! lookup name it selects the lookup; otherwise the lookup is `exact`.
//! Keys that are not plain words, such as `"owner-name"` or a digit-only
//! object key like `"0"`, are written as quoted strings:
//! `data__"owner-name"__isnull = true`.
//!
//! ## Builder form
//!
//! ```
//! use fieldcheck::ast::F;
//!
//! let expr = F::new("data").key("owner").isnull(false)
//!     & (F::new("price").gte(0) | F::new("price").isnull(true));
//!
//! assert_eq!(
//!     expr.to_string(),
//!     "(data__owner__isnull = false and (price__gte = 0 or price__isnull = true))"
//! );
//! ```
pub mod expressions;
pub mod lookups;
pub mod path;
pub mod tokens;

pub use expressions::{Expr, F, LookupExpr};
pub use lookups::LookupKind;
pub use path::{KeyPath, KeySegment};
pub use tokens::{PathWord, Token};
