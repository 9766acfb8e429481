//! HIR → THIR construction
//!
//! [`LoweringContext`] turns one HIR body into a typed, desugared THIR
//! tree. It reads the type-check results, the scope tree and the name
//! resolution tables computed for the body and never changes them, except
//! for interning the few types that desugarings synthesize.
//!
//! Every lowered expression is finalized the same way: its adjustments
//! are applied in order, then it is wrapped in its `Node` scope, then in
//! its destruction scope when it has one.
//!
//! # Examples
//!
//! ```rust,ignore
//! let scopes = rv_region::resolve_body_scopes(&body);
//! let mut cx = LoweringContext::new(&body, &items, &mut ty_ctx, &scopes, &known_items);
//! let thir = cx.thir_body()?;
//! ```

mod adjust;
mod block;
mod config;
mod cx;
mod error;
mod expr;
mod path;
mod pattern;

pub use config::LowerConfig;
pub use cx::LoweringContext;
pub use error::{InternalError, LowerError, LowerResult, Unsupported};
