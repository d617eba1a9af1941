//! # Composite Value Code Generator
//!
//! Turns a composite value tree (UI configuration, expressions, callbacks,
//! slot content) into JavaScript source text.
//!
//! ## Dispatch Invariants
//!
//! 1. **Total classification**: every value is exactly one [`ValueKind`], decided
//!    in this order: undefined, null, array, variable, JSExpression, JSFunction,
//!    JSSlot, DataSource, object, string, number, boolean. Untyped JSON that fits
//!    none of them (a tagged object missing its payload) is a
//!    [`GenerateError::Classification`].
//!
//! 2. **Single recursion path**: arrays, objects, i18n params, desugared
//!    references and children a hook generates through [`Next::generate`]
//!    re-enter the dispatcher, so hooks see every nested value and the depth
//!    limit covers all of them.
//!
//! 3. **Hook stacks**: the first hook registered for a kind is the outermost;
//!    the default emitter is the innermost. An empty stack is the same as none.
//!
//! 4. **Scope is opaque**: the dispatcher forwards [`Scope`] unchanged; only
//!    collaborators read it.
//!
//! ```
//! use composite_codegen::{generate_json, GenerateOptions, Scope};
//! use serde_json::json;
//!
//! let code = generate_json(&json!([1, "a", true]), &Scope::root(), &GenerateOptions::new()).unwrap();
//! assert_eq!(code, r#"[1,"a",true]"#);
//! ```

mod collaborators;
mod collection;
mod config;
mod dispatch;
mod error;
mod function_shape;
mod hooks;
mod keywords;
mod literal;
mod reference;
mod scope;
mod value;

#[cfg(test)]
mod dispatch_tests;

pub use collaborators::{
    DefaultExpressionGenerator, DefaultFunctionGenerator, DefaultSlotGenerator,
    ExpressionGenerator, FunctionGenerator, FunctionMode, NodeGenerator, SlotGenerator,
};
pub use collection::I18N_HELPER;
pub use config::{GenerateConfig, GenerateOptions, SlotPolicy, DEFAULT_MAX_DEPTH};
pub use dispatch::{generate, generate_json};
pub use error::{GenerateError, Result};
pub use function_shape::{
    forwarder_fragment, FunctionShape, HeuristicShapeDetector, ShapeDetector, ARGUMENTS_KEYWORD,
};
pub use hooks::{execute, Emitter, HandlerSet, Hook, Interceptor, Next};
pub use keywords::{scan_identifiers, KeywordExtractor, OxcKeywordExtractor};
pub use literal::{emit_bool, emit_number, emit_string};
pub use reference::{desugar_data_source, desugar_variable};
pub use scope::Scope;
pub use value::{
    CompositeObject, CompositeValue, DataSourceRef, JsExpression, JsFunction, JsSlot,
    LegacyVariable, ValueKind,
};

#[cfg(feature = "napi")]
pub use dispatch::generate_composite_native;
