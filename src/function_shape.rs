//! Function-shape classification for `JSFunction` fragments.
//!
//! The fragment is inspected, never executed, and mapped to one of three
//! shapes. The inspection is a best-effort heuristic sitting behind
//! [`ShapeDetector`], so a parser-based detector can replace it without
//! touching the dispatcher.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::collaborators::{find_closing, FunctionMode};
use crate::config::GenerateOptions;
use crate::error::Result;
use crate::keywords::KeywordExtractor;
use crate::value::JsFunction;

/// Free identifier denoting the caller's argument list.
pub const ARGUMENTS_KEYWORD: &str = "arguments";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionShape {
    /// Legacy `function(){ this.m.apply(this, Array.prototype.slice.call(arguments).concat([..])) }`
    /// shim. `extra_args` is the bracketed list without brackets, `None` when
    /// no list could be found.
    LegacyForward {
        method: String,
        extra_args: Option<String>,
    },
    /// References `arguments`; needs its own `this`-bound function.
    Bound,
    Arrow,
}

pub trait ShapeDetector: Send + Sync {
    fn detect(&self, code: &str, keywords: &dyn KeywordExtractor) -> FunctionShape;
}

lazy_static! {
    static ref ZERO_ARG_HEADER_RE: Regex = Regex::new(r"^\s*function\s*\(\s*\)\s*\{").unwrap();
    static ref FORWARD_IDIOM_RE: Regex = Regex::new(
        r"\.\s*apply\s*\(\s*this\s*,\s*Array\s*\.\s*prototype\s*\.\s*slice\s*\.\s*call\s*\(\s*arguments\s*\)\s*\.\s*concat\s*\("
    )
    .unwrap();
    static ref MEMBER_NAME_RE: Regex = Regex::new(r"\.\s*([A-Za-z_$][\w$]*)").unwrap();
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicShapeDetector;

impl ShapeDetector for HeuristicShapeDetector {
    fn detect(&self, code: &str, keywords: &dyn KeywordExtractor) -> FunctionShape {
        let flattened: String = code
            .chars()
            .filter(|c| !matches!(c, '\r' | '\t' | '\n'))
            .collect();

        if let Some(shape) = detect_legacy_forward(&flattened, code) {
            return shape;
        }

        if keywords.free_identifiers(code).contains(ARGUMENTS_KEYWORD) {
            FunctionShape::Bound
        } else {
            FunctionShape::Arrow
        }
    }
}

fn detect_legacy_forward(flat: &str, code: &str) -> Option<FunctionShape> {
    if !ZERO_ARG_HEADER_RE.is_match(flat) {
        return None;
    }
    let idiom = FORWARD_IDIOM_RE.find(flat)?;
    let method = MEMBER_NAME_RE.captures(flat)?[1].to_string();

    // The flattened text only decides the shape. The list itself is cut from
    // the fragment as written, so line comments inside it keep their newline.
    let extra_args = match FORWARD_IDIOM_RE.find(code) {
        Some(found) => extra_args_after(&code[found.end()..]),
        None => extra_args_after(&flat[idiom.end()..]),
    };

    Some(FunctionShape::LegacyForward { method, extra_args })
}

/// First bracketed list after `.concat(`; earlier brackets in the body are
/// never considered.
fn extra_args_after(rest: &str) -> Option<String> {
    let open = rest.find('[')?;
    find_closing(rest, open, b'[', b']').map(|close| rest[open + 1..close].trim().to_string())
}

/// Variadic forwarder replacing a legacy shim.
pub fn forwarder_fragment(method: &str, extra_args: Option<&str>) -> String {
    match extra_args.filter(|args| !args.is_empty()) {
        Some(args) => format!(
            "function (...args) {{ return this.{}(...args, {}); }}",
            method, args
        ),
        None => format!("function (...args) {{ return this.{}(...args); }}", method),
    }
}

/// Default emitter for the `function` kind.
pub(crate) fn emit_function(func: &JsFunction, options: &GenerateOptions) -> Result<String> {
    match options.shapes.detect(&func.value, options.keywords.as_ref()) {
        FunctionShape::LegacyForward { method, extra_args } => {
            if extra_args.is_none() {
                warn!(
                    method = %method,
                    "legacy forwarding shim without an extra-arguments list, forwarding call arguments only"
                );
            }
            debug!(method = %method, "rewriting legacy forwarding shim");
            let forwarder = JsFunction {
                value: forwarder_fragment(&method, extra_args.as_deref()),
            };
            options
                .functions
                .generate_function(&forwarder, FunctionMode::Arrow)
        }
        FunctionShape::Bound => options.functions.generate_function(func, FunctionMode::Bound),
        FunctionShape::Arrow => options.functions.generate_function(func, FunctionMode::Arrow),
    }
}
