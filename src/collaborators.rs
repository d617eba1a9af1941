//! Collaborator interfaces the dispatcher delegates to, with the default
//! implementations used when the caller does not plug in its own.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, StaticMemberExpression};
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::error::{GenerateError, Result};
use crate::keywords::fragment_source_type;
use crate::scope::Scope;
use crate::value::{JsExpression, JsFunction, JsSlot};

// ═══════════════════════════════════════════════════════════════════════════════
// INTERFACES
// ═══════════════════════════════════════════════════════════════════════════════

/// Renders a `JSExpression` fragment in the caller's lexical scope.
pub trait ExpressionGenerator: Send + Sync {
    fn generate_expression(&self, expr: &JsExpression, scope: &Scope) -> Result<String>;
}

/// Binding mode requested from a [`FunctionGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionMode {
    /// Context-transparent: `this` is not rebound.
    Arrow,
    /// Execution context bound explicitly to the surrounding `this`.
    Bound,
}

/// Renders a function-literal fragment under a binding mode.
pub trait FunctionGenerator: Send + Sync {
    fn generate_function(&self, func: &JsFunction, mode: FunctionMode) -> Result<String>;
}

/// Generates code for one child node of a slot.
pub trait NodeGenerator: Send + Sync {
    fn generate_node(&self, node: &Value, scope: &Scope) -> Result<String>;
}

impl<F> NodeGenerator for F
where
    F: Fn(&Value, &Scope) -> Result<String> + Send + Sync,
{
    fn generate_node(&self, node: &Value, scope: &Scope) -> Result<String> {
        self(node, scope)
    }
}

/// Renders `JSSlot` content through a node generator.
pub trait SlotGenerator: Send + Sync {
    fn generate_slot(&self, slot: &JsSlot, scope: &Scope, nodes: &dyn NodeGenerator)
        -> Result<String>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Trims the fragment and resolves `this.<name>` reads against the scope:
/// a name bound in scope (slot param, loop variable) is emitted bare.
#[derive(Debug, Clone, Copy)]
pub struct DefaultExpressionGenerator {
    pub rewrite_scope_refs: bool,
}

impl Default for DefaultExpressionGenerator {
    fn default() -> Self {
        DefaultExpressionGenerator {
            rewrite_scope_refs: true,
        }
    }
}

impl ExpressionGenerator for DefaultExpressionGenerator {
    fn generate_expression(&self, expr: &JsExpression, scope: &Scope) -> Result<String> {
        let code = expr.value.trim();
        if code.is_empty() {
            return Ok("undefined".to_string());
        }
        if !self.rewrite_scope_refs || scope.is_empty() {
            return Ok(code.to_string());
        }
        rewrite_scope_refs(code, scope)
    }
}

fn rewrite_scope_refs(code: &str, scope: &Scope) -> Result<String> {
    let allocator = Allocator::default();
    let expr = Parser::new(&allocator, code, fragment_source_type())
        .parse_expression()
        .map_err(|errors| GenerateError::Expression {
            code: code.to_string(),
            message: format!("{:?}", errors),
        })?;

    let mut rewriter = ThisRefRewriter {
        scope,
        replacements: Vec::new(),
    };
    rewriter.visit_expression(&expr);

    let mut replacements = rewriter.replacements;
    replacements.sort_by(|a, b| b.0.cmp(&a.0));

    let mut out = code.to_string();
    for (start, end, name) in replacements {
        out.replace_range(start as usize..end as usize, &name);
    }
    Ok(out)
}

struct ThisRefRewriter<'s> {
    scope: &'s Scope,
    replacements: Vec<(u32, u32, String)>,
}

impl<'a, 's> Visit<'a> for ThisRefRewriter<'s> {
    fn visit_static_member_expression(&mut self, expr: &StaticMemberExpression<'a>) {
        if let Expression::ThisExpression(_) = &expr.object {
            let name = expr.property.name.as_str();
            if self.scope.has(name) {
                self.replacements
                    .push((expr.span.start, expr.span.end, name.to_string()));
                return;
            }
        }
        oxc_ast_visit::walk::walk_static_member_expression(self, expr);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    static ref FUNCTION_HEADER_RE: Regex =
        Regex::new(r"^(async\s+)?function\b\s*(\*)?\s*(?:[A-Za-z_$][\w$]*)?\s*\(").unwrap();
}

/// Arrow mode rewrites `function [name](params) { body }` to
/// `(params) => { body }`; bound mode wraps the fragment in `.bind(this)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFunctionGenerator;

impl FunctionGenerator for DefaultFunctionGenerator {
    fn generate_function(&self, func: &JsFunction, mode: FunctionMode) -> Result<String> {
        let code = func.value.trim().trim_end_matches(';').trim_end();
        match mode {
            FunctionMode::Bound => Ok(bind_this(code)),
            FunctionMode::Arrow => Ok(to_arrow(code)),
        }
    }
}

fn bind_this(code: &str) -> String {
    format!("({}).bind(this)", code)
}

fn to_arrow(code: &str) -> String {
    let Some(cap) = FUNCTION_HEADER_RE.captures(code) else {
        // already an arrow, or a reference like `this.handler`
        return code.to_string();
    };
    if cap.get(2).is_some() {
        // generators have no arrow form
        return bind_this(code);
    }

    let header_end = cap.get(0).map_or(0, |m| m.end());
    let open = header_end - 1;
    let Some(close) = find_closing(code, open, b'(', b')') else {
        trace!("unbalanced parameter list, emitting function as-is");
        return code.to_string();
    };
    let body = code[close + 1..].trim_start();
    if !body.starts_with('{') {
        return code.to_string();
    }

    let params = code[open + 1..close].trim();
    let prefix = if cap.get(1).is_some() { "async " } else { "" };
    format!("{}({}) => {}", prefix, params, body)
}

/// Index of the delimiter closing the one at `open`, skipping string and
/// template literals.
pub(crate) fn find_closing(src: &str, open: usize, open_ch: u8, close_ch: u8) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
        } else if b == b'"' || b == b'\'' || b == b'`' {
            quote = Some(b);
        } else if b == open_ch {
            depth += 1;
        } else if b == close_ch {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════════
// SLOTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Slot content is generated node by node in a scope extended with the
/// slot's params; a parameterised slot becomes a render arrow.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSlotGenerator;

impl SlotGenerator for DefaultSlotGenerator {
    fn generate_slot(
        &self,
        slot: &JsSlot,
        scope: &Scope,
        nodes: &dyn NodeGenerator,
    ) -> Result<String> {
        let params = slot.params.as_deref().unwrap_or_default();
        let slot_scope = if params.is_empty() {
            scope.clone()
        } else {
            scope.derive(params.iter().cloned())
        };

        let content = match &slot.value {
            None => "null".to_string(),
            Some(Value::Array(children)) => match children.as_slice() {
                [] => "null".to_string(),
                [only] => nodes.generate_node(only, &slot_scope)?,
                many => {
                    let parts = many
                        .iter()
                        .map(|child| nodes.generate_node(child, &slot_scope))
                        .collect::<Result<Vec<_>>>()?;
                    format!("[{}]", parts.join(","))
                }
            },
            Some(node) => nodes.generate_node(node, &slot_scope)?,
        };

        if params.is_empty() {
            Ok(content)
        } else {
            Ok(format!("({}) => {}", params.join(", "), content))
        }
    }
}
