//! Dispatcher: routes a composite value to its emitter.
//!
//! Classification is the `match` on [`CompositeValue`]; untyped input is
//! classified beforehand by [`CompositeValue::from_json`]. Before the default
//! emitter of a kind runs, the hook stack registered for that kind (if any)
//! gets the value, with the default emitter as its terminal.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::collection::{emit_array, emit_object};
use crate::config::{GenerateOptions, SlotPolicy};
use crate::error::{GenerateError, Result};
use crate::function_shape::emit_function;
use crate::hooks;
use crate::literal::{emit_bool, emit_number, emit_string};
use crate::reference::{desugar_data_source, desugar_variable};
use crate::scope::Scope;
use crate::value::{CompositeValue, JsSlot};

/// Generate code for `value`.
pub fn generate(value: &CompositeValue, scope: &Scope, options: &GenerateOptions) -> Result<String> {
    Dispatch::root(options).generate(value, scope)
}

/// Classify untyped JSON, then generate code for it.
pub fn generate_json(raw: &Value, scope: &Scope, options: &GenerateOptions) -> Result<String> {
    let value = CompositeValue::from_json(raw)?;
    generate(&value, scope, options)
}

/// One dispatcher frame; `depth` counts nesting from the root value.
pub(crate) struct Dispatch<'o> {
    options: &'o GenerateOptions,
    depth: usize,
}

impl<'o> Dispatch<'o> {
    fn root(options: &'o GenerateOptions) -> Self {
        Dispatch { options, depth: 0 }
    }

    /// Re-enter the dispatcher one level deeper.
    pub(crate) fn nested(&self, value: &CompositeValue, scope: &Scope) -> Result<String> {
        Dispatch {
            options: self.options,
            depth: self.depth + 1,
        }
        .generate(value, scope)
    }

    fn generate(&self, value: &CompositeValue, scope: &Scope) -> Result<String> {
        let max = self.options.config.max_depth;
        if self.depth >= max {
            return Err(GenerateError::DepthExceeded { max });
        }

        let kind = value.kind();
        trace!(kind = %kind, depth = self.depth, "dispatch");

        let Some(stack) = self.options.handlers.stack(kind) else {
            return self.emit_default(value, scope);
        };

        debug!(kind = %kind, hooks = stack.len(), "running hook stack");
        // A hook may hand a value of another kind down the chain; that value
        // is classified afresh instead of reaching this kind's emitter.
        let terminal = |v: &CompositeValue, s: &Scope| {
            if v.kind() == kind {
                self.emit_default(v, s)
            } else {
                self.nested(v, s)
            }
        };
        let nested = |v: &CompositeValue, s: &Scope| self.nested(v, s);
        hooks::execute(value, scope, kind, stack, &terminal, &nested, self.options)
    }

    fn emit_default(&self, value: &CompositeValue, scope: &Scope) -> Result<String> {
        match value {
            CompositeValue::Undefined => Ok("undefined".to_string()),
            CompositeValue::Null => Ok("null".to_string()),
            CompositeValue::Array(items) => emit_array(items, scope, self),
            CompositeValue::Variable(var) => {
                debug!(variable = %var.variable, "desugaring legacy variable");
                self.nested(&desugar_variable(var), scope)
            }
            CompositeValue::Expression(expr) => {
                self.options.expressions.generate_expression(expr, scope)
            }
            CompositeValue::Function(func) => emit_function(func, self.options),
            CompositeValue::Slot(slot) => self.emit_slot(slot, scope),
            CompositeValue::DataSource(ds) => {
                debug!(id = %ds.id, "desugaring data source reference");
                self.nested(&desugar_data_source(ds), scope)
            }
            CompositeValue::Object(map) => emit_object(map, scope, self),
            CompositeValue::String(s) => Ok(emit_string(s)),
            CompositeValue::Number(n) => Ok(emit_number(*n)),
            CompositeValue::Bool(b) => Ok(emit_bool(*b)),
        }
    }

    fn emit_slot(&self, slot: &JsSlot, scope: &Scope) -> Result<String> {
        match &self.options.node_generator {
            Some(nodes) => self.options.slots.generate_slot(slot, scope, nodes.as_ref()),
            None => match self.options.config.slot_policy {
                SlotPolicy::Degrade => {
                    warn!(
                        title = slot.title.as_deref().unwrap_or(""),
                        "JSSlot without a node generator, emitting empty content"
                    );
                    Ok(String::new())
                }
                SlotPolicy::Fail => Err(GenerateError::MissingNodeGenerator),
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Generate code for a JSON composite value with the default collaborators.
/// `scope_bindings` seeds the root scope (e.g. loop variables).
#[cfg(feature = "napi")]
#[napi]
pub fn generate_composite_native(
    value: Value,
    config: Option<Value>,
    scope_bindings: Option<Vec<String>>,
) -> napi::Result<String> {
    use crate::config::GenerateConfig;

    let config = match config {
        Some(raw) => {
            GenerateConfig::from_value(raw).map_err(|e| napi::Error::from_reason(e.to_string()))?
        }
        None => GenerateConfig::default(),
    };
    let options = GenerateOptions::new().with_config(config);
    let scope = match scope_bindings {
        Some(names) => Scope::root().derive(names),
        None => Scope::root(),
    };

    generate_json(&value, &scope, &options)
        .map_err(|e| napi::Error::from_reason(format!("[{}] {}", e.code(), e)))
}
