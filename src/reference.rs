//! Desugaring of reference kinds into plain expressions.

use crate::literal::emit_string;
use crate::value::{CompositeValue, DataSourceRef, LegacyVariable};

/// `{ type: "DataSource", id }` reads the runtime-registered value by id.
pub fn desugar_data_source(ds: &DataSourceRef) -> CompositeValue {
    CompositeValue::expression(format!("this.dataSourceMap[{}]", emit_string(&ds.id)))
}

/// Deprecated `{ type: "variable" }` is an expression naming `variable`.
pub fn desugar_variable(var: &LegacyVariable) -> CompositeValue {
    CompositeValue::expression(var.variable.clone())
}
