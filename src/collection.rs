//! Array and object emitters. Every element goes back through the dispatcher
//! so hooks apply at each nesting level.

use serde_json::Value;
use tracing::trace;

use crate::dispatch::Dispatch;
use crate::error::Result;
use crate::literal::emit_string;
use crate::scope::Scope;
use crate::value::{is_i18n_object, CompositeObject, CompositeValue, TAG_KEY};

pub const I18N_HELPER: &str = "this._i18nText";

pub(crate) fn emit_array(
    items: &[CompositeValue],
    scope: &Scope,
    dispatch: &Dispatch<'_>,
) -> Result<String> {
    let parts = items
        .iter()
        .map(|item| dispatch.nested(item, scope))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("[{}]", parts.join(",")))
}

pub(crate) fn emit_object(
    map: &CompositeObject,
    scope: &Scope,
    dispatch: &Dispatch<'_>,
) -> Result<String> {
    if is_i18n_object(map) {
        return emit_i18n(map, scope, dispatch);
    }

    let body = map
        .iter()
        .map(|(key, value)| Ok(format!("{}: {}", emit_string(key), dispatch.nested(value, scope)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("{{{}}}", body.join(",\n")))
}

/// `{ type: "i18n", key, params? }` becomes a runtime lookup. Dynamic params
/// are generated recursively; otherwise the payload is plain data and is
/// embedded as a JSON literal.
fn emit_i18n(map: &CompositeObject, scope: &Scope, dispatch: &Dispatch<'_>) -> Result<String> {
    let payload: CompositeObject = map
        .iter()
        .filter(|(key, _)| key.as_str() != TAG_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if payload.get("params").is_some_and(has_dynamic_params) {
        trace!("i18n text with bound params");
        let generated = dispatch.nested(&CompositeValue::Object(payload), scope)?;
        return Ok(format!("{}({})", I18N_HELPER, generated));
    }

    let literal = CompositeValue::Object(payload)
        .to_json()
        .unwrap_or(Value::Null);
    Ok(format!("{}({})", I18N_HELPER, literal))
}

fn has_dynamic_params(params: &CompositeValue) -> bool {
    !matches!(
        params,
        CompositeValue::Undefined
            | CompositeValue::Null
            | CompositeValue::String(_)
            | CompositeValue::Number(_)
            | CompositeValue::Bool(_)
    )
}
