//! Dispatcher behaviour over whole composite trees: classification order,
//! collection layout, desugaring, function shapes, slots and depth limits.

#[cfg(test)]
mod tests {
    use crate::config::{GenerateConfig, GenerateOptions, SlotPolicy};
    use crate::dispatch::{generate, generate_json};
    use crate::error::{GenerateError, Result};
    use crate::scope::Scope;
    use crate::value::{CompositeValue, JsExpression};
    use crate::ExpressionGenerator;
    use serde_json::{json, Value};

    fn codegen(raw: Value) -> String {
        generate_json(&raw, &Scope::root(), &GenerateOptions::new()).unwrap()
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // PRIMITIVES & COLLECTIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_undefined_and_null() {
        let options = GenerateOptions::new();
        assert_eq!(
            generate(&CompositeValue::Undefined, &Scope::root(), &options).unwrap(),
            "undefined"
        );
        assert_eq!(codegen(json!(null)), "null");
    }

    #[test]
    fn test_array_structural_mapping() {
        assert_eq!(codegen(json!([1, "a", true])), r#"[1,"a",true]"#);
        assert_eq!(codegen(json!([])), "[]");
        assert_eq!(codegen(json!([[1, 2], [null]])), "[[1,2],[null]]");
    }

    #[test]
    fn test_string_literal_is_escaped() {
        assert_eq!(codegen(json!("He said \"hi\"\n")), r#""He said \"hi\"\n""#);
    }

    #[test]
    fn test_object_key_order_preserved() {
        let raw: Value = serde_json::from_str(r#"{"b": 1, "a": {"z": false, "y": "s"}}"#).unwrap();
        assert_eq!(codegen(raw), "{\"b\": 1,\n\"a\": {\"z\": false,\n\"y\": \"s\"}}");
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(codegen(json!({})), "{}");
    }

    #[test]
    fn test_object_keys_are_quoted_literals() {
        assert_eq!(codegen(json!({"data-id": 1})), "{\"data-id\": 1}");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // I18N
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_i18n_static_payload() {
        assert_eq!(
            codegen(json!({"type": "i18n", "key": "hello"})),
            r#"this._i18nText({"key":"hello"})"#
        );
    }

    #[test]
    fn test_i18n_primitive_params_stay_static() {
        assert_eq!(
            codegen(json!({"type": "i18n", "key": "hello", "params": "x"})),
            r#"this._i18nText({"key":"hello","params":"x"})"#
        );
    }

    #[test]
    fn test_i18n_dynamic_params_generated_recursively() {
        let out = codegen(json!({
            "type": "i18n",
            "key": "hello",
            "params": {"name": {"type": "JSExpression", "value": "this.state.name"}}
        }));
        assert_eq!(
            out,
            "this._i18nText({\"key\": \"hello\",\n\"params\": {\"name\": this.state.name}})"
        );
        assert!(!out.contains("JSExpression"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // DESUGARING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_data_source_desugaring() {
        assert_eq!(
            codegen(json!({"type": "DataSource", "id": "ds1"})),
            codegen(json!({"type": "JSExpression", "value": "this.dataSourceMap[\"ds1\"]"}))
        );
        assert_eq!(
            codegen(json!({"type": "DataSource", "id": "ds1"})),
            r#"this.dataSourceMap["ds1"]"#
        );
    }

    #[test]
    fn test_legacy_variable_desugaring() {
        assert_eq!(
            codegen(json!({"type": "variable", "value": {"mock": 1}, "variable": "foo"})),
            codegen(json!({"type": "JSExpression", "value": "foo"}))
        );
    }

    #[test]
    fn test_scope_reaches_nested_expressions() {
        let scope = Scope::root().derive(["item"]);
        let raw = json!([{"label": {"type": "JSExpression", "value": "this.item.label"}}]);
        let out = generate_json(&raw, &scope, &GenerateOptions::new()).unwrap();
        assert_eq!(out, "[{\"label\": item.label}]");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // FUNCTIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_function_with_arguments_is_bound() {
        assert_eq!(
            codegen(json!({"type": "JSFunction", "value": "function () { return this.f(arguments[0]); }"})),
            "(function () { return this.f(arguments[0]); }).bind(this)"
        );
    }

    #[test]
    fn test_plain_function_becomes_arrow() {
        assert_eq!(
            codegen(json!({"type": "JSFunction", "value": "function onClick(e) { this.go(e); }"})),
            "(e) => { this.go(e); }"
        );
    }

    #[test]
    fn test_legacy_forwarder_rewrite() {
        let raw = json!({
            "type": "JSFunction",
            "value": "function(){ this.bar.apply(this,Array.prototype.slice.call(arguments).concat([1,2])) }"
        });
        assert_eq!(codegen(raw), "(...args) => { return this.bar(...args, 1,2); }");
    }

    #[test]
    fn test_legacy_forwarder_without_list_forwards_only() {
        let raw = json!({
            "type": "JSFunction",
            "value": "function(){ this.bar.apply(this,Array.prototype.slice.call(arguments).concat(x)) }"
        });
        assert_eq!(codegen(raw), "(...args) => { return this.bar(...args); }");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SLOTS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_slot_without_node_generator_degrades() {
        assert_eq!(codegen(json!({"type": "JSSlot", "value": [{"componentName": "A"}]})), "");
        assert_eq!(
            codegen(json!({"children": {"type": "JSSlot", "value": []}})),
            "{\"children\": }"
        );
    }

    #[test]
    fn test_slot_without_node_generator_can_fail() {
        let options = GenerateOptions::new().with_config(GenerateConfig {
            slot_policy: SlotPolicy::Fail,
            ..GenerateConfig::default()
        });
        let err = generate_json(&json!({"type": "JSSlot"}), &Scope::root(), &options).unwrap_err();
        assert_eq!(err, GenerateError::MissingNodeGenerator);
    }

    #[test]
    fn test_slot_with_node_generator() {
        let options = GenerateOptions::new().with_node_generator(
            |node: &Value, scope: &Scope| -> Result<String> {
                let name = node["componentName"].as_str().unwrap_or("Unknown");
                Ok(format!("h({}, {})", name, scope.has("row")))
            },
        );
        let raw = json!({
            "renderCell": {"type": "JSSlot", "params": ["row"], "value": [{"componentName": "Cell"}]}
        });
        let out = generate_json(&raw, &Scope::root(), &options).unwrap();
        assert_eq!(out, "{\"renderCell\": (row) => h(Cell, true)}");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // ERRORS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_classification_error_propagates() {
        let raw = json!({"a": [1, {"type": "JSFunction"}]});
        let err = generate_json(&raw, &Scope::root(), &GenerateOptions::new()).unwrap_err();
        assert!(err.is_classification());
        assert_eq!(err.code(), "CG-ERR-CLASSIFY-001");
    }

    #[test]
    fn test_classification_totality() {
        let inputs = vec![
            json!(null),
            json!(0),
            json!(-1.5),
            json!(""),
            json!([{}, [], [[]]]),
            json!({"type": "unknown-tag", "x": 1}),
            json!({"type": "i18n"}),
            json!({"type": "JSExpression", "value": ""}),
            json!({"type": "JSExpression"}),
            json!({"type": "variable", "variable": 3}),
            json!({"type": "JSSlot", "params": [1]}),
        ];
        for raw in inputs {
            match generate_json(&raw, &Scope::root(), &GenerateOptions::new()) {
                Ok(_) => {}
                Err(err) => assert!(err.is_classification(), "{} -> {:?}", raw, err),
            }
        }
    }

    #[test]
    fn test_collaborator_error_propagates_unchanged() {
        struct Failing;
        impl ExpressionGenerator for Failing {
            fn generate_expression(&self, expr: &JsExpression, _scope: &Scope) -> Result<String> {
                Err(GenerateError::Expression {
                    code: expr.value.clone(),
                    message: "rejected".to_string(),
                })
            }
        }
        let options = GenerateOptions::new().with_expression_generator(Failing);
        let err = generate_json(
            &json!([{"type": "DataSource", "id": "d"}]),
            &Scope::root(),
            &options,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GenerateError::Expression {
                code: "this.dataSourceMap[\"d\"]".to_string(),
                message: "rejected".to_string(),
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let options = GenerateOptions::new().with_config(GenerateConfig {
            max_depth: 2,
            ..GenerateConfig::default()
        });
        assert_eq!(generate_json(&json!([1]), &Scope::root(), &options).unwrap(), "[1]");
        let err = generate_json(&json!([[1]]), &Scope::root(), &options).unwrap_err();
        assert_eq!(err, GenerateError::DepthExceeded { max: 2 });
    }

    #[test]
    fn test_pathological_nesting_fails_fast() {
        let mut value = CompositeValue::Number(1.0);
        for _ in 0..500 {
            value = CompositeValue::Array(vec![value]);
        }
        let options = GenerateOptions::new().with_config(GenerateConfig {
            max_depth: 64,
            ..GenerateConfig::default()
        });
        let err = generate(&value, &Scope::root(), &options).unwrap_err();
        assert_eq!(err.code(), "CG-ERR-DEPTH-001");
    }
}
