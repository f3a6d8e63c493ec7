//! Classification of schema fragments.

use serde_json::Value;

/// What a schema fragment means, decided from which keywords it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Any,
    TypedArray,
    NamedEnum,
    Enum,
    NamedSchema,
    AllOf,
    AnyOf,
    Reference,
    Array,
    Boolean,
    Number,
    Null,
    Object,
    String,
    Union,
    NumberLiteral,
    Literal,
    AnonymousSchema,
}

/// The fragment's `type`, with a one-element array read as its only member.
///
/// The fragment itself is never rewritten.
pub fn schema_type(fragment: &Value) -> Option<&Value> {
    match fragment.get("type") {
        Some(Value::Array(types)) if types.len() == 1 => types.first(),
        other => other,
    }
}

/// Classify `fragment`. The first matching rule wins:
///
/// 1. `type: "array"` with `items`
/// 2. `enum` with `tsEnumNames`, then `enum` alone
/// 3. `properties` or `additionalProperties`
/// 4. `allOf`, `anyOf`, `$ref`
/// 5. a single primitive `type`, then a `type` array
/// 6. non-schema values: numeric literals, other literals
pub fn classify(fragment: &Value) -> RuleKind {
    let ty = schema_type(fragment);

    if ty.and_then(Value::as_str) == Some("array") && truthy(fragment.get("items")) {
        return RuleKind::TypedArray;
    }
    if truthy(fragment.get("enum")) && truthy(fragment.get("tsEnumNames")) {
        return RuleKind::NamedEnum;
    }
    if truthy(fragment.get("enum")) {
        return RuleKind::Enum;
    }
    if truthy(fragment.get("properties")) || truthy(fragment.get("additionalProperties")) {
        return RuleKind::NamedSchema;
    }
    if truthy(fragment.get("allOf")) {
        return RuleKind::AllOf;
    }
    if truthy(fragment.get("anyOf")) {
        return RuleKind::AnyOf;
    }
    if truthy(fragment.get("$ref")) {
        return RuleKind::Reference;
    }

    match ty {
        Some(Value::String(name)) => match name.as_str() {
            "array" => return RuleKind::Array,
            "boolean" => return RuleKind::Boolean,
            "integer" | "number" => return RuleKind::Number,
            "null" => return RuleKind::Null,
            "object" => return RuleKind::Object,
            "string" => return RuleKind::String,
            _ => {}
        },
        Some(Value::Array(_)) => return RuleKind::Union,
        _ => {}
    }

    if is_number_literal(fragment) {
        return RuleKind::NumberLiteral;
    }
    match fragment {
        Value::Object(_) => RuleKind::AnonymousSchema,
        Value::Null => RuleKind::Any,
        _ => RuleKind::Literal,
    }
}

/// Keyword presence the way schema authors write it: `false`, `0`, `""` and `null` count as absent.
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// A bare number, or a string made only of digits and dots.
fn is_number_literal(fragment: &Value) -> bool {
    let text = match fragment {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return false,
    };
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitive_types() {
        assert_eq!(classify(&json!({ "type": "string" })), RuleKind::String);
        assert_eq!(classify(&json!({ "type": "number" })), RuleKind::Number);
        assert_eq!(classify(&json!({ "type": "integer" })), RuleKind::Number);
        assert_eq!(classify(&json!({ "type": "boolean" })), RuleKind::Boolean);
        assert_eq!(classify(&json!({ "type": "null" })), RuleKind::Null);
        assert_eq!(classify(&json!({ "type": "object" })), RuleKind::Object);
        assert_eq!(classify(&json!({ "type": "array" })), RuleKind::Array);
    }

    #[test]
    fn single_element_type_array_collapses() {
        let fragment = json!({ "type": ["string"] });
        assert_eq!(classify(&fragment), RuleKind::String);
        // Not rewritten in place.
        assert_eq!(fragment, json!({ "type": ["string"] }));

        assert_eq!(
            classify(&json!({ "type": ["array"], "items": { "type": "string" } })),
            RuleKind::TypedArray
        );
    }

    #[test]
    fn type_array_is_union() {
        assert_eq!(classify(&json!({ "type": ["string", "null"] })), RuleKind::Union);
        assert_eq!(classify(&json!({ "type": [] })), RuleKind::Union);
    }

    #[test]
    fn precedence() {
        let named = json!({ "enum": [1, 2], "tsEnumNames": ["One", "Two"], "properties": {} });
        assert_eq!(classify(&named), RuleKind::NamedEnum);

        let enumerated = json!({ "enum": ["a"], "properties": { "x": {} } });
        assert_eq!(classify(&enumerated), RuleKind::Enum);

        let both = json!({ "properties": { "a": {} }, "allOf": [] });
        assert_eq!(classify(&both), RuleKind::NamedSchema);

        let composed = json!({ "allOf": [{}], "anyOf": [{}], "$ref": "#" });
        assert_eq!(classify(&composed), RuleKind::AllOf);

        let reference = json!({ "$ref": "#/definitions/a", "type": "string" });
        assert_eq!(classify(&reference), RuleKind::Reference);
    }

    #[test]
    fn falsy_keywords_are_ignored() {
        assert_eq!(
            classify(&json!({ "additionalProperties": false, "type": "object" })),
            RuleKind::Object
        );
        assert_eq!(classify(&json!({ "type": "array", "items": null })), RuleKind::Array);
        assert_eq!(classify(&json!({ "$ref": "" })), RuleKind::AnonymousSchema);
    }

    #[test]
    fn literals() {
        assert_eq!(classify(&json!(42)), RuleKind::NumberLiteral);
        assert_eq!(classify(&json!("1.5")), RuleKind::NumberLiteral);
        assert_eq!(classify(&json!("-1")), RuleKind::Literal);
        assert_eq!(classify(&json!("hello")), RuleKind::Literal);
        assert_eq!(classify(&json!(true)), RuleKind::Literal);
        assert_eq!(classify(&json!({})), RuleKind::AnonymousSchema);
        assert_eq!(classify(&json!({ "type": "whatever" })), RuleKind::AnonymousSchema);
        assert_eq!(classify(&Value::Null), RuleKind::Any);
    }
}
