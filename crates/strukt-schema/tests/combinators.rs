//! # Combinator Integration Tests
//!
//! Exercises every combinator through the public factory: acceptance,
//! coercion, failure paths, expected types and failure aggregation.

use strukt_core::{HostObject, PathSegment, Value};
use strukt_schema::{
    Defaults, Description, ErrorPatch, Kind, Struct, Structs, TypeRegistry, Verdict,
};

/// Helper: a path of object keys.
fn keys(path: &[&str]) -> Vec<PathSegment> {
    path.iter().map(|k| PathSegment::from(*k)).collect()
}

// -- Object, partial, interface ----------------------------------------------

#[test]
fn test_object_rejects_undeclared_key() {
    let structs = Structs::new();
    let st = structs.object([("a", "string")]).unwrap();
    let input = Value::object([("a", Value::from("x")), ("b", Value::from(1))]);

    let err = st.validate(&input).unwrap_err();
    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.path(), keys(&["b"]).as_slice());
    assert_eq!(err.value(), &Value::from(1));
    assert_eq!(err.expected(), "undefined");
    assert_eq!(err.data(), &input);
    assert_eq!(
        err.to_string(),
        "Expected a value of type `undefined` for `b` but received `1`."
    );
}

#[test]
fn test_interface_preserves_extra_keys() {
    let structs = Structs::new();
    let st = structs.interface([("a", "string")]).unwrap();
    let input = Value::object([("a", Value::from("x")), ("b", Value::from(1))]);
    assert_eq!(st.assert(&input).unwrap(), input);
    assert!(!st.test(&Value::object([("a", 1)])));
    assert!(!st.test(&Value::from("not an object")));
}

#[test]
fn test_object_requires_declared_keys() {
    let structs = Structs::new();
    let st = structs.object([("a", "string"), ("b", "number")]).unwrap();
    let err = st.validate(&Value::object([("a", "x")])).unwrap_err();
    assert_eq!(err.path(), keys(&["b"]).as_slice());
    assert_eq!(err.value(), &Value::Undefined);
    assert_eq!(err.expected(), "number");
}

#[test]
fn test_object_guard_reports_shape_type() {
    let structs = Structs::new();
    let st = structs.object([("a", "string")]).unwrap();
    let err = st.validate(&Value::array([1])).unwrap_err();
    assert!(err.path().is_empty());
    assert_eq!(err.expected(), "{a}");
    assert_eq!(err.errors()[0].expected, "{a}");
}

#[test]
fn test_object_output_skips_absent_undefined_keys() {
    let structs = Structs::new();
    let st = structs.object([("a", "string"), ("b", "number?")]).unwrap();
    let out = st.assert(&Value::object([("a", "x")])).unwrap();
    assert_eq!(out, Value::object([("a", "x")]));
    assert!(out.get("b").is_none());

    let explicit = Value::object([("a", Value::from("x")), ("b", Value::Undefined)]);
    let out = st.assert(&explicit).unwrap();
    assert_eq!(out.get("b"), Some(&Value::Undefined));
}

#[test]
fn test_partial_skips_absent_keys_and_rejects_unknown() {
    let structs = Structs::new();
    let st = structs.partial([("a", "string"), ("b", "number")]).unwrap();
    assert_eq!(st.type_description(), "{a,b,...}");
    assert_eq!(
        st.assert(&Value::object([("a", "x")])).unwrap(),
        Value::object([("a", "x")])
    );
    assert!(st.assert(&Value::object([("b", "x")])).is_err());
    let err = st.validate(&Value::object([("c", 1)])).unwrap_err();
    assert_eq!(err.path(), keys(&["c"]).as_slice());
    assert_eq!(err.expected(), "undefined");
}

#[test]
fn test_partial_keeps_present_undefined_keys() {
    let structs = Structs::new();
    let input = Value::object([("a", Value::Undefined)]);
    let partial = structs.partial([("a", "number?")]).unwrap();
    let out = partial.assert(&input).unwrap();
    assert_eq!(out.get("a"), Some(&Value::Undefined));

    let object = structs.object([("a", "number?")]).unwrap();
    assert_eq!(object.assert(&input).unwrap(), out);
    let empty = Value::object(Vec::<(String, Value)>::new());
    assert_eq!(partial.assert(&empty).unwrap(), empty);
}

#[test]
fn test_failures_aggregate_in_discovery_order() {
    let structs = Structs::new();
    let st = structs.object([("a", "string"), ("b", "number")]).unwrap();
    let input = Value::object([("b", Value::from("two")), ("a", Value::from(1))]);
    let err = st.validate(&input).unwrap_err();
    let paths: Vec<Vec<PathSegment>> = err.errors().iter().map(|f| f.path.clone()).collect();
    assert_eq!(paths, vec![keys(&["b"]), keys(&["a"])]);
    assert!(err.errors().iter().all(|f| f.data == input));
}

#[test]
fn test_nested_paths_join_with_dots() {
    let structs = Structs::new();
    let limits = structs.list(["number"]).unwrap();
    let st = structs.object([("limits", Description::from(limits))]).unwrap();
    let input = Value::object([("limits", Value::array([Value::from(1), Value::from("low")]))]);
    let err = st.validate(&input).unwrap_err();
    assert_eq!(err.path(), &[PathSegment::from("limits"), PathSegment::from(1)]);
    assert_eq!(err.data(), &input);
    assert_eq!(
        err.to_string(),
        "Expected a value of type `number` for `limits.1` but received `\"low\"`."
    );
}

// -- Lists, tuples, dicts -------------------------------------------------------

#[test]
fn test_list_tags_failing_index() {
    let structs = Structs::new();
    let st = structs.list(["number"]).unwrap();
    let input = Value::array([Value::from(1), Value::from("x"), Value::from(3)]);
    let err = st.validate(&input).unwrap_err();
    assert_eq!(err.path(), &[PathSegment::Index(1)]);
    assert_eq!(err.expected(), "number");
    assert_eq!(err.value(), &Value::from("x"));

    let err = st
        .validate(&Value::array([Value::from("x"), Value::from("y")]))
        .unwrap_err();
    assert_eq!(err.errors().len(), 2);

    let err = st.validate(&Value::from(1)).unwrap_err();
    assert_eq!(err.expected(), "[number]");
}

#[test]
fn test_tuple_checks_every_position() {
    let structs = Structs::new();
    let st = structs.tuple(["string", "number"]).unwrap();
    assert_eq!(st.kind(), Kind::Tuple);
    assert!(st.test(&Value::array([Value::from("a"), Value::from(1)])));

    let err = st
        .validate(&Value::array([Value::from("a"), Value::from(1), Value::from(true)]))
        .unwrap_err();
    assert_eq!(err.path(), &[PathSegment::Index(2)]);
    assert_eq!(err.expected(), "undefined");
    assert_eq!(err.value(), &Value::from(true));

    let err = st.validate(&Value::array(["a"])).unwrap_err();
    assert_eq!(err.path(), &[PathSegment::Index(1)]);
    assert_eq!(err.value(), &Value::Undefined);
    assert_eq!(err.expected(), "number");
}

#[test]
fn test_dict_validates_keys_and_values() {
    let structs = Structs::new();
    let st = structs.dict(["string", "number"]).unwrap();
    assert_eq!(st.type_description(), "dict<string,number>");
    let err = st
        .validate(&Value::object([("x", Value::from(1)), ("y", Value::from("z"))]))
        .unwrap_err();
    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.path(), keys(&["y"]).as_slice());
    assert_eq!(err.expected(), "number");
}

#[test]
fn test_dict_key_failure_uses_original_key() {
    let structs = Structs::with_types(TypeRegistry::empty().with(
        "short",
        |value: &Value, _: Option<&Value>| {
            Verdict::from(value.as_str().is_some_and(|s| s.len() <= 3))
        },
    ));
    let st = structs.dict(["short", "any"]).unwrap();
    let err = st.validate(&Value::object([("toolong", 1)])).unwrap_err();
    assert_eq!(err.path(), keys(&["toolong"]).as_slice());
    assert_eq!(err.expected(), "short");
}

// -- Enums, literals, instances ----------------------------------------------------

#[test]
fn test_enum_membership() {
    let structs = Structs::new();
    let st = structs.enumeration([1, 2, 3]);
    assert_eq!(st.assert(&Value::from(2)).unwrap(), Value::from(2));
    let err = st.validate(&Value::from(4)).unwrap_err();
    assert_eq!(err.expected(), "1 | 2 | 3");

    let names = structs.enumeration(["on", "off"]);
    assert_eq!(names.type_description(), r#""on" | "off""#);
}

#[test]
fn test_enum_matches_nan() {
    let structs = Structs::new();
    let st = structs.enumeration([f64::NAN]);
    assert!(st.test(&Value::from(f64::NAN)));
    assert_eq!(st.type_description(), "null");
}

#[test]
fn test_enums_is_a_list_of_enum() {
    let structs = Structs::new();
    let st = structs.enums(["a", "b"]).unwrap();
    assert_eq!(st.kind(), Kind::List);
    assert_eq!(st.type_description(), r#"["a" | "b"]"#);
    assert!(st.test(&Value::array(["a", "b", "a"])));
    let err = st.validate(&Value::array(["a", "c"])).unwrap_err();
    assert_eq!(err.path(), &[PathSegment::Index(1)]);
}

#[test]
fn test_literal_uses_strict_equality() {
    let structs = Structs::new();
    let st = structs.literal("on");
    assert_eq!(st.type_description(), r#"literal: "on""#);
    assert!(st.test(&Value::from("on")));
    assert!(!st.test(&Value::from("off")));
    let object = structs.literal(Value::object([("a", 1)]));
    assert!(!object.test(&Value::object([("a", 1)])));
}

#[derive(Debug)]
struct Point {
    x: i32,
}

#[test]
fn test_instance_checks_payload_type() {
    let structs = Structs::new();
    let st = structs.instance::<Point>();
    assert_eq!(st.type_description(), "instance<Point>");
    let point = Value::from(HostObject::new(Point { x: 1 }));
    assert!(st.test(&point));
    assert_eq!(point.as_host().and_then(|h| h.downcast_ref::<Point>()).map(|p| p.x), Some(1));
    assert!(!st.test(&Value::from(HostObject::new(5u8))));
    assert!(!st.test(&Value::object([("x", 1)])));
}

// -- Unions, intersections, optional -------------------------------------------

#[test]
fn test_union_first_match_wins() {
    let structs = Structs::new();
    let st = structs.union(["number", "string"]).unwrap();
    assert_eq!(st.assert(&Value::from(5)).unwrap(), Value::from(5));
    assert_eq!(st.assert(&Value::from("x")).unwrap(), Value::from("x"));

    let err = st.validate(&Value::from(true)).unwrap_err();
    assert_eq!(err.expected(), "number | string");
    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.errors()[0].expected, err.expected());
    assert_eq!(err.errors()[0].value, Value::from(true));
    assert_eq!(
        err.to_string(),
        "Expected a value of type `number | string` but received `true`."
    );
}

#[test]
fn test_union_order_decides_coercion() {
    let structs = Structs::new();
    let defaulted = structs.with_defaults(Defaults::value("fallback")).scalar("string").unwrap();
    let first = structs
        .union([Description::from("undefined"), Description::from(&defaulted)])
        .unwrap();
    let second = structs
        .union([Description::from(&defaulted), Description::from("undefined")])
        .unwrap();
    assert_eq!(first.assert(&Value::Undefined).unwrap(), Value::Undefined);
    assert_eq!(second.assert(&Value::Undefined).unwrap(), Value::from("fallback"));
}

#[test]
fn test_intersection_threads_output() {
    let structs = Structs::new();
    let with_count = structs
        .with_defaults(Defaults::value(Value::object([("count", 1)])))
        .interface([("count", "number")])
        .unwrap();
    let has_count = structs.function(|value: &Value, _: Option<&Value>| {
        Verdict::from(value.get("count").is_some())
    });
    let st = structs
        .intersection([Description::from(&with_count), Description::from(&has_count)])
        .unwrap();
    assert_eq!(st.type_description(), "{count} & <function>");
    assert_eq!(
        st.assert(&Value::object::<&str, Value>([])).unwrap(),
        Value::object([("count", 1)])
    );
}

#[test]
fn test_intersection_fails_fast_with_combined_type() {
    let structs = Structs::new();
    let st = structs.compile("string & number").unwrap();
    let err = st.validate(&Value::from("x")).unwrap_err();
    assert_eq!(err.expected(), "string & number");
    assert_eq!(err.errors()[0].expected, "string & number");
    let err = st.validate(&Value::from(1)).unwrap_err();
    assert_eq!(err.errors()[0].expected, "string & number");
}

#[test]
fn test_optional_shorthand() {
    let structs = Structs::new();
    let st = structs.compile("number?").unwrap();
    assert_eq!(st.assert(&Value::Undefined).unwrap(), Value::Undefined);
    assert!(st.assert(&Value::from("x")).is_err());
    let explicit = structs.optional("number").unwrap();
    assert_eq!(explicit.type_description(), st.type_description());
}

// -- Functions and scalars ------------------------------------------------------------

#[test]
fn test_function_verdicts() {
    let structs = Structs::new();
    let reasoned = structs.function(|value: &Value, _: Option<&Value>| match value.as_f64() {
        Some(n) if n >= 0.0 => Verdict::Pass,
        _ => Verdict::from("must be non-negative"),
    });
    let err = reasoned.validate(&Value::from(-1)).unwrap_err();
    assert_eq!(err.reason(), Some("must be non-negative"));
    assert_eq!(err.expected(), "<function>");

    let detailed = structs.function(|value: &Value, _: Option<&Value>| {
        if value.get("id").is_some() {
            Verdict::Pass
        } else {
            ErrorPatch {
                expected: Some("identified".to_string()),
                ..ErrorPatch::reason("missing id").at([PathSegment::from("id")])
            }
            .into()
        }
    });
    let err = detailed.validate(&Value::object([("name", "x")])).unwrap_err();
    assert_eq!(err.path(), keys(&["id"]).as_slice());
    assert_eq!(err.reason(), Some("missing id"));
    assert_eq!(err.expected(), "identified");
}

#[test]
fn test_function_receives_parent() {
    let structs = Structs::new();
    let at_least_min = structs.function(|value: &Value, parent: Option<&Value>| {
        let min = parent.and_then(|p| p.get("min")).and_then(Value::as_f64);
        match (value.as_f64(), min) {
            (Some(v), Some(min)) => Verdict::from(v >= min),
            _ => Verdict::Fail,
        }
    });
    let st = structs
        .object([
            ("min", Description::from("number")),
            ("max", Description::from(at_least_min)),
        ])
        .unwrap();
    assert!(st.test(&Value::object([("min", 1), ("max", 5)])));
    let err = st.validate(&Value::object([("min", 5), ("max", 1)])).unwrap_err();
    assert_eq!(err.path(), keys(&["max"]).as_slice());
}

#[test]
fn test_scalar_keeps_its_name_over_patch_type() {
    let structs = Structs::with_types(TypeRegistry::empty().with(
        "entity-id",
        |value: &Value, _: Option<&Value>| match value.as_str() {
            Some(s) if s.contains('.') => Verdict::Pass,
            _ => ErrorPatch {
                expected: Some("something else".to_string()),
                ..ErrorPatch::reason("entity id should be in the format 'domain.entity'")
            }
            .into(),
        },
    ));
    let st = structs.scalar("entity-id").unwrap();
    let err = st.validate(&Value::from("kitchen")).unwrap_err();
    assert_eq!(err.expected(), "entity-id");
    assert_eq!(
        err.reason(),
        Some("entity id should be in the format 'domain.entity'")
    );
}

#[test]
fn test_unknown_scalar_is_a_schema_error() {
    let structs = Structs::new();
    let err = structs.compile([("a", "strnig")]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid type: strnig");
}

#[test]
fn test_builtin_any_and_date() {
    let structs = Structs::new();
    let any = structs.any().unwrap();
    assert!(any.test(&Value::Null));
    assert!(!any.test(&Value::Undefined));
    let date = structs.compile("date").unwrap();
    assert!(!date.test(&Value::invalid_date()));
    assert!(date.test(&Value::date(chrono::Utc::now())));
}

// -- Lazy and dynamic ---------------------------------------------------------------

/// Helper: `{value: number, children: [tree]}`.
fn tree(structs: &Structs) -> Struct {
    let factory = structs.clone();
    let child = structs.lazy(move || tree(&factory));
    structs
        .object([
            ("value", Description::from("number")),
            ("children", Description::items([Description::from(child)])),
        ])
        .unwrap()
}

#[test]
fn test_lazy_supports_recursion() {
    let structs = Structs::new();
    let st = tree(&structs);
    let leaf = |n: i32| {
        Value::object([
            ("value", Value::from(n)),
            ("children", Value::array(Vec::<Value>::new())),
        ])
    };
    let input = Value::object([
        ("value", Value::from(1)),
        ("children", Value::array([leaf(2), leaf(3)])),
    ]);
    assert_eq!(st.assert(&input).unwrap(), input);

    let bad = Value::object([
        ("value", Value::from(1)),
        (
            "children",
            Value::array([Value::object([
                ("value", Value::from("x")),
                ("children", Value::array(Vec::<Value>::new())),
            ])]),
        ),
    ]);
    let err = st.validate(&bad).unwrap_err();
    assert_eq!(
        err.path(),
        &[PathSegment::from("children"), PathSegment::from(0), PathSegment::from("value")]
    );
}

#[test]
fn test_lazy_adopts_target_kind_once_resolved() {
    let structs = Structs::new();
    let factory = structs.clone();
    let st = structs.lazy(move || factory.compile("string").unwrap());
    assert_eq!(st.kind(), Kind::Lazy);
    assert_eq!(st.type_description(), "lazy...");
    assert!(st.test(&Value::from("x")));
    assert_eq!(st.kind(), Kind::Scalar);
    assert_eq!(st.type_description(), "string");
}

#[test]
fn test_dynamic_selects_per_value() {
    let structs = Structs::new();
    let light = structs.object([("type", "string"), ("brightness", "number")]).unwrap();
    let switch = structs.object([("type", "string"), ("on", "boolean")]).unwrap();
    let st = structs.dynamic(move |value: &Value, _: Option<&Value>| {
        if value.get("type").and_then(Value::as_str) == Some("light") {
            light.clone()
        } else {
            switch.clone()
        }
    });
    assert_eq!(st.type_description(), "dynamic...");
    assert!(st.test(&Value::object([
        ("type", Value::from("light")),
        ("brightness", Value::from(3)),
    ])));
    assert!(st.test(&Value::object([("type", Value::from("switch")), ("on", Value::from(true))])));
    assert!(!st.test(&Value::object([("type", Value::from("light")), ("on", Value::from(true))])));
}

// -- Defaults ----------------------------------------------------------------------------

#[test]
fn test_field_default_injected_and_explicit_wins() {
    let structs = Structs::new();
    let st = structs
        .with_defaults(Defaults::fields([("a", Defaults::compute(|_| Value::from(5)))]))
        .object([("a", "number")])
        .unwrap();
    let empty = Value::object::<&str, Value>([]);
    assert_eq!(st.assert(&empty).unwrap(), Value::object([("a", 5)]));
    assert_eq!(
        st.assert(&Value::object([("a", 10)])).unwrap(),
        Value::object([("a", 10)])
    );
}

#[test]
fn test_computed_field_default_sees_parent() {
    let structs = Structs::new();
    let st = structs
        .with_defaults(Defaults::fields([(
            "max",
            Defaults::compute(|parent| {
                let min = parent.and_then(|p| p.get("min")).and_then(Value::as_f64);
                Value::from(min.unwrap_or(0.0) + 100.0)
            }),
        )]))
        .object([("min", "number"), ("max", "number")])
        .unwrap();
    let out = st.assert(&Value::object([("min", 20)])).unwrap();
    assert_eq!(out, Value::object([("min", 20), ("max", 120)]));
}

#[test]
fn test_whole_value_default_for_undefined_input() {
    let structs = Structs::new();
    let st = structs
        .with_defaults(Defaults::value(Value::object([("a", "x")])))
        .object([("a", "string")])
        .unwrap();
    assert_eq!(st.assert(&Value::Undefined).unwrap(), Value::object([("a", "x")]));
}

#[test]
fn test_interface_and_dict_merge_default_under_input() {
    let structs = Structs::new();
    let defaults = Defaults::value(Value::object([("min", 0), ("max", 100)]));
    let st = structs
        .with_defaults(defaults.clone())
        .interface([("min", "number"), ("max", "number")])
        .unwrap();
    let out = st
        .assert(&Value::object([("max", Value::from(50)), ("unit", Value::from("%"))]))
        .unwrap();
    assert_eq!(
        out,
        Value::object([
            ("min", Value::from(0)),
            ("max", Value::from(50)),
            ("unit", Value::from("%")),
        ])
    );

    let dict = structs.with_defaults(defaults).dict(["string", "number"]).unwrap();
    assert_eq!(
        dict.assert(&Value::object([("step", 5)])).unwrap(),
        Value::object([("min", 0), ("max", 100), ("step", 5)])
    );
}

#[test]
fn test_defaults_do_not_mutate_input() {
    let structs = Structs::new();
    let st = structs
        .with_defaults(Defaults::fields([("a", Defaults::value(1))]))
        .object([("a", "number")])
        .unwrap();
    let input = Value::object::<&str, Value>([]);
    let out = st.assert(&input).unwrap();
    assert_eq!(input, Value::object::<&str, Value>([]));
    assert_eq!(out, Value::object([("a", 1)]));
}
