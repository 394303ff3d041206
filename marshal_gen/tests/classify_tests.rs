/* Classification Tests
 *
 * These tests exercise the ordered rule list directly: each rule in
 * isolation, the tie-break order between rules, and the description
 * override that bypasses them all.
 */

use marshal_gen::classify::{
    classify, classify_with_rule, MARSHAL_RULES, RULE_DEFAULT_ASYNC, RULE_OVERRIDE,
    SYNC_ONLY_OPERATIONS,
};
use marshal_types::{
    CountSpec, Direction, MarshalFlavor, OperationSignature, ParameterSpec, ReturnType,
    TypeExpression, TypeTable,
};

fn parse(text: &str) -> TypeExpression {
    let table = TypeTable::with_builtins();
    TypeExpression::parse(text, &table, None).expect("fixture type must parse")
}

fn param(name: &str, ty: &str) -> ParameterSpec {
    ParameterSpec {
        name: name.to_string(),
        type_expr: parse(ty),
        direction: Direction::In,
        count: CountSpec::None,
        padding: false,
    }
}

fn counted(name: &str, ty: &str, counter: &str) -> ParameterSpec {
    ParameterSpec {
        count: CountSpec::Counted {
            counter: counter.to_string(),
            scale: 1,
        },
        ..param(name, ty)
    }
}

fn op(name: &str, params: Vec<ParameterSpec>) -> OperationSignature {
    OperationSignature {
        name: name.to_string(),
        return_type: ReturnType::Void,
        parameters: params,
        marshal: None,
    }
}

fn returning(name: &str, ret: &str, params: Vec<ParameterSpec>) -> OperationSignature {
    OperationSignature {
        return_type: ReturnType::Value(parse(ret)),
        ..op(name, params)
    }
}

#[test]
fn test_all_scalar_void_operation_is_async() {
    let (flavor, rule) = classify_with_rule(&op("Foo", vec![param("x", "int")]));
    assert_eq!(flavor, MarshalFlavor::Async);
    assert_eq!(rule, RULE_DEFAULT_ASYNC);
}

#[test]
fn test_zero_parameter_void_operation_is_async() {
    assert_eq!(classify(&op("Nop", vec![])), MarshalFlavor::Async);
}

#[test]
fn test_non_void_return_is_always_sync() {
    let (flavor, rule) = classify_with_rule(&returning("Bar", "int", vec![]));
    assert_eq!(flavor, MarshalFlavor::Sync);
    assert_eq!(rule, "non-void-return");

    /* Parameters cannot rescue a value-returning operation. */
    let with_params = returning("Scale", "float", vec![param("x", "int"), param("s", "float")]);
    assert_eq!(classify(&with_params), MarshalFlavor::Sync);
}

#[test]
fn test_sync_only_names_force_sync() {
    for name in SYNC_ONLY_OPERATIONS {
        let barrier = op(name, vec![]);
        let (flavor, rule) = classify_with_rule(&barrier);
        assert_eq!(flavor, MarshalFlavor::Sync, "{} must be sync", name);
        assert_eq!(rule, "sync-only-name");
    }
}

#[test]
fn test_output_parameter_is_sync() {
    let mut result = param("result", "int *");
    result.direction = Direction::Out;
    let (flavor, rule) = classify_with_rule(&op("GetValue", vec![result]));
    assert_eq!(flavor, MarshalFlavor::Sync);
    /* The out-parameter rule must win over the uncounted-pointer rule. */
    assert_eq!(rule, "output-parameter");
}

#[test]
fn test_uncounted_pointer_is_sync() {
    let (flavor, rule) = classify_with_rule(&op("Qux", vec![param("data", "const int *")]));
    assert_eq!(flavor, MarshalFlavor::Sync);
    assert_eq!(rule, "uncounted-pointer");
}

#[test]
fn test_enum_selected_count_is_sync() {
    let mut data = param("values", "const int *");
    data.count = CountSpec::EnumSelected(vec!["pname".to_string()]);
    let query = op("SetNamed", vec![param("pname", "enum"), data]);
    let (flavor, rule) = classify_with_rule(&query);
    assert_eq!(flavor, MarshalFlavor::Sync);
    assert_eq!(rule, "enum-selected-count");
}

#[test]
fn test_counted_pointer_is_async() {
    let baz = op(
        "Baz",
        vec![counted("data", "const int *", "n"), param("n", "int")],
    );
    assert_eq!(classify(&baz), MarshalFlavor::Async);
}

#[test]
fn test_fixed_count_pointer_is_async() {
    let mut v = param("v", "const float *");
    v.count = CountSpec::Fixed(4);
    assert_eq!(classify(&op("SetVec", vec![v])), MarshalFlavor::Async);
}

#[test]
fn test_override_bypasses_every_rule() {
    /* Forced Async on a signature every rule would reject. */
    let mut forced = returning("GetError", "enum", vec![]);
    forced.marshal = Some(MarshalFlavor::Async);
    let (flavor, rule) = classify_with_rule(&forced);
    assert_eq!(flavor, MarshalFlavor::Async);
    assert_eq!(rule, RULE_OVERRIDE);

    let mut skipped = op("Internal", vec![]);
    skipped.marshal = Some(MarshalFlavor::Skip);
    assert_eq!(classify(&skipped), MarshalFlavor::Skip);

    let mut custom = op("MapBuffer", vec![]);
    custom.marshal = Some(MarshalFlavor::Custom);
    assert_eq!(classify(&custom), MarshalFlavor::Custom);
}

#[test]
fn test_rule_order_is_auditable() {
    let names: Vec<&str> = MARSHAL_RULES.iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        vec![
            "sync-only-name",
            "non-void-return",
            "output-parameter",
            "uncounted-pointer",
            "enum-selected-count",
        ]
    );
    assert!(MARSHAL_RULES.iter().all(|r| r.flavor == MarshalFlavor::Sync));
}

#[test]
fn test_first_matching_rule_reports() {
    /* Matches both the name rule and the return rule; the name rule is
     * first in the list so it must be the one reported. */
    let finish = returning("Finish", "int", vec![]);
    let (_, rule) = classify_with_rule(&finish);
    assert_eq!(rule, "sync-only-name");
}

#[test]
fn test_padding_parameters_do_not_classify() {
    let mut pad = param("pad", "const int *");
    pad.padding = true;
    /* An uncounted pointer would force Sync, but padding fillers take
     * no part in marshalling. */
    assert_eq!(
        classify(&op("Aligned", vec![param("x", "int"), pad])),
        MarshalFlavor::Async
    );
}
