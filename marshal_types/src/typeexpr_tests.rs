use super::*;
use crate::table::TypeTable;

fn parse_ok(text: &str) -> TypeExpression {
    let table = TypeTable::with_builtins();
    TypeExpression::parse(text, &table, None)
        .unwrap_or_else(|e| panic!("\"{}\" should parse: {}", text, e))
}

fn parse_err(text: &str) -> TypeParseError {
    let table = TypeTable::with_builtins();
    TypeExpression::parse(text, &table, None)
        .err()
        .unwrap_or_else(|| panic!("\"{}\" should fail to parse", text))
}

#[test]
fn test_scalar_int() {
    let expr = parse_ok("int");

    assert!(!expr.is_pointer());
    assert_eq!(expr.base_name(), Some("int"));
    assert_eq!(expr.element_size(), 4);
    assert_eq!(expr.stack_size(), 4);
    assert_eq!(expr.format_string(), "%d");
    assert_eq!(expr.to_c_string(), "signed int");
    assert_eq!(expr.original(), "int");
}

#[test]
fn test_small_integers_promote_to_one_stack_slot() {
    for text in ["char", "short", "unsigned char", "unsigned short"] {
        let expr = parse_ok(text);
        assert_eq!(expr.stack_size(), 4, "stack size of \"{}\"", text);
    }

    assert_eq!(parse_ok("char").element_size(), 1);
    assert_eq!(parse_ok("short").element_size(), 2);
}

#[test]
fn test_floating_point_stack_sizes() {
    let float = parse_ok("float");
    assert_eq!(float.element_size(), 4);
    assert_eq!(float.stack_size(), 4);
    assert_eq!(float.format_string(), "%f");

    /* Non-integer scalars keep their native size on the stack. */
    let double = parse_ok("double");
    assert_eq!(double.element_size(), 8);
    assert_eq!(double.stack_size(), 8);
    assert_eq!(double.format_string(), "%f");
}

#[test]
fn test_pointer_to_const() {
    let expr = parse_ok("const int *");

    assert!(expr.is_pointer());
    assert_eq!(expr.stack_size(), 4);
    assert_eq!(expr.format_string(), "%p");
    /* The const binds to the base type, not the pointer level. */
    assert!(expr.base_node().constant);
    assert_eq!(expr.to_c_string(), "const signed int *");
}

#[test]
fn test_const_pointer() {
    let expr = parse_ok("int * const");

    assert!(expr.is_pointer());
    assert!(!expr.base_node().constant);
    assert_eq!(expr.to_c_string(), "signed int * const");
}

#[test]
fn test_bare_unsigned_before_pointer_means_unsigned_int() {
    let expr = parse_ok("unsigned * const *");

    assert!(expr.is_pointer());
    assert_eq!(expr.base_name(), Some("int"));
    assert!(!expr.base_node().signed);
    assert_eq!(expr.to_c_string(), "unsigned int * const *");
}

#[test]
fn test_sign_qualifiers_on_base_types() {
    assert_eq!(parse_ok("unsigned int").to_c_string(), "unsigned int");
    assert_eq!(parse_ok("signed char").to_c_string(), "signed char");
    assert_eq!(parse_ok("unsigned long").to_c_string(), "unsigned long");
    assert!(!parse_ok("unsigned short").base_node().signed);
}

#[test]
fn test_original_text_is_preserved_verbatim() {
    let expr = parse_ok(" const  int  * ");
    assert_eq!(expr.original(), " const  int  * ");
    assert_eq!(expr.to_c_string(), "const signed int *");
}

#[test]
fn test_explicit_element_count() {
    let mut expr = parse_ok("int");
    expr.set_elements(4);

    assert_eq!(expr.element_count(), 4);
    assert_eq!(expr.element_size(), 16);
    /* Arrays still occupy a single stack slot. */
    assert_eq!(expr.stack_size(), 4);
}

#[test]
fn test_element_size_saturates_instead_of_wrapping() {
    let mut expr = parse_ok("const int *");
    expr.set_elements(u32::MAX);

    assert_eq!(expr.element_size(), u32::MAX);
}

#[test]
fn test_unknown_base_type() {
    let err = parse_err("foo");
    assert_eq!(err, TypeParseError::UnknownBaseType("foo".to_string()));
    assert!(err.to_string().contains("\"foo\""));
}

#[test]
fn test_extra_table_resolves_description_defined_types() {
    let table = TypeTable::with_builtins();
    let mut extra = TypeTable::new();
    extra.add(TypeExpression::from_base_node(TypeNode::base(
        "handle", 4, true,
    )));

    let expr = TypeExpression::parse("handle *", &table, Some(&extra))
        .unwrap_or_else(|e| panic!("extra lookup should succeed: {}", e));
    assert!(expr.is_pointer());
    assert_eq!(expr.base_name(), Some("handle"));

    /* Without the extra table the same name is unknown. */
    assert_eq!(
        TypeExpression::parse("handle *", &table, None),
        Err(TypeParseError::UnknownBaseType("handle".to_string()))
    );
}

#[test]
fn test_garbage_after_base_type() {
    assert_eq!(
        parse_err("int int"),
        TypeParseError::TrailingToken("int int".to_string())
    );
    assert_eq!(
        parse_err("int float *"),
        TypeParseError::TrailingToken("int float *".to_string())
    );
}

#[test]
fn test_dangling_pointer() {
    assert_eq!(
        parse_err("* int"),
        TypeParseError::DanglingPointer("* int".to_string())
    );
    assert_eq!(
        parse_err("*"),
        TypeParseError::DanglingPointer("*".to_string())
    );
    /* A lone "signed" does not resolve to a base type the way "unsigned"
     * does, so the pointer has nothing to point at. */
    assert_eq!(
        parse_err("signed *"),
        TypeParseError::DanglingPointer("signed *".to_string())
    );
}

#[test]
fn test_sign_applied_to_pointer() {
    assert_eq!(
        parse_err("int signed *"),
        TypeParseError::SignOnPointer("int signed *".to_string())
    );
}

#[test]
fn test_conflicting_sign_qualifiers() {
    assert_eq!(
        parse_err("signed unsigned int"),
        TypeParseError::ConflictingSign("signed unsigned int".to_string())
    );
    assert_eq!(
        parse_err("unsigned signed int"),
        TypeParseError::ConflictingSign("unsigned signed int".to_string())
    );
}

#[test]
fn test_dangling_qualifiers() {
    assert_eq!(
        parse_err("const"),
        TypeParseError::DanglingQualifier {
            qualifier: "const",
            text: "const".to_string(),
        }
    );
    assert_eq!(
        parse_err("int const"),
        TypeParseError::DanglingQualifier {
            qualifier: "const",
            text: "int const".to_string(),
        }
    );
    assert_eq!(
        parse_err("signed"),
        TypeParseError::DanglingQualifier {
            qualifier: "signed",
            text: "signed".to_string(),
        }
    );
    /* Bare "unsigned" only resolves to "unsigned int" directly before a
     * pointer token; on its own it dangles. */
    assert_eq!(
        parse_err("unsigned"),
        TypeParseError::DanglingQualifier {
            qualifier: "unsigned",
            text: "unsigned".to_string(),
        }
    );
}

#[test]
fn test_empty_declaration() {
    assert_eq!(parse_err(""), TypeParseError::Empty);
    assert_eq!(parse_err("   "), TypeParseError::Empty);
}

#[test]
fn test_builtin_table_contents() {
    let table = TypeTable::with_builtins();

    assert_eq!(table.len(), 7);
    for name in ["char", "short", "int", "long", "float", "double", "enum"] {
        assert!(table.find(name).is_some(), "missing builtin \"{}\"", name);
    }
    assert!(table.find("void").is_none());

    /* names() walks the seeding order. */
    let names: Vec<&str> = table.names().collect();
    assert_eq!(
        names,
        ["char", "short", "int", "long", "float", "double", "enum"]
    );

    let long = table.find("long").unwrap();
    assert_eq!(long.element_size(), 4);
}

#[test]
fn test_table_add_replaces_existing_entry() {
    let mut table = TypeTable::new();
    table.add(TypeExpression::from_base_node(TypeNode::base(
        "handle", 4, true,
    )));
    table.add(TypeExpression::from_base_node(TypeNode::base(
        "handle", 8, false,
    )));

    assert_eq!(table.len(), 1);
    assert_eq!(table.find("handle").unwrap().element_size(), 8);
}
