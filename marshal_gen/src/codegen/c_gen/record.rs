use crate::layout::CommandRecord;
use std::fmt::Write;

/// The record type for one deferred call: the queue header, the fixed
/// fields by value, and one comment per trailing variable-length range.
/// The variable ranges have no struct members; they live in the bytes
/// directly after the struct.
pub fn emit_command_struct(record: &CommandRecord) -> String {
    let mut out = String::new();
    writeln!(out, "struct {}", record.struct_name).unwrap();
    writeln!(out, "{{").unwrap();
    writeln!(out, "   struct cq_cmd_base cmd_base;").unwrap();
    for field in &record.fixed {
        if field.is_array() {
            writeln!(
                out,
                "   {} {}[{}];",
                field.base_type, field.name, field.element_count
            )
            .unwrap();
        } else {
            writeln!(out, "   {} {};", field.decl_type, field.name).unwrap();
        }
    }
    for field in &record.variable {
        if field.scale != 1 {
            writeln!(
                out,
                "   /* Next {} bytes are {} {}[{}][{}] */",
                field.size_expr, field.base_type, field.name, field.counter, field.scale
            )
            .unwrap();
        } else {
            writeln!(
                out,
                "   /* Next {} bytes are {} {}[{}] */",
                field.size_expr, field.base_type, field.name, field.counter
            )
            .unwrap();
        }
    }
    writeln!(out, "}};").unwrap();
    out
}
