use super::helpers::call_statement;
use crate::layout::CommandRecord;
use marshal_types::OperationSignature;
use std::fmt::Write;

/// The consumer-side replay routine. Fixed fields are read back by
/// value, variable-length fields become typed views into the bytes
/// after the struct, with the read cursor advancing in the exact order
/// the encoder's write cursor did. The reconstructed arguments are then
/// handed to the real operation.
pub fn emit_unmarshal_fn(op: &OperationSignature, record: &CommandRecord) -> String {
    let mut out = String::new();
    writeln!(out, "static inline void").unwrap();
    writeln!(
        out,
        "cq_unmarshal_{}(struct cq_context *ctx, const struct {} *cmd)",
        op.name, record.struct_name
    )
    .unwrap();
    writeln!(out, "{{").unwrap();
    for field in &record.fixed {
        if field.is_array() {
            writeln!(
                out,
                "   const {0} * {1} = cmd->{1};",
                field.base_type, field.name
            )
            .unwrap();
        } else {
            writeln!(
                out,
                "   const {0} {1} = cmd->{1};",
                field.decl_type, field.name
            )
            .unwrap();
        }
    }
    if record.has_variable_data() {
        for field in &record.variable {
            writeln!(out, "   const {} * {};", field.base_type, field.name).unwrap();
        }
        writeln!(out, "   const char *variable_data = (const char *) (cmd + 1);").unwrap();
        for field in &record.variable {
            writeln!(
                out,
                "   {} = (const {} *) variable_data;",
                field.name, field.base_type
            )
            .unwrap();
            writeln!(out, "   variable_data += {};", field.size_expr).unwrap();
        }
    }
    writeln!(out, "   {}", call_statement(op)).unwrap();
    writeln!(out, "}}").unwrap();
    out
}
