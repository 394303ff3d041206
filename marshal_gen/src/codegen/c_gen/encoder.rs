use super::helpers::call_statement;
use crate::layout::CommandRecord;
use marshal_types::OperationSignature;
use std::fmt::Write;

/* Allocate the record, copy every field, and run the post-encode hook.
 * Emitted at two depths: directly in the stub body when the record size
 * is a generation-time constant, or inside the size guard otherwise. */
fn emit_enqueue(op: &OperationSignature, record: &CommandRecord, pad: &str) -> String {
    let mut out = String::new();
    writeln!(out, "{}struct {} *cmd =", pad, record.struct_name).unwrap();
    writeln!(
        out,
        "{}   cq_allocate_command(ctx, CQ_DISPATCH_CMD_{}, cmd_size);",
        pad, op.name
    )
    .unwrap();
    for field in &record.fixed {
        if field.is_array() {
            writeln!(
                out,
                "{}memcpy(cmd->{1}, {1}, {2});",
                pad, field.name, field.byte_size
            )
            .unwrap();
        } else {
            writeln!(out, "{}cmd->{1} = {1};", pad, field.name).unwrap();
        }
    }
    if record.has_variable_data() {
        writeln!(out, "{}char *variable_data = (char *) (cmd + 1);", pad).unwrap();
        for field in &record.variable {
            writeln!(
                out,
                "{}memcpy(variable_data, {}, {});",
                pad, field.name, field.size_expr
            )
            .unwrap();
            writeln!(out, "{}variable_data += {};", pad, field.size_expr).unwrap();
        }
    }
    if record.is_empty() {
        writeln!(out, "{}(void) cmd;", pad).unwrap();
        writeln!(out).unwrap();
    }
    writeln!(out, "{}cq_post_marshal_hook(ctx);", pad).unwrap();
    out
}

/// The producer-side capture routine for one Async operation.
///
/// The record size is evaluated against the live arguments. When any
/// field is variable-length the enqueue is wrapped in a size guard:
/// over the limit, nothing is encoded at all and the call drains the
/// queue and executes synchronously instead.
pub fn emit_marshal_fn(op: &OperationSignature, record: &CommandRecord) -> String {
    let mut out = String::new();
    writeln!(out, "static void CQ_API_ENTRY").unwrap();
    writeln!(out, "cq_marshal_{}({})", op.name, op.parameter_string()).unwrap();
    writeln!(out, "{{").unwrap();
    writeln!(out, "   CQ_GET_CONTEXT(ctx);").unwrap();
    writeln!(out, "   ASYNC_MARSHAL_HOOK({});", op.name).unwrap();

    let mut size_terms = vec![format!("sizeof(struct {})", record.struct_name)];
    for field in &record.variable {
        size_terms.push(field.size_expr.clone());
    }
    writeln!(out, "   size_t cmd_size = {};", size_terms.join(" + ")).unwrap();

    if record.has_variable_data() {
        writeln!(out, "   if (cmd_size <= CQ_MAX_CMD_SIZE) {{").unwrap();
        out.push_str(&emit_enqueue(op, record, "      "));
        writeln!(out, "   }} else {{").unwrap();
        writeln!(out, "      cq_synchronize(ctx);").unwrap();
        writeln!(out, "      {}", call_statement(op)).unwrap();
        writeln!(out, "   }}").unwrap();
    } else {
        out.push_str(&emit_enqueue(op, record, "   "));
    }
    writeln!(out, "}}").unwrap();
    out
}
