use super::helpers::call_statement;
use marshal_types::OperationSignature;
use std::fmt::Write;

/// The immediate stub: drain every queued command, then call the real
/// operation on the caller's thread and hand its result straight back.
pub fn emit_sync_fn(op: &OperationSignature) -> String {
    let mut out = String::new();
    writeln!(out, "/* {}: marshalled synchronously */", op.name).unwrap();
    writeln!(
        out,
        "static {} CQ_API_ENTRY",
        op.return_type.c_string()
    )
    .unwrap();
    writeln!(out, "cq_marshal_{}({})", op.name, op.parameter_string()).unwrap();
    writeln!(out, "{{").unwrap();
    writeln!(out, "   CQ_GET_CONTEXT(ctx);").unwrap();
    writeln!(out, "   cq_synchronize(ctx);").unwrap();
    writeln!(out, "   SYNC_EXECUTE_HOOK({});", op.name).unwrap();
    writeln!(out, "   {}", call_statement(op)).unwrap();
    writeln!(out, "}}").unwrap();
    out
}
