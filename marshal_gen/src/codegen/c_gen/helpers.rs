use marshal_types::OperationSignature;

/* The call through the consumer-side table, shared by the sync stub,
 * the overflow fallback, and the decoder. Value-returning operations
 * forward the result. */
pub fn call_statement(op: &OperationSignature) -> String {
    let call = format!(
        "CQ_CALL_{0}(cq_target_dispatch(ctx), ({1}))",
        op.name,
        op.argument_string()
    );
    if op.returns_void() {
        format!("{};", call)
    } else {
        format!("return {};", call)
    }
}

/* Function-pointer member of the dispatch table for one operation. */
pub fn table_member(op: &OperationSignature) -> String {
    format!(
        "{} (CQ_API_ENTRY *{})({});",
        op.return_type.c_string(),
        op.name,
        op.parameter_string()
    )
}
