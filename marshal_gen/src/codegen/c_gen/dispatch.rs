use crate::plan::MarshalPlan;
use std::fmt::Write;

/// The consumer's decode loop body: one case per deferred operation,
/// keyed on the record header's command tag. An unrecognized tag means
/// the producer and consumer disagree about the protocol, or the queue
/// memory is corrupt; neither is recoverable, so the default case never
/// returns. The record size is handed back so the caller can step to
/// the next record.
pub fn emit_dispatch_switch(plans: &[MarshalPlan]) -> String {
    let mut out = String::new();
    writeln!(out, "size_t").unwrap();
    writeln!(
        out,
        "cq_dispatch_command(struct cq_context *ctx, const void *cmd)"
    )
    .unwrap();
    writeln!(out, "{{").unwrap();
    writeln!(out, "   const struct cq_cmd_base *cmd_base = cmd;").unwrap();
    writeln!(out, "   switch (cmd_base->cmd_id) {{").unwrap();
    for plan in plans {
        let Some(record) = &plan.record else { continue };
        writeln!(out, "   case CQ_DISPATCH_CMD_{}:", plan.name()).unwrap();
        writeln!(out, "      ASYNC_UNMARSHAL_HOOK({});", plan.name()).unwrap();
        writeln!(
            out,
            "      cq_unmarshal_{}(ctx, (const struct {} *) cmd);",
            plan.name(),
            record.struct_name
        )
        .unwrap();
        writeln!(out, "      break;").unwrap();
    }
    writeln!(out, "   default:").unwrap();
    writeln!(out, "      cq_fatal(\"Unrecognized command ID\");").unwrap();
    writeln!(out, "      break;").unwrap();
    writeln!(out, "   }}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "   return cmd_base->cmd_size;").unwrap();
    writeln!(out, "}}").unwrap();
    out
}

/// The producer-facing entry table: every generated stub installed at
/// its stable slot. Skip and Custom operations own no slot here.
pub fn emit_create_table(plans: &[MarshalPlan]) -> String {
    let mut out = String::new();
    writeln!(out, "struct cq_dispatch_table *").unwrap();
    writeln!(
        out,
        "cq_create_marshal_table(const struct cq_context *ctx)"
    )
    .unwrap();
    writeln!(out, "{{").unwrap();
    writeln!(out, "   struct cq_dispatch_table *table;").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "   table = cq_alloc_dispatch_table(CQ_ENTRY_COUNT);").unwrap();
    writeln!(out, "   if (table == NULL)").unwrap();
    writeln!(out, "      return NULL;").unwrap();
    writeln!(out).unwrap();
    for plan in plans {
        if !plan.flavor.is_generated() {
            continue;
        }
        writeln!(
            out,
            "   CQ_SET_{0}(table, cq_marshal_{0});",
            plan.name()
        )
        .unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "   return table;").unwrap();
    writeln!(out, "}}").unwrap();
    out
}
