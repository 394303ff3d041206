use super::helpers::table_member;
use crate::plan::MarshalPlan;
use std::fmt::Write;

/// The generated header: record header type, command tags, entry-point
/// slots, the dispatch table type, per-operation call and install
/// macros, and the contract the embedding runtime must provide.
pub fn emit_header(plans: &[MarshalPlan], max_cmd_size: u32) -> String {
    let mut out = String::new();
    writeln!(out, "#ifndef MARSHAL_GENERATED_H").unwrap();
    writeln!(out, "#define MARSHAL_GENERATED_H").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "#include <stddef.h>").unwrap();
    writeln!(out, "#include <stdint.h>").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/* Calling convention of the generated entry points. Empty unless the").unwrap();
    writeln!(out, " * embedding runtime overrides it. */").unwrap();
    writeln!(out, "#ifndef CQ_API_ENTRY").unwrap();
    writeln!(out, "#define CQ_API_ENTRY").unwrap();
    writeln!(out, "#endif").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/* Largest record, in bytes, allowed into the queue. Calls whose record").unwrap();
    writeln!(out, " * would be bigger run synchronously instead. */").unwrap();
    writeln!(out, "#define CQ_MAX_CMD_SIZE {}", max_cmd_size).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/* Every record starts with this header. cmd_size is the total record").unwrap();
    writeln!(out, " * size in bytes, this header included. */").unwrap();
    writeln!(out, "struct cq_cmd_base {{").unwrap();
    writeln!(out, "   uint32_t cmd_id;").unwrap();
    writeln!(out, "   uint32_t cmd_size;").unwrap();
    writeln!(out, "}};").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "/* Command tags, one per deferred operation. */").unwrap();
    writeln!(out, "enum cq_dispatch_cmd_id {{").unwrap();
    for plan in plans.iter().filter(|p| p.flavor.is_async()) {
        writeln!(out, "   CQ_DISPATCH_CMD_{},", plan.name()).unwrap();
    }
    writeln!(out, "   CQ_DISPATCH_CMD_COUNT,").unwrap();
    writeln!(out, "}};").unwrap();
    writeln!(out).unwrap();

    let generated: Vec<&MarshalPlan> = plans.iter().filter(|p| p.flavor.is_generated()).collect();

    writeln!(out, "/* Entry-point slots, in description order. Slot positions are stable").unwrap();
    writeln!(out, " * from one generator run to the next. */").unwrap();
    writeln!(out, "enum cq_entry_id {{").unwrap();
    for plan in &generated {
        writeln!(out, "   CQ_ENTRY_{},", plan.name()).unwrap();
    }
    writeln!(out, "   CQ_ENTRY_COUNT,").unwrap();
    writeln!(out, "}};").unwrap();
    writeln!(out).unwrap();

    if generated.is_empty() {
        writeln!(out, "struct cq_dispatch_table;").unwrap();
    } else {
        writeln!(out, "/* One function pointer per generated operation. The producer-facing").unwrap();
        writeln!(out, " * instance holds the marshalling stubs; the consumer-facing instance").unwrap();
        writeln!(out, " * holds the real implementations. */").unwrap();
        writeln!(out, "struct cq_dispatch_table {{").unwrap();
        for plan in &generated {
            writeln!(out, "   {}", table_member(&plan.signature)).unwrap();
        }
        writeln!(out, "}};").unwrap();
    }
    writeln!(out).unwrap();

    for plan in &generated {
        writeln!(
            out,
            "#define CQ_CALL_{0}(table, parameters) (*(table)->{0}) parameters",
            plan.name()
        )
        .unwrap();
        writeln!(
            out,
            "#define CQ_SET_{0}(table, fn) ((table)->{0} = (fn))",
            plan.name()
        )
        .unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "/* Provided by the embedding runtime. */").unwrap();
    writeln!(out, "struct cq_context;").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "struct cq_context *cq_current_context(void);").unwrap();
    writeln!(out, "struct cq_dispatch_table *cq_target_dispatch(struct cq_context *ctx);").unwrap();
    writeln!(out, "struct cq_dispatch_table *cq_alloc_dispatch_table(int slot_count);").unwrap();
    writeln!(out, "void *cq_allocate_command(struct cq_context *ctx, uint32_t cmd_id, size_t cmd_size);").unwrap();
    writeln!(out, "void cq_synchronize(struct cq_context *ctx);").unwrap();
    writeln!(out, "void cq_post_marshal_hook(struct cq_context *ctx);").unwrap();
    writeln!(out, "void cq_fatal(const char *message);").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "#ifndef CQ_GET_CONTEXT").unwrap();
    writeln!(out, "#define CQ_GET_CONTEXT(ctx) struct cq_context *ctx = cq_current_context()").unwrap();
    writeln!(out, "#endif").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "/* Generated in marshal_generated.c. */").unwrap();
    writeln!(out, "size_t cq_dispatch_command(struct cq_context *ctx, const void *cmd);").unwrap();
    writeln!(out, "struct cq_dispatch_table *cq_create_marshal_table(const struct cq_context *ctx);").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "#endif /* MARSHAL_GENERATED_H */").unwrap();
    out
}
