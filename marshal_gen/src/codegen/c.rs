use crate::codegen::c_gen::{
    emit_command_struct, emit_create_table, emit_dispatch_switch, emit_header, emit_marshal_fn,
    emit_sync_fn, emit_unmarshal_fn,
};
use crate::plan::MarshalPlan;
use marshal_types::MarshalFlavor;
use std::fs;

/// Fallback record-size limit when the caller does not configure one.
pub const DEFAULT_MAX_CMD_SIZE: u32 = 65536;

/* Debug hooks around every generated path. They compile to nothing
 * unless the embedder defines CQ_DEBUG_MARSHALLING. */
const SOURCE_PRELUDE: &str = r#"#include "marshal_generated.h"

#include <string.h> /* for memcpy */

#ifdef CQ_DEBUG_MARSHALLING
#include <stdio.h>
#define SYNC_EXECUTE_HOOK(FUNC) printf("Sync: %s\n", #FUNC)
#define ASYNC_MARSHAL_HOOK(FUNC) printf("Marshal: %s\n", #FUNC)
#define ASYNC_UNMARSHAL_HOOK(FUNC) printf("Unmarshal: %s\n", #FUNC)
#else
#define SYNC_EXECUTE_HOOK(FUNC) (void) 0
#define ASYNC_MARSHAL_HOOK(FUNC) (void) 0
#define ASYNC_UNMARSHAL_HOOK(FUNC) (void) 0
#endif
"#;

pub struct CMarshalGeneratorOptions {
    pub output_dir: String,
    /// Largest record, in bytes, the generated code will enqueue.
    pub max_cmd_size: u32,
    /// Package name from the description, echoed into the banner.
    pub package: Option<String>,
}

impl Default for CMarshalGeneratorOptions {
    fn default() -> Self {
        Self {
            output_dir: "generated".to_string(),
            max_cmd_size: DEFAULT_MAX_CMD_SIZE,
            package: None,
        }
    }
}

/// Both generated texts, header first.
pub struct GeneratedMarshal {
    pub header: String,
    pub source: String,
}

pub struct CMarshalGenerator {
    options: CMarshalGeneratorOptions,
}

impl CMarshalGenerator {
    pub fn new(options: CMarshalGeneratorOptions) -> Self {
        Self { options }
    }

    /// Emits marshal_generated.h and marshal_generated.c for the given
    /// plans, writes both under the configured output directory, and
    /// returns the texts. Generation is a pure function of the plans
    /// and options; running it twice yields byte-identical output.
    pub fn emit_code(&self, plans: &[MarshalPlan]) -> GeneratedMarshal {
        let banner = self.banner();

        let mut header = banner.clone();
        header.push_str(&emit_header(plans, self.options.max_cmd_size));

        let mut source = banner;
        source.push_str(SOURCE_PRELUDE);
        source.push('\n');
        for plan in plans {
            match plan.flavor {
                MarshalFlavor::Skip | MarshalFlavor::Custom => continue,
                MarshalFlavor::Sync => source.push_str(&emit_sync_fn(&plan.signature)),
                MarshalFlavor::Async => {
                    /* Planned Async always carries a record. */
                    let Some(record) = &plan.record else { continue };
                    source.push_str(&format!(
                        "/* {}: marshalled asynchronously */\n",
                        plan.name()
                    ));
                    source.push_str(&emit_command_struct(record));
                    source.push_str(&emit_unmarshal_fn(&plan.signature, record));
                    source.push_str(&emit_marshal_fn(&plan.signature, record));
                }
            }
            source.push_str("\n\n");
        }
        source.push_str(&emit_dispatch_switch(plans));
        source.push_str("\n\n");
        source.push_str(&emit_create_table(plans));

        if let Err(e) = fs::create_dir_all(&self.options.output_dir) {
            eprintln!(
                "Warning: Failed to create output directory {}: {}",
                self.options.output_dir, e
            );
        }
        let header_path = format!("{}/marshal_generated.h", self.options.output_dir);
        if let Err(e) = fs::write(&header_path, &header) {
            eprintln!("Warning: Failed to write header to {}: {}", header_path, e);
        }
        let source_path = format!("{}/marshal_generated.c", self.options.output_dir);
        if let Err(e) = fs::write(&source_path, &source) {
            eprintln!("Warning: Failed to write source to {}: {}", source_path, e);
        }

        GeneratedMarshal { header, source }
    }

    fn banner(&self) -> String {
        match &self.options.package {
            Some(package) => format!(
                "/* Generated by marshal-gen from {}. Do not edit. */\n\n",
                package
            ),
            None => "/* Generated by marshal-gen. Do not edit. */\n\n".to_string(),
        }
    }
}
