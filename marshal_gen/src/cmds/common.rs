/* Common utilities shared between analyze and codegen commands */

use crate::plan::{plan_operations, MarshalPlan};
use marshal_loader::{load_api_file, resolve_api, ApiFile, ResolvedApi};
use std::path::PathBuf;

/* Load every description file, resolve the combined API against the
 * built-in type table, and plan each operation */
pub fn load_and_plan(
  files: &[PathBuf],
  max_cmd_size: u32,
  verbose: bool,
) -> anyhow::Result<(ResolvedApi, Vec<MarshalPlan>)> {
  if verbose {
    println!("[~] Loading {} description file(s)...", files.len());
  }

  let mut parsed: Vec<ApiFile> = Vec::new();
  for file in files {
    let api_file = load_api_file(file)?;
    if verbose {
      println!(
        "  - {} ({} operations, {} extra types)",
        file.display(),
        api_file.functions().len(),
        api_file.extra_types().len()
      );
    }
    parsed.push(api_file);
  }

  let api = resolve_api(&parsed)
    .map_err(|e| anyhow::anyhow!("Type resolution failed: {}", e))?;

  if verbose {
    println!(
      "\n[~] Resolved package '{}' with {} operation(s)",
      api.package,
      api.operations.len()
    );
    if !api.extra_types.is_empty() {
      let names: Vec<&str> = api.extra_types.names().collect();
      println!("[~] Base types defined by the descriptions: {}", names.join(", "));
    }
  }

  let plans = plan_operations(&api.operations, max_cmd_size)
    .map_err(|e| anyhow::anyhow!("Layout failed: {}", e))?;

  if verbose {
    println!("[✓] Classification and layout successful");
    for plan in &plans {
      match &plan.record {
        Some(record) => println!(
          "  - {} -> {} ({}), fixed block {} bytes, {} variable field(s)",
          plan.name(),
          plan.flavor,
          plan.rule,
          record.fixed_block_size,
          record.variable.len()
        ),
        None => println!("  - {} -> {} ({})", plan.name(), plan.flavor, plan.rule),
      }
    }
    println!();
  }

  Ok((api, plans))
}
