/* Codegen command - generate the C marshalling unit from descriptions */

use super::common::load_and_plan;
use crate::codegen::c::{CMarshalGenerator, CMarshalGeneratorOptions};
use std::path::PathBuf;

/* Execute the codegen command */
pub fn run(
  files: Vec<PathBuf>,
  output_dir: PathBuf,
  max_cmd_size: u32,
  verbose: bool,
) -> anyhow::Result<()> {
  if verbose {
    println!("Marshal Generator - Code Generation Tool");
    println!("========================================\n");
    println!("[~] Configuration:");
    println!("  Output directory: {}", output_dir.display());
    println!("  Max command size: {} bytes", max_cmd_size);
    println!("  Input files: {}", files.len());
    for file in &files {
      println!("    - {}", file.display());
    }
    println!();
  }

  let (api, plans) = load_and_plan(&files, max_cmd_size, verbose)?;

  if verbose {
    println!("[*] Starting code generation...");
  }

  std::fs::create_dir_all(&output_dir)?;

  let options = CMarshalGeneratorOptions {
    output_dir: output_dir.to_string_lossy().to_string(),
    max_cmd_size,
    package: Some(api.package.clone()),
  };
  let generator = CMarshalGenerator::new(options);
  generator.emit_code(&plans);

  if verbose {
    println!(
      "[✓] Generated {}/{{marshal_generated.h, marshal_generated.c}}",
      output_dir.display()
    );
  }

  println!("[✓] Code generation complete!");
  Ok(())
}
