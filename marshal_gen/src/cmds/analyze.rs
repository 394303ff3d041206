/* Analyze command - classification and layout reporting */

use super::common::load_and_plan;
use crate::codegen::c_gen::emit_command_struct;
use crate::plan::MarshalPlan;
use anyhow::anyhow;
use clap::ValueEnum;
use indexmap::IndexMap;
use marshal_types::MarshalFlavor;
use serde_derive::Serialize;
use std::path::PathBuf;

/* Execute the analyze command */
pub fn run(
    files: Vec<PathBuf>,
    format: OutputFormat,
    operation: Option<String>,
    max_cmd_size: u32,
) -> anyhow::Result<()> {
    println!("Marshal Generator - Classification Analysis Tool");
    println!("================================================\n");

    let (api, plans) = load_and_plan(&files, max_cmd_size, true)?;

    match format {
        OutputFormat::Text => print_classification_report(&api.package, &plans),
        OutputFormat::Json => {
            let report = build_report(&api.package, &plans);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(name) = operation.as_deref() {
        print_record_preview(name, &plans)?;
    }

    Ok(())
}

fn print_classification_report(package: &str, plans: &[MarshalPlan]) {
    println!("\n[~] Classification Results for '{}':", package);
    println!("==================================");

    for plan in plans {
        println!("\n[*] Operation: {}", plan.name());
        println!("    Flavor: {} (rule: {})", plan.flavor, plan.rule);
        if let Some(record) = &plan.record {
            println!(
                "    Record: struct {} ({} bytes fixed)",
                record.struct_name, record.fixed_block_size
            );
            for field in &record.fixed {
                if field.is_array() {
                    println!(
                        "      {} {}[{}] ({} bytes)",
                        field.base_type, field.name, field.element_count, field.byte_size
                    );
                } else {
                    println!(
                        "      {} {} ({} bytes)",
                        field.decl_type, field.name, field.byte_size
                    );
                }
            }
            for field in &record.variable {
                println!(
                    "      {} {}[] ({} bytes, counted by {})",
                    field.base_type, field.name, field.size_expr, field.counter
                );
            }
        }
    }

    /* Totals per flavor, in first-seen order */
    let mut totals: IndexMap<MarshalFlavor, usize> = IndexMap::new();
    for plan in plans {
        *totals.entry(plan.flavor).or_insert(0) += 1;
    }
    println!("\n[~] Summary:");
    for (flavor, count) in &totals {
        println!("    {}: {}", flavor, count);
    }
}

/* Show the generated record type and call surface for one operation */
fn print_record_preview(name: &str, plans: &[MarshalPlan]) -> anyhow::Result<()> {
    let plan = plans
        .iter()
        .find(|p| p.name() == name)
        .ok_or_else(|| anyhow!("Operation '{}' not found in the descriptions", name))?;

    match &plan.record {
        Some(record) => {
            println!("\n[~] Record layout for '{}':", name);
            println!("{}", emit_command_struct(record));
        }
        None => println!(
            "\n[~] Operation '{}' is {} ({}); it has no command record",
            name, plan.flavor, plan.rule
        ),
    }

    println!("[~] Call surface:");
    for param in plan.signature.marshal_params() {
        println!(
            "    {} (stack slot {} bytes, printf \"{}\")",
            param.c_declaration(),
            param.type_expr.stack_size(),
            param.type_expr.format_string()
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct AnalyzeReport {
    package: String,
    operations: Vec<OperationReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct OperationReport {
    name: String,
    flavor: MarshalFlavor,
    rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_block_size: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    variable_sizes: Vec<String>,
}

fn build_report(package: &str, plans: &[MarshalPlan]) -> AnalyzeReport {
    AnalyzeReport {
        package: package.to_string(),
        operations: plans
            .iter()
            .map(|plan| OperationReport {
                name: plan.name().to_string(),
                flavor: plan.flavor,
                rule: plan.rule.to_string(),
                fixed_block_size: plan.record.as_ref().map(|r| r.fixed_block_size),
                variable_sizes: plan
                    .record
                    .as_ref()
                    .map(|r| r.variable.iter().map(|v| v.size_expr.clone()).collect())
                    .unwrap_or_default(),
            })
            .collect(),
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
