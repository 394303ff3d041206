use crate::classify;
use crate::layout::{self, CommandRecord, LayoutError};
use marshal_types::{MarshalFlavor, OperationSignature};

/// The cached generation decisions for one operation: its flavor, the
/// rule that picked it, and the record layout when the flavor defers.
///
/// Every generator reads from the plan instead of re-running the
/// classifier, so one operation can never be classified two ways by
/// two generators.
#[derive(Debug, Clone)]
pub struct MarshalPlan {
    pub signature: OperationSignature,
    pub flavor: MarshalFlavor,
    /* Name of the classification rule that decided the flavor. */
    pub rule: &'static str,
    /* Present exactly when `flavor` is Async. */
    pub record: Option<CommandRecord>,
}

impl MarshalPlan {
    pub fn name(&self) -> &str {
        &self.signature.name
    }
}

/// Classifies one operation and, when it defers, computes its record.
pub fn plan_operation(
    op: &OperationSignature,
    max_cmd_size: u32,
) -> Result<MarshalPlan, LayoutError> {
    let (flavor, rule) = classify::classify_with_rule(op);
    let record = if flavor.is_async() {
        Some(layout::layout_command(op, max_cmd_size)?)
    } else {
        None
    };
    Ok(MarshalPlan {
        signature: op.clone(),
        flavor,
        rule,
        record,
    })
}

/// Plans a whole description, one entry per operation in description
/// order. The order fixes command tags and entry-point slots, so it is
/// preserved as given.
pub fn plan_operations(
    ops: &[OperationSignature],
    max_cmd_size: u32,
) -> Result<Vec<MarshalPlan>, LayoutError> {
    ops.iter().map(|op| plan_operation(op, max_cmd_size)).collect()
}
