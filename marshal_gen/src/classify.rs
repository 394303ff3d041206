use marshal_types::{CountSpec, MarshalFlavor, OperationSignature};

/* Operations whose externally visible effects must have happened by the
 * time the call returns, whatever their signature says. */
pub const SYNC_ONLY_OPERATIONS: &[&str] = &["Finish", "Flush"];

/// One classification rule: a named predicate and the flavor it assigns
/// when it matches.
///
/// The rules form an ordered, first-match-wins list. Keeping them as
/// data rather than nested conditionals makes the tie-break order
/// visible in one place and lets each rule be tested in isolation.
pub struct MarshalRule {
    pub name: &'static str,
    pub applies: fn(&OperationSignature) -> bool,
    pub flavor: MarshalFlavor,
}

fn sync_only_name(op: &OperationSignature) -> bool {
    SYNC_ONLY_OPERATIONS.contains(&op.name.as_str())
}

/* A deferred call has no way to deliver a result to the caller. */
fn non_void_return(op: &OperationSignature) -> bool {
    !op.returns_void()
}

fn has_output_parameter(op: &OperationSignature) -> bool {
    op.marshal_params().any(|p| p.is_output())
}

/* A pointer with no count of any kind: the byte length cannot be known
 * without executing the call. */
fn has_uncounted_pointer(op: &OperationSignature) -> bool {
    op.marshal_params()
        .any(|p| p.is_pointer() && matches!(p.count, CountSpec::None))
}

/* The element count is picked by runtime enum values, which the
 * generator cannot resolve into a size expression. */
fn has_enum_selected_count(op: &OperationSignature) -> bool {
    op.marshal_params()
        .any(|p| matches!(p.count, CountSpec::EnumSelected(_)))
}

/// The ordered rule list. Every rule forces Sync; an operation matching
/// none of them is deferrable.
pub const MARSHAL_RULES: &[MarshalRule] = &[
    MarshalRule {
        name: "sync-only-name",
        applies: sync_only_name,
        flavor: MarshalFlavor::Sync,
    },
    MarshalRule {
        name: "non-void-return",
        applies: non_void_return,
        flavor: MarshalFlavor::Sync,
    },
    MarshalRule {
        name: "output-parameter",
        applies: has_output_parameter,
        flavor: MarshalFlavor::Sync,
    },
    MarshalRule {
        name: "uncounted-pointer",
        applies: has_uncounted_pointer,
        flavor: MarshalFlavor::Sync,
    },
    MarshalRule {
        name: "enum-selected-count",
        applies: has_enum_selected_count,
        flavor: MarshalFlavor::Sync,
    },
];

/// Rule name reported when the description forced a flavor.
pub const RULE_OVERRIDE: &str = "override";

/// Rule name reported when no Sync rule matched.
pub const RULE_DEFAULT_ASYNC: &str = "default-async";

/// Classifies one operation.
///
/// The result is computed once per operation and cached in its plan;
/// downstream generators must consult that plan rather than calling
/// this again, so the decision can never drift between generators.
pub fn classify(op: &OperationSignature) -> MarshalFlavor {
    classify_with_rule(op).0
}

/// Classifies one operation and reports which rule decided it.
pub fn classify_with_rule(op: &OperationSignature) -> (MarshalFlavor, &'static str) {
    if let Some(flavor) = op.marshal {
        return (flavor, RULE_OVERRIDE);
    }
    for rule in MARSHAL_RULES {
        if (rule.applies)(op) {
            return (rule.flavor, rule.name);
        }
    }
    (MarshalFlavor::Async, RULE_DEFAULT_ASYNC)
}
