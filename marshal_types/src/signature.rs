use crate::typeexpr::TypeExpression;
use serde_derive::{Deserialize, Serialize};

/// Data flow of a parameter relative to the callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
}

/// How a pointer parameter's element count is determined at call time.
///
/// Scalars are always `None`. The distinction drives both classification
/// (a pointer whose length cannot be computed before the call executes
/// forces an immediate call) and record layout (fixed block versus
/// trailing variable bytes).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CountSpec {
    /// No length information. Fine for scalars, disqualifying for pointers.
    #[default]
    None,
    /// The pointee is an array with a count fixed in the description.
    Fixed(u32),
    /// A sibling parameter carries the element count at call time,
    /// multiplied by a constant scale factor.
    Counted { counter: String, scale: u32 },
    /// The length is selected by the runtime value of sibling enum
    /// parameters; not resolvable at generation time.
    EnumSelected(Vec<String>),
}

/// Dispatch strategy for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarshalFlavor {
    /// Not generated at all.
    Skip,
    /// Hand-written elsewhere; nothing generated here.
    Custom,
    /// Immediate call behind a drain barrier.
    Sync,
    /// Deferred call encoded into a command record.
    Async,
}

impl MarshalFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarshalFlavor::Skip => "skip",
            MarshalFlavor::Custom => "custom",
            MarshalFlavor::Sync => "sync",
            MarshalFlavor::Async => "async",
        }
    }

    /* Skip and Custom produce no generated artifacts. */
    pub fn is_generated(&self) -> bool {
        matches!(self, MarshalFlavor::Sync | MarshalFlavor::Async)
    }

    pub fn is_async(&self) -> bool {
        matches!(self, MarshalFlavor::Async)
    }
}

impl std::fmt::Display for MarshalFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameter of an operation, with its type fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub type_expr: TypeExpression,
    pub direction: Direction,
    pub count: CountSpec,
    /* Alignment filler from the description; kept out of the call
     * signature and never marshalled. */
    pub padding: bool,
}

impl ParameterSpec {
    pub fn is_pointer(&self) -> bool {
        self.type_expr.is_pointer()
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Out
    }

    /// Whether the byte size is only known at call time. Fixed-count
    /// arrays are not variable: their size is a generation-time constant.
    pub fn is_variable_length(&self) -> bool {
        matches!(self.count, CountSpec::Counted { .. })
    }

    /// The C declaration of this parameter, using the source type text.
    pub fn c_declaration(&self) -> String {
        format!("{} {}", self.type_expr.original().trim(), self.name)
    }
}

/// Return type of an operation. `void` never enters the type table, so it
/// is modelled apart from value-returning types.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnType {
    Void,
    Value(TypeExpression),
}

impl ReturnType {
    pub fn is_void(&self) -> bool {
        matches!(self, ReturnType::Void)
    }

    /// The C return type text, as written in the description.
    pub fn c_string(&self) -> &str {
        match self {
            ReturnType::Void => "void",
            ReturnType::Value(expr) => expr.original().trim(),
        }
    }
}

/// One callable operation from the API description.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSignature {
    pub name: String,
    pub return_type: ReturnType,
    pub parameters: Vec<ParameterSpec>,
    /// Forced classification from the description, overriding the rules.
    pub marshal: Option<MarshalFlavor>,
}

impl OperationSignature {
    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }

    /// Parameters that take part in marshalling and in the generated call
    /// signature; padding fillers are description-only artifacts.
    pub fn marshal_params(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| !p.padding)
    }

    /// The C parameter list for the generated stubs, `"void"` if empty.
    pub fn parameter_string(&self) -> String {
        let decls: Vec<String> = self.marshal_params().map(|p| p.c_declaration()).collect();
        if decls.is_empty() {
            "void".to_string()
        } else {
            decls.join(", ")
        }
    }

    /// The argument list used when invoking the real operation.
    pub fn argument_string(&self) -> String {
        let names: Vec<&str> = self.marshal_params().map(|p| p.name.as_str()).collect();
        names.join(", ")
    }
}
