use marshal_types::MarshalFlavor;
use serde_derive::{Deserialize, Serialize};

/* ============================================================================
   API Description Schema
   ============================================================================ */

/* Element count attribute of a parameter. An integer is a count fixed in
 * the description; a string names the sibling parameter that carries the
 * count at call time. */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CountValue {
    /* Fixed element count (e.g., count: 4) */
    Fixed(u32),
    /* Name of the counting parameter (e.g., count: n) */
    Counter(String),
}

/* One parameter of a described function */
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ParamDef {
    pub name: String,

    /* Type declaration text, e.g. "const int *" */
    #[serde(rename = "type")]
    pub type_text: String,

    /* Element count: fixed integer or counting-parameter name */
    #[serde(default)]
    pub count: Option<CountValue>,

    /* Constant multiplier applied to the counted element total */
    #[serde(default = "default_scale")]
    pub count_scale: u32,

    /* Names of sibling enum parameters that select the length at runtime */
    #[serde(default)]
    pub variable_param: Vec<String>,

    /* Whether the callee writes through this parameter */
    #[serde(default)]
    pub output: bool,

    /* Alignment filler; excluded from marshalling and call signatures */
    #[serde(default)]
    pub padding: bool,
}

fn default_scale() -> u32 {
    1
}

fn default_return_type() -> String {
    "void".to_string()
}

/* One callable function of the described API */
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionDef {
    pub name: String,

    /* Return type text; defaults to void */
    #[serde(rename = "return", default = "default_return_type")]
    pub return_type: String,

    #[serde(default)]
    pub params: Vec<ParamDef>,

    /* Forced classification, overriding the rule list */
    #[serde(default)]
    pub marshal: Option<MarshalFlavor>,
}

/* A base type defined by the description, beyond the built-in set */
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ExtraTypeDef {
    pub name: String,

    /* Size in bytes */
    pub size: u32,

    /* Whether this is an integer type (affects sign handling and the
     * fixed-ABI stack slot size) */
    #[serde(default = "default_true")]
    pub integer: bool,
}

fn default_true() -> bool {
    true
}

/* Metadata for an API description file */
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ApiMetadata {
    /* Package identifier (e.g., "demo.gfx") */
    pub package: String,

    /* Optional human-readable display name */
    #[serde(default)]
    pub name: Option<String>,

    /* File description */
    #[serde(default)]
    pub description: String,
}

/* Complete API description: metadata, extra base types, and functions */
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ApiFile {
    /* Description metadata */
    pub api: ApiMetadata,

    /* Base types beyond the built-in primitive set */
    #[serde(default)]
    pub types: Vec<ExtraTypeDef>,

    /* Described functions, in declaration order */
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
}

impl ApiFile {
    /* Get the package identifier */
    pub fn package(&self) -> &str {
        &self.api.package
    }

    /* Get the human-readable display name */
    pub fn name(&self) -> Option<&str> {
        self.api.name.as_deref()
    }

    /* Get the description */
    pub fn description(&self) -> &str {
        &self.api.description
    }

    /* Get the extra base type definitions */
    pub fn extra_types(&self) -> &[ExtraTypeDef] {
        &self.types
    }

    /* Get the function definitions */
    pub fn functions(&self) -> &[FunctionDef] {
        &self.functions
    }
}
