use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use marshal_types::{
    CountSpec, Direction, OperationSignature, ParameterSpec, ReturnType, TypeExpression, TypeNode,
    TypeParseError, TypeTable,
};
use thiserror::Error;

use crate::file::{ApiFile, CountValue, FunctionDef, ParamDef};

/* Failures turning a parsed description into resolved signatures. Every
 * variant names the operation (and parameter) it came from, so a bad
 * entry in a large description is easy to locate. */
#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("operation {operation}: parameter {parameter}: {source}")]
    ParameterType {
        operation: String,
        parameter: String,
        source: TypeParseError,
    },
    #[error("operation {operation}: return type: {source}")]
    ReturnType {
        operation: String,
        source: TypeParseError,
    },
    #[error(
        "operation {operation}: parameter {parameter}: counter \"{counter}\" does not name a sibling parameter"
    )]
    UnknownCounter {
        operation: String,
        parameter: String,
        counter: String,
    },
    #[error(
        "operation {operation}: parameter {parameter}: counter \"{counter}\" is not a marshalled integer scalar"
    )]
    InvalidCounter {
        operation: String,
        parameter: String,
        counter: String,
    },
    #[error(
        "operation {operation}: parameter {parameter}: count {count} with scale {scale} overflows the 32-bit byte size"
    )]
    CountOverflow {
        operation: String,
        parameter: String,
        count: u32,
        scale: u32,
    },
    #[error(
        "operation {operation}: parameter {parameter}: count and variable-param are mutually exclusive"
    )]
    ConflictingCounts { operation: String, parameter: String },
    #[error("operation {operation}: parameter {parameter}: count on non-pointer type \"{type_text}\"")]
    CountOnNonPointer {
        operation: String,
        parameter: String,
        type_text: String,
    },
    #[error("operation {operation}: duplicate parameter \"{parameter}\"")]
    DuplicateParameter { operation: String, parameter: String },
    #[error("duplicate operation \"{0}\"")]
    DuplicateOperation(String),
}

/// A fully resolved API description: every type parsed against the
/// built-in table plus the description-defined extras, ready for
/// classification and code generation.
#[derive(Debug, Clone)]
pub struct ResolvedApi {
    pub package: String,
    /// Operations in description order. This order fixes command tags and
    /// entry-point slots, so it must stay stable across runs.
    pub operations: Vec<OperationSignature>,
    pub extra_types: TypeTable,
}

/* Read and parse one description file from disk */
pub fn load_api_file(path: &Path) -> anyhow::Result<ApiFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading API description {}", path.display()))?;
    let file: ApiFile = serde_yml::from_str(&contents)
        .with_context(|| format!("parsing API description {}", path.display()))?;
    Ok(file)
}

/// Resolves one or more description files into signatures. Extra base
/// types from every file are registered before any function is resolved,
/// so descriptions may reference types defined in a sibling file. The
/// package identifier comes from the first file.
pub fn resolve_api(files: &[ApiFile]) -> Result<ResolvedApi, ResolveError> {
    let builtins = TypeTable::with_builtins();

    let mut extra = TypeTable::new();
    for file in files {
        for def in file.extra_types() {
            extra.add(TypeExpression::from_base_node(TypeNode::base(
                &def.name,
                def.size,
                def.integer,
            )));
        }
    }

    let mut seen = HashSet::new();
    let mut operations = Vec::new();
    for file in files {
        for func in file.functions() {
            if !seen.insert(func.name.clone()) {
                return Err(ResolveError::DuplicateOperation(func.name.clone()));
            }
            operations.push(resolve_function(func, &builtins, &extra)?);
        }
    }

    Ok(ResolvedApi {
        package: files
            .first()
            .map(|f| f.package().to_string())
            .unwrap_or_default(),
        operations,
        extra_types: extra,
    })
}

fn resolve_function(
    func: &FunctionDef,
    builtins: &TypeTable,
    extra: &TypeTable,
) -> Result<OperationSignature, ResolveError> {
    /* "void" is not a registered type; it is the absence of a result. */
    let return_type = if func.return_type.trim() == "void" {
        ReturnType::Void
    } else {
        let expr = TypeExpression::parse(&func.return_type, builtins, Some(extra)).map_err(
            |source| ResolveError::ReturnType {
                operation: func.name.clone(),
                source,
            },
        )?;
        ReturnType::Value(expr)
    };

    let mut names = HashSet::new();
    for param in &func.params {
        if !names.insert(param.name.as_str()) {
            return Err(ResolveError::DuplicateParameter {
                operation: func.name.clone(),
                parameter: param.name.clone(),
            });
        }
    }

    let mut parameters = Vec::with_capacity(func.params.len());
    for param in &func.params {
        parameters.push(resolve_parameter(func, param, builtins, extra)?);
    }

    Ok(OperationSignature {
        name: func.name.clone(),
        return_type,
        parameters,
        marshal: func.marshal,
    })
}

fn resolve_parameter(
    func: &FunctionDef,
    param: &ParamDef,
    builtins: &TypeTable,
    extra: &TypeTable,
) -> Result<ParameterSpec, ResolveError> {
    let mut type_expr = TypeExpression::parse(&param.type_text, builtins, Some(extra)).map_err(
        |source| ResolveError::ParameterType {
            operation: func.name.clone(),
            parameter: param.name.clone(),
            source,
        },
    )?;

    if (param.count.is_some() || !param.variable_param.is_empty()) && !type_expr.is_pointer() {
        return Err(ResolveError::CountOnNonPointer {
            operation: func.name.clone(),
            parameter: param.name.clone(),
            type_text: param.type_text.clone(),
        });
    }
    if param.count.is_some() && !param.variable_param.is_empty() {
        return Err(ResolveError::ConflictingCounts {
            operation: func.name.clone(),
            parameter: param.name.clone(),
        });
    }

    let count = if !param.variable_param.is_empty() {
        CountSpec::EnumSelected(param.variable_param.clone())
    } else {
        match &param.count {
            None => CountSpec::None,
            Some(CountValue::Fixed(n)) => {
                /* A constant scale folds straight into the fixed count,
                 * and the folded byte size must stay representable. */
                let total = n
                    .checked_mul(param.count_scale)
                    .filter(|total| total.checked_mul(type_expr.base_node().size).is_some())
                    .ok_or_else(|| ResolveError::CountOverflow {
                        operation: func.name.clone(),
                        parameter: param.name.clone(),
                        count: *n,
                        scale: param.count_scale,
                    })?;
                type_expr.set_elements(total);
                CountSpec::Fixed(total)
            }
            Some(CountValue::Counter(counter)) => {
                let sibling = func
                    .params
                    .iter()
                    .find(|p| p.name != param.name && p.name == *counter)
                    .ok_or_else(|| ResolveError::UnknownCounter {
                        operation: func.name.clone(),
                        parameter: param.name.clone(),
                        counter: counter.clone(),
                    })?;
                /* The counter sizes the trailing bytes and is read back by
                 * name in the generated code, so it must itself be a
                 * marshalled integer scalar. An unparseable sibling type is
                 * reported when the sibling resolves. */
                let integer_scalar =
                    TypeExpression::parse(&sibling.type_text, builtins, Some(extra))
                        .map(|expr| !expr.is_pointer() && expr.base_node().integer)
                        .unwrap_or(true);
                if sibling.padding || !integer_scalar {
                    return Err(ResolveError::InvalidCounter {
                        operation: func.name.clone(),
                        parameter: param.name.clone(),
                        counter: counter.clone(),
                    });
                }
                CountSpec::Counted {
                    counter: counter.clone(),
                    scale: param.count_scale,
                }
            }
        }
    };

    Ok(ParameterSpec {
        name: param.name.clone(),
        type_expr,
        direction: if param.output {
            Direction::Out
        } else {
            Direction::In
        },
        count,
        padding: param.padding,
    })
}
