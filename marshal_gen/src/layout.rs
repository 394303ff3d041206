use marshal_types::{CountSpec, OperationSignature, ParameterSpec, TypeExpression};
use thiserror::Error;

/* Every record starts with an 8-byte header: a 32-bit command tag and
 * the 32-bit total record size. */
pub const CMD_HEADER_SIZE: u32 = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error(
        "operation {operation}: pointer parameter \"{parameter}\" has no \
         generation-time element count"
    )]
    VariablePointerWithoutCounter {
        operation: String,
        parameter: String,
    },
    #[error(
        "operation {operation}: fixed fields need {needed} bytes but the \
         record limit is {limit}"
    )]
    FixedBlockTooLarge {
        operation: String,
        needed: u32,
        limit: u32,
    },
    #[error(
        "operation {operation}: parameter \"{parameter}\" overflows the \
         32-bit record size"
    )]
    RecordSizeOverflow {
        operation: String,
        parameter: String,
    },
}

/// A field stored by value inside the record: a scalar, or a fixed-size
/// array copied as one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedField {
    pub name: String,
    /* Declaration text as written in the description, e.g. "int". */
    pub decl_type: String,
    /* Base type with qualifiers and pointers stripped, used for array
     * declarations and typed views, e.g. "unsigned char". */
    pub base_type: String,
    /* 0 for scalars. */
    pub element_count: u32,
    pub byte_size: u32,
}

impl FixedField {
    pub fn is_array(&self) -> bool {
        self.element_count != 0
    }
}

/// A field whose byte length is only known at call time. Its bytes live
/// after the fixed block, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableField {
    pub name: String,
    pub base_type: String,
    /* Sibling parameter carrying the element count at call time. */
    pub counter: String,
    pub scale: u32,
    /* C expression for the field's byte length, e.g. "n * 4". */
    pub size_expr: String,
}

/// The packed layout of one deferred call.
///
/// This is the single field-order list both the encoder and the decoder
/// generators consult. Because neither side re-derives the order from
/// the signature, the write cursor and the read cursor cannot drift
/// apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub op_name: String,
    /* C tag of the record type, e.g. "cq_cmd_Baz". */
    pub struct_name: String,
    pub fixed: Vec<FixedField>,
    pub variable: Vec<VariableField>,
    /* Header plus fixed fields under natural alignment. An estimate of
     * the C compiler's sizeof, used only for the record-limit check. */
    pub fixed_block_size: u32,
}

impl CommandRecord {
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.variable.is_empty()
    }

    /// Whether the record's total size depends on call-time values.
    pub fn has_variable_data(&self) -> bool {
        !self.variable.is_empty()
    }
}

/* Base type spelled the way C wants it in a declaration: the name alone
 * for signed integers and non-integers, an "unsigned" prefix otherwise.
 * Qualifiers and pointer levels do not apply to stored fields. */
fn base_type_string(expr: &TypeExpression) -> String {
    let base = expr.base_node();
    let name = base.name.as_deref().unwrap_or_default();
    if base.integer && !base.signed {
        format!("unsigned {}", name)
    } else {
        name.to_string()
    }
}

/* The byte-length expression for one counted field. The constant factor
 * is the element size and the scale folded together; a factor of one is
 * left out entirely. */
fn size_expression(counter: &str, factor: u32) -> String {
    if factor == 1 {
        counter.to_string()
    } else {
        format!("{} * {}", counter, factor)
    }
}

fn align_up(offset: u32, align: u32) -> Option<u32> {
    offset.checked_next_multiple_of(align.clamp(1, 8))
}

/* Natural-alignment accounting for one more fixed field. The record
 * size travels on the wire as 32 bits, so overflowing u32 here is a
 * hard failure. */
fn grow_fixed_block(
    size: u32,
    op: &OperationSignature,
    param: &ParameterSpec,
    field: &FixedField,
) -> Result<u32, LayoutError> {
    align_up(size, param.type_expr.base_node().size)
        .and_then(|aligned| aligned.checked_add(field.byte_size))
        .ok_or_else(|| LayoutError::RecordSizeOverflow {
            operation: op.name.clone(),
            parameter: param.name.clone(),
        })
}

fn fixed_field(param: &ParameterSpec, element_count: u32) -> FixedField {
    FixedField {
        name: param.name.clone(),
        decl_type: param.type_expr.original().trim().to_string(),
        base_type: base_type_string(&param.type_expr),
        element_count,
        byte_size: param.type_expr.element_size(),
    }
}

/// Computes the command record for one Async operation.
///
/// Partitions the non-padding parameters into fixed fields (scalars and
/// fixed-size arrays) and variable-length fields (counted by a sibling
/// parameter), each list in declaration order. Fails when a pointer's
/// length has no generation-time expression, or when the fixed block
/// alone cannot fit under `max_cmd_size` and there is no call-time
/// guard to fall back on.
pub fn layout_command(
    op: &OperationSignature,
    max_cmd_size: u32,
) -> Result<CommandRecord, LayoutError> {
    let mut fixed = Vec::new();
    let mut variable = Vec::new();
    let mut fixed_block_size = CMD_HEADER_SIZE;

    for param in op.marshal_params() {
        match &param.count {
            CountSpec::Fixed(count) => {
                let field = fixed_field(param, *count);
                fixed_block_size = grow_fixed_block(fixed_block_size, op, param, &field)?;
                fixed.push(field);
            }
            CountSpec::None if !param.is_pointer() => {
                let field = fixed_field(param, 0);
                fixed_block_size = grow_fixed_block(fixed_block_size, op, param, &field)?;
                fixed.push(field);
            }
            CountSpec::Counted { counter, scale } => {
                let factor = param
                    .type_expr
                    .element_size()
                    .checked_mul(*scale)
                    .ok_or_else(|| LayoutError::RecordSizeOverflow {
                        operation: op.name.clone(),
                        parameter: param.name.clone(),
                    })?;
                variable.push(VariableField {
                    name: param.name.clone(),
                    base_type: base_type_string(&param.type_expr),
                    counter: counter.clone(),
                    scale: *scale,
                    size_expr: size_expression(counter, factor),
                });
            }
            CountSpec::None | CountSpec::EnumSelected(_) => {
                return Err(LayoutError::VariablePointerWithoutCounter {
                    operation: op.name.clone(),
                    parameter: param.name.clone(),
                });
            }
        }
    }

    /* Records with trailing variable data carry a call-time size guard,
     * so an oversized fixed block only matters when the record size is
     * a generation-time constant. */
    if variable.is_empty() && fixed_block_size > max_cmd_size {
        return Err(LayoutError::FixedBlockTooLarge {
            operation: op.name.clone(),
            needed: fixed_block_size,
            limit: max_cmd_size,
        });
    }

    Ok(CommandRecord {
        op_name: op.name.clone(),
        struct_name: format!("cq_cmd_{}", op.name),
        fixed,
        variable,
        fixed_block_size,
    })
}
