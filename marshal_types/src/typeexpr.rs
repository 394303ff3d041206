use crate::table::TypeTable;
use thiserror::Error;

/* Parse-time failures. Every variant carries the offending source text so
 * generation aborts with a message a human can act on. */
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("invalid type expression (empty declaration)")]
    Empty,
    #[error("unknown base type \"{0}\"")]
    UnknownBaseType(String),
    #[error("invalid type expression (garbage after qualifier): \"{0}\"")]
    TrailingToken(String),
    #[error("invalid type expression (dangling pointer): \"{0}\"")]
    DanglingPointer(String),
    #[error("invalid type expression (signed/unsigned applied to pointer level): \"{0}\"")]
    SignOnPointer(String),
    #[error("invalid type expression (both signed and unsigned): \"{0}\"")]
    ConflictingSign(String),
    #[error("invalid type expression (dangling {qualifier}): \"{text}\"")]
    DanglingQualifier {
        qualifier: &'static str,
        text: String,
    },
}

/* One portion of a C type: either the named base type (e.g. the "int" of
 * "unsigned int") or a single layer of pointer indirection. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    pub pointer: bool,
    pub constant: bool,
    /* Only meaningful for integer base types. */
    pub signed: bool,
    /* Ignored for pointer nodes. */
    pub integer: bool,
    /* Number of array elements if this node is an array; 0 for scalars. */
    pub elements: u32,
    /* Base name (e.g. "int" for "unsigned int"). None for pointer nodes. */
    pub name: Option<String>,
    /* Size in bytes. 0 for pointer nodes. */
    pub size: u32,
}

impl Default for TypeNode {
    fn default() -> Self {
        Self {
            pointer: false,
            constant: false,
            signed: true,
            integer: true,
            elements: 0,
            name: None,
            size: 0,
        }
    }
}

impl TypeNode {
    /* A named base-type node, the first entry of every expression. */
    pub fn base(name: &str, size: u32, integer: bool) -> Self {
        Self {
            name: Some(name.to_string()),
            size,
            integer,
            ..Self::default()
        }
    }

    fn pointer_level() -> Self {
        Self {
            pointer: true,
            ..Self::default()
        }
    }

    /* Canonical C rendering of this node. Array size is ignored. */
    fn to_c_fragment(&self) -> String {
        let mut s = String::new();

        if self.pointer {
            s.push_str("* ");
        }
        if self.constant {
            s.push_str("const ");
        }
        if !self.pointer {
            if self.integer {
                s.push_str(if self.signed { "signed " } else { "unsigned " });
            }
            if let Some(name) = &self.name {
                s.push_str(name);
                s.push(' ');
            }
        }

        s
    }
}

/// A complete C type: a base node followed by zero or more pointer levels.
///
/// Index 0 is always the (only) named, sized node; every later node is one
/// level of indirection carrying at most a `const` qualifier. The sequence
/// is immutable after parsing apart from [`TypeExpression::set_elements`],
/// which records an explicit array count on the base node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpression {
    nodes: Vec<TypeNode>,
    original: String,
}

impl TypeExpression {
    /* Used by the type table to construct the canonical built-in entries. */
    pub fn from_base_node(node: TypeNode) -> Self {
        let original = node.name.clone().unwrap_or_default();
        Self {
            nodes: vec![node],
            original,
        }
    }

    /// Parses a textual C type declaration such as `"const int *"` or
    /// `"unsigned * const *"`.
    ///
    /// Base names are looked up in `table` first and then in `extra`, the
    /// supplementary table of description-defined types. Both lookups
    /// failing is a hard error; nothing is ever defaulted.
    pub fn parse(
        text: &str,
        table: &TypeTable,
        extra: Option<&TypeTable>,
    ) -> Result<Self, TypeParseError> {
        let mut expr = Self {
            nodes: Vec::new(),
            original: text.to_string(),
        };

        /* Isolate '*' as its own token, then split on whitespace. */
        let padded = text.replace('*', " * ");
        let tokens: Vec<&str> = padded.split_whitespace().collect();

        let mut constant = false;
        let mut signed = false;
        let mut unsigned = false;
        /* Index of the most recently appended pointer node, if any. A
         * `const` seen after a pointer level qualifies that level rather
         * than the base type. */
        let mut last_pointer: Option<usize> = None;

        for token in tokens {
            match token {
                "const" => {
                    if let Some(idx) = last_pointer {
                        expr.nodes[idx].constant = true;
                    } else {
                        constant = true;
                    }
                }
                "signed" => signed = true,
                "unsigned" => unsigned = true,
                "*" => {
                    /* C quirk: a bare "unsigned" directly before a pointer
                     * token means "unsigned int". */
                    if unsigned {
                        expr.set_base_type("int", signed, unsigned, constant, table, extra)?;
                        constant = false;
                        signed = false;
                        unsigned = false;
                    }

                    if expr.nodes.is_empty() {
                        return Err(TypeParseError::DanglingPointer(text.to_string()));
                    }
                    if signed {
                        return Err(TypeParseError::SignOnPointer(text.to_string()));
                    }

                    expr.nodes.push(TypeNode::pointer_level());
                    last_pointer = Some(expr.nodes.len() - 1);
                }
                name => {
                    if !expr.nodes.is_empty() {
                        return Err(TypeParseError::TrailingToken(text.to_string()));
                    }
                    expr.set_base_type(name, signed, unsigned, constant, table, extra)?;
                    constant = false;
                    signed = false;
                    unsigned = false;
                }
            }

            if signed && unsigned {
                return Err(TypeParseError::ConflictingSign(text.to_string()));
            }
        }

        let dangling = if constant {
            Some("const")
        } else if signed {
            Some("signed")
        } else if unsigned {
            Some("unsigned")
        } else {
            None
        };
        if let Some(qualifier) = dangling {
            return Err(TypeParseError::DanglingQualifier {
                qualifier,
                text: text.to_string(),
            });
        }

        if expr.nodes.is_empty() {
            return Err(TypeParseError::Empty);
        }

        Ok(expr)
    }

    /* Replace the (empty) node chain by the canonical chain of the named
     * base type, applying any pending const / sign qualifiers. */
    fn set_base_type(
        &mut self,
        name: &str,
        signed: bool,
        unsigned: bool,
        constant: bool,
        table: &TypeTable,
        extra: Option<&TypeTable>,
    ) -> Result<(), TypeParseError> {
        let canonical = table
            .find(name)
            .or_else(|| extra.and_then(|t| t.find(name)))
            .ok_or_else(|| TypeParseError::UnknownBaseType(name.to_string()))?;

        self.nodes = canonical.nodes.clone();

        /* Canonical entries are never empty; qualifiers land on the last
         * node of the cloned chain. */
        let last_idx = self.nodes.len() - 1;
        let last = &mut self.nodes[last_idx];
        last.constant = constant;
        if signed {
            last.signed = true;
        } else if unsigned {
            last.signed = false;
        }

        Ok(())
    }

    /// Records an explicit array element count; tracked on the base node.
    pub fn set_elements(&mut self, count: u32) {
        self.nodes[0].elements = count;
    }

    /// The source text this expression was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn base_node(&self) -> &TypeNode {
        &self.nodes[0]
    }

    fn outer_node(&self) -> &TypeNode {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn base_name(&self) -> Option<&str> {
        self.nodes[0].name.as_deref()
    }

    /// Byte size of the base type, accounting for an explicit array count.
    /// Saturates rather than wraps; resolution rejects element counts whose
    /// byte size is not representable before they reach this point.
    pub fn element_size(&self) -> u32 {
        let base = &self.nodes[0];
        if base.elements != 0 {
            base.elements.saturating_mul(base.size)
        } else {
            base.size
        }
    }

    pub fn element_count(&self) -> u32 {
        self.nodes[0].elements
    }

    /// Space this type occupies on the stack under the fixed 32-bit ABI:
    /// pointers and arrays take one slot, non-integer scalars take their
    /// native size, every other scalar takes one slot.
    pub fn stack_size(&self) -> u32 {
        let outer = self.outer_node();
        if outer.elements != 0 || outer.pointer {
            4
        } else if !outer.integer {
            outer.size
        } else {
            4
        }
    }

    /// Whether the outermost level is a pointer.
    pub fn is_pointer(&self) -> bool {
        self.outer_node().pointer
    }

    /// printf-style placeholder for debug-printing values of this type.
    pub fn format_string(&self) -> &'static str {
        let outer = self.outer_node();
        if outer.pointer {
            "%p"
        } else if !outer.integer {
            "%f"
        } else {
            "%d"
        }
    }

    /// Canonical C rendering (sign spelled out, array size ignored).
    pub fn to_c_string(&self) -> String {
        let mut s = String::new();
        for node in &self.nodes {
            s.push_str(&node.to_c_fragment());
        }
        s.trim_end().to_string()
    }
}

#[cfg(test)]
#[path = "typeexpr_tests.rs"]
mod typeexpr_tests;
