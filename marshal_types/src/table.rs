use crate::typeexpr::{TypeExpression, TypeNode};
use indexmap::IndexMap;

/// Registry of base types, searchable by name and iterated in insertion
/// order. Construct with [`TypeTable::with_builtins`] before parsing any
/// type text; a missing name is reported by [`TypeTable::find`] returning
/// `None` and never silently defaulted.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types_by_name: IndexMap<String, TypeExpression>,
}

/* The fixed primitive set: (name, byte size, integer?). Sizes follow the
 * 32-bit ABI the generated protocol targets, so "long" is 4 bytes. */
const BUILTIN_TYPES: &[(&str, u32, bool)] = &[
    ("char", 1, true),
    ("short", 2, true),
    ("int", 4, true),
    ("long", 4, true),
    ("float", 4, false),
    ("double", 8, false),
    ("enum", 4, true),
];

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table seeded with the built-in primitive set. Every parse
    /// call takes this table by reference; there is no process-wide
    /// instance to initialize.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for &(name, size, integer) in BUILTIN_TYPES {
            table.add(TypeExpression::from_base_node(TypeNode::base(
                name, size, integer,
            )));
        }
        table
    }

    /// Registers a canonical expression under its base name. Re-adding a
    /// name replaces the previous entry.
    pub fn add(&mut self, expr: TypeExpression) {
        if let Some(name) = expr.base_name() {
            self.types_by_name.insert(name.to_string(), expr);
        }
    }

    pub fn find(&self, name: &str) -> Option<&TypeExpression> {
        self.types_by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.types_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types_by_name.is_empty()
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types_by_name.keys().map(String::as_str)
    }
}
