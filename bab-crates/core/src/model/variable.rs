use std::fmt::Display;

use crate::containers::StorageKey;

/// A handle to a variable of an [`IntegerProgram`](crate::model::IntegerProgram).
///
/// The handle is only meaningful for the program which created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    id: u32,
}

impl VariableId {
    pub(crate) fn new(id: u32) -> Self {
        VariableId { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// Whether a variable has to take an integral value in an accepted solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Continuous,
    Integer,
}

/// The declaration of a single variable; its name, optional bounds, and [`VariableKind`].
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    name: String,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    kind: VariableKind,
}

impl VariableDefinition {
    pub fn new(
        name: impl Into<String>,
        lower_bound: Option<f64>,
        upper_bound: Option<f64>,
        kind: VariableKind,
    ) -> Self {
        VariableDefinition {
            name: name.into(),
            lower_bound,
            upper_bound,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.upper_bound
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn is_integer(&self) -> bool {
        self.kind == VariableKind::Integer
    }
}
