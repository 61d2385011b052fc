//! Concrete bit identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One bit of a declared register, identified by register name and index.
///
/// A `RegBit` only references its register by name; it never owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegBit {
    pub name: String,
    pub index: usize,
}

impl RegBit {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// All bits of a register of `size`, in index order.
    pub fn range(name: &str, size: usize) -> Vec<RegBit> {
        (0..size).map(|index| RegBit::new(name, index)).collect()
    }
}

impl fmt::Display for RegBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}
