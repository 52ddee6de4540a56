//! Heap storage for variable cells
//!
//! Every binding owns one cell. Cells are never freed and addresses are
//! never reused: the next address is always one past the largest address
//! handed out so far. The backing map is persistent, so a cloned heap is an
//! independent snapshot and writes through one copy are invisible to others.

use std::fmt;

use im::OrdMap;

use crate::value::Value;

/// Address of a heap cell. Addresses start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub usize);

impl Address {
    /// The address handed out by an empty heap
    pub const FIRST: Address = Address(1);

    fn next(self) -> Self {
        Address(self.0 + 1)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Address-to-value store
#[derive(Debug, Clone, Default)]
pub struct Heap {
    cells: OrdMap<Address, Value>,
}

impl Heap {
    pub fn new() -> Self {
        Self {
            cells: OrdMap::new(),
        }
    }

    /// Address the next allocation will use
    pub fn next_address(&self) -> Address {
        match self.cells.get_max() {
            Some((address, _)) => address.next(),
            None => Address::FIRST,
        }
    }

    /// Store `value` in a fresh cell and return its address
    pub fn allocate(&mut self, value: Value) -> Address {
        let address = self.next_address();
        self.cells.insert(address, value);
        address
    }

    /// Read the value stored at `address`.
    ///
    /// Addresses come from environment lookups, so a missing cell means the
    /// environment and heap were threaded inconsistently.
    pub fn read(&self, address: Address) -> &Value {
        match self.cells.get(&address) {
            Some(value) => value,
            None => panic!("heap read from unallocated address {}", address),
        }
    }

    /// Overwrite the cell at an existing `address`. Never allocates.
    pub fn write(&mut self, address: Address, value: Value) {
        match self.cells.get_mut(&address) {
            Some(cell) => *cell = value,
            None => panic!("heap write to unallocated address {}", address),
        }
    }

    /// Number of allocated cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
