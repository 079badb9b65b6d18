//! The assertion ledger `test(a, b)` records into.
//!
//! Owned by the interpreter, consumed by whoever wants to report on the
//! run; recording never fails and never prints.

use sprout_ir::Primitive;

#[derive(Debug, Clone, PartialEq)]
pub struct TestEntry {
    pub actual: Primitive,
    pub expected: Primitive,
}

impl TestEntry {
    pub fn passed(&self) -> bool {
        self.actual == self.expected
    }
}

#[derive(Debug, Default)]
pub struct TestLedger {
    entries: Vec<TestEntry>,
}

impl TestLedger {
    pub fn record(&mut self, actual: Primitive, expected: Primitive) {
        self.entries.push(TestEntry { actual, expected });
    }

    pub fn entries(&self) -> &[TestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn passed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.passed()).count()
    }
}
