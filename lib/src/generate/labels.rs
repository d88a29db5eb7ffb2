use super::BranchTargets;
use crate::util::Offset;
use std::collections::HashMap;

/// Generates new labels
pub trait LabelGenerator<Label> {
    /// Generate a fresh label
    fn fresh_label(&mut self) -> Label;
}

/// Label generator for names made of a fixed prefix and an increasing counter
///
/// Counters start at zero for every new generator, so there is never any sharing of names
/// across generated scripts.
#[derive(Clone, Debug)]
pub struct LabelCounter {
    prefix: &'static str,
    next: usize,
}

impl LabelCounter {
    pub fn new(prefix: &'static str) -> LabelCounter {
        LabelCounter { prefix, next: 0 }
    }
}

impl LabelGenerator<String> for LabelCounter {
    fn fresh_label(&mut self) -> String {
        let label = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        label
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LabelKind {
    BranchTarget,
    TryStart,
    TryEnd,
    Handler,
}

/// Named position in the code
///
/// Each kind of label has its own naming scheme, so names never collide across kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub offset: Offset,
    pub kind: LabelKind,
}

/// Names for branch targets (`label0`, `label1`, ...)
#[derive(Debug)]
pub struct LabelAllocator {
    generator: LabelCounter,
    names: HashMap<Offset, usize>,
    minted: Vec<Label>,
}

impl LabelAllocator {
    pub fn new() -> LabelAllocator {
        LabelAllocator {
            generator: LabelCounter::new("label"),
            names: HashMap::new(),
            minted: vec![],
        }
    }

    /// Allocate names for all targets, in ascending offset order
    pub fn for_targets(targets: &BranchTargets) -> LabelAllocator {
        let mut allocator = LabelAllocator::new();
        for target in targets.iter() {
            allocator.name_for(*target);
        }
        allocator
    }

    /// Name of the label at an offset, minting a new one on first request
    pub fn name_for(&mut self, offset: Offset) -> &str {
        let idx = match self.names.get(&offset) {
            Some(idx) => *idx,
            None => {
                let idx = self.minted.len();
                self.minted.push(Label {
                    name: self.generator.fresh_label(),
                    offset,
                    kind: LabelKind::BranchTarget,
                });
                self.names.insert(offset, idx);
                idx
            }
        };
        &self.minted[idx].name
    }

    /// Name of an already minted label
    pub fn get(&self, offset: Offset) -> Option<&str> {
        self.names
            .get(&offset)
            .map(|idx| self.minted[*idx].name.as_str())
    }

    /// Labels in the order they were minted
    pub fn minted(&self) -> &[Label] {
        &self.minted
    }
}

impl Default for LabelAllocator {
    fn default() -> Self {
        LabelAllocator::new()
    }
}

/// Labels delimiting one exception table entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionRegion {
    pub try_start: Label,
    pub try_end: Label,
    pub handler: Label,
}

/// Names for exception table entries (`TRY_START_0`, `TRY_END_0`, `HANDLER_START_0`, ...)
#[derive(Debug)]
pub struct ExceptionLabelAllocator {
    try_starts: LabelCounter,
    try_ends: LabelCounter,
    handlers: LabelCounter,
    minted: Vec<Label>,
}

impl ExceptionLabelAllocator {
    pub fn new() -> ExceptionLabelAllocator {
        ExceptionLabelAllocator {
            try_starts: LabelCounter::new("TRY_START_"),
            try_ends: LabelCounter::new("TRY_END_"),
            handlers: LabelCounter::new("HANDLER_START_"),
            minted: vec![],
        }
    }

    /// Mint the three labels of the next exception table entry
    pub fn fresh_region(&mut self, start: Offset, end: Offset, handler: Offset) -> ExceptionRegion {
        let region = ExceptionRegion {
            try_start: Label {
                name: self.try_starts.fresh_label(),
                offset: start,
                kind: LabelKind::TryStart,
            },
            try_end: Label {
                name: self.try_ends.fresh_label(),
                offset: end,
                kind: LabelKind::TryEnd,
            },
            handler: Label {
                name: self.handlers.fresh_label(),
                offset: handler,
                kind: LabelKind::Handler,
            },
        };
        self.minted.extend([
            region.try_start.clone(),
            region.try_end.clone(),
            region.handler.clone(),
        ]);
        region
    }

    /// Labels in the order they were minted
    pub fn minted(&self) -> &[Label] {
        &self.minted
    }
}

impl Default for ExceptionLabelAllocator {
    fn default() -> Self {
        ExceptionLabelAllocator::new()
    }
}
