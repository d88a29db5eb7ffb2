use super::Error;
use crate::jvm::code::MethodBody;
use crate::util::Offset;
use std::collections::btree_set;
use std::collections::BTreeSet;

/// Offsets that some branch or switch in a method jumps to
#[derive(Debug, Clone, Default)]
pub struct BranchTargets(BTreeSet<Offset>);

impl BranchTargets {
    /// Collect all jump targets in a method body
    ///
    /// Every target must be the offset of an instruction in the body.
    pub fn analyze(body: &MethodBody) -> Result<BranchTargets, Error> {
        let mut targets = BTreeSet::new();
        for (at, instruction) in &body.instructions {
            for relative in instruction.jump_targets().relative_offsets() {
                let target = at
                    .jump(*relative)
                    .filter(|target| body.instruction_at(*target).is_some())
                    .ok_or(Error::UnresolvedBranchTarget {
                        at: *at,
                        relative: *relative,
                    })?;
                targets.insert(target);
            }
        }
        log::debug!("Found {} branch targets", targets.len());
        Ok(BranchTargets(targets))
    }

    pub fn contains(&self, offset: Offset) -> bool {
        self.0.contains(&offset)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Targets in ascending order
    pub fn iter(&self) -> btree_set::Iter<'_, Offset> {
        self.0.iter()
    }
}
