use super::{Error, ExceptionLabelAllocator, InstructionTranslator, Label, Statement, StringLiteral};
use crate::jvm::code::{Instruction, MethodBody};
use crate::util::Offset;
use std::collections::BTreeMap;

/// Exception handler region declaration, emitted after all instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchSpec<'a> {
    pub try_start: String,
    pub try_end: String,
    pub handler: String,

    /// `None` for catch-all handlers
    pub catch_type: Option<&'a str>,
}

impl CatchSpec<'_> {
    pub fn statement(&self) -> Statement {
        let catch_type = match self.catch_type {
            Some(class) => StringLiteral(class).to_string(),
            None => String::from("null"),
        };
        Statement::new(format!(
            "catch_({}, {}, {}, {}, null)",
            self.try_start, self.try_end, self.handler, catch_type
        ))
    }
}

/// Item in the final ordered stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingItem<'a> {
    Instruction(Offset, &'a Instruction),
    Label(Label),
    Catch(CatchSpec<'a>),
}

impl ProcessingItem<'_> {
    pub fn render(&self, translator: &InstructionTranslator) -> Result<Vec<Statement>, Error> {
        match self {
            ProcessingItem::Instruction(at, instruction) => translator.translate(*at, instruction),
            ProcessingItem::Label(label) => Ok(vec![Statement::label(&label.name)]),
            ProcessingItem::Catch(spec) => Ok(vec![spec.statement()]),
        }
    }
}

/// Merge instructions with exception labels and catch declarations
///
/// Exception labels are bound right before the instruction at their offset, in the order the
/// exception table lists them (so two entries sharing a boundary bind in table order). A try end
/// at the very end of the code is bound after the last instruction. Catch declarations follow
/// everything else, in table order.
pub fn assemble<'a>(
    body: &'a MethodBody<'_>,
    exception_labels: &mut ExceptionLabelAllocator,
) -> Result<Vec<ProcessingItem<'a>>, Error> {
    let mut pending: BTreeMap<Offset, Vec<Label>> = BTreeMap::new();
    let mut catches = vec![];

    for (idx, entry) in body.exception_table.iter().enumerate() {
        let resolves = |offset: Offset| body.instruction_at(offset).is_some();
        for offset in [entry.start, entry.handler] {
            if !resolves(offset) {
                return Err(Error::UnresolvedExceptionOffset { entry: idx, offset });
            }
        }
        if !resolves(entry.end) && entry.end != body.code_length {
            return Err(Error::UnresolvedExceptionOffset {
                entry: idx,
                offset: entry.end,
            });
        }

        let region = exception_labels.fresh_region(entry.start, entry.end, entry.handler);
        catches.push(CatchSpec {
            try_start: region.try_start.name.clone(),
            try_end: region.try_end.name.clone(),
            handler: region.handler.name.clone(),
            catch_type: entry.catch_type,
        });
        for label in [region.try_start, region.try_end, region.handler] {
            pending.entry(label.offset).or_default().push(label);
        }
    }

    let mut items = vec![];
    for (at, instruction) in &body.instructions {
        if let Some(labels) = pending.remove(at) {
            items.extend(labels.into_iter().map(ProcessingItem::Label));
        }
        items.push(ProcessingItem::Instruction(*at, instruction));
    }
    if let Some(labels) = pending.remove(&body.code_length) {
        items.extend(labels.into_iter().map(ProcessingItem::Label));
    }
    items.extend(catches.into_iter().map(ProcessingItem::Catch));

    log::debug!(
        "Assembled {} items ({} instructions, {} exception handlers)",
        items.len(),
        body.instructions.len(),
        body.exception_table.len()
    );
    Ok(items)
}
