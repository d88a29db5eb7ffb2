//! Turn decoded method bodies into `CompactCodeAttributeComposer` scripts
//!
//! ### Pipeline
//!
//! Generation is one linear pass over an immutable [`MethodBody`]:
//!
//!   1. [`BranchTargets::analyze`] finds every offset some jump lands on
//!   2. [`LabelAllocator`] names those offsets (`label0`, `label1`, ...) in ascending order
//!   3. [`assemble`] mints exception labels through [`ExceptionLabelAllocator`] and merges them
//!      with the instructions and the trailing `catch_` declarations
//!   4. every [`ProcessingItem`] is rendered into [`Statement`]s, instructions going through
//!      [`InstructionTranslator`] (which defers to [`ConstantRenderer`] for pool references)
//!
//! All the counters live in allocators created for each call, so generating twice from the same
//! input always produces the same text.
//!
//! ### Example
//!
//! ```no_run
//! use class2composer::generate::{generate, Settings};
//! use class2composer::jvm::class_file::ClassFile;
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let class = ClassFile::load_from_path("Container.class")?;
//! let body = class.method_body("main")?;
//! let script = generate(&body, &Settings::default())?;
//! print!("{}", script);
//! # Ok(())
//! # }
//! ```

mod assembler;
mod branch_targets;
mod constant_renderer;
mod errors;
mod instruction_translator;
mod labels;
mod script;
mod settings;
mod string_literal;

pub use assembler::*;
pub use branch_targets::*;
pub use constant_renderer::*;
pub use errors::*;
pub use instruction_translator::*;
pub use labels::*;
pub use script::*;
pub use settings::*;
pub use string_literal::*;

use crate::jvm::code::MethodBody;

/// Generate the builder script for a method body
pub fn generate(body: &MethodBody, settings: &Settings) -> Result<GeneratedScript, Error> {
    log::debug!(
        "Generating script for {}.{}{} ({} instructions)",
        body.class_name,
        body.method_name,
        body.descriptor,
        body.instructions.len()
    );

    let targets = BranchTargets::analyze(body)?;
    let labels = LabelAllocator::for_targets(&targets);
    let mut exception_labels = ExceptionLabelAllocator::new();
    let items = assemble(body, &mut exception_labels)?;

    let translator = InstructionTranslator::new(&labels, ConstantRenderer::new(body, settings));
    let mut statements = vec![];
    for item in &items {
        statements.extend(item.render(&translator)?);
    }

    let declared = labels
        .minted()
        .iter()
        .chain(exception_labels.minted())
        .map(|label| label.name.clone())
        .collect();
    Ok(GeneratedScript::new(settings, declared, statements))
}
