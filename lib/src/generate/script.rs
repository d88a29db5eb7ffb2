use super::Settings;
use std::fmt;

/// One chained builder call (eg. `.iload(4)`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Method name and arguments, without the leading `.`
    pub call: String,

    /// Comment following the call on the same line
    pub comment: Option<String>,
}

impl Statement {
    pub fn new(call: String) -> Statement {
        Statement {
            call,
            comment: None,
        }
    }

    /// Bind a label at the current position
    pub fn label(name: &str) -> Statement {
        Statement::new(format!("label({})", name))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.call)
    }
}

/// Complete script rebuilding a method body
///
/// ```text
/// CompactCodeAttributeComposer composer = new CompactCodeAttributeComposer(targetClass);
/// Label label0 = composer.createLabel();
/// composer
///         .label(label0)
///         .return_();
/// ```
#[derive(Debug, Clone)]
pub struct GeneratedScript {
    composer_class: String,
    composer_variable: String,
    target_class_variable: String,
    indent: String,
    labels: Vec<String>,
    statements: Vec<Statement>,
}

impl GeneratedScript {
    pub fn new(settings: &Settings, labels: Vec<String>, statements: Vec<Statement>) -> Self {
        GeneratedScript {
            composer_class: settings.composer_class.clone(),
            composer_variable: settings.composer_variable.clone(),
            target_class_variable: settings.target_class_variable.clone(),
            indent: settings.indent.clone(),
            labels,
            statements,
        }
    }

    /// Declared labels: branch targets first, then exception labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Lines declaring the labels (without trailing newlines)
    pub fn label_declarations(&self) -> impl Iterator<Item = String> + '_ {
        self.labels.iter().map(move |label| {
            format!(
                "Label {} = {}.createLabel();",
                label, self.composer_variable
            )
        })
    }
}

impl fmt::Display for GeneratedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{class} {composer} = new {class}({target});",
            class = self.composer_class,
            composer = self.composer_variable,
            target = self.target_class_variable
        )?;
        for declaration in self.label_declarations() {
            writeln!(f, "{}", declaration)?;
        }

        if self.statements.is_empty() {
            return writeln!(f, "{};", self.composer_variable);
        }
        writeln!(f, "{}", self.composer_variable)?;
        let last = self.statements.len() - 1;
        for (idx, statement) in self.statements.iter().enumerate() {
            write!(f, "{}{}", self.indent, statement)?;
            if idx == last {
                f.write_str(";")?;
            }
            if let Some(comment) = &statement.comment {
                write!(f, " // {}", comment)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
