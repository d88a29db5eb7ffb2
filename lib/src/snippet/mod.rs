//! Generate scripts straight from Java source
//!
//! A snippet is the source of a whole class. It gets compiled by a [`SnippetCompiler`], then the
//! resulting class file is decoded and handed to [`generate`]. When compilation fails, only the
//! compiler's diagnostics are reported and nothing gets generated.

mod javac;

pub use javac::*;

use crate::generate::{self, generate, GeneratedScript, Settings};
use crate::jvm;
use crate::jvm::class_file::ClassFile;
use std::fmt;
use std::io;

/// Starter snippet, matching the default [`Settings`]
pub const DEFAULT_SNIPPET: &str = "\
class Container {
    public static void main(String... args) {
        System.out.println(\"Hello, world!\");
    }
}
";

/// Compiles class sources into class files
pub trait SnippetCompiler {
    /// Compile the source of a class (`class_name` is a binary name, like `foo/Bar`)
    fn compile(&self, class_name: &str, source: &str) -> Result<Compiled, Error>;
}

/// Outcome of running a compiler that could be run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compiled {
    /// Bytes of the compiled class file
    Class(Vec<u8>),

    /// Compilation failed
    Diagnostics(Vec<Diagnostic>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        })
    }
}

/// Compiler message about the snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,

    /// 1-based line in the snippet
    pub line: Option<u64>,
}

/// Renders as `error: ';' expected at line 3.`
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(line) = self.line {
            write!(f, " at line {}", line)?;
        }
        f.write_str(".")
    }
}

#[derive(Debug)]
pub enum Error {
    /// Compiler could not be run or its output could not be read
    Io(io::Error),

    /// Compiled class could not be decoded
    Decode(jvm::Error),

    Generate(generate::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<jvm::Error> for Error {
    fn from(err: jvm::Error) -> Error {
        Error::Decode(err)
    }
}

impl From<generate::Error> for Error {
    fn from(err: generate::Error) -> Error {
        Error::Generate(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "failed to run compiler: {}", err),
            Error::Decode(err) => write!(f, "failed to decode compiled class: {}", err),
            Error::Generate(err) => write!(f, "failed to generate script: {}", err),
        }
    }
}

impl std::error::Error for Error {}

/// Final text shown for a snippet
#[derive(Debug, Clone)]
pub enum SnippetOutput {
    Diagnostics(Vec<Diagnostic>),
    Script(GeneratedScript),
}

impl fmt::Display for SnippetOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnippetOutput::Diagnostics(diagnostics) => {
                for diagnostic in diagnostics {
                    writeln!(f, "{}", diagnostic)?;
                }
                Ok(())
            }
            SnippetOutput::Script(script) => fmt::Display::fmt(script, f),
        }
    }
}

/// Compile a snippet and generate the script for `settings.method_name`
pub fn generate_from_snippet<C: SnippetCompiler + ?Sized>(
    compiler: &C,
    source: &str,
    settings: &Settings,
) -> Result<SnippetOutput, Error> {
    let bytes = match compiler.compile(&settings.target_class_name, source)? {
        Compiled::Class(bytes) => bytes,
        Compiled::Diagnostics(diagnostics) => {
            log::info!(
                "Compiling `{}` failed with {} diagnostics",
                settings.target_class_name,
                diagnostics.len()
            );
            return Ok(SnippetOutput::Diagnostics(diagnostics));
        }
    };

    let class = ClassFile::parse(&bytes)?;
    let body = class.method_body(&settings.method_name)?;
    let script = generate(&body, settings)?;
    Ok(SnippetOutput::Script(script))
}

#[cfg(test)]
mod test {
    use super::*;

    struct Failing;

    impl SnippetCompiler for Failing {
        fn compile(&self, _class_name: &str, _source: &str) -> Result<Compiled, Error> {
            Ok(Compiled::Diagnostics(vec![Diagnostic {
                severity: Severity::Error,
                message: String::from("';' expected"),
                line: Some(3),
            }]))
        }
    }

    struct Garbage;

    impl SnippetCompiler for Garbage {
        fn compile(&self, _class_name: &str, _source: &str) -> Result<Compiled, Error> {
            Ok(Compiled::Class(vec![0xDE, 0xAD]))
        }
    }

    #[test]
    fn diagnostics_only() {
        let output = generate_from_snippet(&Failing, DEFAULT_SNIPPET, &Settings::default()).unwrap();
        assert_eq!(output.to_string(), "error: ';' expected at line 3.\n");
    }

    #[test]
    fn diagnostic_without_line() {
        let diagnostic = Diagnostic {
            severity: Severity::Warning,
            message: String::from("no source files"),
            line: None,
        };
        assert_eq!(diagnostic.to_string(), "warning: no source files.");
    }

    #[test]
    fn undecodable_class() {
        assert!(matches!(
            generate_from_snippet(&Garbage, DEFAULT_SNIPPET, &Settings::default()),
            Err(Error::Decode(_))
        ));
    }
}
