use super::{Compiled, Diagnostic, Error, Severity, SnippetCompiler};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Compiles snippets by running `javac` in a scratch directory
#[derive(Debug, Clone)]
pub struct JavacCompiler {
    /// `javac` executable
    pub javac: PathBuf,

    /// Value passed to `--release`
    pub release: u32,

    /// Extra classpath the snippet compiles against
    pub classpath: Option<OsString>,
}

impl Default for JavacCompiler {
    fn default() -> JavacCompiler {
        JavacCompiler {
            javac: PathBuf::from("javac"),
            release: 8,
            classpath: None,
        }
    }
}

impl SnippetCompiler for JavacCompiler {
    fn compile(&self, class_name: &str, source: &str) -> Result<Compiled, Error> {
        let scratch = tempfile::Builder::new()
            .prefix("class2composer")
            .tempdir()?;
        let mut segments: Vec<&str> = class_name.split('/').collect();
        let simple_name = segments.pop().unwrap_or(class_name);
        let source_name = format!("{}.java", simple_name);
        let source_file = scratch.path().join(&source_name);
        fs::write(&source_file, source)?;
        let output_dir = scratch.path().join("classes");
        fs::create_dir(&output_dir)?;

        let mut command = Command::new(&self.javac);
        command
            .arg("--release")
            .arg(self.release.to_string())
            .arg("-d")
            .arg(&output_dir);
        if let Some(classpath) = &self.classpath {
            command.arg("-cp").arg(classpath);
        }
        command.arg(&source_file);
        log::info!("Compiling `{}` with {:?}", class_name, self.javac);
        let output = command.output()?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut diagnostics = parse_diagnostics(&stderr, &source_name);
        if !output.status.success() {
            if diagnostics.is_empty() {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    message: format!("javac failed ({}): {}", output.status, stderr.trim()),
                    line: None,
                });
            }
            return Ok(Compiled::Diagnostics(diagnostics));
        }
        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }

        let mut class_file = output_dir;
        for segment in segments {
            class_file.push(segment);
        }
        class_file.push(format!("{}.class", simple_name));
        let bytes = fs::read(&class_file)?;
        log::info!("Read {} bytes from {:?}", bytes.len(), class_file);
        Ok(Compiled::Class(bytes))
    }
}

/// Extract diagnostics from `javac`'s standard error
///
/// Located messages look like `/tmp/x/Container.java:3: error: ';' expected`. They are followed
/// by an echo of the source line and a caret, which get skipped along with the final count.
/// Unlocated messages (eg. option warnings) are only recognized before the first located one,
/// since after that an unlocated line may be an echo of source text like `error: for (...)`.
pub fn parse_diagnostics(stderr: &str, source_name: &str) -> Vec<Diagnostic> {
    let located_prefix = format!("{}:", source_name);
    let mut diagnostics = vec![];
    let mut seen_located = false;
    for line in stderr.lines() {
        let (line_number, rest) = match line.find(&located_prefix) {
            Some(pos) => {
                let rest = &line[pos + located_prefix.len()..];
                match rest.split_once(':') {
                    Some((number, rest)) => match number.trim().parse::<u64>() {
                        Ok(number) => {
                            seen_located = true;
                            (Some(number), rest.trim_start())
                        }
                        Err(_) => continue,
                    },
                    None => continue,
                }
            }
            None if seen_located => continue,
            None => (None, line),
        };

        let severities = [
            ("error: ", Severity::Error),
            ("warning: ", Severity::Warning),
            ("note: ", Severity::Note),
        ];
        for (prefix, severity) in severities {
            if let Some(message) = rest.strip_prefix(prefix) {
                diagnostics.push(Diagnostic {
                    severity,
                    message: message.to_owned(),
                    line: line_number,
                });
                break;
            }
        }
    }
    diagnostics
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn syntax_error() {
        let stderr = "\
/tmp/class2composerAbc/Container.java:3: error: ';' expected
        System.out.println(\"hi\")
                                 ^
1 error
";
        assert_eq!(
            parse_diagnostics(stderr, "Container.java"),
            vec![Diagnostic {
                severity: Severity::Error,
                message: String::from("';' expected"),
                line: Some(3),
            }]
        );
    }

    #[test]
    fn echoed_source_is_not_a_message() {
        let stderr = "\
Container.java:4: error: undefined label: error
error: for (;;) { break error; }
                        ^
Container.java:6: warning: [cast] redundant cast to int
error: while (true) { }
1 error
1 warning
";
        assert_eq!(
            parse_diagnostics(stderr, "Container.java"),
            vec![
                Diagnostic {
                    severity: Severity::Error,
                    message: String::from("undefined label: error"),
                    line: Some(4),
                },
                Diagnostic {
                    severity: Severity::Warning,
                    message: String::from("[cast] redundant cast to int"),
                    line: Some(6),
                },
            ]
        );
    }

    #[test]
    fn mixed_messages() {
        let stderr = "\
warning: [options] bootstrap class path not set in conjunction with -source 8
Container.java:4: warning: [deprecation] Integer(int) in Integer has been deprecated
        Integer x = new Integer(3);
                    ^
Container.java:5: error: cannot find symbol
        foo();
        ^
  symbol:   method foo()
  location: class Container
Note: Some input files use unchecked or unsafe operations.
1 error
2 warnings
";
        let diagnostics = parse_diagnostics(stderr, "Container.java");
        assert_eq!(
            diagnostics
                .iter()
                .map(|diagnostic| diagnostic.to_string())
                .collect::<Vec<_>>(),
            vec![
                "warning: [options] bootstrap class path not set in conjunction with -source 8.",
                "warning: [deprecation] Integer(int) in Integer has been deprecated at line 4.",
                "error: cannot find symbol at line 5.",
            ]
        );
    }
}
