use class2composer::generate::{generate, Settings};
use class2composer::jvm::class_file::ClassFile;
use class2composer::snippet::{self, generate_from_snippet, JavacCompiler, SnippetOutput};

use clap::{crate_version, value_parser, Arg, ArgAction, Command};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process;

fn main() -> Result<(), snippet::Error> {
    env_logger::init();

    let matches = Command::new("Class to composer converter")
        .version(crate_version!())
        .author("Alec Theriault <alec.theriault@gmail.com>")
        .about("Print the CompactCodeAttributeComposer calls that rebuild a method's bytecode")
        .arg(
            Arg::new("class-name")
                .long("class-name")
                .value_name("CLASS_NAME")
                .default_value("Container")
                .help("Class declared by a `.java` input (eg. `foo/bar/Baz`)"),
        )
        .arg(
            Arg::new("method")
                .long("method")
                .value_name("METHOD_NAME")
                .default_value("main")
                .help("Method to rebuild (the first one with this name)"),
        )
        .arg(
            Arg::new("classpath")
                .long("classpath")
                .value_name("CLASSPATH")
                .value_parser(value_parser!(OsString))
                .help("Classpath used when compiling a `.java` input"),
        )
        .arg(
            Arg::new("javac")
                .long("javac")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("javac")
                .help("Sets the `javac` executable to use"),
        )
        .arg(
            Arg::new("release")
                .long("release")
                .value_name("VERSION")
                .value_parser(value_parser!(u32))
                .default_value("8")
                .help("Java release to compile `.java` inputs for"),
        )
        .arg(
            Arg::new("annotate-bootstrap")
                .long("annotate-bootstrap")
                .action(ArgAction::SetTrue)
                .help("Comment `invokedynamic` calls with their bootstrap method"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Write the script to a file instead of standard output"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Java source (`.java`) or class file to read")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .index(1),
        )
        .get_matches();

    let mut settings = Settings::default();
    if let Some(class_name) = matches.get_one::<String>("class-name") {
        settings.target_class_name = class_name.clone();
    }
    if let Some(method) = matches.get_one::<String>("method") {
        settings.method_name = method.clone();
    }
    settings.annotate_bootstrap_methods = matches.get_flag("annotate-bootstrap");

    let input = matches
        .get_one::<PathBuf>("INPUT")
        .expect("INPUT is required");
    let is_source = input.extension().map_or(false, |ext| ext == "java");

    let output = if is_source {
        let mut compiler = JavacCompiler {
            classpath: matches.get_one::<OsString>("classpath").cloned(),
            ..JavacCompiler::default()
        };
        if let Some(javac) = matches.get_one::<PathBuf>("javac") {
            compiler.javac = javac.clone();
        }
        if let Some(release) = matches.get_one::<u32>("release") {
            compiler.release = *release;
        }

        log::info!("Reading '{}'", input.display());
        let source = fs::read_to_string(input)?;
        generate_from_snippet(&compiler, &source, &settings)?
    } else {
        log::info!("Decoding '{}'", input.display());
        let class = ClassFile::load_from_path(input)?;
        let body = class.method_body(&settings.method_name)?;
        SnippetOutput::Script(generate(&body, &settings)?)
    };

    let text = output.to_string();
    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            log::info!("Writing '{}'", path.display());
            fs::write(path, text)?;
        }
        None => print!("{}", text),
    }

    if let SnippetOutput::Diagnostics(_) = output {
        process::exit(1);
    }
    Ok(())
}
