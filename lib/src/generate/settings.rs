/// Knobs for the generated script
///
/// Names here end up verbatim in the script, so they must be valid Java identifiers.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Binary name of the class a snippet declares (eg. `Container`)
    ///
    /// This only names the source file handed to the compiler. Class constants render as
    /// `target_class_variable` when they name the class actually declaring the decoded method.
    pub target_class_name: String,

    /// Method to decode (the first method with this name is picked)
    pub method_name: String,

    /// Builder class instantiated in the preamble
    pub composer_class: String,

    /// Variable holding the builder
    pub composer_variable: String,

    /// Variable holding the class being built
    pub target_class_variable: String,

    /// Variable holding the constant pool editor of the class being built
    pub constant_pool_editor_variable: String,

    /// Prefix of every chained statement
    pub indent: String,

    /// Append a `// bootstrap: ...` comment to `invokedynamic` statements
    pub annotate_bootstrap_methods: bool,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            target_class_name: String::from("Container"),
            method_name: String::from("main"),
            composer_class: String::from("CompactCodeAttributeComposer"),
            composer_variable: String::from("composer"),
            target_class_variable: String::from("targetClass"),
            constant_pool_editor_variable: String::from("constantPoolEditor"),
            indent: String::from("        "),
            annotate_bootstrap_methods: false,
        }
    }
}
