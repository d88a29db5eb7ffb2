use super::{Error, Settings, StringLiteral};
use crate::jvm::class_file::BootstrapMethod;
use crate::jvm::code::MethodBody;
use crate::jvm::{Constant, ConstantIndex, ConstantPool};

/// Argument text for an instruction referencing the constant pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantArgument {
    pub text: String,

    /// Argument registers a new class constant in the pool being built
    ///
    /// `ldc` needs to pick a different builder method for those.
    pub registers_class: bool,

    /// Trailing comment for the statement
    pub comment: Option<String>,
}

impl ConstantArgument {
    fn plain(text: String) -> ConstantArgument {
        ConstantArgument {
            text,
            registers_class: false,
            comment: None,
        }
    }
}

/// Renders constant pool entries as builder method arguments
pub struct ConstantRenderer<'a> {
    /// Class declaring the method, whose class constants render as the target class variable
    class_name: &'a str,
    constants: &'a ConstantPool,
    bootstrap_methods: &'a [BootstrapMethod],
    settings: &'a Settings,
}

impl<'a> ConstantRenderer<'a> {
    pub fn new(body: &'a MethodBody<'_>, settings: &'a Settings) -> ConstantRenderer<'a> {
        ConstantRenderer {
            class_name: body.class_name,
            constants: body.constants,
            bootstrap_methods: &body.bootstrap_methods,
            settings,
        }
    }

    pub fn render(&self, index: ConstantIndex) -> Result<ConstantArgument, Error> {
        let text = match self.constants.get(index)? {
            Constant::Integer(integer) => integer.to_string(),
            Constant::Long(long) => format!("{}L", long),
            Constant::Float(float) => float_literal(*float),
            Constant::Double(double) => double_literal(*double),
            Constant::Utf8(string) => StringLiteral(string).to_string(),
            Constant::String(string) => StringLiteral(self.constants.utf8(*string)?).to_string(),
            Constant::Class(name) => {
                let name = self.constants.utf8(*name)?;
                if name == self.class_name {
                    self.settings.target_class_variable.clone()
                } else {
                    return Ok(ConstantArgument {
                        text: format!(
                            "{}.addClassConstant({}, null)",
                            self.settings.constant_pool_editor_variable,
                            StringLiteral(name)
                        ),
                        registers_class: true,
                        comment: None,
                    });
                }
            }
            Constant::FieldRef(..) | Constant::MethodRef { .. } => {
                let member = self.constants.member(index)?;
                format!(
                    "{}, {}, {}",
                    StringLiteral(member.owner),
                    StringLiteral(member.name),
                    StringLiteral(member.descriptor)
                )
            }
            Constant::InvokeDynamic {
                bootstrap_method,
                method_descriptor,
            } => {
                let (name, descriptor) = self.constants.name_and_type(*method_descriptor)?;
                let text = format!(
                    "{}, {}, {}",
                    bootstrap_method,
                    StringLiteral(name),
                    StringLiteral(descriptor)
                );
                let target = self.bootstrap_target(*bootstrap_method);
                log::debug!(
                    "Bootstrap method {} of `{}` is {}",
                    bootstrap_method,
                    name,
                    target.as_deref().unwrap_or("unresolved")
                );
                let comment = target
                    .filter(|_| self.settings.annotate_bootstrap_methods)
                    .map(|target| format!("bootstrap: {}", target));
                return Ok(ConstantArgument {
                    text,
                    registers_class: false,
                    comment,
                });
            }
            other @ (Constant::NameAndType { .. }
            | Constant::MethodHandle { .. }
            | Constant::MethodType { .. }
            | Constant::Dynamic { .. }
            | Constant::Module(_)
            | Constant::Package(_)) => {
                let description = self.constants.describe(index);
                log::warn!(
                    "No dedicated rendering for constant #{} ({}), quoting it as {:?}",
                    index.0,
                    other,
                    description
                );
                StringLiteral(&description).to_string()
            }
        };
        Ok(ConstantArgument::plain(text))
    }

    /// Readable `owner.name` of the method behind a bootstrap method entry
    pub fn bootstrap_target(&self, bootstrap_method: u16) -> Option<String> {
        let entry = self.bootstrap_methods.get(bootstrap_method as usize)?;
        match self.constants.get(entry.method_ref).ok()? {
            Constant::MethodHandle { member, .. } => {
                let member = self.constants.member(*member).ok()?;
                Some(format!("{}.{}", member.owner, member.name))
            }
            _ => None,
        }
    }
}

fn float_literal(value: f32) -> String {
    if value.is_nan() {
        String::from("Float.NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 {
            "Float.POSITIVE_INFINITY"
        } else {
            "Float.NEGATIVE_INFINITY"
        })
    } else {
        format!("{:?}f", value)
    }
}

fn double_literal(value: f64) -> String {
    if value.is_nan() {
        String::from("Double.NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 {
            "Double.POSITIVE_INFINITY"
        } else {
            "Double.NEGATIVE_INFINITY"
        })
    } else {
        format!("{:?}", value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_file::BootstrapMethod;
    use crate::jvm::{
        ClassConstantIndex, HandleKind, MethodAccessFlags, NameAndTypeConstantIndex,
        Utf8ConstantIndex,
    };
    use crate::util::Offset;

    fn utf8(pool: &mut ConstantPool, string: &str) -> Utf8ConstantIndex {
        Utf8ConstantIndex(pool.push(Constant::Utf8(String::from(string))))
    }

    fn body<'a>(constants: &'a ConstantPool, bootstrap: Vec<BootstrapMethod>) -> MethodBody<'a> {
        MethodBody {
            class_name: "Container",
            method_name: "main",
            descriptor: "([Ljava/lang/String;)V",
            access_flags: MethodAccessFlags::STATIC,
            instructions: vec![],
            code_length: Offset(0),
            constants,
            exception_table: vec![],
            bootstrap_methods: bootstrap,
        }
    }

    #[test]
    fn numbers() {
        let mut pool = ConstantPool::new();
        let int = pool.push(Constant::Integer(-70000));
        let long = pool.push(Constant::Long(1 << 40));
        let float = pool.push(Constant::Float(1.5));
        let whole = pool.push(Constant::Double(2.0));
        let nan = pool.push(Constant::Float(f32::NAN));
        let inf = pool.push(Constant::Double(f64::NEG_INFINITY));
        let settings = Settings::default();
        let body = body(&pool, vec![]);
        let renderer = ConstantRenderer::new(&body, &settings);

        let text = |index| renderer.render(index).unwrap().text;
        assert_eq!(text(int), "-70000");
        assert_eq!(text(long), "1099511627776L");
        assert_eq!(text(float), "1.5f");
        assert_eq!(text(whole), "2.0");
        assert_eq!(text(nan), "Float.NaN");
        assert_eq!(text(inf), "Double.NEGATIVE_INFINITY");
    }

    #[test]
    fn strings_are_escaped() {
        let mut pool = ConstantPool::new();
        let raw = utf8(&mut pool, "say \"hi\"\n");
        let string = pool.push(Constant::String(raw));
        let settings = Settings::default();
        let body = body(&pool, vec![]);
        let renderer = ConstantRenderer::new(&body, &settings);

        assert_eq!(
            renderer.render(string).unwrap(),
            ConstantArgument::plain(String::from("\"say \\\"hi\\\"\\n\""))
        );
        assert_eq!(renderer.render(raw.0).unwrap().text, "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn classes() {
        let mut pool = ConstantPool::new();
        let own_name = utf8(&mut pool, "Container");
        let own = pool.push(Constant::Class(own_name));
        let other_name = utf8(&mut pool, "java/util/List");
        let other = pool.push(Constant::Class(other_name));
        let settings = Settings::default();
        let body = body(&pool, vec![]);
        let renderer = ConstantRenderer::new(&body, &settings);

        let own = renderer.render(own).unwrap();
        assert_eq!(own.text, "targetClass");
        assert!(!own.registers_class);

        let other = renderer.render(other).unwrap();
        assert_eq!(
            other.text,
            "constantPoolEditor.addClassConstant(\"java/util/List\", null)"
        );
        assert!(other.registers_class);
    }

    #[test]
    fn members_and_dynamic_call_sites() {
        let mut pool = ConstantPool::new();
        let owner_name = utf8(&mut pool, "java/lang/System");
        let owner = ClassConstantIndex(pool.push(Constant::Class(owner_name)));
        let name = utf8(&mut pool, "out");
        let descriptor = utf8(&mut pool, "Ljava/io/PrintStream;");
        let name_and_type =
            NameAndTypeConstantIndex(pool.push(Constant::NameAndType { name, descriptor }));
        let field = pool.push(Constant::FieldRef(owner, name_and_type));

        let factory_name = utf8(&mut pool, "java/lang/invoke/LambdaMetafactory");
        let factory = ClassConstantIndex(pool.push(Constant::Class(factory_name)));
        let meta_name = utf8(&mut pool, "metafactory");
        let meta_desc = utf8(&mut pool, "()Ljava/lang/invoke/CallSite;");
        let meta_nat = NameAndTypeConstantIndex(pool.push(Constant::NameAndType {
            name: meta_name,
            descriptor: meta_desc,
        }));
        let meta = pool.push(Constant::MethodRef {
            class: factory,
            name_and_type: meta_nat,
            is_interface: false,
        });
        let handle = pool.push(Constant::MethodHandle {
            handle_kind: HandleKind::InvokeStatic,
            member: meta,
        });
        let run = utf8(&mut pool, "run");
        let run_desc = utf8(&mut pool, "()Ljava/lang/Runnable;");
        let run_nat = NameAndTypeConstantIndex(pool.push(Constant::NameAndType {
            name: run,
            descriptor: run_desc,
        }));
        let indy = pool.push(Constant::InvokeDynamic {
            bootstrap_method: 0,
            method_descriptor: run_nat,
        });

        let bootstrap = vec![BootstrapMethod {
            method_ref: handle,
            arguments: vec![],
        }];
        let mut settings = Settings::default();
        let body = body(&pool, bootstrap);

        let renderer = ConstantRenderer::new(&body, &settings);
        assert_eq!(
            renderer.render(field).unwrap().text,
            "\"java/lang/System\", \"out\", \"Ljava/io/PrintStream;\""
        );
        let call_site = renderer.render(indy).unwrap();
        assert_eq!(call_site.text, "0, \"run\", \"()Ljava/lang/Runnable;\"");
        assert_eq!(call_site.comment, None);
        assert_eq!(
            renderer.bootstrap_target(0).as_deref(),
            Some("java/lang/invoke/LambdaMetafactory.metafactory")
        );
        assert_eq!(renderer.bootstrap_target(1), None);

        settings.annotate_bootstrap_methods = true;
        let renderer = ConstantRenderer::new(&body, &settings);
        assert_eq!(
            renderer.render(indy).unwrap().comment.as_deref(),
            Some("bootstrap: java/lang/invoke/LambdaMetafactory.metafactory")
        );

        // no dedicated rendering for method handles
        assert_eq!(
            renderer.render(handle).unwrap().text,
            "\"InvokeStatic java/lang/invoke/LambdaMetafactory.metafactory:()Ljava/lang/invoke/CallSite;\""
        );
    }

    #[test]
    fn missing_constant() {
        let pool = ConstantPool::new();
        let settings = Settings::default();
        let body = body(&pool, vec![]);
        let renderer = ConstantRenderer::new(&body, &settings);
        assert!(matches!(
            renderer.render(ConstantIndex(3)),
            Err(Error::Constants(_))
        ));
    }
}
