/// One `GLAPI ... APIENTRY name(...)` declaration pulled out of glcorearb.h.
///
/// Field order matters: the derived `Ord` compares the whole record field by field,
/// which is the order the generated files list functions in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FunctionRecord<'a> {
    /// Text between `GLAPI` and `APIENTRY`, as written (`"void "`, `"const GLubyte *"`).
    pub return_type: &'a str,
    pub name: &'a str,
    /// `(GLint x, GLfloat *y)`
    pub raw_arglist: &'a str,
    /// `(x,y)`
    pub call_arglist: String,
    pub returns_value: bool,
}

impl FunctionRecord<'_> {
    pub fn return_keyword(&self) -> &'static str {
        if self.returns_value { "return" } else { "" }
    }
}

#[test]
fn test_return_keyword() {
    let mut record = FunctionRecord {
        return_type: "GLuint ",
        name: "glCreateProgram",
        raw_arglist: "(void)",
        call_arglist: "()".to_string(),
        returns_value: true,
    };
    assert_eq!(record.return_keyword(), "return");
    record.returns_value = false;
    assert_eq!(record.return_keyword(), "");
}

#[test]
fn test_ord_compares_return_type_first() {
    let clear = FunctionRecord {
        return_type: "void ",
        name: "glClear",
        raw_arglist: "(GLbitfield mask)",
        call_arglist: "(mask)".to_string(),
        returns_value: false,
    };
    let create_program = FunctionRecord {
        return_type: "GLuint ",
        name: "glCreateProgram",
        raw_arglist: "(void)",
        call_arglist: "()".to_string(),
        returns_value: true,
    };
    assert!(create_program < clear);
}
