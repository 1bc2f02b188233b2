use anyhow::Context as _;
use regex::Regex;

use crate::record::FunctionRecord;

/// Name suffixes of vendor extension functions. Matched with `ends_with`, so any name
/// that happens to end in these letters is treated as an extension too.
pub const EXTENSION_SUFFIXES: &[&str] = &["ARB", "EXT", "KHR", "OVR", "NV", "AMD", "INTEL"];

// GLAPI <return type>APIENTRY <name><anything but '('>(<args>);
//
// return type keeps whatever whitespace stood before APIENTRY.
const DECLARATION_PATTERN: &str = r"GLAPI\s+(.+?)APIENTRY\s+(\w+)[^(]*([^;]+);";

// replace_all with the capture: "(int one, void *two)" -> "one,two)"
const PARAM_NAME_PATTERN: &str = r"[^,)]*?(\w+[,)])";

pub fn is_extension(name: &str) -> bool {
    EXTENSION_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

pub struct Extractor {
    declaration: Regex,
    param_name: Regex,
}

impl Extractor {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            declaration: Regex::new(DECLARATION_PATTERN)
                .context("could not compile declaration pattern")?,
            param_name: Regex::new(PARAM_NAME_PATTERN)
                .context("could not compile param name pattern")?,
        })
    }

    /// Returns `None` for anything that is not a single-line `GLAPI` declaration.
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<FunctionRecord<'a>> {
        let captures = self.declaration.captures(line)?;
        let return_type = captures.get(1)?.as_str();
        let name = captures.get(2)?.as_str();
        let raw_arglist = captures.get(3)?.as_str();

        let call_arglist = if raw_arglist == "(void)" {
            "()".to_string()
        } else {
            format!("({}", self.param_name.replace_all(raw_arglist, "${1}"))
        };

        Some(FunctionRecord {
            return_type,
            name,
            raw_arglist,
            call_arglist,
            returns_value: return_type.trim() != "void",
        })
    }

    /// Every declaration in file order. Duplicates are kept.
    pub fn parse_header<'a>(&self, header: &'a str) -> Vec<FunctionRecord<'a>> {
        header
            .lines()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }
}

/// Parses `header`, optionally drops extension functions and sorts what is left.
pub fn extract(header: &str, include_extensions: bool) -> anyhow::Result<Vec<FunctionRecord<'_>>> {
    let extractor = Extractor::new()?;

    let mut records = extractor.parse_header(header);
    if !include_extensions {
        records.retain(|record| {
            if is_extension(record.name) {
                log::debug!("skipping extension function {}", record.name);
                false
            } else {
                true
            }
        });
    }
    // NOTE: whole-record ordering, not name-only. glCreateProgram ("GLuint ") sorts
    // before glClear ("void ").
    records.sort();

    Ok(records)
}

#[cfg(test)]
const HEADER: &str = r#"
#ifndef __gl_glcorearb_h_
#define __gl_glcorearb_h_ 1
/* comment mentioning GLAPI void APIENTRY but no declaration */
typedef void (APIENTRYP PFNGLCLEARPROC) (GLbitfield mask);
GLAPI void APIENTRY glClear (GLbitfield mask);
GLAPI GLuint APIENTRY glCreateProgram (void);
GLAPI const GLubyte *APIENTRY glGetString (GLenum name);
GLAPI void APIENTRY glUniform2f (GLint location, GLfloat v0, GLfloat v1);
GLAPI void APIENTRY glDrawElements (GLenum mode, GLsizei count, GLenum type, const void *indices);
GLAPI void APIENTRY glShaderSource (GLuint shader, GLsizei count, const GLchar *const*string, const GLint *length);
GLAPI void APIENTRY glMaxShaderCompilerThreadsKHR (GLuint count);
GLAPI void APIENTRY glDrawArraysIndirectINTEL (GLenum mode);
GLAPI GLuint64 APIENTRY glGetTextureHandleARB (GLuint texture);

#endif
"#;

#[test]
fn test_parse_line() {
    let extractor = Extractor::new().unwrap();

    let clear = extractor
        .parse_line("GLAPI void APIENTRY glClear (GLbitfield mask);")
        .unwrap();
    assert_eq!(clear.return_type, "void ");
    assert_eq!(clear.name, "glClear");
    assert_eq!(clear.raw_arglist, "(GLbitfield mask)");
    assert_eq!(clear.call_arglist, "(mask)");
    assert!(!clear.returns_value);

    let create_program = extractor
        .parse_line("GLAPI GLuint APIENTRY glCreateProgram (void);")
        .unwrap();
    assert_eq!(create_program.return_type, "GLuint ");
    assert_eq!(create_program.name, "glCreateProgram");
    assert_eq!(create_program.raw_arglist, "(void)");
    assert_eq!(create_program.call_arglist, "()");
    assert!(create_program.returns_value);
}

#[test]
fn test_parse_line_pointer_return_type() {
    let extractor = Extractor::new().unwrap();
    let get_string = extractor
        .parse_line("GLAPI const GLubyte *APIENTRY glGetString (GLenum name);")
        .unwrap();
    assert_eq!(get_string.return_type, "const GLubyte *");
    assert_eq!(get_string.call_arglist, "(name)");
    assert!(get_string.returns_value);
}

#[test]
fn test_parse_line_strips_param_types() {
    let extractor = Extractor::new().unwrap();

    let record = extractor
        .parse_line("GLAPI void APIENTRY glFoo (GLint x, GLfloat *y);")
        .unwrap();
    assert_eq!(record.call_arglist, "(x,y)");

    let record = extractor
        .parse_line("GLAPI void APIENTRY glShaderSource (GLuint shader, GLsizei count, const GLchar *const*string, const GLint *length);")
        .unwrap();
    assert_eq!(record.call_arglist, "(shader,count,string,length)");
}

#[test]
fn test_parse_line_skips_calling_convention_macros() {
    let extractor = Extractor::new().unwrap();
    let record = extractor
        .parse_line("GLAPI void APIENTRY glFinish GL_NOEXCEPT (void);")
        .unwrap();
    assert_eq!(record.name, "glFinish");
    assert_eq!(record.raw_arglist, "(void)");
}

#[test]
fn test_parse_line_rejects_non_declarations() {
    let extractor = Extractor::new().unwrap();
    assert!(extractor.parse_line("").is_none());
    assert!(extractor.parse_line("#define GL_VERSION_1_0 1").is_none());
    assert!(
        extractor
            .parse_line("typedef void (APIENTRYP PFNGLCLEARPROC) (GLbitfield mask);")
            .is_none()
    );
    assert!(
        extractor
            .parse_line("/* comment mentioning GLAPI void APIENTRY but no declaration */")
            .is_none()
    );
}

#[test]
fn test_call_arglist_has_as_many_params_as_raw_arglist() {
    let extractor = Extractor::new().unwrap();
    for record in extractor.parse_header(HEADER) {
        let raw_count = if record.raw_arglist == "(void)" {
            0
        } else {
            record.raw_arglist.split(',').count()
        };
        let call_count = if record.call_arglist == "()" {
            0
        } else {
            record.call_arglist.split(',').count()
        };
        assert_eq!(raw_count, call_count, "{}", record.name);
    }
}

#[test]
fn test_parse_header_keeps_duplicates() {
    let extractor = Extractor::new().unwrap();
    let header = "GLAPI void APIENTRY glFlush (void);\nGLAPI void APIENTRY glFlush (void);\n";
    let records = extractor.parse_header(header);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], records[1]);
}

#[test]
fn test_is_extension() {
    assert!(is_extension("glGetTextureHandleARB"));
    assert!(is_extension("glMaxShaderCompilerThreadsKHR"));
    assert!(is_extension("glFooNV"));
    assert!(is_extension("glBarINTEL"));
    assert!(!is_extension("glClear"));
    assert!(!is_extension("glNVFoo"));
}

#[test]
fn test_extract_without_extensions() {
    let records = extract(HEADER, false).unwrap();
    assert_eq!(records.len(), 6);
    assert!(records.iter().all(|record| !is_extension(record.name)));
}

#[test]
fn test_extract_with_extensions() {
    let all = Extractor::new().unwrap().parse_header(HEADER);
    let records = extract(HEADER, true).unwrap();
    assert_eq!(records.len(), all.len());
    assert_eq!(records.len(), 9);
}

#[test]
fn test_extract_order() {
    let records = extract(
        "GLAPI void APIENTRY glClear (GLbitfield mask);\nGLAPI GLuint APIENTRY glCreateProgram (void);\n",
        false,
    )
    .unwrap();
    let names: Vec<&str> = records.iter().map(|record| record.name).collect();
    assert_eq!(names, ["glCreateProgram", "glClear"]);

    let names: Vec<&str> = extract(HEADER, false)
        .unwrap()
        .iter()
        .map(|record| record.name)
        .collect();
    assert_eq!(
        names,
        [
            "glCreateProgram",
            "glGetString",
            "glClear",
            "glDrawElements",
            "glShaderSource",
            "glUniform2f",
        ]
    );
}

#[test]
fn test_extract_is_deterministic() {
    assert_eq!(extract(HEADER, true).unwrap(), extract(HEADER, true).unwrap());
}
