#![allow(clippy::write_with_newline)]

use std::io;

use crate::record::FunctionRecord;

const UNLICENSE: &str = r#"/*
 * This file was generated with gl3w_gen.py, part of gl3w
 * (hosted at https://github.com/skaslev/gl3w)
 *
 * This is free and unencumbered software released into the public domain.
 *
 * Anyone is free to copy, modify, publish, use, compile, sell, or
 * distribute this software, either in source code form or as a compiled
 * binary, for any purpose, commercial or non-commercial, and by any
 * means.
 *
 * In jurisdictions that recognize copyright laws, the author or authors
 * of this software dedicate any and all copyright interest in the
 * software to the public domain. We make this dedication for the benefit
 * of the public at large and to the detriment of our heirs and
 * successors. We intend this dedication to be an overt act of
 * relinquishment in perpetuity of all present and future rights to this
 * software under copyright law.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
 * EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
 * MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
 * IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR ANY CLAIM, DAMAGES OR
 * OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE,
 * ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR
 * OTHER DEALINGS IN THE SOFTWARE.
 */

"#;

const HEADER_PRELUDE: &str = r#"#ifndef __gl3w_h_
#define __gl3w_h_

#include <GL/glcorearb.h>

#define _COSMO_SOURCE
#include "libc/dce.h"

#ifndef GL3W_API
#define GL3W_API
#endif

#ifndef __gl_h_
#define __gl_h_
#endif

#ifdef __cplusplus
extern "C" {
#endif

#define GL3W_OK 0
#define GL3W_ERROR_INIT -1
#define GL3W_ERROR_LIBRARY_OPEN -2
#define GL3W_ERROR_OPENGL_VERSION -3

/* gl3w api */
GL3W_API void gl3wInit(void);

/* gl3w internal state */
"#;

const HEADER_EPILOGUE: &str = r#"
#ifdef __cplusplus
}
#endif

#endif
"#;

const SOURCE_PRELUDE: &str = r#"#include <GL/gl3w.h>
#include "SDL.h"
#include "libc/dlopen/dlfcn.h"

static const char *proc_names[] = {
"#;

// the odd indentation of the last two lines is what gl3w has always shipped.
const SOURCE_EPILOGUE: &str = "};

GL3W_API union GL3WProcs gl3wProcs;

void gl3wInit(void)
{
\tsize_t i;

\tfor (i = 0; i < sizeof(proc_names)/sizeof(proc_names[0]); i++) {
\t\tgl3wProcs.ptr[i] = SDL_GL_GetProcAddress(proc_names[i]);
        if (!IsWindows()) gl3wProcs.ptr[i] = cosmo_dltramp(gl3wProcs.ptr[i]);
    }
}
";

// `ptr[i]` aliases the i-th member of both structs, and `proc_names[i]` in gl3w.c.
// all three are emitted from the same slice in the same order.
fn emit_procs_union<W: io::Write>(w: &mut W, records: &[FunctionRecord]) -> io::Result<()> {
    write!(w, "union GL3WProcs {{\n")?;
    write!(w, "\tvoid *ptr[{}];\n", records.len())?;

    write!(w, "\tstruct {{\n")?;
    for record in records.iter() {
        write!(
            w,
            "\t\t{}(* {}) {};\n",
            record.return_type, record.name, record.raw_arglist
        )?;
    }
    write!(w, "\t}} sysv;\n")?;

    write!(w, "\tstruct {{\n")?;
    for record in records.iter() {
        write!(
            w,
            "\t\t{}(* __attribute__((__ms_abi__)) {}) {};\n",
            record.return_type, record.name, record.raw_arglist
        )?;
    }
    write!(w, "\t}} ms;\n")?;
    write!(w, "}};\n\n")?;

    write!(w, "GL3W_API extern union GL3WProcs gl3wProcs;\n\n")?;

    Ok(())
}

// the IsWindows() branch is evaluated on every call so that one binary can talk to
// either an ms_abi or a sysv libGL.
fn emit_dispatch_wrapper<W: io::Write>(w: &mut W, record: &FunctionRecord) -> io::Result<()> {
    let FunctionRecord {
        return_type,
        name,
        raw_arglist,
        call_arglist,
        ..
    } = record;
    let ret = record.return_keyword();

    write!(w, "static {return_type}{name}{raw_arglist}\n")?;
    write!(
        w,
        "{{ if (IsWindows()) {ret}   gl3wProcs.ms.{name}{call_arglist};\n"
    )?;
    write!(
        w,
        "  else             {ret} gl3wProcs.sysv.{name}{call_arglist}; }}\n\n"
    )?;

    Ok(())
}

/// Writes `GL/gl3w.h`.
pub fn generate_header<W: io::Write>(w: &mut W, records: &[FunctionRecord]) -> anyhow::Result<()> {
    w.write_all(UNLICENSE.as_bytes())?;
    w.write_all(HEADER_PRELUDE.as_bytes())?;

    emit_procs_union(w, records)?;

    write!(w, "/* OpenGL functions */\n")?;
    for record in records.iter() {
        emit_dispatch_wrapper(w, record)?;
    }

    w.write_all(HEADER_EPILOGUE.as_bytes())?;
    Ok(())
}

/// Writes `gl3w.c`.
pub fn generate_source<W: io::Write>(w: &mut W, records: &[FunctionRecord]) -> anyhow::Result<()> {
    w.write_all(UNLICENSE.as_bytes())?;
    w.write_all(SOURCE_PRELUDE.as_bytes())?;

    for record in records.iter() {
        write!(w, "\t\"{}\",\n", record.name)?;
    }

    w.write_all(SOURCE_EPILOGUE.as_bytes())?;
    Ok(())
}

#[cfg(test)]
fn test_records() -> Vec<FunctionRecord<'static>> {
    vec![
        FunctionRecord {
            return_type: "GLuint ",
            name: "glCreateProgram",
            raw_arglist: "(void)",
            call_arglist: "()".to_string(),
            returns_value: true,
        },
        FunctionRecord {
            return_type: "void ",
            name: "glClear",
            raw_arglist: "(GLbitfield mask)",
            call_arglist: "(mask)".to_string(),
            returns_value: false,
        },
    ]
}

#[test]
fn test_generate_header() {
    let mut buf: Vec<u8> = Vec::new();
    generate_header(&mut buf, &test_records()).unwrap();
    let header = String::from_utf8(buf).unwrap();

    assert!(header.starts_with("/*\n * This file was generated with gl3w_gen.py"));
    assert!(header.contains("#include <GL/glcorearb.h>\n"));
    assert!(header.contains("GL3W_API void gl3wInit(void);\n"));
    assert!(header.ends_with("#ifdef __cplusplus\n}\n#endif\n\n#endif\n"));

    assert!(header.contains(
        "union GL3WProcs {
\tvoid *ptr[2];
\tstruct {
\t\tGLuint (* glCreateProgram) (void);
\t\tvoid (* glClear) (GLbitfield mask);
\t} sysv;
\tstruct {
\t\tGLuint (* __attribute__((__ms_abi__)) glCreateProgram) (void);
\t\tvoid (* __attribute__((__ms_abi__)) glClear) (GLbitfield mask);
\t} ms;
};

GL3W_API extern union GL3WProcs gl3wProcs;
"
    ));

    assert!(header.contains(
        "static GLuint glCreateProgram(void)
{ if (IsWindows()) return   gl3wProcs.ms.glCreateProgram();
  else             return gl3wProcs.sysv.glCreateProgram(); }
"
    ));
    assert!(header.contains(
        "static void glClear(GLbitfield mask)
{ if (IsWindows())    gl3wProcs.ms.glClear(mask);
  else              gl3wProcs.sysv.glClear(mask); }
"
    ));
}

#[test]
fn test_generate_header_empty() {
    let mut buf: Vec<u8> = Vec::new();
    generate_header(&mut buf, &[]).unwrap();
    let header = String::from_utf8(buf).unwrap();
    assert!(header.contains("\tvoid *ptr[0];\n"));
}

#[test]
fn test_generate_source() {
    let mut buf: Vec<u8> = Vec::new();
    generate_source(&mut buf, &test_records()).unwrap();
    let source = String::from_utf8(buf).unwrap();

    assert!(source.contains(
        "static const char *proc_names[] = {
\t\"glCreateProgram\",
\t\"glClear\",
};
"
    ));
    assert!(source.contains("\t\tgl3wProcs.ptr[i] = SDL_GL_GetProcAddress(proc_names[i]);\n"));
    assert!(source.contains(
        "        if (!IsWindows()) gl3wProcs.ptr[i] = cosmo_dltramp(gl3wProcs.ptr[i]);\n"
    ));
}

#[test]
fn test_name_table_matches_pointer_table() {
    let records = test_records();

    let mut buf: Vec<u8> = Vec::new();
    generate_header(&mut buf, &records).unwrap();
    let header = String::from_utf8(buf).unwrap();

    let mut buf: Vec<u8> = Vec::new();
    generate_source(&mut buf, &records).unwrap();
    let source = String::from_utf8(buf).unwrap();

    let sysv: Vec<&str> = header
        .lines()
        .skip_while(|line| *line != "\tstruct {")
        .skip(1)
        .take_while(|line| *line != "\t} sysv;")
        .filter_map(|line| line.split("(* ").nth(1)?.split(')').next())
        .collect();
    let names: Vec<&str> = source
        .lines()
        .filter_map(|line| line.strip_prefix("\t\"")?.strip_suffix("\","))
        .collect();

    assert_eq!(sysv.len(), records.len());
    assert_eq!(sysv, names);
}
