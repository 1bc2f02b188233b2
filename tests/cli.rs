use std::fs;
use std::path::Path;

use assert_cmd::Command;

const GLCOREARB: &str = "\
#ifndef __gl_glcorearb_h_
#define __gl_glcorearb_h_ 1
GLAPI void APIENTRY glClear (GLbitfield mask);
GLAPI GLuint APIENTRY glCreateProgram (void);
GLAPI void APIENTRY glUniform2f (GLint location, GLfloat v0, GLfloat v1);
GLAPI GLuint64 APIENTRY glGetTextureHandleARB (GLuint texture);
#endif
";

fn seed_root(root: &Path) {
    fs::create_dir_all(root.join("GL")).unwrap();
    fs::create_dir_all(root.join("KHR")).unwrap();
    fs::write(root.join("GL/glcorearb.h"), GLCOREARB).unwrap();
    fs::write(root.join("KHR/khrplatform.h"), "/* khrplatform */\n").unwrap();
}

fn run(root: &Path, ext: bool) {
    let mut cmd = Command::cargo_bin("gl3w-gen").unwrap();
    cmd.arg("--root").arg(root).env_remove("GL3W_ROOT");
    if ext {
        cmd.arg("--ext");
    }
    cmd.assert().success();
}

#[test]
fn test_generates_from_existing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    seed_root(dir.path());

    run(dir.path(), false);

    let header = fs::read_to_string(dir.path().join("GL/gl3w.h")).unwrap();
    let source = fs::read_to_string(dir.path().join("gl3w.c")).unwrap();

    assert!(header.contains("\tvoid *ptr[3];\n"));
    assert!(header.contains("static void glUniform2f(GLint location, GLfloat v0, GLfloat v1)\n"));
    assert!(header.contains("gl3wProcs.sysv.glUniform2f(location,v0,v1); }\n"));
    assert!(!header.contains("glGetTextureHandleARB"));
    assert!(source.contains(
        "static const char *proc_names[] = {\n\t\"glCreateProgram\",\n\t\"glClear\",\n\t\"glUniform2f\",\n};\n"
    ));

    // inputs were reused untouched
    assert_eq!(
        fs::read_to_string(dir.path().join("KHR/khrplatform.h")).unwrap(),
        "/* khrplatform */\n"
    );
}

#[test]
fn test_ext_includes_extensions() {
    let dir = tempfile::tempdir().unwrap();
    seed_root(dir.path());

    run(dir.path(), true);

    let header = fs::read_to_string(dir.path().join("GL/gl3w.h")).unwrap();
    let source = fs::read_to_string(dir.path().join("gl3w.c")).unwrap();
    assert!(header.contains("\tvoid *ptr[4];\n"));
    assert!(source.contains("\t\"glGetTextureHandleARB\",\n"));
}

#[test]
fn test_output_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    seed_root(dir.path());

    run(dir.path(), false);
    let header = fs::read(dir.path().join("GL/gl3w.h")).unwrap();
    let source = fs::read(dir.path().join("gl3w.c")).unwrap();

    run(dir.path(), false);
    assert_eq!(fs::read(dir.path().join("GL/gl3w.h")).unwrap(), header);
    assert_eq!(fs::read(dir.path().join("gl3w.c")).unwrap(), source);
}

#[test]
fn test_fails_when_root_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("not-a-dir");
    fs::write(&root, "").unwrap();

    Command::cargo_bin("gl3w-gen")
        .unwrap()
        .arg("--root")
        .arg(&root)
        .assert()
        .failure();
}
