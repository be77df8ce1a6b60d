//! Build system integration tests
//!
//! End-to-end script generation over complete on-disk projects.

use mortar_build::{Builder, Profile};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a project with a manifest and source files
fn create_project(root: &Path, dir: &str, manifest: &str, files: &[(&str, &str)]) {
    let path = root.join(dir);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("mortar.toml"), manifest).unwrap();
    for (file_path, content) in files {
        let full_path = path.join(file_path);
        fs::create_dir_all(full_path.parent().unwrap()).unwrap();
        fs::write(full_path, content).unwrap();
    }
}

fn workspace_fixture(root: &Path) {
    create_project(
        root,
        "viewer",
        r#"
[package]
name = "viewer"
version = "0.4.0"

[standards]
cxx = "17"

[settings]
compile-options = ["-Wall"]

[settings.release]
compile-options = ["-O3"]

[dependencies]
imagelib = { path = "../imagelib" }
mathutil = { path = "../mathutil" }
"#,
        &[
            ("apps/viewer.cpp", "int main() { return 0; }\n"),
            ("apps/tools/thumbs.cpp", "int main() { return 0; }\n"),
            ("src/window.cpp", "// window\n"),
        ],
    );
    create_project(
        root,
        "imagelib",
        r#"
[package]
name = "imagelib"
version = "2.3.1"
kind = "shared"

[dependencies]
mathutil = { path = "../mathutil" }
"#,
        &[
            ("src/decode.cpp", "// decode\n"),
            ("include/imagelib/decode.hpp", "// api\n"),
            ("apps/identify.cpp", "int main() { return 0; }\n"),
        ],
    );
    create_project(
        root,
        "mathutil",
        r#"
[package]
name = "mathutil"
version = "1.0.2"
kind = "header-only"
"#,
        &[("include/mathutil/vec.hpp", "// header\n")],
    );
}

#[test]
fn test_full_workspace_script() {
    let temp = TempDir::new().unwrap();
    workspace_fixture(temp.path());

    let builder = Builder::new(temp.path().join("viewer")).unwrap();
    let generation = builder.generate().unwrap();
    let text = fs::read_to_string(&generation.script_path).unwrap();

    // Header first, project declaration second.
    assert!(text.starts_with("cmake_minimum_required(VERSION 3.10)\n"));
    assert!(text.contains("project(viewer VERSION 0.4.0 LANGUAGES C CXX)"));

    // Leaf-first: mathutil (leaf), imagelib, then the root's units.
    let mathutil_pos = text.find("include_directories(").unwrap();
    let imagelib_pos = text.find("add_library(imagelib SHARED").unwrap();
    let viewer_pos = text.find("add_executable(viewer_viewer").unwrap();
    assert!(mathutil_pos < imagelib_pos);
    assert!(imagelib_pos < viewer_pos);

    // One unit per entry point, id derived from the sub-path.
    assert!(text.contains("add_executable(viewer_tools_thumbs"));
    assert!(text.contains("RUNTIME_OUTPUT_DIRECTORY \"${CMAKE_BINARY_DIR}/bin/tools\""));

    // Library demo linked against the library it demonstrates.
    assert!(text.contains("add_executable(imagelib_identify"));
    assert!(text.contains("target_link_libraries(imagelib_identify PRIVATE imagelib)"));

    // Header-only dependencies contribute no link target.
    assert!(text.contains("target_link_libraries(viewer_viewer PRIVATE imagelib)"));

    // Version components surface as defines.
    assert!(text.contains("IMAGELIB_VERSION_MAJOR=2 IMAGELIB_VERSION_MINOR=3 IMAGELIB_VERSION_PATCH=1"));
}

#[test]
fn test_release_profile_changes_script() {
    let temp = TempDir::new().unwrap();
    workspace_fixture(temp.path());

    let debug = Builder::new(temp.path().join("viewer"))
        .unwrap()
        .generate()
        .unwrap();
    let debug_text = fs::read_to_string(&debug.script_path).unwrap();

    let release = Builder::new(temp.path().join("viewer"))
        .unwrap()
        .with_profile(Profile::Release)
        .generate()
        .unwrap();
    let release_text = fs::read_to_string(&release.script_path).unwrap();

    assert!(debug_text.contains("target_compile_options(viewer_viewer PRIVATE -Wall)"));
    assert!(release_text.contains("target_compile_options(viewer_viewer PRIVATE -Wall -O3)"));
}

#[test]
fn test_link_options_raise_declared_minimum() {
    let temp = TempDir::new().unwrap();
    create_project(
        temp.path(),
        "app",
        r#"
[package]
name = "app"
version = "1.0.0"

[settings]
link-options = ["-static-libstdc++"]
"#,
        &[("apps/main.cpp", "int main() { return 0; }\n")],
    );

    let builder = Builder::new(temp.path().join("app")).unwrap();
    let generation = builder.generate().unwrap();
    let text = fs::read_to_string(&generation.script_path).unwrap();

    assert!(text.starts_with("cmake_minimum_required(VERSION 3.13)\n"));
    assert!(text.contains("target_link_options(app_main PRIVATE -static-libstdc++)"));
}

#[test]
fn test_repeat_generation_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    workspace_fixture(temp.path());

    let builder = Builder::new(temp.path().join("viewer")).unwrap();
    let first = fs::read_to_string(builder.generate().unwrap().script_path).unwrap();
    let second = fs::read_to_string(builder.generate().unwrap().script_path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_incompatible_majors_abort_before_synthesis() {
    let temp = TempDir::new().unwrap();
    create_project(
        temp.path(),
        "app",
        r#"
[package]
name = "app"
version = "1.0.0"

[dependencies]
first = { path = "../first" }
second = { path = "../second" }
"#,
        &[("apps/main.cpp", "int main() { return 0; }\n")],
    );
    create_project(
        temp.path(),
        "first",
        "[package]\nname = \"first\"\nversion = \"1.0.0\"\nkind = \"static\"\n\n[dependencies]\nlib = { path = \"../lib-v1\" }\n",
        &[("src/f.cpp", "// f\n")],
    );
    create_project(
        temp.path(),
        "second",
        "[package]\nname = \"second\"\nversion = \"1.0.0\"\nkind = \"static\"\n\n[dependencies]\nlib = { path = \"../lib-v2\" }\n",
        &[("src/s.cpp", "// s\n")],
    );
    create_project(
        temp.path(),
        "lib-v1",
        "[package]\nname = \"lib\"\nversion = \"1.9.0\"\nkind = \"static\"\n",
        &[("src/l.cpp", "// l\n")],
    );
    create_project(
        temp.path(),
        "lib-v2",
        "[package]\nname = \"lib\"\nversion = \"2.0.0\"\nkind = \"static\"\n",
        &[("src/l.cpp", "// l\n")],
    );

    let builder = Builder::new(temp.path().join("app")).unwrap();
    let error = builder.generate().unwrap_err().to_string();
    assert!(error.contains("lib"));
    assert!(error.contains("incompatible major"));

    // Nothing half-written.
    assert!(!temp.path().join("app/build/CMakeLists.txt").exists());
}
