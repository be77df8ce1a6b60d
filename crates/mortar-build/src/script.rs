//! Build-script accumulation
//!
//! An ordered, append-only sequence of CMake directives. Components
//! append through the typed operations below; serialization writes one
//! line per directive, verbatim, in append order. The accumulator never
//! reorders or deduplicates anything; that is the resolver's and
//! synthesizer's job.
//!
//! A `(major, minor)` minimum-generator-version watermark only ever
//! rises: operations that need newer CMake raise it, and serialization
//! declares it in the leading `cmake_minimum_required` line.

use std::path::Path;

/// Baseline CMake version every generated script requires
pub const BASELINE_VERSION: (u32, u32) = (3, 10);

/// Scope tier of a per-unit option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Public,
    Interface,
}

impl Visibility {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Public => "PUBLIC",
            Self::Interface => "INTERFACE",
        }
    }
}

/// Library flavor for `add_library`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Static,
    Shared,
    Interface,
}

impl LibraryKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Static => "STATIC",
            Self::Shared => "SHARED",
            Self::Interface => "INTERFACE",
        }
    }
}

/// Language of a per-unit standard setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cxx,
}

impl Language {
    fn standard_property(&self) -> &'static str {
        match self {
            Self::C => "C_STANDARD",
            Self::Cxx => "CXX_STANDARD",
        }
    }
}

/// Ordered build-script accumulator
#[derive(Debug, Clone, Default)]
pub struct CMakeScript {
    directives: Vec<String>,
    min_version: Option<(u32, u32)>,
}

impl CMakeScript {
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            min_version: None,
        }
    }

    /// Raise the minimum generator version; never lowers it.
    pub fn require_version(&mut self, major: u32, minor: u32) {
        let current = self.min_version.unwrap_or(BASELINE_VERSION);
        self.min_version = Some(current.max((major, minor)));
    }

    /// Current watermark
    pub fn min_version(&self) -> (u32, u32) {
        self.min_version.unwrap_or(BASELINE_VERSION)
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Declare the top-level project
    pub fn project(&mut self, name: &str, version: &semver::Version) {
        self.push(format!(
            "project({} VERSION {} LANGUAGES C CXX)",
            name, version
        ));
    }

    /// Declare an executable unit from a source list
    pub fn add_executable(&mut self, unit: &str, sources: &[impl AsRef<Path>]) {
        if sources.is_empty() {
            return;
        }
        self.push(format!("add_executable({} {})", unit, path_list(sources)));
    }

    /// Declare a library unit; `Interface` libraries carry no sources
    pub fn add_library(&mut self, unit: &str, kind: LibraryKind, sources: &[impl AsRef<Path>]) {
        match kind {
            LibraryKind::Interface => {
                self.push(format!("add_library({} INTERFACE)", unit));
            }
            _ => {
                if sources.is_empty() {
                    return;
                }
                self.push(format!(
                    "add_library({} {} {})",
                    unit,
                    kind.keyword(),
                    path_list(sources)
                ));
            }
        }
    }

    /// Set a unit's output file name
    pub fn set_output_name(&mut self, unit: &str, name: &str) {
        self.push(format!(
            "set_target_properties({} PROPERTIES OUTPUT_NAME \"{}\")",
            unit, name
        ));
    }

    /// Set the directory a unit's executable lands in
    pub fn set_output_directory(&mut self, unit: &str, dir: &str) {
        self.push(format!(
            "set_target_properties({} PROPERTIES RUNTIME_OUTPUT_DIRECTORY \"{}\")",
            unit, dir
        ));
    }

    /// Pin a unit's language standard
    pub fn set_standard(&mut self, unit: &str, language: Language, standard: &str) {
        let property = language.standard_property();
        self.push(format!(
            "set_target_properties({} PROPERTIES {} {} {}_REQUIRED ON)",
            unit, property, standard, property
        ));
    }

    /// Unit-scoped include directories
    pub fn include_directories(
        &mut self,
        unit: &str,
        visibility: Visibility,
        dirs: &[impl AsRef<Path>],
    ) {
        if dirs.is_empty() {
            return;
        }
        self.push(format!(
            "target_include_directories({} {} {})",
            unit,
            visibility.keyword(),
            path_list(dirs)
        ));
    }

    /// Unit-scoped preprocessor defines
    pub fn compile_definitions(&mut self, unit: &str, visibility: Visibility, defines: &[String]) {
        if defines.is_empty() {
            return;
        }
        self.push(format!(
            "target_compile_definitions({} {} {})",
            unit,
            visibility.keyword(),
            defines.join(" ")
        ));
    }

    /// Unit-scoped compiler options
    pub fn compile_options(&mut self, unit: &str, visibility: Visibility, options: &[String]) {
        if options.is_empty() {
            return;
        }
        self.push(format!(
            "target_compile_options({} {} {})",
            unit,
            visibility.keyword(),
            options.join(" ")
        ));
    }

    /// Unit-scoped linker options; needs CMake 3.13
    pub fn link_options(&mut self, unit: &str, visibility: Visibility, options: &[String]) {
        if options.is_empty() {
            return;
        }
        self.require_version(3, 13);
        self.push(format!(
            "target_link_options({} {} {})",
            unit,
            visibility.keyword(),
            options.join(" ")
        ));
    }

    /// Unit-scoped link search directories; needs CMake 3.13
    pub fn link_directories(
        &mut self,
        unit: &str,
        visibility: Visibility,
        dirs: &[impl AsRef<Path>],
    ) {
        if dirs.is_empty() {
            return;
        }
        self.require_version(3, 13);
        self.push(format!(
            "target_link_directories({} {} {})",
            unit,
            visibility.keyword(),
            path_list(dirs)
        ));
    }

    /// Link a unit against libraries
    pub fn link_libraries(&mut self, unit: &str, visibility: Visibility, libraries: &[String]) {
        if libraries.is_empty() {
            return;
        }
        self.push(format!(
            "target_link_libraries({} {} {})",
            unit,
            visibility.keyword(),
            libraries.join(" ")
        ));
    }

    /// Global include directories (header-only dependencies)
    pub fn global_include_directories(&mut self, dirs: &[impl AsRef<Path>]) {
        if dirs.is_empty() {
            return;
        }
        self.push(format!("include_directories({})", path_list(dirs)));
    }

    /// Global preprocessor defines; needs CMake 3.12
    pub fn global_definitions(&mut self, defines: &[String]) {
        if defines.is_empty() {
            return;
        }
        self.require_version(3, 12);
        self.push(format!("add_compile_definitions({})", defines.join(" ")));
    }

    /// Generic key/value setting
    pub fn set(&mut self, key: &str, value: &str) {
        self.push(format!("set({} {})", key, value));
    }

    /// Open a conditional block
    pub fn if_block(&mut self, condition: &str) {
        self.push(format!("if({})", condition));
    }

    /// Switch to the else branch of the innermost block
    pub fn else_block(&mut self) {
        self.push("else()".to_string());
    }

    /// Close the innermost conditional block
    pub fn end_block(&mut self) {
        self.push("endif()".to_string());
    }

    /// Comment line
    pub fn comment(&mut self, text: &str) {
        self.push(format!("# {}", text));
    }

    /// Blank separator line
    pub fn blank(&mut self) {
        self.push(String::new());
    }

    fn push(&mut self, directive: String) {
        self.directives.push(directive);
    }

    /// Serialize: the watermark line first, then every directive in
    /// append order, one per line.
    pub fn serialize(&self) -> String {
        let (major, minor) = self.min_version();
        let mut out = format!("cmake_minimum_required(VERSION {}.{})\n", major, minor);
        for directive in &self.directives {
            out.push_str(directive);
            out.push('\n');
        }
        out
    }
}

/// Quote paths for a directive, forward slashes throughout
fn path_list(paths: &[impl AsRef<Path>]) -> String {
    paths
        .iter()
        .map(|p| format!("\"{}\"", display_path(p.as_ref())))
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
