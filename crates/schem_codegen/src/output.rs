//! Generation requests and their results.

use crate::links::LinkEntry;
use crate::writer::SourceWriter;
use schem_common::Language;
use schem_config::{LintConfig, ProjectConfig};
use schem_diagnostics::Diagnostic;
use schem_source::SourceDb;
use std::path::{Path, PathBuf};

/// Everything `generate` needs besides the schematic.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    /// Entity/module name.
    pub module_name: String,
    /// Output language.
    pub language: Language,
    /// VHDL architecture name.
    pub architecture: String,
    /// Directory the files are meant for; must exist.
    pub output_path: PathBuf,
    /// VHDL only: entity and architecture in one file.
    pub single_file: bool,
    /// Canvas grid size for wire matching.
    pub grid_size: f64,
    /// Written into the `Created by` header line.
    pub timestamp: String,
    /// Rule overrides for the sensitivity check.
    pub lint: LintConfig,
}

impl GenerateRequest {
    /// Builds a request from a project configuration.
    ///
    /// A relative output path is taken relative to `base_dir`.
    pub fn from_config(
        config: &ProjectConfig,
        base_dir: &Path,
        timestamp: impl Into<String>,
    ) -> Self {
        let design = &config.design;
        let output_path = if design.output_path.is_empty() {
            PathBuf::new()
        } else {
            base_dir.join(&design.output_path)
        };
        Self {
            module_name: design.module.clone(),
            language: design.language,
            architecture: design.architecture.clone(),
            output_path,
            single_file: design.single_file,
            grid_size: config.schematic.grid_size,
            timestamp: timestamp.into(),
            lint: config.lint.clone(),
        }
    }

    /// Names of the files this request produces, interface file first.
    ///
    /// Split VHDL yields `<module>_e.vhd` and `<module>_<arch>.vhd`; every
    /// other case a single file.
    pub fn file_names(&self) -> Vec<String> {
        let module = self.module_name.trim();
        match self.language {
            Language::Vhdl if !self.single_file => vec![
                format!("{module}_e.vhd"),
                format!("{module}_{}.vhd", self.architecture),
            ],
            language => vec![format!("{module}.{}", language.extension())],
        }
    }

    pub(crate) fn header(&self, w: &mut SourceWriter) {
        let marker = self.language.comment_marker();
        let file = w.file().to_string();
        w.line_text(&format!("{marker} Filename: {file}"));
        w.line_text(&format!("{marker} Created by schemgen at {}", self.timestamp));
    }
}

/// One generated file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name, also the key of its link entries.
    pub name: String,
    /// Full destination path.
    pub path: PathBuf,
    /// File contents.
    pub text: String,
}

/// The outcome of a successful generation run.
#[derive(Debug)]
pub struct Generated {
    /// Generated files, interface file first.
    pub files: Vec<GeneratedFile>,
    /// Link entries of all files in line order.
    pub links: Vec<LinkEntry>,
    /// Advisories from sorting and linting.
    pub diagnostics: Vec<Diagnostic>,
    /// Sensitivity findings as one-line warnings.
    pub sensitivity_warnings: Vec<String>,
    /// The generated files, for resolving diagnostic spans.
    pub sources: SourceDb,
}

impl Generated {
    /// Looks a generated file up by name.
    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.name == name)
    }
}
