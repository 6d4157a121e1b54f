//! Reverse index from generated source lines to schematic constructs.
//!
//! Emitters record a [`LinkEntry`] for every physical line of a tracked
//! construct while the text is written. A [`LinkDictionary`] keeps the entries
//! of all generated files; regenerating a file replaces that file's entries as
//! a whole.

use schem_model::ElementId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The kind of construct a generated line belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Entity/module framing lines.
    Entity,
    /// Library and package lines in front of the entity/module.
    InterfacePackages,
    /// Generic/parameter declarations of the entity/module.
    InterfaceGenerics,
    /// Library and package lines in front of the architecture.
    InternalsPackages,
    /// User declarations before the generated signals.
    FirstDeclarations,
    /// User declarations after the generated signals.
    LastDeclarations,
    /// A port of the entity/module.
    PortDeclaration,
    /// A generated internal signal.
    SignalDeclaration,
    /// A component declaration for an instantiated entity.
    ComponentDeclaration,
    /// A configuration specification binding an instance.
    EmbeddedLibraryInstruction,
    /// A generate condition line.
    Generate,
    /// A line of a schematic block.
    Block,
    /// The label/entity line of an instance.
    InstanceName,
    /// A generic-map line of an instance.
    GenericMapping,
    /// A port-map line of an instance.
    PortConnection,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkKind::Entity => "entity",
            LinkKind::InterfacePackages => "interface_packages",
            LinkKind::InterfaceGenerics => "interface_generics",
            LinkKind::InternalsPackages => "internals_packages",
            LinkKind::FirstDeclarations => "first_declarations",
            LinkKind::LastDeclarations => "last_declarations",
            LinkKind::PortDeclaration => "port_declaration",
            LinkKind::SignalDeclaration => "signal_declaration",
            LinkKind::ComponentDeclaration => "component_declaration",
            LinkKind::EmbeddedLibraryInstruction => "embedded_library_instruction",
            LinkKind::Generate => "generate",
            LinkKind::Block => "block",
            LinkKind::InstanceName => "instance_name",
            LinkKind::GenericMapping => "generic_mapping",
            LinkKind::PortConnection => "port_connection",
        };
        f.write_str(name)
    }
}

/// The schematic object a generated line refers to.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkObject {
    /// The design's own interface or a free-text section of it.
    Design,
    /// A block, instance or generate frame.
    Element {
        /// The element on the canvas.
        id: ElementId,
    },
    /// A port or internal signal, by name.
    Signal {
        /// The signal name.
        name: String,
    },
    /// One port of an instance.
    Port {
        /// The instance element.
        instance: ElementId,
        /// The port name on the instantiated entity.
        port: String,
    },
    /// A component declaration, by entity name.
    Component {
        /// The declared entity.
        entity: String,
    },
}

/// A generated line and the construct that produced it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LinkEntry {
    /// The generated file name.
    pub file: String,
    /// 1-based line within the file.
    pub line: u32,
    /// The construct kind.
    pub kind: LinkKind,
    /// The schematic object.
    pub object: LinkObject,
    /// Index of the line within a multi-line construct.
    pub sub_line: u32,
}

/// What a line links to, as stored in the [`LinkDictionary`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LinkTarget {
    /// The construct kind.
    pub kind: LinkKind,
    /// The schematic object.
    pub object: LinkObject,
    /// Index of the line within a multi-line construct.
    pub sub_line: u32,
}

/// Link entries of all generated files, keyed by file and line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkDictionary {
    files: BTreeMap<String, BTreeMap<u32, LinkTarget>>,
}

impl LinkDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all entries of `file` with `entries`.
    ///
    /// Entries naming another file are ignored.
    pub fn replace_file(&mut self, file: &str, entries: &[LinkEntry]) {
        let lines = entries
            .iter()
            .filter(|e| e.file == file)
            .map(|e| {
                (
                    e.line,
                    LinkTarget {
                        kind: e.kind,
                        object: e.object.clone(),
                        sub_line: e.sub_line,
                    },
                )
            })
            .collect();
        self.files.insert(file.to_string(), lines);
    }

    /// Replaces the entries of every file named in `entries`.
    pub fn replace_all(&mut self, entries: &[LinkEntry]) {
        let mut names: Vec<&str> = entries.iter().map(|e| e.file.as_str()).collect();
        names.dedup();
        for name in names {
            self.replace_file(name, entries);
        }
    }

    /// Looks up the construct that produced `line` of `file`.
    pub fn lookup(&self, file: &str, line: u32) -> Option<&LinkTarget> {
        self.files.get(file)?.get(&line)
    }

    /// Returns the number of linked lines in `file`.
    pub fn line_count(&self, file: &str) -> usize {
        self.files.get(file).map_or(0, BTreeMap::len)
    }

    /// Returns the names of all files with entries.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}
