//! Built-in lint rules.

mod w105;
mod w106;

pub use w105::MissingSensitivity;
pub use w106::SuperfluousSensitivity;

use crate::LintEngine;

/// Registers the built-in sensitivity-list rules with the engine.
pub fn register_builtin_rules(engine: &mut LintEngine) {
    engine.register(Box::new(MissingSensitivity));
    engine.register(Box::new(SuperfluousSensitivity));
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{BlockRegion, LintContext};
    use schem_common::Language;
    use schem_source::SourceDb;

    /// Builds a database holding `text` as the whole of `mux.vhd`.
    pub fn db_with(text: &str) -> SourceDb {
        let mut db = SourceDb::new();
        db.add_source("mux.vhd", text.to_string());
        db
    }

    /// A context treating the whole file as one block.
    pub fn whole_file<'a>(
        db: &'a SourceDb,
        readable: &'a [String],
        blocks: &'a [BlockRegion],
    ) -> LintContext<'a> {
        LintContext {
            sources: db,
            file: schem_source::FileId::from_raw(0),
            module: "mux",
            language: Language::Vhdl,
            readable,
            blocks,
        }
    }

    pub const MUX: &str = "architecture rtl of mux is\nbegin\n    process (sel, a, spare)\n    begin\n        if sel = '1' then\n            y <= a;\n        else\n            y <= b;\n        end if;\n    end process;\nend architecture;\n";

    pub fn mux_readable() -> Vec<String> {
        ["a", "b", "sel", "spare"].iter().map(|s| s.to_string()).collect()
    }

    pub const MUX_BLOCK: BlockRegion = BlockRegion {
        first_line: 3,
        line_count: 8,
    };
}
