use std::fmt::Write;

use super::{bindings, escape_string};
use crate::reconcile::ReconciledTable;

const GALLERY_PREAMBLE: &str = r#"#import "lib.typ": *
#table(
  columns: (3fr, 1fr, 1fr, 2fr),
  stroke: none,
  table.header([typst code], [default], [solid], [`fa-icon` with text]),
"#;

/// Render `gallery.typ`, one row per generated binding
pub fn emit_gallery(table: &ReconciledTable) -> String {
    let mut output = GALLERY_PREAMBLE.to_string();

    for binding in bindings(table) {
        let name = &binding.name;
        let _ = writeln!(
            output,
            "  ```typst #fa-{name}()```, fa-{name}(), fa-{name}(solid: true), fa-icon(\"{}\"),",
            escape_string(name)
        );
    }

    output.push_str(")\n");
    output
}
