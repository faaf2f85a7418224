//! Typst source generation
//!
//! Renders a [`ReconciledTable`] into the generated files of the Typst
//! package: the icon maps and bindings ([`library`]) and the gallery
//! document ([`gallery`]).

pub mod gallery;
pub mod library;

pub use gallery::emit_gallery;
pub use library::{emit_combined_library, emit_library, LibraryOutput};

use crate::reconcile::{Group, ReconciledTable};

/// A generated `fa-<name>` binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Name without the `fa-` prefix, e.g. `face-smile` or `face-smile-7`
    pub name: String,
    pub code_point: String,
    pub solid_only: bool,
}

impl Binding {
    /// `#let fa-<name> = fa-icon.with("\u{<cp>}")`
    pub fn render(&self) -> String {
        let solid = if self.solid_only { ", solid: true" } else { "" };
        format!(
            "#let fa-{} = fa-icon.with(\"{}\"{})",
            self.name,
            unicode_escape(&self.code_point),
            solid
        )
    }
}

/// Every binding of a table, in emission order
///
/// Common names come first and keep their bare name. Conflicting names get a
/// `-<version>` suffix, and the latest conflicting version also claims the
/// bare name. Names that are not valid Typst identifiers are skipped.
pub fn bindings(table: &ReconciledTable) -> Vec<Binding> {
    let latest = table.latest_conflict_version();
    let mut bindings = Vec::with_capacity(table.len());

    for (group, entries) in table.groups() {
        for entry in entries {
            let mut push = |name: String| {
                if is_identifier_tail(&name) {
                    bindings.push(Binding {
                        name,
                        code_point: entry.code_point.clone(),
                        solid_only: entry.solid_only,
                    });
                }
            };

            match group {
                Group::Common => push(entry.identifier.clone()),
                Group::Version(version) => {
                    push(format!("{}-{version}", entry.identifier));
                    if Some(version) == latest {
                        push(entry.identifier.clone());
                    }
                }
            }
        }
    }

    bindings
}

/// Typst unicode escape for a hex code point
pub fn unicode_escape(code_point: &str) -> String {
    format!("\\u{{{code_point}}}")
}

/// Escape text for use inside a Typst string literal
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Whether `fa-<name>` is a valid Typst identifier
fn is_identifier_tail(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
