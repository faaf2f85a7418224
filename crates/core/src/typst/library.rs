use std::fmt::Write;

use super::{bindings, escape_string, unicode_escape};
use crate::reconcile::{Entry, Group, ReconciledTable};

/// Import line shared by the binding files
const IMPORT_PREAMBLE: &str = "#import \"lib-impl.typ\": fa-icon\n";

/// Generated library files of the split layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOutput {
    /// Contents of `lib-gen-map.typ`
    pub map: String,
    /// Contents of `lib-gen-func.typ`
    pub func: String,
}

/// Render the icon maps and bindings as two files
pub fn emit_library(table: &ReconciledTable, versions: &[String]) -> LibraryOutput {
    let mut map = format!(
        "// Generated icon maps of Font Awesome {}\n\n",
        versions.join(", ")
    );
    write_maps(&mut map, table);

    let mut func = format!(
        "{IMPORT_PREAMBLE}\n// Generated icon functions of Font Awesome {}\n\n",
        versions.join(", ")
    );
    write_bindings(&mut func, table);

    LibraryOutput { map, func }
}

/// Render maps and bindings into a single `lib-gen.typ`
///
/// `fa-icon-map` holds every name under its unsuffixed binding. Per-version
/// maps and the version index follow only when versions conflict.
pub fn emit_combined_library(table: &ReconciledTable, versions: &[String]) -> String {
    let mut output = format!(
        "{IMPORT_PREAMBLE}\n// Generated icon list of Font Awesome {}\n\n",
        versions.join(", ")
    );
    write_map(&mut output, "fa-icon-map", &unsuffixed_entries(table));

    if table.latest_conflict_version().is_some() {
        output.push('\n');
        write_version_maps(&mut output, table);
        write_version_index(&mut output, table);
        output.push('\n');
    }

    write_bindings(&mut output, table);
    output
}

/// Common entries plus those of the latest conflicting version
fn unsuffixed_entries(table: &ReconciledTable) -> Vec<Entry> {
    let mut entries = table.common().to_vec();
    if let Some(latest) = table.latest_conflict_version() {
        entries.extend(table.get(Group::Version(latest)).unwrap_or_default().iter().cloned());
    }
    entries.sort_by(|a, b| {
        (a.code_point.as_str(), a.identifier.as_str())
            .cmp(&(b.code_point.as_str(), b.identifier.as_str()))
    });
    entries
}

fn write_maps(output: &mut String, table: &ReconciledTable) {
    let _ = writeln!(output, "// Common icons");
    write_map(output, "fa-icon-map-common", table.common());
    output.push('\n');

    write_version_maps(output, table);
    write_version_index(output, table);
}

fn write_version_maps(output: &mut String, table: &ReconciledTable) {
    for (version, entries) in table.conflicts() {
        let _ = writeln!(output, "// Version: {version}");
        write_map(output, &format!("fa-icon-map-{version}"), entries);
        output.push('\n');
    }
}

fn write_version_index(output: &mut String, table: &ReconciledTable) {
    let versions: Vec<u32> = table.conflicts().map(|(version, _)| version).collect();
    if versions.is_empty() {
        let _ = writeln!(output, "#let fa-icon-map-version = (:)");
        return;
    }

    let _ = writeln!(output, "#let fa-icon-map-version = (");
    for version in versions {
        let _ = writeln!(output, "  \"{version}\": fa-icon-map-{version},");
    }
    let _ = writeln!(output, ")");
}

/// `#let <name> = ( "<id>": "\u{<cp>}", ... )`, or `(:)` when empty
fn write_map(output: &mut String, name: &str, entries: &[Entry]) {
    if entries.is_empty() {
        let _ = writeln!(output, "#let {name} = (:)");
        return;
    }

    let _ = writeln!(output, "#let {name} = (");
    for entry in entries {
        let _ = writeln!(
            output,
            "  \"{}\": \"{}\",",
            escape_string(&entry.identifier),
            unicode_escape(&entry.code_point)
        );
    }
    let _ = writeln!(output, ")");
}

fn write_bindings(output: &mut String, table: &ReconciledTable) {
    for binding in bindings(table) {
        let _ = writeln!(output, "{}", binding.render());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use crate::typst::tests::icon;

    fn versions(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_emit_library_common_only() {
        let table = reconcile(&[
            (6, vec![icon("face-smile", "f118", false)]),
            (7, vec![icon("face-smile", "f118", false)]),
        ]);

        let output = emit_library(&table, &versions(&["6.7.2", "7.0.0"]));

        assert_eq!(
            output.map,
            r#"// Generated icon maps of Font Awesome 6.7.2, 7.0.0

// Common icons
#let fa-icon-map-common = (
  "face-smile": "\u{f118}",
)

#let fa-icon-map-version = (:)
"#
        );
        assert_eq!(
            output.func,
            r#"#import "lib-impl.typ": fa-icon

// Generated icon functions of Font Awesome 6.7.2, 7.0.0

#let fa-face-smile = fa-icon.with("\u{f118}")
"#
        );
    }

    #[test]
    fn test_emit_library_with_conflicts() {
        let table = reconcile(&[
            (
                6,
                vec![icon("face-smile", "f118", false), icon("bolt", "f0e7", true)],
            ),
            (
                7,
                vec![icon("face-smile", "f200", false), icon("bolt", "f0e7", true)],
            ),
        ]);

        let output = emit_library(&table, &versions(&["6.7.2", "7.0.0"]));

        assert_eq!(
            output.map,
            r#"// Generated icon maps of Font Awesome 6.7.2, 7.0.0

// Common icons
#let fa-icon-map-common = (
  "bolt": "\u{f0e7}",
)

// Version: 6
#let fa-icon-map-6 = (
  "face-smile": "\u{f118}",
)

// Version: 7
#let fa-icon-map-7 = (
  "face-smile": "\u{f200}",
)

#let fa-icon-map-version = (
  "6": fa-icon-map-6,
  "7": fa-icon-map-7,
)
"#
        );

        let lines: Vec<&str> = output.func.lines().skip(4).collect();
        assert_eq!(
            lines,
            vec![
                r#"#let fa-bolt = fa-icon.with("\u{f0e7}", solid: true)"#,
                r#"#let fa-face-smile-6 = fa-icon.with("\u{f118}")"#,
                r#"#let fa-face-smile-7 = fa-icon.with("\u{f200}")"#,
                r#"#let fa-face-smile = fa-icon.with("\u{f200}")"#,
            ]
        );
    }

    #[test]
    fn test_emit_library_aliases_resolve_to_parent() {
        let mut house = icon("house", "f015", false);
        house.aliases = vec!["home".to_string()];
        let table = reconcile(&[(6, vec![house])]);

        let output = emit_library(&table, &versions(&["6.7.2"]));

        assert!(output.map.contains("  \"home\": \"\\u{f015}\",\n"));
        assert!(output.map.contains("  \"house\": \"\\u{f015}\",\n"));
        assert!(output
            .func
            .contains("#let fa-home = fa-icon.with(\"\\u{f015}\")\n"));
        assert!(output
            .func
            .contains("#let fa-house = fa-icon.with(\"\\u{f015}\")\n"));
    }

    #[test]
    fn test_emit_library_empty_table() {
        let table = reconcile(&[]);
        let output = emit_library(&table, &[]);

        assert!(output.map.contains("#let fa-icon-map-common = (:)\n"));
        assert!(output.map.ends_with("#let fa-icon-map-version = (:)\n"));
    }

    #[test]
    fn test_emit_library_is_reproducible() {
        let sets = vec![
            (6, vec![icon("b", "f002", false), icon("a", "f001", true)]),
            (7, vec![icon("a", "f003", false)]),
        ];
        let labels = versions(&["6.7.2", "7.0.0"]);

        assert_eq!(
            emit_library(&reconcile(&sets), &labels),
            emit_library(&reconcile(&sets), &labels)
        );
    }

    #[test]
    fn test_emit_combined_library() {
        let table = reconcile(&[(
            6,
            vec![icon("bolt", "f0e7", true), icon("house", "f015", false)],
        )]);

        let output = emit_combined_library(&table, &versions(&["6.7.2"]));

        assert_eq!(
            output,
            r#"#import "lib-impl.typ": fa-icon

// Generated icon list of Font Awesome 6.7.2

#let fa-icon-map = (
  "bolt": "\u{f0e7}",
  "house": "\u{f015}",
)
#let fa-bolt = fa-icon.with("\u{f0e7}", solid: true)
#let fa-house = fa-icon.with("\u{f015}")
"#
        );
        assert!(!output.contains("fa-icon-map-version"));
    }

    #[test]
    fn test_emit_combined_library_with_conflicts() {
        let table = reconcile(&[
            (
                6,
                vec![icon("face-smile", "f118", false), icon("bolt", "f0e7", true)],
            ),
            (
                7,
                vec![icon("face-smile", "f200", false), icon("bolt", "f0e7", true)],
            ),
        ]);

        let output = emit_combined_library(&table, &versions(&["6.7.2", "7.0.0"]));

        assert_eq!(
            output,
            r#"#import "lib-impl.typ": fa-icon

// Generated icon list of Font Awesome 6.7.2, 7.0.0

#let fa-icon-map = (
  "bolt": "\u{f0e7}",
  "face-smile": "\u{f200}",
)

// Version: 6
#let fa-icon-map-6 = (
  "face-smile": "\u{f118}",
)

// Version: 7
#let fa-icon-map-7 = (
  "face-smile": "\u{f200}",
)

#let fa-icon-map-version = (
  "6": fa-icon-map-6,
  "7": fa-icon-map-7,
)

#let fa-bolt = fa-icon.with("\u{f0e7}", solid: true)
#let fa-face-smile-6 = fa-icon.with("\u{f118}")
#let fa-face-smile-7 = fa-icon.with("\u{f200}")
#let fa-face-smile = fa-icon.with("\u{f200}")
"#
        );
    }

    #[test]
    fn test_emit_combined_library_empty_table() {
        let output = emit_combined_library(&reconcile(&[]), &versions(&["6.7.2"]));
        assert!(output.ends_with("Font Awesome 6.7.2\n\n#let fa-icon-map = (:)\n"));
    }

    #[test]
    fn test_colliding_alias_yields_single_key() {
        let mut house = icon("house", "f015", false);
        house.aliases = vec!["home".to_string()];
        let table = reconcile(&[(6, vec![house, icon("home", "e000", false)])]);

        let output = emit_library(&table, &versions(&["6.7.2"]));

        assert_eq!(output.map.matches("  \"home\":").count(), 1);
        assert!(output.map.contains("  \"home\": \"\\u{e000}\",\n"));
        assert_eq!(output.func.matches("#let fa-home =").count(), 1);
    }
}
