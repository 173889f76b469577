//! Source templates for generated migration modules

/// First line of every generated `mod.rs`.
pub const MOD_FILE_MARKER: &str = "// @generated by stepwise";

/// A new migration module with empty `up` and `down` actions.
pub fn render_migration(version: &str, name: &str) -> String {
    let name = comment_text(name);
    format!(
        r#"//! Migration {version}: {name}

use stepwise::Migration;

use super::Context;

pub fn migration() -> Migration<Context> {{
    Migration::<Context>::new("{version}")
        .up(|ctx| {{
            let _ = ctx;
            Ok(())
        }})
        .down(|ctx| {{
            let _ = ctx;
            Ok(())
        }})
}}
"#
    )
}

/// `name` flattened to one line: control characters become spaces and runs
/// of whitespace collapse, so it cannot leave the doc comment.
fn comment_text(name: &str) -> String {
    name.split(|c: char| c.is_control() || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `mod.rs` declaring every migration module plus the registry constructor.
pub fn render_mod_file(context_type: &str, modules: &[String]) -> String {
    let mut out = format!(
        r#"{MOD_FILE_MARKER}
// Regenerated by `stepwise new`. Do not edit by hand.

use stepwise::Registry;

pub use {context_type} as Context;
"#
    );

    if !modules.is_empty() {
        out.push('\n');
    }
    for module in modules {
        out.push_str(&format!("mod {module};\n"));
    }

    out.push_str(
        "\n/// Every migration in this directory.\npub fn registry() -> Registry<Context> {\n",
    );
    if modules.is_empty() {
        out.push_str("    Registry::new()\n");
    } else {
        out.push_str("    let mut registry = Registry::new();\n");
        for module in modules {
            out.push_str(&format!("    registry.add({module}::migration());\n"));
        }
        out.push_str("    registry\n");
    }
    out.push_str("}\n");
    out
}
