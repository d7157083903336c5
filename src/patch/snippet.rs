// src/patch/snippet.rs

//! The client footer appended to the Turbo bundle.

use std::sync::LazyLock;

use regex::Regex;

use crate::host::TURBO_REFRESH_EVENT;

use super::PatchMode;

/// Hot-data key set once the refresh listener is registered.
pub const REGISTERED_FLAG: &str = "turboRegistered";

/// Hot-data key set when a Turbo refresh ran and the next full reload
/// should be swallowed.
pub const REFRESHED_FLAG: &str = "turboRefreshed";

/// Host event fired right before it reloads the whole page.
pub const BEFORE_FULL_RELOAD_EVENT: &str = "vite:beforeFullReload";

/// Reload target the host never matches against the current page.
pub const NO_RELOAD_SENTINEL: &str = "(WILL-NOT-RELOAD)";

/// Stream message that makes Turbo re-fetch and morph the current page.
pub const REFRESH_STREAM: &str = r#"<turbo-stream action="refresh"></turbo-stream>"#;

static COLLAPSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n|\s\s)+").expect("static regex is valid"));

/// Drop every newline and every pair of whitespace characters.
///
/// Single spaces between tokens survive; indentation made of an even number
/// of spaces disappears entirely.
pub fn minify(source: &str) -> String {
    COLLAPSE.replace_all(source, "").into_owned()
}

/// Minified footer for the given mode.
pub fn footer(mode: PatchMode) -> String {
    let refreshed = match mode {
        PatchMode::RefreshOnly => String::new(),
        PatchMode::SuppressFullReload => format!(
            "
            import.meta.hot.data.{REFRESHED_FLAG} = true;"
        ),
    };

    let before_full_reload = match mode {
        PatchMode::RefreshOnly => String::new(),
        PatchMode::SuppressFullReload => format!(
            r#"
          import.meta.hot.on("{BEFORE_FULL_RELOAD_EVENT}", (payload) => {{
            if (import.meta.hot.data.{REFRESHED_FLAG}) {{
              payload.path = "{NO_RELOAD_SENTINEL}";
              import.meta.hot.data.{REFRESHED_FLAG} = false;
            }}
          }});"#
        ),
    };

    let source = format!(
        r#"
        if (import.meta.hot && !import.meta.hot.data.{REGISTERED_FLAG}) {{
          import.meta.hot.data.{REGISTERED_FLAG} = true;
          import.meta.hot.on("{TURBO_REFRESH_EVENT}", (data) => {{{refreshed}
            console.log("Run <turbo-stream action=refresh> via vite-plugin-turbo-reload");
            Turbo.renderStreamMessage('{REFRESH_STREAM}');
          }});{before_full_reload}
        }}
      "#
    );

    minify(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minify_collapses_newlines_and_indentation() {
        assert_eq!(minify("a {\n    b;\n  }\n"), "a {b;}");
        assert_eq!(minify("if (x) y"), "if (x) y");
    }

    #[test]
    fn refresh_only_footer() {
        assert_eq!(
            footer(PatchMode::RefreshOnly),
            concat!(
                r#"if (import.meta.hot && !import.meta.hot.data.turboRegistered) {"#,
                r#"import.meta.hot.data.turboRegistered = true;"#,
                r#"import.meta.hot.on("turbo-refresh", (data) => {"#,
                r#"console.log("Run <turbo-stream action=refresh> via vite-plugin-turbo-reload");"#,
                r#"Turbo.renderStreamMessage('<turbo-stream action="refresh"></turbo-stream>');"#,
                r#"});}"#,
            )
        );
    }

    #[test]
    fn suppressing_footer_guards_the_full_reload() {
        let footer = footer(PatchMode::SuppressFullReload);
        assert!(!footer.contains('\n'));
        assert!(footer.contains(r#"import.meta.hot.on("turbo-refresh", (data) => {import.meta.hot.data.turboRefreshed = true;"#));
        assert!(footer.contains(
            r#"import.meta.hot.on("vite:beforeFullReload", (payload) => {if (import.meta.hot.data.turboRefreshed) {payload.path = "(WILL-NOT-RELOAD)";import.meta.hot.data.turboRefreshed = false;}});}"#
        ));
    }
}
