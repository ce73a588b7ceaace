//! End-to-end tests for the build pipeline.
//!
//! Each test feeds a small project through [`Builder`] (or [`compile`] when the
//! rule table itself is under test) and checks the emitted stylesheet.

use std::fs;

use layout_css::{
    compile, minify, Builder, Config, Diagnostics, DirSource, EmitOptions, LayoutRegistry,
    MemorySource, VariantFile, Warning,
};
use tempfile::TempDir;

const COLUMNS: &str = r#"{
    "prefix": "columns",
    "name": "Columns",
    "layouts": [
        { "id": "1", "columns": "1fr", "items": 1 },
        { "id": "2", "columns": "1fr 1fr", "items": 2 }
    ]
}"#;

const GRID: &str = r#"{
    "prefix": "grid",
    "layouts": [
        {
            "id": "3b",
            "columns": "1fr 1fr",
            "rules": [
                { "selector": "&", "properties": { "align-items": "start" } },
                { "selector": "*:nth-of-type(3n+1)", "properties": { "grid-column": "span 2" } }
            ]
        },
        { "id": "4a", "columns": "repeat(4, 1fr)", "srcset": "25%,25%,25%,25%" }
    ]
}"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn source(config: &str) -> MemorySource {
    MemorySource::new(config)
        .with_layout("columns", COLUMNS)
        .with_layout("grid", GRID)
}

fn registry(diagnostics: &mut Diagnostics) -> LayoutRegistry {
    LayoutRegistry::load(
        [
            ("columns", VariantFile::from_json(COLUMNS).unwrap()),
            ("grid", VariantFile::from_json(GRID).unwrap()),
        ],
        diagnostics,
    )
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn single_curated_variant_renders_exact_stylesheet() {
    init_logging();
    let output = Builder::new(source(
        r#"{ "breakpoints": { "md": { "min": "720px", "layouts": [{ "columns": ["columns(2)"] }] } } }"#,
    ))
    .build()
    .unwrap();

    let expected = concat!(
        "@layer layout.base, layout.reset, layout.animations, layout.md;\n",
        "\n",
        "@media (min-width: 720px) {\n",
        "  @layer layout.md {\n",
        "    lay-out[md*=\"columns(\"] {\n",
        "      --_ga: initial;\n",
        "    }\n",
        "\n",
        "    lay-out[md*=\"columns(\"] > * {\n",
        "      --layout-ga: auto;\n",
        "    }\n",
        "\n",
        "    lay-out[md=\"columns(2)\"] {\n",
        "      --layout-gtc: 1fr 1fr;\n",
        "      --_ci: 2;\n",
        "    }\n",
        "  }\n",
        "}\n",
    );
    assert_eq!(output.css, expected);
    assert_eq!(output.rules, 3);
    assert!(output.warnings.is_empty());
}

#[test]
fn missing_variant_warns_once_and_siblings_still_resolve() {
    init_logging();
    let output = Builder::new(source(
        r#"{ "breakpoints": { "md": { "min": "720px",
            "layouts": ["columns", { "grid": ["grid(3a)", "grid(4a)"] }] } } }"#,
    ))
    .build()
    .unwrap();

    assert_eq!(
        output.warnings,
        vec![Warning::UnknownVariant {
            breakpoint: "md".into(),
            layout_type: "grid".into(),
            id: "grid(3a)".into(),
        }]
    );
    assert!(output.css.contains(r#"lay-out[md="columns(1)"]"#));
    assert!(output.css.contains(r#"lay-out[md="columns(2)"]"#));
    assert!(output.css.contains(r#"lay-out[md="grid(4a)"]"#));
    assert!(!output.css.contains("grid(3a)"));
}

#[test]
fn declared_rules_are_scoped_to_the_container() {
    let output = Builder::new(source(
        r#"{ "breakpoints": { "lg": { "min": "1024px", "layouts": [{ "grid": ["grid(3b)"] }] } } }"#,
    ))
    .build()
    .unwrap();

    assert!(output.css.contains(concat!(
        "    lay-out[lg=\"grid(3b)\"] {\n",
        "      --layout-gtc: 1fr 1fr;\n",
        "      align-items: start;\n",
        "    }\n",
    )));
    assert!(output
        .css
        .contains("    lay-out[lg=\"grid(3b)\"] > *:nth-of-type(3n+1) {\n      grid-column: span 2;\n"));
}

#[test]
fn breakpoints_emit_in_document_order_with_own_layers() {
    let output = Builder::new(source(
        r#"{ "breakpoints": {
            "xl": { "min": "1400px", "layouts": ["grid"] },
            "sm": { "type": "@media", "max": "719px", "layouts": ["columns"] },
            "off": { "layouts": ["columns"] },
            "card": { "type": "@container", "container": "card", "min": "30rem", "max": "50rem", "layouts": ["columns"] }
        } }"#,
    ))
    .build()
    .unwrap();

    let css = &output.css;
    assert!(css.starts_with(
        "@layer layout.base, layout.reset, layout.animations, layout.xl, layout.sm, layout.off, layout.card;\n"
    ));

    let xl = css.find("@media (min-width: 1400px) {\n  @layer layout.xl {").unwrap();
    let sm = css.find("@media (max-width: 719px) {\n  @layer layout.sm {").unwrap();
    let card = css
        .find("@container card (min-width: 30rem) and (max-width: 50rem) {\n  @layer layout.card {")
        .unwrap();
    assert!(xl < sm && sm < card);
    assert!(!css.contains("off=\""));
    assert!(output.warnings.is_empty());
}

#[test]
fn identical_containers_are_grouped_unless_disabled() {
    const SAME: &str = r#"{ "prefix": "stack", "layouts": [
        { "id": "a", "columns": "1fr" },
        { "id": "b", "columns": "1fr" }
    ] }"#;
    let config = r#"{ "breakpoints": { "md": { "min": "720px", "layouts": ["stack"] } } }"#;

    let grouped = Builder::new(MemorySource::new(config).with_layout("stack", SAME))
        .build()
        .unwrap();
    assert!(grouped.css.contains(concat!(
        "    lay-out[md=\"stack(a)\"],\n",
        "    lay-out[md=\"stack(b)\"] {\n",
        "      --layout-gtc: 1fr;\n",
    )));

    let ungrouped = Builder::new(MemorySource::new(config).with_layout("stack", SAME))
        .options(EmitOptions {
            group_identical: false,
            ..Default::default()
        })
        .build()
        .unwrap();
    assert_eq!(ungrouped.css.matches("--layout-gtc: 1fr;").count(), 2);
    assert_eq!(grouped.rules, ungrouped.rules);
}

#[test]
fn full_document_sections_in_order() {
    let config = r##"{
        "core": ["base"],
        "common": ["animations"],
        "layoutContainer": { "maxLayoutWidth": { "value": "1024px" }, "layoutMargin": { "value": "1rem" } },
        "themes": { "dark": { "bg": "#111", "color": "#eee" } },
        "breakpoints": { "md": { "min": "720px", "layouts": ["columns"] } }
    }"##;
    let output = Builder::new(
        source(config)
            .with_module("base", "@layer layout.base { lay-out { display: grid; } }\n")
            .with_module("animations", "@layer layout.animations { }\n"),
    )
    .build()
    .unwrap();

    let css = &output.css;
    let positions = [
        css.find("@layer layout.base, ").unwrap(),
        css.find("@layer layout.base {").unwrap(),
        css.find("@layer layout.animations {").unwrap(),
        css.find("body {\n  --layout-bleed-mw: 1024px;\n  --layout-mi: 1rem;\n}").unwrap(),
        css.find("lay-out[theme=\"dark\"]").unwrap(),
        css.find("@media (min-width: 720px)").unwrap(),
    ];
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn lanes_get_generated_track_list() {
    let output = Builder::new(
        MemorySource::new(r#"{ "breakpoints": { "md": { "min": "720px", "layouts": ["lanes"] } } }"#)
            .with_layout("lanes", r#"{ "prefix": "lanes", "layouts": [{ "id": "4" }] }"#),
    )
    .build()
    .unwrap();

    assert!(output.css.contains(
        "--layout-gtc: repeat(auto-fill, minmax(calc((100% - 3 * var(--layout-cg, 1rem)) / 4), 1fr));"
    ));
}

#[test]
fn breakpoints_sharing_a_query_keep_their_own_layers() {
    let output = Builder::new(source(
        r#"{ "breakpoints": {
            "md": { "min": "720px", "layouts": [{ "columns": ["columns(2)"] }] },
            "tablet": { "min": "720px", "layouts": [{ "grid": ["grid(4a)"] }] }
        } }"#,
    ))
    .build()
    .unwrap();

    let css = &output.css;
    assert_eq!(css.matches("@media (min-width: 720px) {").count(), 1);
    let md = css.find("  @layer layout.md {\n").unwrap();
    let tablet = css.find("  @layer layout.tablet {\n").unwrap();
    assert!(md < tablet);
    assert!(css[md..tablet].contains(r#"lay-out[md="columns(2)"]"#));
    assert!(css[tablet..].contains(r#"lay-out[tablet="grid(4a)"]"#));
    assert!(!css[md..tablet].contains("tablet="));
}

#[test]
fn grouping_keeps_overriding_rule_last() {
    const ORDERED: &str = r#"{ "prefix": "grid", "layouts": [{
        "id": "z",
        "rules": [
            { "selector": "*:nth-child(odd)", "properties": { "order": 1 } },
            { "selector": "*:nth-child(3n)", "properties": { "order": 2 } },
            { "selector": "*:nth-child(3)", "properties": { "order": 1 } }
        ]
    }] }"#;
    let output = Builder::new(
        MemorySource::new(r#"{ "breakpoints": { "md": { "min": "720px", "layouts": ["grid"] } } }"#)
            .with_layout("grid", ORDERED),
    )
    .build()
    .unwrap();

    let css = &output.css;
    let every_third = css.find("> *:nth-child(3n) {\n      order: 2;\n").unwrap();
    let third = css.find("> *:nth-child(3) {\n      order: 1;\n").unwrap();
    assert!(every_third < third);
    assert!(!css.contains("*:nth-child(odd),"));
}

#[test]
fn minified_output_keeps_module_strings() {
    let output = Builder::new(
        source(r#"{ "core": ["quote"], "breakpoints": { "md": { "min": "720px", "layouts": ["columns"] } } }"#)
            .with_module("quote", "lay-out::before {\n  content: \"a ; }\";\n}\n"),
    )
    .build()
    .unwrap();

    let min = minify(&output.css);
    assert!(min.contains("lay-out::before{content: \"a ; }\"}"), "{}", min);
    assert!(min.contains(r#"lay-out[md="columns(2)"]{--layout-gtc: 1fr 1fr;--_ci: 2}"#));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn builds_are_idempotent() {
    let config = r#"{ "breakpoints": {
        "md": { "min": "720px", "layouts": ["columns", "grid"] },
        "lg": { "min": "1024px", "layouts": [{ "grid": ["grid(4a)"] }, "columns"] }
    } }"#;

    let first = Builder::new(source(config)).build().unwrap();
    let second = Builder::new(source(config)).build().unwrap();
    assert_eq!(first.css, second.css);
    assert_eq!(first.rules, second.rules);
}

#[test]
fn repeated_references_dedup_within_breakpoint() {
    let mut diagnostics = Diagnostics::new();
    let registry = registry(&mut diagnostics);

    let once = Config::from_json(
        r#"{ "breakpoints": { "md": { "min": "720px", "layouts": ["columns"] } } }"#,
    )
    .unwrap();
    let repeated = Config::from_json(
        r#"{ "breakpoints": { "md": { "min": "720px",
            "layouts": ["columns", { "columns": ["columns(2)"] }, "columns"] } } }"#,
    )
    .unwrap();

    let a = compile(&once, &registry, &mut diagnostics);
    let b = compile(&repeated, &registry, &mut diagnostics);
    assert_eq!(a.len(), b.len());
    assert!(diagnostics.is_empty());
}

#[test]
fn reset_pair_emitted_once_per_type_and_breakpoint() {
    let mut diagnostics = Diagnostics::new();
    let registry = registry(&mut diagnostics);
    let config = Config::from_json(
        r#"{ "breakpoints": {
            "md": { "min": "720px", "layouts": ["columns", "grid"] },
            "lg": { "min": "1024px", "layouts": ["columns"] }
        } }"#,
    )
    .unwrap();

    let table = compile(&config, &registry, &mut diagnostics);
    let selectors: Vec<&str> = table
        .blocks()
        .flat_map(|block| block.rules().map(|(selector, _)| selector))
        .collect();

    let count = |needle: &str| selectors.iter().filter(|s| **s == needle).count();
    assert_eq!(count(r#"lay-out[md*="columns("]"#), 1);
    assert_eq!(count(r#"lay-out[md*="columns("] > *"#), 1);
    assert_eq!(count(r#"lay-out[md*="grid("]"#), 1);
    assert_eq!(count(r#"lay-out[lg*="columns("]"#), 1);
}

#[test]
fn custom_element_and_layer_namespace() {
    let output = Builder::new(source(
        r#"{ "element": "x-grid", "layer": "app",
             "breakpoints": { "md": { "min": "720px", "layouts": [{ "columns": ["columns(1)"] }] } } }"#,
    ))
    .build()
    .unwrap();

    assert!(output.css.starts_with("@layer app.base, app.reset, app.animations, app.md;"));
    assert!(output.css.contains("  @layer app.md {\n"));
    assert!(output.css.contains(r#"x-grid[md="columns(1)"]"#));
    assert!(!output.css.contains("lay-out["));
}

// ============================================================================
// Directory source
// ============================================================================

#[test]
fn builds_from_project_directory() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(
        root.join("layout.config.json"),
        r#"{ "core": ["base", "gone"], "breakpoints": { "md": { "min": "720px", "layouts": ["columns", "broken"] } } }"#,
    )
    .unwrap();
    fs::create_dir(root.join("layouts")).unwrap();
    fs::write(root.join("layouts/columns.json"), COLUMNS).unwrap();
    fs::write(root.join("layouts/broken.json"), "{").unwrap();
    fs::create_dir(root.join("core")).unwrap();
    fs::write(root.join("core/base.css"), "lay-out { display: grid; }\n").unwrap();

    let output = Builder::new(DirSource::new(root.join("layout.config.json")))
        .build()
        .unwrap();

    assert!(output.css.contains("lay-out { display: grid; }"));
    assert!(output.css.contains(r#"lay-out[md="columns(2)"]"#));
    assert_eq!(output.warnings.len(), 3);
    assert!(matches!(output.warnings[0], Warning::VariantFileFailed { .. }));
    assert!(matches!(output.warnings[1], Warning::CssModuleMissing { .. }));
    assert!(matches!(output.warnings[2], Warning::UnknownLayoutType { .. }));
}

#[test]
fn missing_layout_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("layout.config.json"), "{}").unwrap();

    let err = Builder::new(DirSource::new(dir.path().join("layout.config.json")))
        .build()
        .unwrap_err();
    assert!(matches!(err, layout_css::BuildError::Source(_)));
}
