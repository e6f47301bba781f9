/// Renderer behavior: variables, stringification, sections, loops and render modes.
use citeplate_core::{render, RenderOptions, Value};
use serde_json::json;

fn r(template: &str, context: serde_json::Value) -> String {
    render(template, &Value::from(context), &RenderOptions::default())
        .unwrap_or_else(|e| panic!("{template:?} failed: {e}"))
}

fn r_with(template: &str, context: serde_json::Value, options: RenderOptions) -> String {
    render(template, &Value::from(context), &options)
        .unwrap_or_else(|e| panic!("{template:?} failed: {e}"))
}

// ============================================================================
// Variables and stringification
// ============================================================================

#[test]
fn string_variable() {
    assert_eq!(r("Hello {{name}}!", json!({"name": "Ada"})), "Hello Ada!");
}

#[test]
fn missing_variable_is_empty() {
    assert_eq!(r("[{{missing}}]", json!({})), "[]");
    assert_eq!(r("[{{a.b.c}}]", json!({"a": {"x": 1}})), "[]");
}

#[test]
fn scalars_stringify() {
    let ctx = json!({"i": 2024, "neg": -7, "f": 2.5, "whole": 3.0, "t": true, "fa": false, "n": null});
    assert_eq!(
        r("{{i}}|{{neg}}|{{f}}|{{whole}}|{{t}}|{{fa}}|{{n}}", ctx),
        "2024|-7|2.5|3|true|false|"
    );
}

#[test]
fn list_variable_joins_with_comma() {
    assert_eq!(r("{{tags}}", json!({"tags": ["a", "b", 3]})), "a,b,3");
}

#[test]
fn object_variable_renders_compact_json() {
    assert_eq!(
        r("{{container}}", json!({"container": {"title": "Nature", "volume": 12}})),
        r#"{"title":"Nature","volume":12}"#
    );
}

#[test]
fn filters_apply_to_stringified_value() {
    assert_eq!(r("{{year|abbr2}}", json!({"year": 2024})), "20");
    assert_eq!(r("{{flag|uppercase}}", json!({"flag": true})), "TRUE");
    assert_eq!(r("[{{missing|uppercase}}]", json!({})), "[]");
}

#[test]
fn nested_paths_and_list_indexing() {
    let ctx = json!({
        "issued": {"date-parts": [[2019, 4, 1]]},
        "authors_family": ["Kuhn", "Popper"],
    });
    assert_eq!(
        r("{{authors_family.1}} {{issued.date-parts.0.0}}-{{issued.date-parts.0.1}}", ctx),
        "Popper 2019-4"
    );
}

#[test]
fn literal_whitespace_is_untouched() {
    let template = "line one\n  {{#a}}\n  item\n  {{/a}}\nend\n";
    assert_eq!(r(template, json!({"a": true})), "line one\n  \n  item\n  \nend\n");
}

// ============================================================================
// Sections
// ============================================================================

#[test]
fn section_over_list_iterates() {
    assert_eq!(r("{{#a}}{{.}}{{/a}}", json!({"a": ["x", "y"]})), "xy");
}

#[test]
fn section_over_list_of_objects_sees_fields() {
    let ctx = json!({"authors": [
        {"family": "Smith", "given": "Jane"},
        {"family": "Doe", "given": "John"},
    ]});
    assert_eq!(
        r("{{#authors}}{{given}} {{family}};{{/authors}}", ctx),
        "Jane Smith;John Doe;"
    );
}

#[test]
fn loop_body_falls_back_to_outer_scope() {
    let ctx = json!({"year": 2020, "tags": ["a", "b"]});
    assert_eq!(r("{{#tags}}{{.}}{{year}} {{/tags}}", ctx), "a2020 b2020 ");
}

#[test]
fn inner_scope_shadows_outer() {
    let ctx = json!({"name": "outer", "items": [{"name": "inner"}, {}]});
    assert_eq!(r("{{#items}}{{name}},{{/items}}", ctx), "inner,outer,");
}

#[test]
fn mid_path_has_no_fallback() {
    // `meta` resolves in the item scope, so `meta.title` never consults the root.
    let ctx = json!({"meta": {"title": "root"}, "items": [{"meta": {}}]});
    assert_eq!(r("{{#items}}[{{meta.title}}]{{/items}}", ctx), "[]");
}

#[test]
fn null_field_shadows_outer_scope() {
    let ctx = json!({"name": "outer", "items": [{"name": null}]});
    assert_eq!(r("{{#items}}[{{name}}]{{/items}}", ctx), "[]");
}

#[test]
fn section_over_object_pushes_scope() {
    let ctx = json!({"title": "Outer", "container": {"title": "Journal"}});
    assert_eq!(r("{{#container}}{{title}}{{/container}}", ctx), "Journal");
}

#[test]
fn section_over_empty_object_renders_once() {
    let ctx = json!({"title": "Outer", "container": {}});
    assert_eq!(r("{{#container}}{{title}}{{/container}}", ctx), "Outer");
}

#[test]
fn section_over_truthy_scalar_renders_once_without_scope() {
    let ctx = json!({"doi": "10.1000/x", "year": 2020});
    assert_eq!(r("{{#doi}}has doi {{doi}}{{/doi}}", ctx.clone()), "has doi 10.1000/x");
    assert_eq!(r("{{#year}}y={{year}}{{/year}}", ctx), "y=2020");
}

#[test]
fn falsy_values_skip_sections() {
    let ctx = json!({"z": 0, "zf": 0.0, "f": false, "n": null, "e": "", "l": []});
    for path in ["z", "zf", "f", "n", "e", "l", "absent"] {
        let template = format!("[{{{{#{path}}}}}x{{{{/{path}}}}}]");
        assert_eq!(r(&template, ctx.clone()), "[]", "{template}");
    }
}

#[test]
fn string_zero_is_truthy() {
    assert_eq!(r("{{#s}}yes{{/s}}", json!({"s": "0"})), "yes");
}

#[test]
fn inverted_section() {
    assert_eq!(r("{{^a}}empty{{/a}}", json!({})), "empty");
    assert_eq!(r("{{^a}}empty{{/a}}", json!({"a": [1]})), "");
    assert_eq!(r("{{^a}}empty{{/a}}", json!({"a": []})), "empty");
    assert_eq!(r("{{^a}}empty{{/a}}", json!({"a": {}})), "");
}

#[test]
fn inverted_section_keeps_scopes() {
    let ctx = json!({"title": "T"});
    assert_eq!(r("{{^doi}}no doi for {{title}}{{/doi}}", ctx), "no doi for T");
}

#[test]
fn nested_lists() {
    let ctx = json!({"rows": [[1, 2], [3]]});
    assert_eq!(r("{{#rows}}({{#.}}{{.}}{{/.}}){{/rows}}", ctx), "(12)(3)");
}

#[test]
fn dot_section_outside_loop_uses_root() {
    assert_eq!(r("{{#.}}{{a}}{{/.}}", json!({"a": "root"})), "root");
}

// ============================================================================
// Loop metadata
// ============================================================================

#[test]
fn loop_metadata_number_and_last() {
    let ctx = json!({"a": ["x", "y", "z"]});
    assert_eq!(
        r("{{#a}}{{@number}}:{{.}}{{^@last}},{{/@last}}{{/a}}", ctx),
        "1:x,2:y,3:z"
    );
}

#[test]
fn loop_metadata_all_bindings() {
    let ctx = json!({"a": ["x", "y"]});
    assert_eq!(
        r(
            "{{#a}}{{@index}}/{{@number}}/{{@first}}/{{@last}}/{{@odd}}/{{@even}}/{{@length}} {{/a}}",
            ctx
        ),
        "0/1/true/false/false/true/2 1/2/false/true/true/false/2 "
    );
}

#[test]
fn first_separator_idiom() {
    let ctx = json!({"a": ["x", "y", "z"]});
    assert_eq!(r("{{#a}}{{^@first}}, {{/@first}}{{.}}{{/a}}", ctx), "x, y, z");
}

#[test]
fn inner_loop_metadata_shadows_outer() {
    let ctx = json!({"outer": [{"inner": ["a", "b"]}, {"inner": ["c"]}]});
    assert_eq!(
        r("{{#outer}}{{#inner}}{{@index}}{{/inner}};{{@index}}|{{/outer}}", ctx),
        "01;0|0;1|"
    );
}

#[test]
fn loop_metadata_absent_outside_loops() {
    assert_eq!(r("[{{@index}}]{{#@first}}x{{/@first}}", json!({})), "[]");
}

#[test]
fn object_section_inside_loop_keeps_loop_metadata_visible() {
    let ctx = json!({"items": [{"meta": {"k": "v"}}, {"meta": {"k": "w"}}]});
    assert_eq!(
        r("{{#items}}{{#meta}}{{@number}}{{k}}{{/meta}}{{/items}}", ctx),
        "1v2w"
    );
}

#[test]
fn single_element_is_first_and_last() {
    let ctx = json!({"a": ["only"]});
    assert_eq!(r("{{#a}}{{#@first}}F{{/@first}}{{#@last}}L{{/@last}}{{/a}}", ctx), "FL");
}

// ============================================================================
// Render modes
// ============================================================================

#[test]
fn citekey_mode_strips_punctuation() {
    let out = r_with(
        "{{a}} {{b}}",
        json!({"a": "Smith", "b": "2024!"}),
        RenderOptions::for_citekey(),
    );
    assert_eq!(out, "Smith2024");
}

#[test]
fn citekey_mode_keeps_case_underscore_and_hyphen() {
    let out = r_with(
        "{{a}}_{{b}}-{{c}}",
        json!({"a": "McDonald", "b": "O'Neil", "c": "Zoë"}),
        RenderOptions::for_citekey(),
    );
    assert_eq!(out, "McDonald_ONeil-Zo");
}

#[test]
fn citekey_mode_applies_to_literals_too() {
    let out = r_with("key: {{a}}/2", json!({"a": "x"}), RenderOptions::for_citekey());
    assert_eq!(out, "keyx2");
}

#[test]
fn normal_mode_leaves_output_alone() {
    let out = r("{{a}} {{b}}", json!({"a": "Smith", "b": "2024!"}));
    assert_eq!(out, "Smith 2024!");
}

#[test]
fn array_mode_is_advisory() {
    let template = r#"[{{#tags}}{{^@first}},{{/@first}}"{{.}}"{{/tags}}]"#;
    let ctx = json!({"tags": ["physics", "history"]});
    let plain = r(template, ctx.clone());
    let array = r_with(template, ctx, RenderOptions::for_array_field());
    assert_eq!(plain, array);
    assert_eq!(array, r#"["physics","history"]"#);
    let parsed: serde_json::Value = serde_json::from_str(&array).unwrap();
    assert_eq!(parsed, json!(["physics", "history"]));
}

#[test]
fn array_mode_does_not_escape() {
    let out = r_with(
        r#"["{{title}}"]"#,
        json!({"title": "say \"hi\""}),
        RenderOptions::for_array_field(),
    );
    assert_eq!(out, r#"["say "hi""]"#);
}

#[test]
fn non_object_root_context() {
    assert_eq!(r("{{.}}", json!("bare")), "bare");
    assert_eq!(r("{{0}}{{1}}", json!(["a", "b"])), "ab");
}
