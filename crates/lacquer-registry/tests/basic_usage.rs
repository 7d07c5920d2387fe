//! Integration tests for the everyday render path: one registry, a few
//! sheets, a theme swap, a reset.

use std::rc::Rc;

use lacquer_registry::StyleRegistry;
use lacquer_render::{MemoryRenderer, MemoryState};
use lacquer_style::{RuleSet, StyleSheet, Theme, decl_block};
use serde_json::json;

fn button() -> Rc<StyleSheet> {
    StyleSheet::computed("button", |theme| {
        RuleSet::new().with_rule(
            "root",
            decl_block(json!({
                "color": theme.str_value("color").unwrap_or("black"),
                "fontFamily": "Roboto",
            })),
        )
    })
    .shared()
}

fn icon() -> Rc<StyleSheet> {
    StyleSheet::new(
        "icon",
        RuleSet::new().with_rule("root", decl_block(json!({"width": 24, "height": 24}))),
    )
    .shared()
}

fn red_registry() -> (StyleRegistry, Rc<MemoryState>) {
    let renderer = MemoryRenderer::new();
    let state = renderer.state();
    let mut registry = StyleRegistry::with_renderer(renderer);
    registry.replace_theme(Theme::builder().set("color", "red").build());
    (registry, state)
}

#[test]
fn render_returns_classes_and_serializes() {
    let (mut registry, _state) = red_registry();

    let classes = registry.render(&button(), None).unwrap();
    assert_eq!(classes.get("root").unwrap(), "button-root-lq-1");
    assert_eq!(
        registry.sheets_to_string(),
        ".button-root-lq-1 {\n  color: red;\n  font-family: Roboto;\n}"
    );
}

#[test]
fn several_sheets_serialize_in_render_order() {
    let (mut registry, state) = red_registry();

    registry.render(&button(), None).unwrap();
    registry.render(&icon(), None).unwrap();
    assert_eq!(state.counters().compiled, 2);
    assert_eq!(
        registry.sheets_to_string(),
        ".button-root-lq-1 {\n  color: red;\n  font-family: Roboto;\n}\n\
         .icon-root-lq-2 {\n  height: 24px;\n  width: 24px;\n}"
    );
}

#[test]
fn theme_update_flows_into_serialized_output() {
    let (mut registry, state) = red_registry();
    let button = button();
    registry.render(&button, None).unwrap();

    registry
        .update_theme(Theme::builder().set("color", "blue").build())
        .unwrap();
    assert_eq!(registry.len(), 1, "rerender must not duplicate entries");
    assert_eq!(state.counters().compiled, 2);
    assert_eq!(
        registry.sheets_to_string(),
        ".button-root-lq-2 {\n  color: blue;\n  font-family: Roboto;\n}"
    );

    // the updated sheet is cached again
    registry.render(&button, None).unwrap();
    assert_eq!(state.counters().compiled, 2);
}

#[test]
fn reset_tears_everything_down() {
    let (mut registry, state) = red_registry();
    registry.render(&button(), None).unwrap();
    registry.render(&icon(), None).unwrap();

    registry.reset();
    assert!(registry.is_empty());
    assert_eq!(state.counters().detached, 2);
    assert_eq!(registry.sheets_to_string(), "");

    // the registry stays usable after a reset
    registry.render(&button(), None).unwrap();
    assert_eq!(registry.len(), 1);
}

#[test]
fn descriptor_swap_serves_the_new_rules() {
    let (mut registry, state) = red_registry();
    registry.render(&button(), None).unwrap();

    let restyled = StyleSheet::new(
        "button",
        RuleSet::new().with_rule("root", decl_block(json!({"color": "green"}))),
    )
    .shared();
    let classes = registry.render(&restyled, None).unwrap();

    assert_eq!(classes.get("root").unwrap(), "button-root-lq-2");
    assert_eq!(state.counters().removed, 1);
    assert_eq!(
        registry.sheets_to_string(),
        ".button-root-lq-2 {\n  color: green;\n}"
    );
}
