mod common;

use common::{assert_converges, op, wire};
use json0::{Error, Json0, Side};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn list_insert_tie_break() {
    let engine = Json0::new();
    let doc = json!([1, 2, 3]);
    let a = op(json!([{"p": [1], "li": "a"}]));
    let b = op(json!([{"p": [1], "li": "b"}]));

    assert_eq!(wire(&engine.transform(&a, &b, Side::Left).unwrap()), json!([{"p": [1], "li": "a"}]));
    assert_eq!(wire(&engine.transform(&a, &b, Side::Right).unwrap()), json!([{"p": [2], "li": "a"}]));
    assert_eq!(assert_converges(&engine, &doc, &a, &b), json!([1, "a", "b", 2, 3]));
}

#[test]
fn number_adds_commute() {
    let engine = Json0::new();
    let doc = json!({"x": 5});
    let a = op(json!([{"p": ["x"], "na": 3}]));
    let b = op(json!([{"p": ["x"], "na": 4}]));

    let ab = engine.apply(&engine.apply(&doc, &a).unwrap(), &b).unwrap();
    let ba = engine.apply(&engine.apply(&doc, &b).unwrap(), &a).unwrap();
    assert_eq!(ab, json!({"x": 12}));
    assert_eq!(ab, ba);
    assert_eq!(assert_converges(&engine, &doc, &a, &b), json!({"x": 12}));
}

#[test]
fn stale_delete_fails_its_precondition() {
    let engine = Json0::new();
    let err = engine.apply(&json!({"a": 1}), &op(json!([{"p": ["a"], "od": 2}]))).unwrap_err();
    assert_eq!(
        err,
        Error::Precondition { path: r#"["a"]"#.into(), expected: "2".into(), actual: "1".into() }
    );
}

#[test]
fn object_insert_race() {
    let engine = Json0::new();
    let doc = json!({});
    let a = op(json!([{"p": ["k"], "oi": 1}]));
    let b = op(json!([{"p": ["k"], "oi": 2}]));

    assert_eq!(
        wire(&engine.transform(&a, &b, Side::Left).unwrap()),
        json!([{"p": ["k"], "od": 2, "oi": 1}])
    );
    assert_eq!(wire(&engine.transform(&a, &b, Side::Right).unwrap()), json!([]));
    assert_eq!(assert_converges(&engine, &doc, &a, &b), json!({"k": 1}));
}

#[test]
fn transforming_against_nothing_is_identity() {
    let engine = Json0::new();
    let a = op(json!([{"p": ["a"], "oi": 1}, {"p": ["l", 0], "lm": 1}]));
    assert_eq!(engine.transform(&a, &[], Side::Left).unwrap(), a);
    assert_eq!(engine.transform(&a, &[], Side::Right).unwrap(), a);
}

#[test]
fn replace_versus_delete_becomes_insert() {
    let engine = Json0::new();
    let doc = json!({"l": ["a", "b"]});
    let a = op(json!([{"p": ["l", 0], "ld": "a", "li": "z"}]));
    let b = op(json!([{"p": ["l", 0], "ld": "a"}]));
    assert_eq!(wire(&engine.transform(&a, &b, Side::Left).unwrap()), json!([{"p": ["l", 0], "li": "z"}]));
    assert_eq!(assert_converges(&engine, &doc, &a, &b), json!({"l": ["z", "b"]}));
}

#[test]
fn concurrent_replaces_left_wins() {
    let engine = Json0::new();
    let doc = json!({"k": 0, "l": [0]});
    let a = op(json!([{"p": ["k"], "od": 0, "oi": "a"}, {"p": ["l", 0], "ld": 0, "li": "a"}]));
    let b = op(json!([{"p": ["k"], "od": 0, "oi": "b"}, {"p": ["l", 0], "ld": 0, "li": "b"}]));
    assert_eq!(assert_converges(&engine, &doc, &a, &b), json!({"k": "a", "l": ["a"]}));
}

#[test]
fn edits_inside_a_replaced_subtree_are_dropped() {
    let engine = Json0::new();
    let doc = json!({"cfg": {"n": 1, "tags": ["x"]}});
    let a = op(json!([{"p": ["cfg", "n"], "na": 1}, {"p": ["cfg", "tags", 1], "li": "y"}]));
    let b = op(json!([{"p": ["cfg"], "od": {"n": 1, "tags": ["x"]}, "oi": null}]));
    assert_eq!(assert_converges(&engine, &doc, &a, &b), json!({"cfg": null}));
}

#[test]
fn concurrent_deletes_of_a_modified_value_stay_invertible() {
    let engine = Json0::new();
    let doc = json!({"a": {"n": 1}});
    let a = op(json!([{"p": ["a"], "od": {"n": 1}}]));
    let b = op(json!([{"p": ["a", "n"], "na": 2}]));

    let a_t = engine.transform(&a, &b, Side::Left).unwrap();
    assert_eq!(wire(&a_t), json!([{"p": ["a"], "od": {"n": 3}}]));
    let after_b = engine.apply(&doc, &b).unwrap();
    let after_both = engine.apply(&after_b, &a_t).unwrap();
    assert_eq!(engine.apply(&after_both, &engine.invert(&a_t).unwrap()).unwrap(), after_b);
}

#[test]
fn root_replace_wins_over_nested_edits() {
    let engine = Json0::new();
    let doc = json!({"a": 1});
    let a = op(json!([{"p": ["a"], "na": 1}]));
    let b = op(json!([{"p": [], "od": {"a": 1}, "oi": [1, 2]}]));
    assert_eq!(assert_converges(&engine, &doc, &a, &b), json!([1, 2]));
}
