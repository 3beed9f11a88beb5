mod common;

use common::{assert_converges, assert_invertible, op, wire};
use json0::{Json0, Side};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn doc() -> Value {
    json!({
        "title": "hello",
        "count": 1,
        "tags": ["a", "b", "c"],
        "meta": {"owner": "x", "list": [1, 2]},
    })
}

#[test_case(json!([{"p": ["title", 5], "si": " world"}]) ; "legacy insert")]
#[test_case(json!([{"p": ["title", 0], "sd": "he"}]) ; "legacy delete")]
#[test_case(json!([{"p": ["count"], "na": -4}]) ; "number add")]
#[test_case(json!([{"p": ["tags", 1], "ld": "b", "li": {"x": 1}}]) ; "list replace")]
#[test_case(json!([{"p": ["tags", 0], "lm": 2}, {"p": ["tags", 3], "li": "d"}]) ; "move then insert")]
#[test_case(json!([{"p": ["meta"], "od": {"owner": "x", "list": [1, 2]}}]) ; "object delete")]
#[test_case(json!([{"p": ["meta", "owner"], "od": "x", "oi": "y"}, {"p": ["new"], "oi": []}]) ; "object edits")]
#[test_case(json!([{"p": ["title"], "t": "text0", "o": [{"p": 1, "d": "el"}, {"p": 0, "i": "J"}]}]) ; "text0 subtype")]
#[test_case(json!([{"p": [], "od": doc(), "oi": 3}]) ; "root replace")]
fn every_kind_inverts(op_json: Value) {
    assert_invertible(&Json0::new(), &doc(), &op(op_json));
}

#[test_case(
    json!([{"p": ["count"], "na": 2}, {"p": ["tags", 0], "li": "z"}]),
    json!([{"p": ["tags", 0], "ld": "z"}, {"p": ["count"], "na": 3}])
    ; "cancelling insert"
)]
#[test_case(
    json!([{"p": ["title", 5], "si": "!"}]),
    json!([{"p": ["title", 6], "si": "?"}, {"p": ["title", 0], "sd": "h"}])
    ; "string edits"
)]
#[test_case(
    json!([{"p": ["meta", "owner"], "od": "x"}]),
    json!([{"p": ["meta", "owner"], "oi": "y"}, {"p": ["meta", "list", 0], "lm": 1}])
    ; "delete then insert"
)]
fn compose_matches_sequential_application(a: Value, b: Value) {
    let engine = Json0::new();
    let (a, b) = (op(a), op(b));
    let sequential = engine.apply(&engine.apply(&doc(), &a).unwrap(), &b).unwrap();
    let composed = engine.compose(&a, &b).unwrap();
    assert_eq!(engine.apply(&doc(), &composed).unwrap(), sequential);
}

#[test_case(json!([{"p": ["count"], "na": 2}, {"p": ["tags", 0], "li": "z"}]) ; "already minimal")]
#[test_case(json!([{"p": ["count"], "na": 2}, {"p": ["count"], "na": 3}]) ; "mergeable neighbours")]
fn composing_with_nothing_is_identity(op_json: Value) {
    let engine = Json0::new();
    let a = op(op_json);
    assert_eq!(engine.compose(&a, &[]).unwrap(), a);

    let normalized = engine.normalize(&a).unwrap();
    assert_eq!(engine.compose(&[], &a).unwrap(), normalized);
    assert_eq!(engine.compose(&normalized, &[]).unwrap(), normalized);
    assert_eq!(engine.apply(&doc(), &normalized).unwrap(), engine.apply(&doc(), &a).unwrap());
}

#[test]
fn compose_is_minimal_for_cancelling_edits() {
    let engine = Json0::new();
    let a = op(json!([{"p": ["count"], "na": 2}, {"p": ["tags", 0], "li": "z"}]));
    let b = op(json!([{"p": ["tags", 0], "ld": "z"}, {"p": ["count"], "na": 3}]));
    assert_eq!(wire(&engine.compose(&a, &b).unwrap()), json!([{"p": ["count"], "na": 5}]));
}

#[test]
fn normalize_keeps_unrelated_components() {
    let engine = Json0::new();
    let a = op(json!([
        {"p": ["tags", 0], "lm": 0},
        {"p": ["count"], "na": 1},
        {"p": ["title", 0], "si": "a"},
        {"p": ["title", 1], "si": "b"},
    ]));
    assert_eq!(
        wire(&engine.normalize(&a).unwrap()),
        json!([{"p": ["tags", 0], "lm": 0}, {"p": ["count"], "na": 1}, {"p": ["title", 0], "si": "ab"}])
    );
}

#[test_case(
    json!([{"p": ["tags", 1], "li": "x"}]),
    json!([{"p": ["tags", 1], "ld": "b"}])
    ; "insert vs delete"
)]
#[test_case(
    json!([{"p": ["title", 2], "sd": "llo"}]),
    json!([{"p": ["title", 3], "si": "XX"}, {"p": ["title", 0], "sd": "h"}])
    ; "string delete split"
)]
#[test_case(
    json!([{"p": ["meta", "list", 1], "ld": 2}, {"p": ["meta", "owner"], "od": "x"}]),
    json!([{"p": ["meta"], "od": {"owner": "x", "list": [1, 2]}, "oi": {}}])
    ; "nested edits vs parent replace"
)]
#[test_case(
    json!([{"p": ["tags", 0], "ld": "a"}, {"p": ["count"], "na": 1}]),
    json!([{"p": ["tags", 0], "ld": "a"}, {"p": ["count"], "na": 1}])
    ; "identical ops"
)]
#[test_case(
    json!([{"p": ["title"], "t": "text0", "o": [{"p": 1, "i": "A"}]}]),
    json!([{"p": ["title", 1], "si": "B"}, {"p": ["title", 4], "sd": "lo"}])
    ; "text0 vs legacy"
)]
fn concurrent_ops_converge(a: Value, b: Value) {
    let engine = Json0::new();
    assert_converges(&engine, &doc(), &op(a.clone()), &op(b.clone()));
    assert_converges(&engine, &doc(), &op(b), &op(a));
}

#[test]
fn transform_x_matches_single_sided_transform() {
    let engine = Json0::new();
    let a = op(json!([{"p": ["tags", 0], "li": "x"}, {"p": ["count"], "na": 1}]));
    let b = op(json!([{"p": ["tags", 0], "li": "y"}, {"p": ["tags", 3], "ld": "c"}]));
    let (a_t, b_t) = engine.transform_x(&a, &b).unwrap();
    assert_eq!(a_t, engine.transform(&a, &b, Side::Left).unwrap());
    assert_eq!(b_t, engine.transform(&b, &a, Side::Right).unwrap());
}
