mod common;

use common::{assert_converges, assert_invertible, op};
use json0::Json0;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn letters() -> Value {
    json!(["a", "b", "c", "d", "e"])
}

#[test_case(json!([{"p": [0], "lm": 2}]), json!([{"p": [1], "lm": 3}]), json!(["c", "a", "d", "b", "e"]) ; "crossing moves")]
#[test_case(json!([{"p": [1], "lm": 3}]), json!([{"p": [1], "lm": 0}]), json!(["a", "c", "d", "b", "e"]) ; "same element left wins")]
#[test_case(json!([{"p": [0], "lm": 4}]), json!([{"p": [4], "lm": 0}]), json!(["e", "b", "c", "d", "a"]) ; "swapped ends")]
#[test_case(json!([{"p": [3], "lm": 1}]), json!([{"p": [2], "li": "x"}]), json!(["a", "d", "b", "x", "c", "e"]) ; "move against insert")]
#[test_case(json!([{"p": [1], "lm": 3}]), json!([{"p": [3], "ld": "d"}]), json!(["a", "c", "b", "e"]) ; "move onto deleted slot")]
#[test_case(json!([{"p": [2], "lm": 0}]), json!([{"p": [2], "ld": "c"}]), json!(["a", "b", "d", "e"]) ; "moved element deleted")]
fn moves_converge(a: Value, b: Value, expected: Value) {
    let engine = Json0::new();
    assert_eq!(assert_converges(&engine, &letters(), &op(a), &op(b)), expected);
}

#[test]
fn edits_follow_their_moved_element() {
    let engine = Json0::new();
    let doc = json!([{"n": 1}, {"n": 2}]);
    let a = op(json!([{"p": [0], "lm": 1}]));
    let b = op(json!([{"p": [0, "n"], "na": 5}]));
    assert_eq!(assert_converges(&engine, &doc, &a, &b), json!([{"n": 2}, {"n": 6}]));
}

#[test]
fn moves_invert() {
    let engine = Json0::new();
    for (from, to) in [(0, 4), (4, 0), (2, 2), (1, 3)] {
        assert_invertible(&engine, &letters(), &op(json!([{"p": [from], "lm": to}])));
    }
}
