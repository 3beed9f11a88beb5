#![allow(dead_code)]

use json0::{codec, Json0, Op, Side};
use serde_json::Value;

pub fn op(v: Value) -> Op {
    codec::from_json_op(&v).expect("test op must decode")
}

pub fn wire(op: &Op) -> Value {
    codec::to_json_op(op)
}

/// Transforms `a` and `b` against each other and checks both application
/// orders reach the same snapshot, which is returned.
pub fn assert_converges(engine: &Json0, doc: &Value, a: &Op, b: &Op) -> Value {
    let a_t = engine.transform(a, b, Side::Left).expect("transform a");
    let b_t = engine.transform(b, a, Side::Right).expect("transform b");

    let via_a = engine
        .apply(&engine.apply(doc, a).expect("apply a"), &b_t)
        .expect("apply b'");
    let via_b = engine
        .apply(&engine.apply(doc, b).expect("apply b"), &a_t)
        .expect("apply a'");
    assert_eq!(via_a, via_b, "diverged: a={} b={}", wire(a), wire(b));
    via_a
}

pub fn assert_invertible(engine: &Json0, doc: &Value, op: &Op) {
    let after = engine.apply(doc, op).expect("apply");
    let inverse = engine.invert(op).expect("invert");
    assert_eq!(&engine.apply(&after, &inverse).expect("apply inverse"), doc);
}
