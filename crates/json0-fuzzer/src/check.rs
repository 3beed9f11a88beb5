//! Convergence, inversion and composition checks over random operations.

use json0::codec::to_json_op;
use json0::json_equal::deep_equal;
use json0::{Json0, Op};
use serde_json::Value;
use thiserror::Error;

use crate::fuzzer::Fuzzer;
use crate::generator::{random_document, random_op, Options};

#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Engine(#[from] json0::Error),
    #[error("transformed ops diverge\n  doc: {doc}\n  a: {a}\n  b: {b}\n  a then b': {left}\n  b then a': {right}")]
    Diverged {
        doc: Value,
        a: Value,
        b: Value,
        left: Value,
        right: Value,
    },
    #[error("op does not invert\n  doc: {doc}\n  op: {op}\n  restored: {restored}")]
    NotInvertible { doc: Value, op: Value, restored: Value },
    #[error("compose differs from sequential apply\n  doc: {doc}\n  a: {a}\n  b: {b}\n  composed: {composed}")]
    ComposeMismatch {
        doc: Value,
        a: Value,
        b: Value,
        composed: Value,
    },
}

/// Checks that `a` and `b`, both valid against `doc`, converge when
/// transformed against each other, that each inverts, and that composing
/// `a` with the transformed `b` matches applying them in sequence. Returns
/// the converged snapshot.
pub fn check_pair(engine: &Json0, doc: &Value, a: &Op, b: &Op) -> Result<Value, Failure> {
    let (a_t, b_t) = engine.transform_x(a, b)?;
    let left = engine.apply_owned(engine.apply(doc, a)?, &b_t)?;
    let right = engine.apply_owned(engine.apply(doc, b)?, &a_t)?;
    if !deep_equal(&left, &right) {
        return Err(Failure::Diverged {
            doc: doc.clone(),
            a: to_json_op(a),
            b: to_json_op(b),
            left,
            right,
        });
    }

    for op in [a, b] {
        let restored = engine.apply_owned(engine.apply(doc, op)?, &engine.invert(op)?)?;
        if !deep_equal(&restored, doc) {
            return Err(Failure::NotInvertible {
                doc: doc.clone(),
                op: to_json_op(op),
                restored,
            });
        }
    }

    let composed = engine.compose(a, &b_t)?;
    if !deep_equal(&engine.apply(doc, &composed)?, &left) {
        return Err(Failure::ComposeMismatch {
            doc: doc.clone(),
            a: to_json_op(a),
            b: to_json_op(&b_t),
            composed: to_json_op(&composed),
        });
    }

    Ok(left)
}

/// Runs `iterations` random pairs starting from `seed`. Each iteration uses
/// its own seed (`seed + i`) so a failure can be replayed on its own.
pub fn run(engine: &Json0, seed: u64, iterations: u64, options: &Options) -> Result<(), Failure> {
    tracing::debug!(seed, iterations, list_moves = options.list_moves, "fuzz run");
    for i in 0..iterations {
        let mut f = Fuzzer::from_u64(seed.wrapping_add(i));
        let doc = random_document(&mut f);
        let a = random_op(&mut f, engine, &doc, options)?;
        let b = random_op(&mut f, engine, &doc, options)?;
        if let Err(failure) = check_pair(engine, &doc, &a, &b) {
            tracing::warn!(seed = seed.wrapping_add(i), "fuzz failure");
            return Err(failure);
        }
    }
    Ok(())
}
