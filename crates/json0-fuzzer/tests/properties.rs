use json0::{codec, Json0};
use json0_fuzzer::{check_pair, random_document, run, Fuzzer, Options};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn random_concurrent_ops_converge() {
    let engine = Json0::new();
    if let Err(failure) = run(&engine, 0, 500, &Options::default()) {
        panic!("{failure}");
    }
}

#[test]
fn long_ops_converge() {
    let engine = Json0::new();
    let options = Options { max_components: 10, root_replace: 0.0, ..Options::default() };
    if let Err(failure) = run(&engine, 10_000, 200, &options) {
        panic!("{failure}");
    }
}

#[test]
fn random_ops_with_list_moves_converge() {
    let engine = Json0::new();
    let options = Options { list_moves: true, ..Options::default() };
    if let Err(failure) = run(&engine, 0, 5_000, &options) {
        panic!("{failure}");
    }
}

#[test]
#[ignore = "slow in debug builds; run with --release --ignored"]
fn many_random_ops_with_list_moves_converge() {
    let engine = Json0::new();
    for max_components in [4, 8, 12] {
        let options = Options { list_moves: true, max_components, ..Options::default() };
        if let Err(failure) = run(&engine, 100_000, 20_000, &options) {
            panic!("max_components {max_components}: {failure}");
        }
    }
}

#[test]
fn check_pair_returns_the_converged_snapshot() {
    let engine = Json0::new();
    let doc = json!({"l": [1, 2], "s": "ab"});
    let a = codec::from_json_op(&json!([{"p": ["l", 0], "ld": 1}, {"p": ["s", 2], "si": "c"}])).unwrap();
    let b = codec::from_json_op(&json!([{"p": ["l", 2], "li": 3}, {"p": ["s", 0], "sd": "a"}])).unwrap();
    assert_eq!(check_pair(&engine, &doc, &a, &b).unwrap(), json!({"l": [2, 3], "s": "bc"}));
}

#[test]
fn random_documents_are_reproducible() {
    assert_eq!(random_document(&mut Fuzzer::from_u64(5)), random_document(&mut Fuzzer::from_u64(5)));
}
