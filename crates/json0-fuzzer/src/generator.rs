//! Random documents and operations.
//!
//! Every generated operation is valid against the document it was generated
//! for: each component is applied to a working copy before the next one is
//! picked.

use json0::text0::{self, TextComponent};
use json0::{Component, Edit, Json0, Op, Path, PathKey};
use serde_json::{Map, Number, Value};

use crate::fuzzer::Fuzzer;

const KEYS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];
const ALPHABET: &str = "abcxyzé";

/// What the generator may produce.
#[derive(Debug, Clone)]
pub struct Options {
    /// Emit list moves.
    pub list_moves: bool,
    pub max_components: usize,
    /// Probability that a component replaces the whole document.
    pub root_replace: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            list_moves: false,
            max_components: 4,
            root_replace: 0.02,
        }
    }
}

fn random_scalar(f: &mut Fuzzer) -> Value {
    match f.random_int(0, 3) {
        0 => Value::from(f.random_int(-10, 10)),
        1 => {
            let len = f.below(4);
            Value::String(f.random_string(len, ALPHABET))
        }
        2 => Value::Bool(f.random_bool(0.5)),
        _ => Value::Null,
    }
}

/// A random value nested at most `depth` containers deep.
pub fn random_value(f: &mut Fuzzer, depth: usize) -> Value {
    if depth == 0 || f.random_bool(0.4) {
        return random_scalar(f);
    }
    if f.random_bool(0.5) {
        let len = f.below(4);
        Value::Array((0..len).map(|_| random_value(f, depth - 1)).collect())
    } else {
        let mut map = Map::new();
        for key in KEYS {
            if f.random_bool(0.4) {
                map.insert(key.to_owned(), random_value(f, depth - 1));
            }
        }
        Value::Object(map)
    }
}

/// An object with at least one string, number, list and nested object.
pub fn random_document(f: &mut Fuzzer) -> Value {
    let mut map = Map::new();
    let title_len = 3 + f.below(4);
    map.insert("title".into(), Value::String(f.random_string(title_len, ALPHABET)));
    map.insert("count".into(), Value::from(f.random_int(-10, 10)));
    let items_len = 2 + f.below(3);
    map.insert(
        "items".into(),
        Value::Array((0..items_len).map(|_| random_value(f, 2)).collect()),
    );
    let mut meta = Map::new();
    for key in KEYS {
        if f.random_bool(0.5) {
            meta.insert(key.to_owned(), random_value(f, 2));
        }
    }
    map.insert("meta".into(), Value::Object(meta));
    Value::Object(map)
}

fn collect<'a>(value: &'a Value, path: &mut Path, out: &mut Vec<(Path, &'a Value)>) {
    out.push((path.clone(), value));
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(PathKey::Key(key.clone()));
                collect(child, path, out);
                path.pop();
            }
        }
        Value::Array(list) => {
            for (i, child) in list.iter().enumerate() {
                path.push(PathKey::Index(i));
                collect(child, path, out);
                path.pop();
            }
        }
        _ => {}
    }
}

fn text_edit(f: &mut Fuzzer, s: &str) -> TextComponent {
    let chars: Vec<char> = s.chars().collect();
    if !chars.is_empty() && f.random_bool(0.4) {
        let start = f.below(chars.len());
        let end = (start + 1 + f.below(3)).min(chars.len());
        TextComponent::delete(start, chars[start..end].iter().collect::<String>())
    } else {
        let len = 1 + f.below(3);
        TextComponent::insert(f.below(chars.len() + 1), f.random_string(len, ALPHABET))
    }
}

/// One component valid against `doc`, or `None` if the picked location
/// offers nothing to edit.
pub fn random_component(f: &mut Fuzzer, doc: &Value, options: &Options) -> Option<Component> {
    if f.random_bool(options.root_replace) {
        return Some(Component::new(
            Vec::new(),
            Edit::ObjectReplace { old: doc.clone(), new: random_document(f) },
        ));
    }

    let mut nodes = Vec::new();
    collect(doc, &mut Vec::new(), &mut nodes);
    let (path, node) = f.pick(&nodes).clone();
    let at = |key: PathKey| {
        let mut p = path.clone();
        p.push(key);
        p
    };

    match node {
        Value::Object(map) => {
            let absent: Vec<&str> = KEYS.into_iter().filter(|k| !map.contains_key(*k)).collect();
            let present: Vec<&String> = map.keys().collect();
            match f.random_int(0, 2) {
                0 if !absent.is_empty() => {
                    let key = *f.pick(&absent);
                    let value = random_value(f, 2);
                    Some(Component::new(at(key.into()), Edit::ObjectInsert { value }))
                }
                1 if !present.is_empty() => {
                    let key = f.pick(&present).to_string();
                    let old = map[&key].clone();
                    Some(Component::new(at(key.into()), Edit::ObjectDelete { old }))
                }
                2 if !present.is_empty() => {
                    let key = f.pick(&present).to_string();
                    let old = map[&key].clone();
                    let new = random_value(f, 2);
                    Some(Component::new(at(key.into()), Edit::ObjectReplace { old, new }))
                }
                _ => None,
            }
        }
        Value::Array(list) => {
            let len = list.len();
            match f.random_int(0, 3) {
                0 => {
                    let index = f.below(len + 1);
                    let value = random_value(f, 2);
                    Some(Component::new(at(index.into()), Edit::ListInsert { value }))
                }
                1 if len > 0 => {
                    let index = f.below(len);
                    let old = list[index].clone();
                    Some(Component::new(at(index.into()), Edit::ListDelete { old }))
                }
                2 if len > 0 => {
                    let index = f.below(len);
                    let old = list[index].clone();
                    let new = random_value(f, 2);
                    Some(Component::new(at(index.into()), Edit::ListReplace { old, new }))
                }
                3 if len > 0 && options.list_moves => {
                    let from = f.below(len);
                    let to = f.below(len);
                    Some(Component::new(at(from.into()), Edit::ListMove { to }))
                }
                _ => None,
            }
        }
        Value::Number(_) if !path.is_empty() => {
            let delta = Number::from(f.random_int(-5, 5));
            Some(Component::new(path.clone(), Edit::NumberAdd { delta }))
        }
        Value::String(s) if !path.is_empty() => {
            let edit = text_edit(f, s);
            if f.random_bool(0.5) {
                let (pos, edit) = match edit.edit {
                    text0::TextEdit::Insert(text) => (edit.pos, Edit::StringInsert { text }),
                    text0::TextEdit::Delete(text) => (edit.pos, Edit::StringDelete { text }),
                };
                Some(Component::new(at(pos.into()), edit))
            } else {
                Some(Component::new(
                    path.clone(),
                    Edit::Subtype { name: text0::NAME.to_owned(), op: text0::encode_op(&[edit]) },
                ))
            }
        }
        _ => None,
    }
}

/// An operation of one to `options.max_components` components, valid
/// against `doc`.
pub fn random_op(f: &mut Fuzzer, engine: &Json0, doc: &Value, options: &Options) -> json0::Result<Op> {
    let target = 1 + f.below(options.max_components.max(1));
    let mut working = doc.clone();
    let mut op = Vec::with_capacity(target);
    let mut attempts = 0;
    while op.len() < target && attempts < target * 10 {
        attempts += 1;
        let Some(c) = random_component(f, &working, options) else {
            continue;
        };
        working = engine.apply_owned(working, std::slice::from_ref(&c))?;
        op.push(c);
    }
    Ok(op)
}
