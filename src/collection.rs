//! Decoding of composite literals (`[]T{...}`, `map[K]V{...}`) element by
//! element on top of the literal decoder.
//!
//! Elements that are not bare basic literals are skipped. A basic literal
//! that fails to decode discards the whole literal.

use std::hash::Hash;

use goscan_syntax::SyntaxTree;
use goscan_syntax::ast::{Element, Expr, ExprId, KeyedElement};
use indexmap::IndexMap;

use crate::literal::decode_basic_lit;
use crate::value::{Primitive, PrimitiveKind, Value};

/// Elements of `expr` when it is a composite literal.
fn composite_elements(tree: &SyntaxTree, expr: ExprId) -> Option<&[KeyedElement]> {
    match tree.arena().exprs[expr] {
        Expr::CompositeLit { lit, .. } => Some(tree.arena().keyed_elems_list(lit.elements)),
        _ => None,
    }
}

/// `Some(decoded)` when `element` is a bare basic literal, `None` otherwise.
fn basic_element(tree: &SyntaxTree, element: Element, kind: PrimitiveKind) -> Option<Option<Value>> {
    let Element::Expr(id) = element else {
        return None;
    };
    match tree.arena().exprs[id] {
        Expr::BasicLit(lit) => Some(decode_basic_lit(tree, lit, kind)),
        _ => None,
    }
}

/// Decodes a sequence literal, skipping non-literal and keyed elements.
/// Empty results are `None`.
pub fn decode_sequence(tree: &SyntaxTree, expr: ExprId, kind: PrimitiveKind) -> Option<Vec<Value>> {
    let elements = composite_elements(tree, expr)?;
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        if element.key.is_some() {
            continue;
        }
        match basic_element(tree, element.value, kind) {
            Some(Some(value)) => out.push(value),
            Some(None) => return None,
            None => {}
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Decodes a mapping literal into `(key, value)` pairs in source order.
/// Duplicate keys are kept; typed callers collapse them last-write-wins.
pub fn decode_mapping(
    tree: &SyntaxTree,
    expr: ExprId,
    key_kind: PrimitiveKind,
    value_kind: PrimitiveKind,
) -> Option<Vec<(Value, Value)>> {
    let elements = composite_elements(tree, expr)?;
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        let Some(key) = element.key else {
            continue;
        };
        let (Some(k), Some(v)) = (
            basic_element(tree, key, key_kind),
            basic_element(tree, element.value, value_kind),
        ) else {
            continue;
        };
        out.push((k?, v?));
    }
    (!out.is_empty()).then_some(out)
}

/// Typed form of [`decode_sequence`].
pub fn sequence<T: Primitive>(tree: &SyntaxTree, expr: ExprId) -> Option<Vec<T>> {
    decode_sequence(tree, expr, T::KIND)?
        .into_iter()
        .map(T::from_value)
        .collect()
}

/// Typed form of [`decode_mapping`]; the last duplicate key wins and keeps
/// the position of its first occurrence.
pub fn mapping<K, V>(tree: &SyntaxTree, expr: ExprId) -> Option<IndexMap<K, V>>
where
    K: Primitive + Eq + Hash,
    V: Primitive,
{
    let pairs = decode_mapping(tree, expr, K::KIND, V::KIND)?;
    let mut out = IndexMap::with_capacity(pairs.len());
    for (k, v) in pairs {
        out.insert(K::from_value(k)?, V::from_value(v)?);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use goscan_syntax::ast::{Spec, TopLevelDecl};
    use goscan_syntax::parse_source;

    /// Initializer of the first `var` in `src`.
    fn first_init(src: &str) -> (SyntaxTree, ExprId) {
        let tree = parse_source(src).unwrap();
        let TopLevelDecl::Gen(id) = tree.decls()[0] else {
            panic!("expected var");
        };
        let Spec::Value(spec) = tree.arena().specs_list(tree.arena().decls[id].specs)[0] else {
            panic!("expected value spec");
        };
        let expr = tree.arena().exprs_list(spec.values)[0];
        (tree, expr)
    }

    #[test]
    fn sequence_skips_non_literals() {
        let (tree, e) = first_init("package p\nvar s = []int{1, x, -2, (3), 4}\n");
        assert_eq!(sequence::<i64>(&tree, e), Some(vec![1, 4]));
    }

    #[test]
    fn sequence_aborts_on_bad_literal() {
        let (tree, e) = first_init("package p\nvar s = []int8{1, 300, 2}\n");
        assert_eq!(sequence::<i8>(&tree, e), None);
        let (tree, e) = first_init("package p\nvar s = []float64{1.5, 2}\n");
        assert_eq!(sequence::<f64>(&tree, e), None);
    }

    #[test]
    fn sequence_skips_keyed_and_nested_elements() {
        let (tree, e) = first_init("package p\nvar s = [...]string{2: \"c\", \"a\", {\"x\"}}\n");
        assert_eq!(sequence::<String>(&tree, e), Some(vec!["a".to_owned()]));
    }

    #[test]
    fn empty_sequence_is_no_match() {
        let (tree, e) = first_init("package p\nvar s = []bool{true, false}\n");
        assert_eq!(sequence::<bool>(&tree, e), None);
        let (tree, e) = first_init("package p\nvar s = []int{}\n");
        assert_eq!(sequence::<i32>(&tree, e), None);
    }

    #[test]
    fn non_composite_is_no_match() {
        let (tree, e) = first_init("package p\nvar s = \"abc\"\n");
        assert_eq!(sequence::<String>(&tree, e), None);
        assert_eq!(mapping::<String, String>(&tree, e), None);
    }

    #[test]
    fn mapping_last_write_wins() {
        let (tree, e) = first_init("package p\nvar m = map[string]int{\"a\": 1, \"b\": 2, \"a\": 3}\n");
        let m = mapping::<String, i64>(&tree, e).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m["a"], 3);
        assert_eq!(m.get_index(0).map(|(k, _)| k.as_str()), Some("a"));
    }

    #[test]
    fn mapping_skips_non_literal_sides_and_aborts_on_bad_literal() {
        let (tree, e) = first_init("package p\nvar m = map[int]float64{3: 3.14, k: 1.0, 4: x, 17: 42.0}\n");
        let m = mapping::<i64, f64>(&tree, e).unwrap();
        assert_eq!(m.into_iter().collect::<Vec<_>>(), vec![(3, 3.14), (17, 42.0)]);

        let (tree, e) = first_init("package p\nvar m = map[int]float64{3: 3.14, 17: 42}\n");
        assert_eq!(mapping::<i64, f64>(&tree, e), None);
    }

    #[test]
    fn runtime_kinds_keep_duplicates() {
        let (tree, e) = first_init("package p\nvar m = map[uint8]string{1: \"a\", 1: \"b\"}\n");
        let pairs = decode_mapping(&tree, e, PrimitiveKind::U8, PrimitiveKind::String).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], (Value::U8(1), Value::String("b".into())));
    }
}
