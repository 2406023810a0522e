//! Doc-tag driven extraction of top-level `var` and `const` initializers.
//!
//! ```text
//! var (
//!     // parser
//!     retries = 3        -> Record { tag: "parser", name: "retries", value: 3 }
//! )
//! ```
//!
//! Only specs inside a parenthesised group carry their own doc comment; a
//! comment above a lone `var x = 1` belongs to the keyword and is not read.

use std::borrow::Cow;
use std::hash::Hash;

use goscan_syntax::SyntaxTree;
use goscan_syntax::ast::{AstArena, CommentGroupId, DeclId, ExprId, FuncDeclId, GenDeclKind, Spec};
use goscan_syntax::walk::Visitor;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::collection;
use crate::literal;
use crate::value::Primitive;

/// Doc-comment labels to look for. Membership is exact; order and
/// duplicates do not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: SmallVec<[String; 4]>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag`; returns false if it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    #[inline]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for TagSet {
    fn from(tags: [S; N]) -> Self {
        tags.into_iter().collect()
    }
}

/// One extracted declaration: the tag that selected it, the declared name
/// and the decoded initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<V> {
    pub tag: String,
    pub name: String,
    pub value: V,
}

/// Walks every top-level value spec whose doc comment carries a tag from
/// `tags` and keeps the names whose initializer `decode` accepts.
///
/// Tags are matched before anything is decoded. Records come out in source
/// order.
pub fn walk_declarations<V, F>(tree: &SyntaxTree, tags: &TagSet, decode: F) -> Vec<Record<V>>
where
    F: FnMut(&SyntaxTree, ExprId) -> Option<V>,
{
    if tags.is_empty() {
        return Vec::new();
    }

    let mut walker = DeclarationWalker {
        tree,
        tags,
        decode,
        records: Vec::new(),
        untagged: 0,
        rejected: 0,
    };
    tree.walk(&mut walker);

    tracing::debug!(
        tags = tags.len(),
        records = walker.records.len(),
        untagged = walker.untagged,
        rejected = walker.rejected,
        "walked declarations"
    );
    walker.records
}

/// `// tag` then `x = <literal>` inside `var ( ... )`.
pub fn scalar_values<T: Primitive>(tree: &SyntaxTree, tags: &TagSet) -> Vec<Record<T>> {
    walk_declarations(tree, tags, literal::decode::<T>)
}

/// `// tag` then `xs = []T{...}` inside `var ( ... )`.
pub fn sequence_values<T: Primitive>(tree: &SyntaxTree, tags: &TagSet) -> Vec<Record<Vec<T>>> {
    walk_declarations(tree, tags, collection::sequence::<T>)
}

/// `// tag` then `m = map[K]V{...}` inside `var ( ... )`.
pub fn mapping_values<K, V>(tree: &SyntaxTree, tags: &TagSet) -> Vec<Record<IndexMap<K, V>>>
where
    K: Primitive + Eq + Hash,
    V: Primitive,
{
    walk_declarations(tree, tags, collection::mapping::<K, V>)
}

struct DeclarationWalker<'t, F, V> {
    tree: &'t SyntaxTree,
    tags: &'t TagSet,
    decode: F,
    records: Vec<Record<V>>,
    untagged: usize,
    rejected: usize,
}

impl<F, V> DeclarationWalker<'_, F, V> {
    /// First doc line that is a member of the tag set, comment markers and
    /// leading spaces trimmed.
    fn matched_tag(&self, doc: CommentGroupId) -> Option<String> {
        self.tree.comment_lines(doc).find_map(|text| {
            let text: Cow<'_, str> = if text.contains('\r') {
                Cow::Owned(text.replace('\r', ""))
            } else {
                Cow::Borrowed(text)
            };
            let line = text.trim_start_matches(['/', ' ']);
            self.tags.contains(line).then(|| line.to_owned())
        })
    }
}

impl<'t, F, V> Visitor<'t> for DeclarationWalker<'t, F, V>
where
    F: FnMut(&SyntaxTree, ExprId) -> Option<V>,
{
    fn visit_decl(&mut self, a: &'t AstArena, id: DeclId) {
        let tree = self.tree;
        let decl = &a.decls[id];
        if !matches!(decl.kind, GenDeclKind::Var | GenDeclKind::Const) {
            return;
        }

        for spec in a.specs_list(decl.specs) {
            let Spec::Value(spec) = spec else { continue };

            let Some(tag) = spec.doc.and_then(|doc| self.matched_tag(doc)) else {
                self.untagged += spec.names.len();
                continue;
            };
            if tag.is_empty() {
                continue;
            }

            let values = a.exprs_list(spec.values);
            for (i, &name) in a.ident_names(spec.names).iter().enumerate() {
                let name = tree.name(name);
                let Some(&value) = values.get(i) else { continue };
                if name == "_" {
                    continue;
                }
                match (self.decode)(tree, value) {
                    Some(value) => self.records.push(Record {
                        tag: tag.clone(),
                        name: name.to_owned(),
                        value,
                    }),
                    None => {
                        tracing::trace!(name, tag = %tag, "initializer did not decode");
                        self.rejected += 1;
                    }
                }
            }
        }
    }

    fn visit_func_decl(&mut self, _: &'t AstArena, _: FuncDeclId) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use goscan_syntax::parse_source;

    fn tree(src: &str) -> SyntaxTree {
        parse_source(src).unwrap()
    }

    /// Wraps `body` in `package p` and a `var ( ... )` group.
    fn grouped(body: &str) -> SyntaxTree {
        tree(&format!("package p\n\nvar (\n{body})\n"))
    }

    #[test]
    fn tag_set_is_a_set() {
        let set: TagSet = ["a", "b", "a"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("b"));
        assert!(!set.contains("c"));
        assert_eq!(TagSet::from(["b", "a"]).iter().count(), 2);
    }

    #[test]
    fn untagged_declarations_are_ignored() {
        let t = grouped("\ta = 1\n\n\t// other\n\tb = 2\n\n\t// parser\n\tc = 3\n");
        let got = scalar_values::<i64>(&t, &TagSet::from(["parser"]));
        assert_eq!(
            got,
            vec![Record {
                tag: "parser".into(),
                name: "c".into(),
                value: 3
            }]
        );
    }

    #[test]
    fn keyword_comment_of_single_declaration_is_not_read() {
        let t = tree("package p\n\n// parser\nvar x = 1\n\n// parser\nconst y = 2\n");
        assert!(scalar_values::<i64>(&t, &TagSet::from(["parser"])).is_empty());
    }

    #[test]
    fn first_matching_line_wins() {
        let t = grouped("\t// description\n\t// second\n\t// first\n\ta = \"x\"\n");
        let got = scalar_values::<String>(&t, &TagSet::from(["first", "second"]));
        assert_eq!(got[0].tag, "second");
    }

    #[test]
    fn comment_markers_and_spaces_are_trimmed() {
        let t = tree("package p\n\nconst (\n\t///   parser\n\ta = 1.5\n)\n");
        let got = scalar_values::<f64>(&t, &TagSet::from(["parser"]));
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].value, 1.5);
    }

    #[test]
    fn empty_tag_never_produces_records() {
        let t = grouped("\t//\n\ta = 1\n");
        assert!(scalar_values::<i64>(&t, &TagSet::from([""])).is_empty());
    }

    #[test]
    fn empty_tag_set_returns_nothing() {
        let t = grouped("\t// parser\n\ta = 1\n");
        assert!(scalar_values::<i64>(&t, &TagSet::new()).is_empty());
    }

    #[test]
    fn names_pair_with_their_own_initializer() {
        let t = grouped("\t// parser\n\ta, _, c = 1, 2, 3\n\n\t// parser\n\tx, y int = 7\n");
        let got: Vec<_> = scalar_values::<i32>(&t, &TagSet::from(["parser"]))
            .into_iter()
            .map(|r| (r.name, r.value))
            .collect();
        assert_eq!(got, vec![("a".to_owned(), 1), ("c".to_owned(), 3), ("x".to_owned(), 7)]);
    }

    #[test]
    fn grouped_spec_uses_its_own_doc_only() {
        let t = tree("package p\n\n// parser\nvar (\n\ta = 1\n\n\t// parser\n\tb = 2\n)\n");
        let got = scalar_values::<u8>(&t, &TagSet::from(["parser"]));
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "b");
    }

    #[test]
    fn functions_are_not_entered() {
        let t = tree("package p\n\n// parser\nfunc f() {\n\tvar (\n\t\t// parser\n\t\tx = 1\n\t)\n\t_ = x\n}\n");
        assert!(scalar_values::<i64>(&t, &TagSet::from(["parser"])).is_empty());
    }

    #[test]
    fn custom_decode_step() {
        let t = grouped("\t// k\n\ta = 10\n\n\t// k\n\tb = \"s\"\n");
        let got = walk_declarations(&t, &TagSet::from(["k"]), |tree, expr| {
            Some(tree.text(tree.arena().exprs.span(expr)).len())
        });
        assert_eq!(got.iter().map(|r| r.value).collect::<Vec<_>>(), vec![2, 3]);
    }
}
