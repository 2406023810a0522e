//! Read-only traversal of the declaration tree.
//!
//! Node types get [`Walk`] from `#[derive(WalkAst)]`, which walks their
//! fields in declaration order. Arena ids are where a walk re-enters the
//! [`Visitor`]: each id type forwards to its own hook, and every hook looks
//! the node up and keeps walking unless overridden. A hook that returns
//! without calling `walk` prunes the subtree below it.

use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

/// Declares the `Visitor` trait with one hook per arena id, and makes each
/// id walk by calling its hook.
macro_rules! visitor_hooks {
    ($(
        $(#[$doc:meta])*
        $hook:ident($id:ty) => $arena:ident;
    )*) => {
        /// Hooks for the arena nodes a walk reaches, starting from the file.
        pub trait Visitor<'ast> {
            /// Entry point of [`SyntaxTree::walk`](crate::SyntaxTree::walk).
            #[inline]
            fn visit_source_file(&mut self, a: &'ast AstArena, f: &'ast SourceFile) {
                f.walk(a, self);
            }

            $(
                $(#[$doc])*
                #[inline]
                fn $hook(&mut self, a: &'ast AstArena, id: $id) {
                    a.$arena[id].walk(a, self);
                }
            )*
        }

        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$hook(a, *self);
                }
            }
        )*
    };
}

visitor_hooks! {
    /// `import`, `const`, `type` or `var`, grouped or single.
    visit_decl(DeclId) => decls;
    /// Function or method. Bodies are spans and have nothing to walk.
    visit_func_decl(FuncDeclId) => funcs;
    visit_expr(ExprId) => exprs;
    visit_type(TypeId) => types;
    visit_field(FieldId) => fields;
    visit_signature(SignatureId) => signatures;
    visit_type_params(TypeParamsId) => type_params;
    /// Only reached by walking a group id directly: doc and line comment
    /// fields are `#[walk(skip)]`, and comments are read through
    /// [`SyntaxTree::comment_lines`](crate::SyntaxTree::comment_lines).
    visit_comment_group(CommentGroupId) => comment_groups;
    visit_comment(CommentId) => comments;
}

/// Arena storage a `ListRef<T>` resolves against. Every list kind gets an
/// impl from the buffer table in [`crate::ast`].
pub trait ListBuffer<T> {
    fn resolve(&self, list: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListBuffer<T>,
    T: Walk<'ast>,
{
    #[inline]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for item in a.resolve(*self) {
            item.walk(a, v);
        }
    }
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(node) = self {
            node.walk(a, v);
        }
    }
}

/// Tokens and positions: nothing below them.
macro_rules! leaves {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

leaves! {
    Span,
    Symbol,
    BasicLit,
    StringLit,
    GenDeclKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    CommentKind,
}
