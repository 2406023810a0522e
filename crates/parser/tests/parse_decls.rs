use goscan_syntax::ast::{
    AstArena, Expr, FuncDeclId, GenDeclKind, ImportName, Spec, TopLevelDecl, Type,
};
use goscan_syntax::walk::{Visitor, Walk};
use goscan_syntax::{DiagKind, ParseOptions, SyntaxTree, parse_source};

const FILE: &str = r#"// Package demo is a fixture.
package demo

import (
	"context"
	ctx2 "context"
	. "fmt"
	_ "embed"
)

import "strings"

type (
	Pair[K comparable, V any] struct {
		Key K
		Val V
	}
	Grid [4][4]int
	Alias = map[string][]*Pair[string, int]
)

// Handler does things.
func (h *Handler) Serve(ctx context.Context, args ...string) (n int, err error) {
	if x := len(args); x > 0 {
		return x, nil
	}
	return 0, nil
}

func Map[T, U any](xs []T, f func(T) U) []U { return nil }

func external(int, string) bool

var (
	ch    = make(chan<- int, 1)
	lit   = &Pair[string, int]{Key: "a", Val: 1}
	fn    = func(a, b int) int { return a + b }
	x, y  = 1 << 3, -2.5
	iface interface{ M() }
)
"#;

fn tree() -> SyntaxTree {
    parse_source(FILE).unwrap()
}

#[test]
fn file_structure() {
    let t = tree();
    assert_eq!(t.package_name(), "demo");
    let kinds: Vec<_> = t
        .decls()
        .iter()
        .map(|d| match *d {
            TopLevelDecl::Gen(id) => format!("{:?}", t.arena().decls[id].kind),
            TopLevelDecl::Func(id) => t.name(t.arena().funcs[id].name).to_owned(),
        })
        .collect();
    assert_eq!(kinds, ["Import", "Import", "Type", "Serve", "Map", "external", "Var"]);

    let doc = t.file().doc.expect("package doc");
    assert_eq!(t.comment_lines(doc).collect::<Vec<_>>(), ["// Package demo is a fixture."]);
}

#[test]
fn import_names() {
    let t = tree();
    let TopLevelDecl::Gen(id) = t.decls()[0] else { panic!() };
    let a = t.arena();
    let names: Vec<_> = a
        .specs_list(a.decls[id].specs)
        .iter()
        .map(|s| match s {
            Spec::Import(i) => match i.name {
                None => "-".to_owned(),
                Some(ImportName::Dot(_)) => ".".to_owned(),
                Some(ImportName::Blank(_)) => "_".to_owned(),
                Some(ImportName::Name(n)) => t.name(n).to_owned(),
            },
            _ => panic!("not an import"),
        })
        .collect();
    assert_eq!(names, ["-", "ctx2", ".", "_"]);
}

#[test]
fn generic_and_alias_types() {
    let t = tree();
    let TopLevelDecl::Gen(id) = t.decls()[2] else { panic!() };
    let a = t.arena();
    assert_eq!(a.decls[id].kind, GenDeclKind::Type);
    let specs = a.specs_list(a.decls[id].specs);
    let [Spec::Type(pair), Spec::Type(grid), Spec::Type(alias)] = specs else {
        panic!("expected three type specs")
    };
    assert!(pair.type_params.is_some());
    assert!(matches!(a.types[pair.typ], Type::Struct { .. }));
    assert!(grid.type_params.is_none());
    assert!(matches!(a.types[grid.typ], Type::Array { .. }));
    assert!(alias.assign_pos.is_some());
    assert!(matches!(a.types[alias.typ], Type::Map { .. }));
}

#[test]
fn method_signature() {
    let t = tree();
    let TopLevelDecl::Func(id) = t.decls()[3] else { panic!() };
    let a = t.arena();
    let f = &a.funcs[id];

    let recv = f.recv.expect("receiver");
    assert_eq!(recv.name.map(|n| t.name(n)), Some("h"));
    assert!(matches!(a.types[recv.typ], Type::Pointer { .. }));
    assert!(f.body.is_some());
    assert_eq!(t.comment_lines(f.doc.expect("doc")).next(), Some("// Handler does things."));

    let params = a.fields_list(a.signatures[f.signature].params.fields);
    assert_eq!(params.len(), 2);
    assert!(a.fields[params[1]].ellipsis_pos.is_some());
}

#[test]
fn generic_function_and_missing_body() {
    let t = tree();
    let a = t.arena();
    let TopLevelDecl::Func(map) = t.decls()[4] else { panic!() };
    assert!(a.funcs[map].type_params.is_some());
    let TopLevelDecl::Func(ext) = t.decls()[5] else { panic!() };
    assert!(a.funcs[ext].body.is_none());
    let params = a.fields_list(a.signatures[a.funcs[ext].signature].params.fields);
    assert_eq!(params.len(), 2);
    assert!(params.iter().all(|&p| a.fields[p].names.is_empty()));
}

struct Counter {
    funcs: usize,
    composites: usize,
    func_lits: usize,
}

impl<'ast> Visitor<'ast> for Counter {
    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        self.funcs += 1;
        a.funcs[id].walk(a, self);
    }

    fn visit_expr(&mut self, a: &'ast AstArena, id: goscan_syntax::ast::ExprId) {
        match a.exprs[id] {
            Expr::CompositeLit { .. } => self.composites += 1,
            Expr::FuncLit { .. } => self.func_lits += 1,
            _ => {}
        }
        a.exprs[id].walk(a, self);
    }
}

#[test]
fn visitor_reaches_nested_nodes() {
    let t = tree();
    let mut c = Counter {
        funcs: 0,
        composites: 0,
        func_lits: 0,
    };
    t.walk(&mut c);
    assert_eq!((c.funcs, c.composites, c.func_lits), (3, 1, 1));
}

#[test]
fn syntax_errors_are_collected() {
    let err = parse_source("package p\n\nvar = 1\nfunc f( {\n").unwrap_err();
    assert!(err.diags.len() >= 2, "{:?}", err.diags);
    assert!(err.diags.iter().all(|d| d.kind == DiagKind::Parse));

    let err = parse_source("package p\nvar x = 0b12\n").unwrap_err();
    assert_eq!(err.diags[0].kind, DiagKind::Lex);
}

#[test]
fn options_can_skip_comments() {
    let t = SyntaxTree::parse_with(FILE, &ParseOptions { comments: false }).unwrap();
    assert!(t.file().doc.is_none());
    assert_eq!(t.arena().comments.len(), 0);
}
