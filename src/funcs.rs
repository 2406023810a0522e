//! Selection of top-level functions by receiver type and parameter types.

use goscan_syntax::SyntaxTree;
use goscan_syntax::ast::{AstArena, DeclId, FuncDeclId, Receiver, SignatureId, Type, TypeId};
use goscan_syntax::lexer::is_identifier;
use goscan_syntax::walk::Visitor;
use smallvec::SmallVec;

/// Names of the functions declared on `receiver` whose parameter types
/// cover every entry of `params`, in source order.
///
/// An empty `receiver` selects plain functions only. A receiver matches
/// `T` and `*T` for an unqualified `T`. Parameter types are compared by
/// their bare name: `*T`, `pkg.T` and `*pkg.T` all count as `T`. Variadic
/// parameters and instantiated generics (`T[A]`) count as nothing.
pub fn function_names(tree: &SyntaxTree, receiver: &str, params: &[&str]) -> Vec<String> {
    if !receiver.is_empty() && !is_identifier(receiver) {
        tracing::debug!(receiver, "receiver is not an identifier; nothing can match");
        return Vec::new();
    }

    let mut filter = FunctionFilter {
        tree,
        receiver,
        params,
        names: Vec::new(),
    };
    tree.walk(&mut filter);
    tracing::debug!(receiver, params = params.len(), matched = filter.names.len(), "filtered functions");
    filter.names
}

struct FunctionFilter<'t> {
    tree: &'t SyntaxTree,
    receiver: &'t str,
    params: &'t [&'t str],
    names: Vec<String>,
}

impl<'t> FunctionFilter<'t> {
    fn receiver_matches(&self, a: &AstArena, recv: Option<Receiver>) -> bool {
        match recv {
            None => self.receiver.is_empty(),
            Some(_) if self.receiver.is_empty() => false,
            Some(recv) => self.receiver_name(a, recv.typ) == Some(self.receiver),
        }
    }

    /// `T` or `*T` with `T` unqualified; type arguments of a generic
    /// receiver (`*S[T]`) are ignored.
    fn receiver_name(&self, a: &AstArena, typ: TypeId) -> Option<&'t str> {
        match a.types[typ] {
            Type::Named { pkg: None, name, .. } => Some(self.tree.name(name)),
            Type::Pointer { elem, .. } => match a.types[elem] {
                Type::Named { pkg: None, name, .. } => Some(self.tree.name(name)),
                _ => None,
            },
            _ => None,
        }
    }

    /// `T`, `pkg.T`, `*T` or `*pkg.T`. Instantiated generics have no name.
    fn param_name(&self, a: &AstArena, typ: TypeId) -> Option<&'t str> {
        let named = |id: TypeId| match a.types[id] {
            Type::Named { name, args, .. } if args.is_empty() => Some(self.tree.name(name)),
            _ => None,
        };
        match a.types[typ] {
            Type::Pointer { elem, .. } => named(elem),
            _ => named(typ),
        }
    }

    fn params_match(&self, a: &AstArena, sig: SignatureId) -> bool {
        if self.params.is_empty() {
            return true;
        }
        let fields = a.fields_list(a.signatures[sig].params.fields);
        let mut present: SmallVec<[&str; 8]> = SmallVec::new();
        for &id in fields {
            let field = &a.fields[id];
            if field.ellipsis_pos.is_some() {
                continue;
            }
            present.extend(self.param_name(a, field.typ));
        }

        self.params.iter().all(|want| {
            present.contains(want) || {
                let quoted = format!("{want:?}");
                present.contains(&quoted.as_str())
            }
        })
    }
}

impl<'t> Visitor<'t> for FunctionFilter<'t> {
    fn visit_decl(&mut self, _: &'t AstArena, _: DeclId) {}

    fn visit_func_decl(&mut self, a: &'t AstArena, id: FuncDeclId) {
        let func = &a.funcs[id];
        if self.receiver_matches(a, func.recv) && self.params_match(a, func.signature) {
            self.names.push(self.tree.name(func.name).to_owned());
        }
    }
}
