use super::*;
use crate::ast::{
    FuncDecl, FuncDeclId, GenDecl, GenDeclKind, ImportName, ImportSpec, ListRef, Spec, StringLit,
    TopLevelDecl, TypeSpec, ValueSpec,
};

impl<'src> Parser<'src> {
    pub(super) fn parse_source_file(&mut self) -> SourceFile {
        let doc = self.lead_comment();
        let package_pos = self.expect(Tok::KwPackage, "`package`");
        let name = self.parse_ident("package clause");
        self.expect_semi("package clause");

        let mut decls = Vec::new();
        while !self.at(Tok::Eof) {
            let before = self.cursor;
            match self.current() {
                Tok::KwImport | Tok::KwConst | Tok::KwVar | Tok::KwType => {
                    let id = self.parse_gen_decl();
                    decls.push(TopLevelDecl::Gen(id));
                }
                Tok::KwFunc => {
                    let id = self.parse_func_decl();
                    decls.push(TopLevelDecl::Func(id));
                }
                Tok::Semi => {
                    self.bump();
                }
                found => {
                    let span = self.current_span();
                    self.push_error(span, format!("expected declaration, found {found}"));
                    self.bump();
                    self.sync_to_decl();
                }
            }
            if self.cursor == before {
                self.bump();
            }
        }

        let decls = self.arena.list_top_decls(decls);
        let comments = self.arena.list_comment_group_ids(self.comment_groups.iter().copied());
        SourceFile {
            package_pos,
            name,
            decls,
            comments,
            doc,
        }
    }

    fn parse_gen_decl(&mut self) -> crate::ast::DeclId {
        let doc = self.lead_comment();
        let kw = self.bump();
        let kind = match kw.tok {
            Tok::KwImport => GenDeclKind::Import,
            Tok::KwConst => GenDeclKind::Const,
            Tok::KwType => GenDeclKind::Type,
            _ => GenDeclKind::Var,
        };

        let (l_paren, specs, r_paren) = if let Some(l) = self.eat(Tok::LParen) {
            let mut specs = Vec::new();
            while !matches!(self.current(), Tok::RParen | Tok::Eof) {
                let before = self.cursor;
                let spec_doc = self.lead_comment();
                specs.push(self.parse_spec(kind, spec_doc));
                if self.cursor == before {
                    self.bump();
                }
            }
            let r = self.expect(Tok::RParen, "')'");
            self.expect_semi("declaration");
            (Some(l), specs, Some(r))
        } else {
            (None, vec![self.parse_spec(kind, None)], None)
        };

        let specs = self.arena.list_specs(specs);
        let span = self.span_from(kw.span);
        self.arena.decls.alloc(
            GenDecl {
                doc,
                kw_pos: kw.span,
                kind,
                l_paren,
                specs,
                r_paren,
            },
            span,
        )
    }

    /// Parses one spec including its terminating `;`.
    fn parse_spec(&mut self, kind: GenDeclKind, doc: Option<CommentGroupId>) -> Spec {
        match kind {
            GenDeclKind::Import => Spec::Import(self.parse_import_spec(doc)),
            GenDeclKind::Type => Spec::Type(self.parse_type_spec(doc)),
            GenDeclKind::Const | GenDeclKind::Var => Spec::Value(self.parse_value_spec(kind, doc)),
        }
    }

    fn parse_import_spec(&mut self, doc: Option<CommentGroupId>) -> ImportSpec {
        let name = match self.current() {
            Tok::Dot => Some(ImportName::Dot(self.bump().span)),
            Tok::Ident("_") => Some(ImportName::Blank(self.bump().span)),
            Tok::Ident(_) => Some(ImportName::Name(self.parse_ident("import name"))),
            _ => None,
        };

        let path = match self.current() {
            Tok::StringLit(_) | Tok::RawStringLit(_) => StringLit {
                raw: self.bump().span,
            },
            found => {
                let span = self.current_span();
                self.push_error(span, format!("expected import path, found {found}"));
                StringLit {
                    raw: Span::empty_at(span.start as usize),
                }
            }
        };

        self.expect_semi("import spec");
        ImportSpec { doc, name, path }
    }

    fn parse_value_spec(&mut self, kind: GenDeclKind, doc: Option<CommentGroupId>) -> ValueSpec {
        let start = self.current_span();
        let names = self.parse_ident_list("declaration");
        let names = self.arena.list_ident_names(names);

        let typ = (!matches!(
            self.current(),
            Tok::Assign | Tok::Semi | Tok::RParen | Tok::Eof
        ))
        .then(|| self.parse_type());

        let values = if self.eat(Tok::Assign).is_some() {
            let values = self.parse_expr_list();
            self.arena.list_exprs(values)
        } else {
            ListRef::EMPTY
        };

        if kind == GenDeclKind::Var && typ.is_none() && values.is_empty() {
            let span = self.span_from(start);
            self.push_error(span, "missing variable type or initialization");
        }

        self.expect_semi("value spec");
        let comment = self.trailing_comment();
        ValueSpec {
            doc,
            names,
            typ,
            values,
            comment,
        }
    }

    fn parse_type_spec(&mut self, doc: Option<CommentGroupId>) -> TypeSpec {
        let name = self.parse_ident("type declaration");
        let type_params = (self.at(Tok::LBrack) && self.brackets_are_type_params())
            .then(|| self.parse_type_params());
        let assign_pos = self.eat(Tok::Assign);
        let typ = self.parse_type();
        self.expect_semi("type spec");
        TypeSpec {
            doc,
            name,
            type_params,
            assign_pos,
            typ,
        }
    }

    /// Tells `type G[T any] ...` from `type A [N]int`.
    fn brackets_are_type_params(&self) -> bool {
        match (self.peek(1), self.peek(2)) {
            (Tok::Ident(_), Tok::RBrack) => false,
            (Tok::Ident(_), next) => matches!(
                next,
                Tok::Ident(_)
                    | Tok::Comma
                    | Tok::Tilde
                    | Tok::Star
                    | Tok::LBrack
                    | Tok::LParen
                    | Tok::KwInterface
                    | Tok::KwFunc
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwStruct
                    | Tok::Arrow
            ),
            _ => false,
        }
    }

    fn parse_func_decl(&mut self) -> FuncDeclId {
        let doc = self.lead_comment();
        let func_pos = self.bump().span;
        let recv = self.at(Tok::LParen).then(|| self.parse_receiver());
        let name = self.parse_ident("function declaration");
        let type_params = self.at(Tok::LBrack).then(|| self.parse_type_params());
        let signature = self.parse_signature();
        let body = self.at(Tok::LBrace).then(|| self.parse_block());
        let span = self.span_from(func_pos);
        self.expect_semi("function declaration");

        self.arena.funcs.alloc(
            FuncDecl {
                doc,
                func_pos,
                recv,
                name,
                type_params,
                signature,
                body,
            },
            span,
        )
    }
}
