use super::*;
use crate::ast::{
    ArrayLen, Block, ChanDir, Field, FieldId, FieldList, IdentName, ListRef, Receiver, Results,
    Signature, SignatureId, Type, TypeId, TypeParams, TypeParamsId,
};

/// One comma-separated entry of a parameter list before name/type grouping.
#[derive(Clone, Debug)]
struct ParamDecl {
    names: Vec<IdentName>,
    ellipsis_pos: Option<Span>,
    /// `None` for a bare identifier that may be a name or a type.
    typ: Option<TypeId>,
    span: Span,
}

impl<'src> Parser<'src> {
    pub(super) fn is_type_start(&self) -> bool {
        match self.current() {
            Tok::Ident(_)
            | Tok::Star
            | Tok::LBrack
            | Tok::LParen
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwStruct
            | Tok::KwInterface
            | Tok::KwFunc => true,
            Tok::Arrow => self.peek(1) == Tok::KwChan,
            _ => false,
        }
    }

    pub(super) fn parse_type(&mut self) -> TypeId {
        let start = self.current_span();
        if !self.enter() {
            return self.arena.types.alloc(Type::Bad(start), start);
        }
        let typ = self.parse_type_inner(start);
        self.leave();
        let span = self.span_from(start);
        self.arena.types.alloc(typ, span)
    }

    fn parse_type_inner(&mut self, start: Span) -> Type {
        match self.current() {
            Tok::Ident(_) => self.parse_named_type(),
            Tok::Star => {
                let star_pos = self.bump().span;
                let elem = self.parse_type();
                Type::Pointer { star_pos, elem }
            }
            Tok::LBrack => {
                let l_brack = self.bump().span;
                if let Some(r_brack) = self.eat(Tok::RBrack) {
                    let elem = self.parse_type();
                    return Type::Slice {
                        l_brack,
                        r_brack,
                        elem,
                    };
                }
                let len = match self.eat(Tok::Ellipsis) {
                    Some(span) => ArrayLen::Ellipsis(span),
                    None => ArrayLen::Expr(self.parse_expr()),
                };
                let r_brack = self.expect(Tok::RBrack, "']'");
                let elem = self.parse_type();
                Type::Array {
                    l_brack,
                    len,
                    r_brack,
                    elem,
                }
            }
            Tok::KwMap => {
                let map_pos = self.bump().span;
                self.expect(Tok::LBrack, "'['");
                let key = self.parse_type();
                self.expect(Tok::RBrack, "']'");
                let val = self.parse_type();
                Type::Map { map_pos, key, val }
            }
            Tok::KwChan => {
                let chan_pos = self.bump().span;
                let dir = match self.eat(Tok::Arrow) {
                    Some(_) => ChanDir::Send,
                    None => ChanDir::Both,
                };
                let elem = self.parse_type();
                Type::Chan {
                    dir,
                    chan_pos,
                    elem,
                }
            }
            Tok::Arrow if self.peek(1) == Tok::KwChan => {
                self.bump();
                let chan_pos = self.bump().span;
                let elem = self.parse_type();
                Type::Chan {
                    dir: ChanDir::Recv,
                    chan_pos,
                    elem,
                }
            }
            Tok::KwStruct => {
                let struct_pos = self.bump().span;
                let body = self.expect_block("struct type");
                Type::Struct { struct_pos, body }
            }
            Tok::KwInterface => {
                let interface_pos = self.bump().span;
                let body = self.expect_block("interface type");
                Type::Interface {
                    interface_pos,
                    body,
                }
            }
            Tok::KwFunc => {
                let func_pos = self.bump().span;
                let sig = self.parse_signature();
                Type::Func { func_pos, sig }
            }
            Tok::LParen => {
                let l_paren = self.bump().span;
                let typ = self.parse_type();
                let r_paren = self.expect(Tok::RParen, "')'");
                Type::Paren {
                    l_paren,
                    typ,
                    r_paren,
                }
            }
            found => {
                self.push_error(start, format!("expected type, found {found}"));
                Type::Bad(Span::empty_at(start.start as usize))
            }
        }
    }

    /// `Name`, `pkg.Name`, optionally followed by `[TypeArgs]`.
    fn parse_named_type(&mut self) -> Type {
        let first = self.parse_ident("type name");
        let (pkg, name) = if self.eat(Tok::Dot).is_some() {
            (Some(first), self.parse_ident("qualified type name"))
        } else {
            (None, first)
        };
        let args = if self.at(Tok::LBrack) && self.peek(1) != Tok::RBrack {
            self.bump();
            let mut args = vec![self.parse_type()];
            while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
                args.push(self.parse_type());
            }
            self.expect(Tok::RBrack, "']'");
            self.arena.list_types(args)
        } else {
            ListRef::EMPTY
        };
        Type::Named { pkg, name, args }
    }

    /// `[T any, U ~int | ~string]`; the contents are not modelled.
    pub(super) fn parse_type_params(&mut self) -> TypeParamsId {
        let start = self.current_span();
        let (l_brack, r_brack) = self.skip_balanced(Tok::LBrack, Tok::RBrack);
        let span = self.span_from(start);
        self.arena
            .type_params
            .alloc(TypeParams { l_brack, r_brack }, span)
    }

    pub(super) fn parse_block(&mut self) -> Block {
        let (l_brace, r_brace) = self.skip_balanced(Tok::LBrace, Tok::RBrace);
        Block { l_brace, r_brace }
    }

    fn expect_block(&mut self, context: &str) -> Block {
        if self.at(Tok::LBrace) {
            return self.parse_block();
        }
        let span = self.current_span();
        self.push_error(span, format!("expected '{{' after {context}"));
        let empty = Span::empty_at(span.start as usize);
        Block {
            l_brace: empty,
            r_brace: empty,
        }
    }

    /// `Parameters [ Result ]`
    pub(super) fn parse_signature(&mut self) -> SignatureId {
        let start = self.current_span();
        let params = self.parse_params();
        let results = if self.at(Tok::LParen) {
            Some(Results::Params(self.parse_params()))
        } else if self.is_type_start() {
            Some(Results::Type(self.parse_type()))
        } else {
            None
        };
        let span = self.span_from(start);
        self.arena
            .signatures
            .alloc(Signature { params, results }, span)
    }

    pub(super) fn parse_receiver(&mut self) -> Receiver {
        let list = self.parse_params();
        let fields = self.arena.fields_list(list.fields).to_vec();
        let (name, typ) = match fields.as_slice() {
            [field] => {
                let field = self.arena.fields[*field];
                let names = self.arena.ident_names(field.names);
                let (count, first) = (names.len(), names.first().copied());
                if count > 1 {
                    self.push_error(list.l_paren.to(list.r_paren), "method has multiple receivers");
                }
                (first, field.typ)
            }
            _ => {
                let span = list.l_paren.to(list.r_paren);
                self.push_error(
                    span,
                    if fields.is_empty() {
                        "method has no receiver"
                    } else {
                        "method has multiple receivers"
                    },
                );
                (None, self.arena.types.alloc(Type::Bad(span), span))
            }
        };
        Receiver {
            l_paren: list.l_paren,
            name,
            typ,
            r_paren: list.r_paren,
        }
    }

    /// `"(" [ ParameterList [ "," ] ] ")"`
    pub(super) fn parse_params(&mut self) -> FieldList {
        let l_paren = self.expect(Tok::LParen, "'('");
        let mut params = Vec::new();
        while !matches!(self.current(), Tok::RParen | Tok::Eof) {
            let before = self.cursor;
            params.push(self.parse_param_decl());
            if self.eat(Tok::Comma).is_none() {
                break;
            }
            if self.cursor == before {
                self.bump();
            }
        }
        let r_paren = self.expect(Tok::RParen, "')'");
        let fields = self.resolve_param_list(params);
        let fields = self.arena.list_fields(fields);
        FieldList {
            l_paren,
            fields,
            r_paren,
        }
    }

    fn parse_param_decl(&mut self) -> ParamDecl {
        let start = self.current_span();
        let mut decl = ParamDecl {
            names: Vec::new(),
            ellipsis_pos: None,
            typ: None,
            span: start,
        };

        match (self.current(), self.peek(1)) {
            (Tok::Ident(_), Tok::Comma | Tok::RParen) => {
                decl.names.push(self.parse_ident("parameter"));
            }
            (Tok::Ident(_), Tok::Dot) => decl.typ = Some(self.parse_type()),
            (Tok::Ident(_), Tok::LBrack) => {
                // `a []T` and `a [N]T` name a parameter; `G[T]` is a generic type.
                let generic = self.peek(2) != Tok::RBrack
                    && self
                        .matching_close(1, Tok::LBrack, Tok::RBrack)
                        .is_some_and(|close| {
                            matches!(self.peek(close + 1), Tok::Comma | Tok::RParen)
                        });
                if generic {
                    decl.typ = Some(self.parse_type());
                } else {
                    decl.names.push(self.parse_ident("parameter"));
                    decl.typ = Some(self.parse_type());
                }
            }
            (Tok::Ident(_), _) => {
                decl.names.push(self.parse_ident("parameter"));
                decl.ellipsis_pos = self.eat(Tok::Ellipsis);
                decl.typ = Some(self.parse_type());
            }
            (Tok::Ellipsis, _) => {
                decl.ellipsis_pos = Some(self.bump().span);
                decl.typ = Some(self.parse_type());
            }
            _ => decl.typ = Some(self.parse_type()),
        }

        decl.span = self.span_from(start);
        decl
    }

    /// Go's grouping rule: when any entry is `name Type`, every bare
    /// identifier is a name sharing the type of the next typed entry;
    /// otherwise every entry is a type.
    fn resolve_param_list(&mut self, params: Vec<ParamDecl>) -> Vec<FieldId> {
        let named = params
            .iter()
            .any(|p| p.typ.is_some() && !p.names.is_empty());

        let mut out = Vec::with_capacity(params.len());
        if !named {
            for param in params {
                let typ = match (param.typ, param.names.first()) {
                    (Some(typ), _) => typ,
                    (None, Some(&name)) => self.named_type_from_ident(name),
                    (None, None) => self.arena.types.alloc(Type::Bad(param.span), param.span),
                };
                out.push(self.alloc_field(ListRef::EMPTY, param.ellipsis_pos, typ, param.span));
            }
            return out;
        }

        let mut pending: Vec<IdentName> = Vec::new();
        let mut pending_start: Option<u32> = None;
        for param in params {
            match param.typ {
                Some(typ) => {
                    if param.names.is_empty() {
                        self.push_error(param.span, "mixed named and unnamed parameters");
                    }
                    let mut names = std::mem::take(&mut pending);
                    names.extend(param.names);
                    let names = self.arena.list_ident_names(names);
                    let span = Span {
                        start: pending_start.take().unwrap_or(param.span.start),
                        end: param.span.end,
                    };
                    out.push(self.alloc_field(names, param.ellipsis_pos, typ, span));
                }
                None => {
                    pending_start.get_or_insert(param.span.start);
                    pending.extend(param.names);
                }
            }
        }

        for name in pending {
            self.push_error(name.pos, "missing parameter type");
            let typ = self.named_type_from_ident(name);
            out.push(self.alloc_field(ListRef::EMPTY, None, typ, name.pos));
        }

        out
    }

    fn alloc_field(
        &mut self,
        names: ListRef<IdentName>,
        ellipsis_pos: Option<Span>,
        typ: TypeId,
        span: Span,
    ) -> FieldId {
        self.arena.fields.alloc(
            Field {
                names,
                ellipsis_pos,
                typ,
            },
            span,
        )
    }

    pub(super) fn named_type_from_ident(&mut self, name: IdentName) -> TypeId {
        self.arena.types.alloc(
            Type::Named {
                pkg: None,
                name,
                args: ListRef::EMPTY,
            },
            name.pos,
        )
    }
}
