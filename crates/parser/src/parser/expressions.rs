use super::*;
use crate::ast::{
    BasicLit, BasicLitKind, BinaryOp, Element, Expr, ExprId, ExprOrType, KeyedElement, ListRef,
    LiteralValue, Type, TypeId, UnaryOp,
};

#[inline]
fn binary_op(tok: Tok<'_>) -> Option<BinaryOp> {
    Some(match tok {
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Mod,
        Tok::Amp => BinaryOp::And,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::AndNot => BinaryOp::AndNot,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::LOr => BinaryOp::LOr,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        _ => return None,
    })
}

#[inline]
fn unary_op(tok: Tok<'_>) -> Option<UnaryOp> {
    Some(match tok {
        Tok::Plus => UnaryOp::Add,
        Tok::Minus => UnaryOp::Sub,
        Tok::Bang => UnaryOp::Not,
        Tok::Caret => UnaryOp::Xor,
        Tok::Star => UnaryOp::Deref,
        Tok::Amp => UnaryOp::Addr,
        Tok::Arrow => UnaryOp::Recv,
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    #[inline]
    fn alloc_expr(&mut self, expr: Expr, start: Span) -> ExprId {
        let span = self.span_from(start);
        self.arena.exprs.alloc(expr, span)
    }

    pub(super) fn parse_expr_list(&mut self) -> Vec<ExprId> {
        let mut exprs = vec![self.parse_expr()];
        while self.eat(Tok::Comma).is_some() {
            exprs.push(self.parse_expr());
        }
        exprs
    }

    pub(super) fn parse_expr(&mut self) -> ExprId {
        let operand = self.parse_expr_or_type();
        self.expect_expr(operand)
    }

    /// Expression, or a type where Go admits one (call and index arguments,
    /// conversion callees).
    pub(super) fn parse_expr_or_type(&mut self) -> ExprOrType {
        match self.parse_unary_or_type() {
            ExprOrType::Expr(left) => ExprOrType::Expr(self.parse_binary_rest(left, 1)),
            typ => typ,
        }
    }

    fn expect_expr(&mut self, operand: ExprOrType) -> ExprId {
        match operand {
            ExprOrType::Expr(id) => id,
            ExprOrType::Type(typ) => {
                let span = self.arena.types.span(typ);
                self.push_error(span, "expected expression, found type");
                self.arena.exprs.alloc(Expr::Bad(span), span)
            }
        }
    }

    /// Precedence climbing over Go's five binary levels.
    fn parse_binary_rest(&mut self, mut left: ExprId, min_prec: u8) -> ExprId {
        while let Some(op) = binary_op(self.current()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            let op_pos = self.bump().span;
            let right = self.parse_unary_expr();
            let right = self.parse_binary_rest(right, prec + 1);
            let span = self.arena.exprs.span(left).to(self.arena.exprs.span(right));
            left = self.arena.exprs.alloc(
                Expr::Binary {
                    left,
                    op,
                    op_pos,
                    right,
                },
                span,
            );
        }
        left
    }

    fn parse_unary_expr(&mut self) -> ExprId {
        let operand = self.parse_unary_or_type();
        self.expect_expr(operand)
    }

    fn parse_unary_or_type(&mut self) -> ExprOrType {
        let start = self.current_span();
        if !self.enter() {
            return ExprOrType::Expr(self.arena.exprs.alloc(Expr::Bad(start), start));
        }
        let out = match unary_op(self.current()) {
            // `<-chan T` is a type, not a receive.
            Some(UnaryOp::Recv) if self.peek(1) == Tok::KwChan => self.parse_primary(),
            Some(op) => {
                let op_pos = self.bump().span;
                let expr = self.parse_unary_expr();
                ExprOrType::Expr(self.alloc_expr(Expr::Unary { op, op_pos, expr }, start))
            }
            None => self.parse_primary(),
        };
        self.leave();
        out
    }

    fn parse_primary(&mut self) -> ExprOrType {
        let start = self.current_span();
        let mut operand = self.parse_operand();
        loop {
            operand = match (self.current(), operand) {
                (Tok::Dot, ExprOrType::Expr(expr)) => {
                    self.bump();
                    match self.current() {
                        Tok::Ident(_) => {
                            let sel = self.parse_ident("selector");
                            ExprOrType::Expr(self.alloc_expr(Expr::Selector { expr, sel }, start))
                        }
                        Tok::LParen => {
                            let l_paren = self.bump().span;
                            let typ = match self.eat(Tok::KwType) {
                                Some(_) => None,
                                None => Some(self.parse_type()),
                            };
                            let r_paren = self.expect(Tok::RParen, "')'");
                            ExprOrType::Expr(self.alloc_expr(
                                Expr::TypeAssert {
                                    expr,
                                    l_paren,
                                    typ,
                                    r_paren,
                                },
                                start,
                            ))
                        }
                        found => {
                            let span = self.current_span();
                            self.push_error(
                                span,
                                format!("expected selector or type assertion, found {found}"),
                            );
                            break;
                        }
                    }
                }
                (Tok::LBrack, ExprOrType::Expr(expr)) => self.parse_index_or_slice(expr, start),
                (Tok::LParen, callee) => self.parse_call(callee, start),
                (Tok::LBrace, ExprOrType::Expr(expr)) => match self.expr_to_type(expr) {
                    Some(typ) => ExprOrType::Expr(self.parse_composite_lit(typ, start)),
                    None => break,
                },
                _ => break,
            };
        }
        operand
    }

    fn parse_operand(&mut self) -> ExprOrType {
        let start = self.current_span();
        let kind = match self.current() {
            Tok::IntLit(_) => Some(BasicLitKind::Int),
            Tok::FloatLit(_) => Some(BasicLitKind::Float),
            Tok::ImagLit(_) => Some(BasicLitKind::Imag),
            Tok::RuneLit(_) => Some(BasicLitKind::Rune),
            Tok::StringLit(_) | Tok::RawStringLit(_) => Some(BasicLitKind::String),
            _ => None,
        };
        if let Some(kind) = kind {
            let raw = self.bump().span;
            return ExprOrType::Expr(self.alloc_expr(Expr::BasicLit(BasicLit { kind, raw }), start));
        }

        match self.current() {
            Tok::Ident(_) => {
                let name = self.parse_ident("operand");
                ExprOrType::Expr(self.alloc_expr(Expr::Ident(name), start))
            }
            Tok::LParen => {
                let l_paren = self.bump().span;
                let inner = self.parse_expr_or_type();
                let r_paren = self.expect(Tok::RParen, "')'");
                let span = self.span_from(start);
                match inner {
                    ExprOrType::Expr(expr) => ExprOrType::Expr(self.arena.exprs.alloc(
                        Expr::Paren {
                            l_paren,
                            expr,
                            r_paren,
                        },
                        span,
                    )),
                    ExprOrType::Type(typ) => ExprOrType::Type(self.arena.types.alloc(
                        Type::Paren {
                            l_paren,
                            typ,
                            r_paren,
                        },
                        span,
                    )),
                }
            }
            Tok::KwFunc => {
                let func_pos = self.bump().span;
                let sig = self.parse_signature();
                if self.at(Tok::LBrace) {
                    let body = self.parse_block();
                    ExprOrType::Expr(self.alloc_expr(Expr::FuncLit { func_pos, sig, body }, start))
                } else {
                    let span = self.span_from(start);
                    ExprOrType::Type(self.arena.types.alloc(Type::Func { func_pos, sig }, span))
                }
            }
            Tok::LBrack | Tok::KwMap | Tok::KwChan | Tok::KwStruct | Tok::KwInterface
            | Tok::Arrow => {
                let typ = self.parse_type();
                if self.at(Tok::LBrace) {
                    ExprOrType::Expr(self.parse_composite_lit(typ, start))
                } else {
                    ExprOrType::Type(typ)
                }
            }
            found => {
                self.push_error(start, format!("expected expression, found {found}"));
                let span = Span::empty_at(start.start as usize);
                ExprOrType::Expr(self.arena.exprs.alloc(Expr::Bad(span), span))
            }
        }
    }

    /// After `[`: `a[i]`, `F[T1, T2]`, `a[lo:hi]` or `a[lo:hi:max]`.
    fn parse_index_or_slice(&mut self, base: ExprId, start: Span) -> ExprOrType {
        let l_brack = self.bump().span;

        let lo = if self.at(Tok::Colon) {
            None
        } else {
            let first = self.parse_expr_or_type();
            if !self.at(Tok::Colon) {
                let mut args = vec![first];
                while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
                    args.push(self.parse_expr_or_type());
                }
                let r_brack = self.expect(Tok::RBrack, "']'");
                let args = self.arena.list_expr_or_types(args);
                return ExprOrType::Expr(self.alloc_expr(
                    Expr::Index {
                        base,
                        l_brack,
                        args,
                        r_brack,
                    },
                    start,
                ));
            }
            Some(self.expect_expr(first))
        };

        self.bump();
        let hi = (!matches!(self.current(), Tok::Colon | Tok::RBrack)).then(|| self.parse_expr());
        let max = self.eat(Tok::Colon).map(|_| self.parse_expr());
        let r_brack = self.expect(Tok::RBrack, "']'");
        ExprOrType::Expr(self.alloc_expr(
            Expr::Slice {
                expr: base,
                l_brack,
                lo,
                hi,
                max,
                r_brack,
            },
            start,
        ))
    }

    fn parse_call(&mut self, callee: ExprOrType, start: Span) -> ExprOrType {
        let l_paren = self.bump().span;
        let mut args = Vec::new();
        let mut ellipsis = None;
        while !matches!(self.current(), Tok::RParen | Tok::Eof) {
            let before = self.cursor;
            args.push(self.parse_expr_or_type());
            if let Some(span) = self.eat(Tok::Ellipsis) {
                ellipsis = Some(span);
            }
            if self.eat(Tok::Comma).is_none() {
                break;
            }
            if self.cursor == before {
                self.bump();
            }
        }
        let r_paren = self.expect(Tok::RParen, "')'");
        let args = self.arena.list_expr_or_types(args);
        ExprOrType::Expr(self.alloc_expr(
            Expr::Call {
                callee,
                l_paren,
                args,
                ellipsis,
                r_paren,
            },
            start,
        ))
    }

    fn parse_composite_lit(&mut self, typ: TypeId, start: Span) -> ExprId {
        let lit = self.parse_literal_value();
        self.alloc_expr(Expr::CompositeLit { typ, lit }, start)
    }

    /// `"{" [ KeyedElement { "," KeyedElement } [ "," ] ] "}"`
    fn parse_literal_value(&mut self) -> LiteralValue {
        let l_brace = self.expect(Tok::LBrace, "'{'");
        if !self.enter() {
            let (_, r_brace) = self.skip_balanced_from_inside();
            return LiteralValue {
                l_brace,
                elements: ListRef::EMPTY,
                r_brace,
            };
        }

        let mut elements = Vec::new();
        while !matches!(self.current(), Tok::RBrace | Tok::Eof) {
            let before = self.cursor;
            let first = self.parse_element();
            let element = match self.eat(Tok::Colon) {
                Some(colon) => KeyedElement {
                    key: Some(first),
                    colon_pos: Some(colon),
                    value: self.parse_element(),
                },
                None => KeyedElement {
                    key: None,
                    colon_pos: None,
                    value: first,
                },
            };
            elements.push(element);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
            if self.cursor == before {
                self.bump();
            }
        }
        self.leave();

        let r_brace = self.expect(Tok::RBrace, "'}'");
        let elements = self.arena.list_keyed_elems(elements);
        LiteralValue {
            l_brace,
            elements,
            r_brace,
        }
    }

    fn parse_element(&mut self) -> Element {
        if self.at(Tok::LBrace) {
            Element::Literal(self.parse_literal_value())
        } else {
            Element::Expr(self.parse_expr())
        }
    }

    /// Skips to the `}` closing a brace that was already consumed.
    fn skip_balanced_from_inside(&mut self) -> (Span, Span) {
        let mut depth = 1usize;
        loop {
            match self.current() {
                Tok::Eof => {
                    let span = self.current_span();
                    return (span, span);
                }
                Tok::LBrace => depth += 1,
                Tok::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        let span = self.bump().span;
                        return (span, span);
                    }
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Reinterprets `T`, `pkg.T` or `G[A, B]` as the type of a composite literal.
    fn expr_to_type(&mut self, expr: ExprId) -> Option<TypeId> {
        let span = self.arena.exprs.span(expr);
        let typ = match self.arena.exprs[expr] {
            Expr::Ident(name) => Type::Named {
                pkg: None,
                name,
                args: ListRef::EMPTY,
            },
            Expr::Selector { expr: base, sel } => match self.arena.exprs[base] {
                Expr::Ident(pkg) => Type::Named {
                    pkg: Some(pkg),
                    name: sel,
                    args: ListRef::EMPTY,
                },
                _ => return None,
            },
            Expr::Index { base, args, .. } => {
                let base = self.expr_to_type(base)?;
                let Type::Named {
                    pkg,
                    name,
                    args: existing,
                } = self.arena.types[base]
                else {
                    return None;
                };
                if !existing.is_empty() {
                    return None;
                }
                let items = self.arena.expr_or_types(args).to_vec();
                let mut type_args = Vec::with_capacity(items.len());
                for item in items {
                    type_args.push(match item {
                        ExprOrType::Type(t) => t,
                        ExprOrType::Expr(e) => self.expr_to_type(e)?,
                    });
                }
                Type::Named {
                    pkg,
                    name,
                    args: self.arena.list_types(type_args),
                }
            }
            _ => return None,
        };
        Some(self.arena.types.alloc(typ, span))
    }
}
