//! # Go declaration-level syntax tree
//!
//! Arena-allocated nodes for one Go source file, shaped for static extraction:
//! every top-level declaration, its doc comments, signatures and initializer
//! expressions are modelled in full. Function, struct and interface bodies are
//! kept as delimiter spans only.
//!
//! ## Layout
//!
//! - **Nodes** live in typed arenas (`SpannedArena<T>`) addressed by `Id<T>`
//! - **Lists** are `ListRef<T>` slices into the central buffers of `ExtraData`
//! - **Spans** are side-table byte ranges; token text is recovered from source
//! - **Identifiers** are interned (`Interner`, `Symbol`)
//!
//! `#[derive(WalkAst)]` generates `impl crate::walk::Walk` (see `crate::walk`).

use goscan_ast_derive::WalkAst;
use core::marker::PhantomData;
use core::ops::Index;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Byte range in the source text, `end` exclusive.
///
/// Offsets are `u32`; inputs above 4 GiB are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: clamp_u32(start),
            end: clamp_u32(end),
        }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub const fn to(self, other: Span) -> Self {
        let start = if self.start < other.start { self.start } else { other.start };
        let end = if self.end > other.end { self.end } else { other.end };
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn range(&self) -> core::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

#[inline(always)]
const fn clamp_u32(x: usize) -> u32 {
    if x > u32::MAX as usize { u32::MAX } else { x as u32 }
}

/// Typed index into a `SpannedArena<T>`.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.raw as usize
    }
}

/// Contiguous run of `T` inside one of the `ExtraData` buffers.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    const fn range(&self) -> core::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

// =============================================================================
// Symbol Interning
// =============================================================================

/// Interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

pub type Ident = Symbol;

/// Identifier occurrence: symbol plus where it was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct IdentName {
    pub sym: Ident,
    pub pos: Span,
}

/// Passes precomputed `u64` hashes through unchanged.
#[derive(Default)]
struct PassThroughHasher(u64);

impl Hasher for PassThroughHasher {
    fn write(&mut self, _bytes: &[u8]) {
        unreachable!("PassThroughHasher only hashes u64 keys")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

/// String interner keyed by a seeded hash; colliding strings share a bucket.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, BuildHasherDefault<PassThroughHasher>>,
    state: RandomState,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the symbol for `s`, adding it on first sight.
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let bucket = self.buckets.entry(h).or_default();

        if let Some(&sym) = bucket
            .iter()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
        {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        bucket.push(sym);
        sym
    }

    /// Text of a symbol produced by this interner. Foreign symbols resolve to `""`.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        debug_assert!((sym.0 as usize) < self.strings.len());
        self.strings.get(sym.0 as usize).map_or("", |s| &**s)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Nodes and their spans in parallel vectors.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.index()]
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;

    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

pub type DeclId = Id<GenDecl>;
pub type FuncDeclId = Id<FuncDecl>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type TypeParamsId = Id<TypeParams>;
pub type CommentId = Id<Comment>;
pub type CommentGroupId = Id<CommentGroup>;

// =============================================================================
// Centralized List Storage
// =============================================================================

/// Backing buffers for every `ListRef<T>` in the tree.
#[derive(Debug, Default)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub exprs: Vec<ExprId>,
    pub types: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub specs: Vec<Spec>,
    pub keyed_elems: Vec<KeyedElement>,
    pub top_decls: Vec<TopLevelDecl>,
    pub comment_ids: Vec<CommentId>,
    pub comment_group_ids: Vec<CommentGroupId>,
    pub expr_or_types: Vec<ExprOrType>,
}

/// Owner of every node and list buffer of one file.
#[derive(Debug, Default)]
pub struct AstArena {
    pub decls: SpannedArena<GenDecl>,
    pub funcs: SpannedArena<FuncDecl>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub signatures: SpannedArena<Signature>,
    pub fields: SpannedArena<Field>,
    pub type_params: SpannedArena<TypeParams>,
    pub comments: SpannedArena<Comment>,
    pub comment_groups: SpannedArena<CommentGroup>,
    pub extras: ExtraData,
}

macro_rules! list_buffers {
    ($($ty:ty => $buf:ident, $build:ident, $get:ident;)*) => {
        impl AstArena {
            $(
                pub fn $build(&mut self, items: impl IntoIterator<Item = $ty>) -> ListRef<$ty> {
                    push_list(&mut self.extras.$buf, items)
                }

                pub fn $get(&self, r: ListRef<$ty>) -> &[$ty] {
                    &self.extras.$buf[r.range()]
                }
            )*
        }

        $(
            impl crate::walk::ListBuffer<$ty> for AstArena {
                #[inline]
                fn resolve(&self, list: ListRef<$ty>) -> &[$ty] {
                    self.$get(list)
                }
            }
        )*
    };
}

#[inline]
fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
    let start = buf.len();
    buf.extend(items);
    ListRef::new(start as u32, (buf.len() - start) as u32)
}

list_buffers! {
    IdentName => ident_names, list_ident_names, ident_names;
    ExprId => exprs, list_exprs, exprs_list;
    TypeId => types, list_types, types_list;
    FieldId => fields, list_fields, fields_list;
    Spec => specs, list_specs, specs_list;
    KeyedElement => keyed_elems, list_keyed_elems, keyed_elems_list;
    TopLevelDecl => top_decls, list_top_decls, top_decls;
    CommentId => comment_ids, list_comment_ids, comment_ids;
    CommentGroupId => comment_group_ids, list_comment_group_ids, comment_group_ids;
    ExprOrType => expr_or_types, list_expr_or_types, expr_or_types;
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// One comment; its text is the source slice under the comment's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Comment {
    pub kind: CommentKind,
}

/// Adjacent comments with no blank line and no token between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CommentGroup {
    pub comments: ListRef<CommentId>,
}

// =============================================================================
// Source File (Root Node)
// =============================================================================

/// `SourceFile = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct SourceFile {
    pub package_pos: Span,
    pub name: IdentName,
    /// All top-level declarations (imports included) in source order.
    pub decls: ListRef<TopLevelDecl>,
    /// Every comment group in the file.
    #[walk(skip)]
    pub comments: ListRef<CommentGroupId>,
    /// Package doc comment.
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum TopLevelDecl {
    Gen(DeclId),
    Func(FuncDeclId),
}

/// `import`, `const`, `type` or `var` declaration, grouped or single.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct GenDecl {
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
    pub kw_pos: Span,
    pub kind: GenDeclKind,
    pub l_paren: Option<Span>,
    pub specs: ListRef<Spec>,
    pub r_paren: Option<Span>,
}

impl GenDecl {
    /// True for `var ( ... )` style declarations.
    #[inline]
    pub const fn is_grouped(&self) -> bool {
        self.l_paren.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `ImportSpec = [ "." | PackageName ] ImportPath`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ImportSpec {
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
    pub name: Option<ImportName>,
    pub path: StringLit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ImportName {
    Dot(Span),
    Blank(Span),
    Name(IdentName),
}

/// `const`/`var` spec: `IdentifierList [ Type ] [ "=" ExpressionList ]`.
///
/// `values` is empty for `var x int` and for implicitly repeated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ValueSpec {
    /// Lead comment of a grouped spec. Single specs leave this `None`; their
    /// comment sits on the enclosing `GenDecl`.
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
    pub names: ListRef<IdentName>,
    pub typ: Option<TypeId>,
    pub values: ListRef<ExprId>,
    /// Trailing comment on the same line.
    #[walk(skip)]
    pub comment: Option<CommentGroupId>,
}

/// `TypeSpec = identifier [ TypeParameters ] [ "=" ] Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeSpec {
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
    pub name: IdentName,
    pub type_params: Option<TypeParamsId>,
    pub assign_pos: Option<Span>,
    pub typ: TypeId,
}

/// Function or method declaration.
///
/// ```text
/// FunctionDecl = "func" FunctionName [ TypeParameters ] Signature [ FunctionBody ]
/// MethodDecl   = "func" Receiver MethodName Signature [ FunctionBody ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncDecl {
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
    pub func_pos: Span,
    pub recv: Option<Receiver>,
    pub name: IdentName,
    pub type_params: Option<TypeParamsId>,
    pub signature: SignatureId,
    pub body: Option<Block>,
}

/// Type parameter list; only the brackets are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeParams {
    pub l_brack: Span,
    pub r_brack: Span,
}

/// `(name T)`, `(name *T)` or `(T)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Receiver {
    pub l_paren: Span,
    pub name: Option<IdentName>,
    pub typ: TypeId,
    pub r_paren: Span,
}

// =============================================================================
// Signatures and Fields
// =============================================================================

/// `Signature = Parameters [ Result ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Signature {
    pub params: FieldList,
    pub results: Option<Results>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Results {
    /// `(x int, err error)` or `(int, error)`
    Params(FieldList),
    /// `int`
    Type(TypeId),
}

/// `Parameters = "(" [ ParameterList [ "," ] ] ")"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FieldList {
    pub l_paren: Span,
    pub fields: ListRef<FieldId>,
    pub r_paren: Span,
}

/// `ParameterDecl = [ IdentifierList ] [ "..." ] Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Field {
    /// Empty for unnamed parameters.
    pub names: ListRef<IdentName>,
    pub ellipsis_pos: Option<Span>,
    pub typ: TypeId,
}

/// Braced body; statements are not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Block {
    pub l_brace: Span,
    pub r_brace: Span,
}

// =============================================================================
// Expressions
// =============================================================================

/// `LiteralValue = "{" [ ElementList [ "," ] ] "}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct LiteralValue {
    pub l_brace: Span,
    pub elements: ListRef<KeyedElement>,
    pub r_brace: Span,
}

/// `KeyedElement = [ Key ":" ] Element`
///
/// Struct field keys are parsed as identifier expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct KeyedElement {
    pub key: Option<Element>,
    pub colon_pos: Option<Span>,
    pub value: Element,
}

/// `Element = Expression | LiteralValue`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Element {
    Expr(ExprId),
    /// Literal with an elided type: the inner `{1, 2}` of `[][]int{{1, 2}}`.
    Literal(LiteralValue),
}

/// Bracket or call argument that may be an expression or a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ExprOrType {
    Expr(ExprId),
    Type(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Ident(IdentName),

    BasicLit(BasicLit),

    /// `T{...}`
    CompositeLit { typ: TypeId, lit: LiteralValue },

    /// `func(x int) int { ... }`
    FuncLit {
        func_pos: Span,
        sig: SignatureId,
        body: Block,
    },

    Paren {
        l_paren: Span,
        expr: ExprId,
        r_paren: Span,
    },

    /// `x.y`
    Selector { expr: ExprId, sel: IdentName },

    /// `a[i]` or a generic instantiation `F[T]`.
    Index {
        base: ExprId,
        l_brack: Span,
        args: ListRef<ExprOrType>,
        r_brack: Span,
    },

    /// `a[lo:hi]` or `a[lo:hi:max]`
    Slice {
        expr: ExprId,
        l_brack: Span,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
        r_brack: Span,
    },

    /// `x.(T)`; `typ` is `None` for `x.(type)`.
    TypeAssert {
        expr: ExprId,
        l_paren: Span,
        typ: Option<TypeId>,
        r_paren: Span,
    },

    /// Call or conversion: `f(x)`, `float32(3.14)`, `[]byte(s)`, `make([]int, 3)`.
    Call {
        callee: ExprOrType,
        l_paren: Span,
        args: ListRef<ExprOrType>,
        ellipsis: Option<Span>,
        r_paren: Span,
    },

    /// `+x`, `-x`, `!x`, `^x`, `*x`, `&x`, `<-x`
    Unary {
        op: UnaryOp,
        op_pos: Span,
        expr: ExprId,
    },

    Binary {
        left: ExprId,
        op: BinaryOp,
        op_pos: Span,
        right: ExprId,
    },

    Bad(Span),
}

/// Literal token; `raw` covers the token exactly as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: BasicLitKind,
    pub raw: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLit {
    pub raw: Span,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Type {
    /// `Name`, `pkg.Name`, `Name[A, B]`
    Named {
        pkg: Option<IdentName>,
        name: IdentName,
        args: ListRef<TypeId>,
    },

    /// `*T`
    Pointer { star_pos: Span, elem: TypeId },

    /// `[N]T` or `[...]T`
    Array {
        l_brack: Span,
        len: ArrayLen,
        r_brack: Span,
        elem: TypeId,
    },

    /// `[]T`
    Slice {
        l_brack: Span,
        r_brack: Span,
        elem: TypeId,
    },

    /// `map[K]V`
    Map {
        map_pos: Span,
        key: TypeId,
        val: TypeId,
    },

    /// `chan T`, `<-chan T`, `chan<- T`
    Chan {
        dir: ChanDir,
        chan_pos: Span,
        elem: TypeId,
    },

    /// `struct { ... }`; fields are not modelled.
    Struct { struct_pos: Span, body: Block },

    /// `interface { ... }`; elements are not modelled.
    Interface { interface_pos: Span, body: Block },

    /// `func(...) ...`
    Func { func_pos: Span, sig: SignatureId },

    /// `(T)`
    Paren {
        l_paren: Span,
        typ: TypeId,
        r_paren: Span,
    },

    Bad(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ArrayLen {
    Expr(ExprId),
    Ellipsis(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    And,    // &
    Or,     // |
    Xor,    // ^
    Shl,    // <<
    Shr,    // >>
    AndNot, // &^
    LAnd,   // &&
    LOr,    // ||
    Eq,     // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
}

impl BinaryOp {
    /// Go operator precedence, 5 binds tightest.
    #[inline]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::LOr => 1,
            Self::LAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Mul | Self::Div | Self::Mod | Self::Shl | Self::Shr | Self::And | Self::AndNot => 5,
        }
    }
}
