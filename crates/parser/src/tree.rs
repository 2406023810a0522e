//! The parsed, immutable form of one Go source file.

use crate::ast::{AstArena, CommentGroupId, IdentName, Interner, SourceFile, Span, Symbol, TopLevelDecl};
use crate::error::ParseFailure;
use crate::walk::Visitor;

/// Knobs for [`SyntaxTree::parse_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Group comments and attach doc comments to declarations.
    pub comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { comments: true }
    }
}

/// Source text, arena, interner and root node of one file.
///
/// Nothing is mutated after construction, so shared references can be
/// handed to any number of readers.
#[derive(Debug)]
pub struct SyntaxTree {
    source: String,
    arena: AstArena,
    interner: Interner,
    file: SourceFile,
}

impl SyntaxTree {
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseFailure> {
        Self::parse_with(source, &ParseOptions::default())
    }

    /// Fails with every collected diagnostic if the file has any lex or
    /// parse error.
    pub fn parse_with(
        source: impl Into<String>,
        options: &ParseOptions,
    ) -> Result<Self, ParseFailure> {
        let source = source.into();
        let out = crate::parser::parse(&source, options);
        if !out.diags.is_empty() {
            tracing::debug!(diags = out.diags.len(), "parse failed");
            return Err(ParseFailure { diags: out.diags });
        }
        Ok(Self {
            source,
            arena: out.arena,
            interner: out.interner,
            file: out.file,
        })
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn arena(&self) -> &AstArena {
        &self.arena
    }

    #[inline]
    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    #[inline]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Top-level declarations in source order.
    #[inline]
    pub fn decls(&self) -> &[TopLevelDecl] {
        self.arena.top_decls(self.file.decls)
    }

    #[inline]
    pub fn package_name(&self) -> &str {
        self.name(self.file.name)
    }

    /// Source text under `span`; empty if the span is out of range.
    #[inline]
    pub fn text(&self, span: Span) -> &str {
        self.source.get(span.range()).unwrap_or("")
    }

    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    #[inline]
    pub fn name(&self, ident: IdentName) -> &str {
        self.interner.resolve(ident.sym)
    }

    /// Raw text of each comment in the group, markers included, in order.
    pub fn comment_lines(&self, group: CommentGroupId) -> impl Iterator<Item = &str> + '_ {
        let comments = self.arena.comment_groups[group].comments;
        self.arena
            .comment_ids(comments)
            .iter()
            .map(move |&id| self.text(self.arena.comments.span(id)))
    }

    /// Drives `visitor` over the whole file.
    pub fn walk<'ast, V: Visitor<'ast> + ?Sized>(&'ast self, visitor: &mut V) {
        visitor.visit_source_file(&self.arena, &self.file);
    }
}

/// Parses with default options.
pub fn parse_source(source: &str) -> Result<SyntaxTree, ParseFailure> {
    SyntaxTree::parse(source)
}
