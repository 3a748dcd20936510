//! Parses regex syntax into an abstract syntax tree.
//!
//! Uses the `regex-syntax` crate's AST parser directly (not its HIR), since
//! the NFA compiler in [`crate::internal::nfa`] walks `Ast` nodes itself
//! rather than consuming an already-simplified high-level IR.
use std::time::Instant;

use log::trace;
use regex_syntax::ast::{parse::Parser, Ast, ClassBracketed, ClassSet, ClassSetItem, ClassSetUnion, Literal, LiteralKind};

use crate::Result;

/// Characters that are metacharacters in `regex-syntax`'s grammar and must be
/// backslash-escaped when re-emitting a literal.
const METACHARS: &str = r".^$*+?()[]{}|\";

/// Expand every `\Q...\E` block in `input` into an escaped literal sequence.
///
/// `regex-syntax` has no notion of `\Q...\E` (it is a Perl/Java convenience),
/// so this crate supports it by rewriting the block at parse time: each
/// character inside becomes a backslash-escaped literal, and the result is
/// spliced back into the surrounding pattern before handing it to
/// `regex-syntax`. An unterminated `\Q` runs to the end of the string.
fn expand_quoted_literals(input: &str) -> String {
    if !input.contains("\\Q") {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("\\Q") {
        out.push_str(&rest[..start]);
        let body_start = start + 2;
        let body = &rest[body_start..];
        let (literal, remainder) = match body.find("\\E") {
            Some(end) => (&body[..end], &body[end + 2..]),
            None => (body, ""),
        };
        for c in literal.chars() {
            if METACHARS.contains(c) {
                out.push('\\');
            }
            out.push(c);
        }
        rest = remainder;
    }
    out.push_str(rest);
    out
}

/// Parse a regex string into an [`Ast`].
///
/// # Errors
/// Returns a [`crate::MatcherError`] if the regex syntax is invalid.
pub(crate) fn parse_regex_syntax(input: &str) -> Result<Ast> {
    let now = Instant::now();
    let expanded = expand_quoted_literals(input);
    let ast = Parser::new().parse(&expanded)?;
    trace!(
        "Parsing '{}' took {} microseconds.",
        input,
        now.elapsed().as_micros()
    );
    Ok(ast)
}

/// Rewrite every case-varying literal in `ast` into a two-character bracketed
/// class matching both of its cases.
///
/// `regex-syntax`'s ast parser has no case-folding of its own (that lives in
/// its `Hir` translation layer, which this crate bypasses), so a pattern
/// registered case-insensitively gets its literals expanded here, per
/// pattern, before the shared character-class registry ever sees them. This
/// only touches bare literals: characters inside an existing class (`[a-z]`)
/// are left as written, a known limitation recorded in `DESIGN.md`.
pub(crate) fn fold_case(ast: Ast) -> Ast {
    match ast {
        Ast::Literal(l) => fold_case_literal(*l),
        Ast::Concat(mut c) => {
            c.asts = c.asts.into_iter().map(fold_case).collect();
            Ast::Concat(c)
        }
        Ast::Alternation(mut a) => {
            a.asts = a.asts.into_iter().map(fold_case).collect();
            Ast::Alternation(a)
        }
        Ast::Repetition(mut r) => {
            r.ast = Box::new(fold_case(*r.ast));
            Ast::Repetition(r)
        }
        Ast::Group(mut g) => {
            g.ast = Box::new(fold_case(*g.ast));
            Ast::Group(g)
        }
        other => other,
    }
}

fn fold_case_literal(lit: Literal) -> Ast {
    let lower = lit.c.to_lowercase().next().unwrap_or(lit.c);
    let upper = lit.c.to_uppercase().next().unwrap_or(lit.c);
    if lower == upper {
        return Ast::Literal(Box::new(lit));
    }
    let span = lit.span;
    let make = |c: char| Literal {
        span,
        kind: LiteralKind::Verbatim,
        c,
    };
    Ast::ClassBracketed(Box::new(ClassBracketed {
        span,
        negated: false,
        kind: ClassSet::Item(ClassSetItem::Union(ClassSetUnion {
            span,
            items: vec![
                ClassSetItem::Literal(make(lower)),
                ClassSetItem::Literal(make(upper)),
            ],
        })),
    }))
}
