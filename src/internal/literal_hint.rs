//! Extracts the longest literal substring guaranteed to occur in every
//! match of a pattern, for the Aho-Corasick prefilter.
//!
//! This is a best-effort static analysis over the parsed AST, not a full
//! derivative-based literal-set computation: it only needs to be a sound
//! *hint* (§4.3) — every match of the pattern must still contain the
//! reported literal at the reported offset — never a complete description.
//! Missing a hint (falling back to `None`) only costs prefilter precision,
//! never correctness (P5).

use regex_syntax::ast::{Ast, LiteralKind};

/// A literal substring known to occur in every match of some pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct LiteralHint {
    pub(crate) literal: String,
    pub(crate) offset: usize,
    pub(crate) anchored_start: bool,
}

/// Compute the longest guaranteed literal run in `ast`, if any is at least
/// one character long.
pub(crate) fn extract(ast: &Ast) -> Option<LiteralHint> {
    let mut best: Option<LiteralHint> = None;
    let mut anchored_start = matches!(ast, Ast::Concat(c) if starts_with_anchor(c));
    let mut current = String::new();
    let mut current_offset = 0usize;
    let mut cursor = 0usize;

    let nodes: Vec<&Ast> = match ast {
        Ast::Concat(c) => c.asts.iter().collect(),
        other => vec![other],
    };

    for node in nodes {
        match node {
            Ast::Literal(l) => {
                if current.is_empty() {
                    current_offset = cursor;
                }
                current.push(l.c);
                cursor += 1;
            }
            Ast::Assertion(_) => {
                // Zero-width: does not break a literal run or advance the cursor.
            }
            _ => {
                flush(&mut best, &mut current, current_offset, anchored_start);
                anchored_start = false;
                // Unknown contribution to match length; stop tracking offsets
                // precisely past this point by never reporting anchored hints
                // again, but keep scanning for a later literal run.
                cursor = usize::MAX / 2;
            }
        }
    }
    flush(&mut best, &mut current, current_offset, anchored_start);
    best
}

fn flush(best: &mut Option<LiteralHint>, current: &mut String, offset: usize, anchored: bool) {
    if !current.is_empty() {
        let candidate = LiteralHint {
            literal: std::mem::take(current),
            offset,
            anchored_start: anchored,
        };
        if best
            .as_ref()
            .map(|b| candidate.literal.len() > b.literal.len())
            .unwrap_or(true)
        {
            *best = Some(candidate);
        }
    }
}

fn starts_with_anchor(concat: &regex_syntax::ast::Concat) -> bool {
    matches!(
        concat.asts.first(),
        Some(Ast::Assertion(a)) if matches!(
            a.kind,
            regex_syntax::ast::AssertionKind::StartText | regex_syntax::ast::AssertionKind::StartLine
        )
    )
}

/// True if `c` survives unchanged when case-folded (used to decide whether
/// both case forms of a hint need separate AC insertion, per OQ2).
#[allow(dead_code)]
pub(crate) fn is_literal_verbatim(kind: &LiteralKind) -> bool {
    matches!(kind, LiteralKind::Verbatim)
}
