use regex_syntax::ast::{
    Ast, ClassAscii, ClassAsciiKind, ClassBracketed, ClassPerl, ClassPerlKind, ClassSet,
    ClassSetBinaryOp, ClassSetBinaryOpKind, ClassSetItem, ClassSetRange, ClassSetUnion,
    ClassUnicode,
    ClassUnicodeKind::{Named, NamedValue, OneLetter},
    Literal,
};

use crate::{MatcherError, Result};

macro_rules! unsupported {
    ($feature:expr) => {
        MatcherError::unsupported_feature($feature.to_string())
    };
}

/// Resolve a Unicode binary-property name (`\p{Alphabetic}`-style) to a match
/// function.
///
/// Gated behind the `multimatch_unicode` feature: with it enabled, a small,
/// commonly-used subset of the Unicode property database is consulted via
/// `seshat-unicode`'s `Ucd` trait; with it disabled (or for a property name
/// outside this subset), the caller treats this as an unsupported feature
/// rather than silently matching nothing.
#[cfg(feature = "multimatch_unicode")]
fn named_unicode_class(name: &str) -> Option<MatchFn> {
    use seshat::unicode::Ucd;
    match name {
        "Alphabetic" => Some(MatchFn::new(|ch: char| ch.alpha())),
        "Lowercase" => Some(MatchFn::new(|ch: char| ch.lower())),
        "Uppercase" => Some(MatchFn::new(|ch: char| ch.upper())),
        "White_Space" => Some(MatchFn::new(|ch: char| ch.wspace())),
        "ASCII_Hex_Digit" => Some(MatchFn::new(|ch: char| ch.ahex())),
        "Hex_Digit" => Some(MatchFn::new(|ch: char| ch.hex())),
        "Dash" => Some(MatchFn::new(|ch: char| ch.dash())),
        "Ideographic" => Some(MatchFn::new(|ch: char| ch.ideo())),
        _ => None,
    }
}

#[cfg(not(feature = "multimatch_unicode"))]
fn named_unicode_class(_name: &str) -> Option<MatchFn> {
    None
}

pub(crate) struct MatchFn(Box<dyn Fn(char) -> bool + 'static>);

impl MatchFn {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(char) -> bool + 'static,
    {
        MatchFn(Box::new(f))
    }

    #[inline]
    pub(crate) fn call(&self, c: char) -> bool {
        (self.0)(c)
    }
}

/// A function that takes a character and returns a boolean.
pub(crate) struct MatchFunction {
    pub(crate) ast: Ast,
    pub(crate) match_fn: MatchFn,
}

impl MatchFunction {
    /// Create a new match function from a closure.
    pub(crate) fn new<F>(ast: Ast, f: F) -> Self
    where
        F: Fn(char) -> bool + 'static,
    {
        MatchFunction {
            ast,
            match_fn: MatchFn::new(f),
        }
    }

    /// Call the match function with a character.
    #[inline]
    pub(crate) fn call(&self, c: char) -> bool {
        self.match_fn.call(c)
    }

    fn try_from_class_set(set: ClassSet) -> Result<MatchFn> {
        let negated = false;
        match &set {
            ClassSet::Item(item) => Self::try_from_set_item(item.clone(), negated),
            ClassSet::BinaryOp(bin_op) => Self::try_from_binary_op(bin_op.clone(), negated),
        }
    }

    fn try_from_class_unicode(unicode: ClassUnicode) -> Result<MatchFn> {
        let negated = unicode.is_negated();
        let kind = unicode.kind.clone();
        let match_function = match kind {
            OneLetter(ch) => {
                match ch {
                    // Unicode class for Letters
                    'L' => MatchFn::new(|ch| ch.is_alphabetic()),
                    // Unicode class for Numbers
                    'N' => MatchFn::new(|ch| ch.is_numeric()),
                    // Unicode class for Whitespace
                    'Z' => MatchFn::new(|ch| ch.is_whitespace()),
                    // Unicode class for Punctuation
                    // Attention: Only ASCII based punctuation is supported
                    'P' => MatchFn::new(|ch| ch.is_ascii_punctuation()),
                    // Unicode class for Control characters
                    'C' => MatchFn::new(|ch| ch.is_control()),
                    _ => return Err(unsupported!(format!("{:#?}", unicode))),
                }
            }
            Named(ref name) => match named_unicode_class(name.as_str()) {
                Some(match_function) => match_function,
                None => return Err(unsupported!(format!("{:#?}", unicode))),
            },
            NamedValue { .. } => return Err(unsupported!(format!("{:#?}", unicode))),
        };
        Ok(if unicode.is_negated() {
            MatchFn::new(move |ch| !match_function.call(ch))
        } else {
            match_function
        })
    }

    fn try_from_class_perl(perl: ClassPerl) -> Result<MatchFn> {
        let ClassPerl { negated, kind, .. } = perl;
        let match_function = match kind {
            ClassPerlKind::Digit => MatchFn::new(|ch| ch.is_numeric()),
            ClassPerlKind::Space => MatchFn::new(|ch| ch.is_whitespace()),
            ClassPerlKind::Word => MatchFn::new(|ch| ch.is_alphanumeric()),
        };
        Ok(if negated {
            MatchFn::new(move |ch| !match_function.call(ch))
        } else {
            match_function
        })
    }

    fn try_from_class_bracketed(bracketed: ClassBracketed) -> Result<MatchFn> {
        let negated = bracketed.negated;
        match &bracketed.kind {
            ClassSet::Item(item) => Self::try_from_set_item(item.clone(), negated),
            ClassSet::BinaryOp(bin_op) => Self::try_from_binary_op(bin_op.clone(), negated),
        }
    }

    // Match one of the set items, i.e.
    fn try_from_class_set_union(union: ClassSetUnion) -> Result<MatchFn> {
        union
            .items
            .iter()
            .try_fold(MatchFn::new(|_| false), |acc, s| {
                Self::try_from_set_item(s.clone(), false)
                    .map(|f| MatchFn::new(move |ch| acc.call(ch) || f.call(ch)))
            })
    }

    fn try_from_binary_op(bin_op: ClassSetBinaryOp, negated: bool) -> Result<MatchFn> {
        let ClassSetBinaryOp { kind, lhs, rhs, .. } = bin_op;
        let lhs = Self::try_from_class_set(*lhs)?;
        let rhs = Self::try_from_class_set(*rhs)?;
        let match_function = match kind {
            ClassSetBinaryOpKind::Intersection => {
                MatchFn::new(move |ch| lhs.call(ch) && rhs.call(ch))
            }
            ClassSetBinaryOpKind::Difference => {
                MatchFn::new(move |ch| lhs.call(ch) && !rhs.call(ch))
            }
            ClassSetBinaryOpKind::SymmetricDifference => {
                MatchFn::new(move |ch| lhs.call(ch) != rhs.call(ch))
            }
        };
        Ok(if negated {
            MatchFn::new(move |ch| !match_function.call(ch))
        } else {
            match_function
        })
    }

    fn try_from_set_item(item: ClassSetItem, negated: bool) -> Result<MatchFn> {
        let match_function = match item {
            ClassSetItem::Empty(_) => MatchFn::new(|_| false),
            ClassSetItem::Literal(ref l) => {
                let Literal { c, .. } = *l;
                MatchFn::new(move |ch| ch == c)
            }
            ClassSetItem::Range(ref r) => {
                let ClassSetRange {
                    ref start, ref end, ..
                } = *r;
                let start = start.c;
                let end = end.c;
                MatchFn::new(move |ch| start <= ch && ch <= end)
            }
            ClassSetItem::Ascii(ref a) => {
                let ClassAscii {
                    ref kind, negated, ..
                } = *a;
                let match_function = match kind {
                    ClassAsciiKind::Alnum => MatchFn::new(|ch| ch.is_alphanumeric()),
                    ClassAsciiKind::Alpha => MatchFn::new(|ch| ch.is_alphabetic()),
                    ClassAsciiKind::Ascii => MatchFn::new(|ch| ch.is_ascii()),
                    ClassAsciiKind::Blank => MatchFn::new(|ch| ch.is_ascii_whitespace()),
                    ClassAsciiKind::Cntrl => MatchFn::new(|ch| ch.is_ascii_control()),
                    ClassAsciiKind::Digit => MatchFn::new(|ch| ch.is_numeric()),
                    ClassAsciiKind::Graph => MatchFn::new(|ch| ch.is_ascii_graphic()),
                    ClassAsciiKind::Lower => MatchFn::new(|ch| ch.is_lowercase()),
                    ClassAsciiKind::Print => MatchFn::new(|ch| ch.is_ascii_graphic()),
                    ClassAsciiKind::Punct => MatchFn::new(|ch| ch.is_ascii_punctuation()),
                    ClassAsciiKind::Space => MatchFn::new(|ch| ch.is_whitespace()),
                    ClassAsciiKind::Upper => MatchFn::new(|ch| ch.is_uppercase()),
                    ClassAsciiKind::Word => MatchFn::new(|ch| ch.is_alphanumeric()),
                    ClassAsciiKind::Xdigit => MatchFn::new(|ch| ch.is_ascii_hexdigit()),
                };
                if negated {
                    MatchFn::new(move |ch| !match_function.call(ch))
                } else {
                    match_function
                }
            }
            ClassSetItem::Unicode(ref c) => Self::try_from_class_unicode(c.clone())?,
            ClassSetItem::Perl(ref c) => Self::try_from_class_perl(c.clone())?,
            ClassSetItem::Bracketed(ref c) => Self::try_from_class_bracketed(*c.clone())?,
            ClassSetItem::Union(ref c) => Self::try_from_class_set_union(c.clone())?,
        };
        Ok(if negated {
            MatchFn::new(move |ch| !match_function.call(ch))
        } else {
            match_function
        })
    }
}

impl std::fmt::Debug for MatchFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MatchFunction")
    }
}

impl MatchFunction {
    /// Build a match function from an AST, honoring `dot_matches_newline`
    /// for the `Ast::Dot(_)` case. `TryFrom<Ast>` delegates here with
    /// `dot_matches_newline = false`.
    pub(crate) fn try_from_ast(ast: Ast, dot_matches_newline: bool) -> Result<Self> {
        let match_function = match ast {
            Ast::Empty(_) => {
                // An empty AST matches everything.
                MatchFunction::new(ast, |_| true)
            }
            Ast::Dot(_) => {
                if dot_matches_newline {
                    MatchFunction::new(ast, |_| true)
                } else {
                    // A dot AST matches any character except newline.
                    MatchFunction::new(ast, |ch| ch != '\n' && ch != '\r')
                }
            }
            Ast::Literal(ref l) => {
                // A literal AST matches a single character.
                let Literal { c, .. } = **l;
                MatchFunction::new(ast, move |ch| ch == c)
            }
            Ast::ClassUnicode(ref c) => Self {
                ast: ast.clone(),
                match_fn: Self::try_from_class_unicode(*c.clone())?,
            },
            Ast::ClassPerl(ref c) => Self {
                ast: ast.clone(),
                match_fn: Self::try_from_class_perl(*c.clone())?,
            },
            Ast::ClassBracketed(ref c) => Self {
                ast: ast.clone(),
                match_fn: Self::try_from_class_bracketed(*c.clone())?,
            },
            _ => return Err(unsupported!(format!("{:#?}", ast))),
        };
        Ok(match_function)
    }
}

impl TryFrom<Ast> for MatchFunction {
    type Error = MatcherError;

    fn try_from(ast: Ast) -> Result<Self> {
        Self::try_from_ast(ast, false)
    }
}
