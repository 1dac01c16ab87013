use winnow::combinator::{alt, cut_err, fail, opt};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

// Structural scan of a relaxed JSON document. Nothing below depth 1 is
// materialized: nested values are recognized and skipped so that the raw
// text of every top-level member can be captured, duplicates included.

/// Deepest object or array nesting accepted, the document itself included.
const MAX_DEPTH: usize = 128;

// -- Tokens -----------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn punct(expected: char) -> impl FnMut(&mut &str) -> ModalResult<char> {
    move |input: &mut &str| {
        expected
            .context(StrContext::Expected(StrContextValue::CharLiteral(expected)))
            .parse_next(input)
    }
}

fn next_char(input: &mut &str) -> ModalResult<char> {
    any.parse_next(input)
}

fn string_literal(input: &mut &str) -> ModalResult<String> {
    punct('"').parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = next_char(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = next_char(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    '/' => s.push('/'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    'r' => s.push('\r'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

/// Numbers, `true`, `false` and `null`. Validated later, when a fragment is
/// actually compiled.
fn scalar(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.')
    })
    .void()
    .parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn value(input: &mut &str, depth: usize) -> ModalResult<()> {
    alt((
        |i: &mut &str| object(i, depth + 1),
        |i: &mut &str| array(i, depth + 1),
        string_literal.void(),
        scalar,
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

fn object(input: &mut &str, depth: usize) -> ModalResult<()> {
    members(input, depth, |_, _| {})
}

fn array(input: &mut &str, depth: usize) -> ModalResult<()> {
    punct('[').parse_next(input)?;
    within_depth(input, depth)?;
    ws(input)?;
    loop {
        if opt(punct(']')).parse_next(input)?.is_some() {
            return Ok(());
        }
        cut_err(|i: &mut &str| value(i, depth)).parse_next(input)?;
        ws(input)?;
        if opt(punct(',')).parse_next(input)?.is_some() {
            ws(input)?;
            continue;
        }
        cut_err(punct(']')).parse_next(input)?;
        return Ok(());
    }
}

fn within_depth(input: &mut &str, depth: usize) -> ModalResult<()> {
    if depth <= MAX_DEPTH {
        return Ok(());
    }
    cut_err(fail::<_, (), _>)
        .context(StrContext::Expected(StrContextValue::Description(
            "at most 128 levels of nesting",
        )))
        .parse_next(input)
}

/// Scan an object, reporting each member's key and the exact source text of
/// its value. Trailing commas are accepted.
fn members<'i>(
    input: &mut &'i str,
    depth: usize,
    mut on_member: impl FnMut(String, &'i str),
) -> ModalResult<()> {
    punct('{').parse_next(input)?;
    within_depth(input, depth)?;
    ws(input)?;
    loop {
        if opt(punct('}')).parse_next(input)?.is_some() {
            return Ok(());
        }
        let key = cut_err(string_literal)
            .context(StrContext::Expected(StrContextValue::Description(
                "property name",
            )))
            .parse_next(input)?;
        ws(input)?;
        cut_err(punct(':')).parse_next(input)?;
        ws(input)?;
        let raw = cut_err((|i: &mut &'i str| value(i, depth)).take()).parse_next(input)?;
        on_member(key, raw);
        ws(input)?;
        if opt(punct(',')).parse_next(input)?.is_some() {
            ws(input)?;
            continue;
        }
        cut_err(punct('}')).parse_next(input)?;
        return Ok(());
    }
}

// -- Top-level scanner ------------------------------------------------------

/// Scan a whole document, returning every depth-1 member in source order.
pub fn document<'i>(input: &mut &'i str) -> ModalResult<Vec<(String, &'i str)>> {
    ws(input)?;
    let mut found = Vec::new();
    if input.is_empty() {
        return Ok(found);
    }
    members(input, 1, |key, raw| found.push((key, raw)))?;
    ws(input)?;
    Ok(found)
}
