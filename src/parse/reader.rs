//! Comment and trailing-comma removal for relaxed JSON rule documents.
//!
//! Both passes are total: malformed input is passed through best-effort and
//! never produces an error. Structural problems surface later, in the scanner.

/// Prepare raw rule-file text for scanning: drop a leading byte-order mark,
/// strip comments and remove trailing commas.
#[must_use]
pub fn read_document(raw: &str) -> String {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    strip_trailing_commas(&strip_comments(raw))
}

/// Remove `//` line comments and `/* */` block comments.
///
/// Line structure is preserved: a commented-out line becomes empty and a line
/// comment leaves the prefix in place. Comment markers inside a double-quoted
/// string are kept. String state is tracked per line, `\` escapes exactly one
/// character (so `\"` never toggles the state and `\\"` does). A block comment
/// may span lines; an unterminated one swallows the rest of the input.
#[must_use]
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_block = false;

    for (n, line) in input.split('\n').enumerate() {
        if n > 0 {
            out.push('\n');
        }

        let mut in_string = false;
        let mut escaped = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if in_block {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    in_block = false;
                }
                continue;
            }

            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }

            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = !in_string;
                    out.push(c);
                }
                '/' if !in_string && chars.peek() == Some(&'/') => break,
                '/' if !in_string && chars.peek() == Some(&'*') => {
                    chars.next();
                    in_block = true;
                }
                _ => out.push(c),
            }
        }
    }

    out
}

/// Remove commas that are followed only by whitespace before a closing `}` or `]`.
#[must_use]
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    // Byte offset in `out` of a comma that may still turn out to be trailing.
    let mut pending: Option<usize> = None;

    for c in input.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                pending = None;
                in_string = true;
                out.push(c);
            }
            ',' => {
                pending = Some(out.len());
                out.push(c);
            }
            '}' | ']' => {
                if let Some(at) = pending.take() {
                    out.remove(at);
                }
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                pending = None;
                out.push(c);
            }
        }
    }

    out
}
