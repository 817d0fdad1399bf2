// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Method signature helpers.
//!
//! Signatures have the shape `name(Type1,Type2,...)`. Registration stores them
//! normalized so that identity comparisons agree with the consumer, which
//! normalizes the signatures it looks up the same way.
//!
//! Parsing is permissive: a missing `(` yields no parameters and a missing `)`
//! simply ends the parameter list at the end of input. Nothing here fails.

/// Normalize a full signature: `" foo ( const QString & , int ) "` becomes
/// `"foo(QString,int)"`.
pub fn normalize_signature(signature: &str) -> String {
    let compact = collapse_whitespace(signature);
    let Some(open) = compact.find('(') else {
        return compact;
    };

    let name = &compact[..open];
    let mut params: Vec<String> = parameter_types(&compact)
        .into_iter()
        .map(normalize_type)
        .collect();
    if params.len() == 1 && params[0] == "void" {
        params.clear();
    }

    let mut out = String::with_capacity(compact.len() + 1);
    out.push_str(name);
    out.push('(');
    out.push_str(&params.join(","));
    out.push(')');
    out
}

/// Normalize a single type name.
///
/// - whitespace is removed except one space between identifier characters
/// - a top-level `const` on a value or reference type is dropped, along
///   with the reference (`const QString &` -> `QString`)
/// - `unsigned` spellings collapse to their short forms (`uint`, `ulong`,
///   `ushort`, `uchar`)
/// - adjacent closing template brackets are separated (`>>` -> `> >`)
pub fn normalize_type(type_name: &str) -> String {
    let collapsed = collapse_whitespace(type_name);
    let stripped = strip_const(&collapsed);
    let (base, suffix) = split_indirection(stripped);
    let base = canonical_unsigned(base).unwrap_or(base);

    let mut out = String::with_capacity(base.len() + suffix.len() + 2);
    let mut prev = '\0';
    for c in base.chars().chain(suffix.chars()) {
        if c == '>' && prev == '>' {
            out.push(' ');
        }
        out.push(c);
        prev = c;
    }
    out
}

/// Parameter type names of a signature, in order.
///
/// Commas nested inside `<...>` do not split: `f(QMap<int,QString>,bool)`
/// has two parameters.
pub fn parameter_types(signature: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let Some(open) = signature.find('(') else {
        return params;
    };

    let bytes = signature.as_bytes();
    let mut pos = open + 1;
    while pos < bytes.len() && bytes[pos] != b')' {
        let begin = pos;
        let mut level = 0i32;
        while pos < bytes.len() && (level > 0 || bytes[pos] != b',') && bytes[pos] != b')' {
            match bytes[pos] {
                b'<' => level += 1,
                b'>' => level -= 1,
                _ => {}
            }
            pos += 1;
        }
        params.push(signature[begin..pos].trim());
        if pos < bytes.len() && bytes[pos] == b',' {
            pos += 1;
        } else {
            break;
        }
    }
    params
}

/// Number of parameters, see [`parameter_types`].
pub fn parameter_count(signature: &str) -> usize {
    parameter_types(signature).len()
}

/// Method name: everything before `(`, or empty if there is no `(`.
pub fn method_name(signature: &str) -> &str {
    signature.find('(').map_or("", |open| &signature[..open])
}

/// Split a declaration like `"void setValue(int)"` into
/// `("void", "setValue(int)")`. Without a return type the first element is
/// empty.
pub fn split_declaration(declaration: &str) -> (&str, &str) {
    let declaration = declaration.trim();
    let head_end = declaration.find('(').unwrap_or(declaration.len());
    match declaration[..head_end].trim_end().rfind(char::is_whitespace) {
        Some(space) => (
            declaration[..space].trim_end(),
            declaration[space..].trim_start(),
        ),
        None => ("", declaration),
    }
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && out.chars().next_back().is_some_and(is_ident) && is_ident(c) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

fn strip_const(type_name: &str) -> &str {
    if let Some(rest) = type_name.strip_prefix("const ") {
        if let Some(value) = rest.strip_suffix('&') {
            if !value.ends_with('&') && !value.contains('*') {
                return value;
            }
        } else if !rest.contains('*') && !rest.ends_with('&') {
            return rest;
        }
    }
    if let Some(value) = type_name.strip_suffix(" const&") {
        if !value.contains('*') {
            return value;
        }
    }
    if let Some(value) = type_name.strip_suffix(" const") {
        if !value.contains('*') && !value.ends_with('&') {
            return value;
        }
    }
    type_name
}

/// Split off a trailing run of `*` and `&`.
fn split_indirection(type_name: &str) -> (&str, &str) {
    let base = type_name.trim_end_matches(['*', '&']);
    (base, &type_name[base.len()..])
}

fn canonical_unsigned(base: &str) -> Option<&'static str> {
    match base {
        "unsigned" | "unsigned int" => Some("uint"),
        "unsigned long" | "unsigned long int" => Some("ulong"),
        "unsigned short" | "unsigned short int" => Some("ushort"),
        "unsigned char" => Some("uchar"),
        _ => None,
    }
}
