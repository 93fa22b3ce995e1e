use std::mem;

use memchr::{memchr3, memchr_iter};

use crate::{BOM, QUOTE, SEPARATOR};

/// Split a single line into its raw fields.
///
/// See the [crate documentation](index.html#splitting) for the rules.
/// There is always at least one field, even for an empty line.
pub fn split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    split_into(line, &mut fields);
    fields
}

/// Split a single line into its raw fields, reusing `fields`.
///
/// `fields` is cleared before any field is added to it.
pub fn split_into(line: &str, fields: &mut Vec<String>) {
    fields.clear();
    let line = line.strip_prefix(BOM).unwrap_or(line);
    let bytes = line.as_bytes();
    // Without quotes or line breaks, the toggle can never be set and no byte
    // is dropped, so every comma is a boundary.
    if memchr3(b'"', b'\r', b'\n', bytes).is_none() {
        let mut start = 0;
        for end in memchr_iter(b',', bytes) {
            fields.push(line[start..end].to_string());
            start = end + 1;
        }
        fields.push(line[start..].to_string());
        return;
    }

    let mut field = String::with_capacity(line.len());
    let mut quoted = false;
    for ch in line.chars() {
        match ch {
            QUOTE => quoted = !quoted,
            '\r' | '\n' => {}
            SEPARATOR if !quoted => fields.push(mem::take(&mut field)),
            _ => field.push(ch),
        }
    }
    fields.push(field);
}
