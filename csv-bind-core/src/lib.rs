/*!
`csv-bind-core` provides the two line-level primitives used by `csv-bind`:
splitting one line of text into raw fields, and joining raw fields back into
one line.

The dialect is fixed: fields are separated by `,` and quoted with `"`.

# Splitting

Splitting uses a *quote toggle*: every `"` flips whether the splitter is
inside a quoted span, and a `,` only ends a field when it is outside of one.
Quote characters are never part of a field's content. Line feeds and carriage
returns are dropped wherever they occur, and a single leading byte order mark
is ignored.

```
use csv_bind_core::split;

assert_eq!(split("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
assert_eq!(split("x,,\r\n"), vec!["x", "", ""]);
```

The splitter never fails. An unterminated quote simply means that every
separator after it is part of the last field.

# Joining

Joining always wraps every field in quotes and never escapes anything:

```
use csv_bind_core::join;

assert_eq!(join(&["a", "b,c"]), "\"a\",\"b,c\"");
```

Since embedded quotes are not escaped, a field that contains a `"` does not
survive a join followed by a split unchanged.
*/

#![deny(missing_docs)]

pub use crate::reader::{split, split_into};
pub use crate::writer::{join, join_into, Terminator};

mod reader;
mod writer;

/// The byte order mark stripped from the start of a line.
pub const BOM: char = '\u{FEFF}';
/// The field separator.
pub const SEPARATOR: char = ',';
/// The quote character.
pub const QUOTE: char = '"';
