use std::slice;

use crate::{QUOTE, SEPARATOR};

/// A record terminator.
///
/// This is used when writing joined lines to a byte sink. Lines produced by
/// [`join`](fn.join.html) never include a terminator themselves.
///
/// The default is `Terminator::Any(b'\n')`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Terminator {
    /// Writes `\r\n` after every line.
    CRLF,
    /// Writes the byte given after every line.
    Any(u8),
}

impl Terminator {
    /// The bytes written for this terminator.
    pub fn as_bytes(&self) -> &[u8] {
        match *self {
            Terminator::CRLF => b"\r\n",
            Terminator::Any(ref b) => slice::from_ref(b),
        }
    }
}

impl Default for Terminator {
    fn default() -> Terminator {
        Terminator::Any(b'\n')
    }
}

/// Join fields into a single line, quoting every one of them.
///
/// Quote characters inside a field are written as is.
pub fn join<I, T>(fields: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut line = String::new();
    join_into(fields, &mut line);
    line
}

/// Join fields into `line`, quoting every one of them.
///
/// The joined fields are appended to whatever `line` already contains.
pub fn join_into<I, T>(fields: I, line: &mut String)
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(SEPARATOR);
        }
        line.push(QUOTE);
        line.push_str(field.as_ref());
        line.push(QUOTE);
    }
}

#[cfg(test)]
mod tests {
    use super::{join, join_into, Terminator};
    use crate::split;

    #[test]
    fn no_fields() {
        assert_eq!(join(Vec::<String>::new()), "");
    }

    #[test]
    fn one_empty_field() {
        assert_eq!(join(&[""]), "\"\"");
    }

    #[test]
    fn always_quoted() {
        assert_eq!(join(&["a", "1", "b,c"]), "\"a\",\"1\",\"b,c\"");
    }

    #[test]
    fn quotes_not_escaped() {
        assert_eq!(join(&["say \"hi\""]), "\"say \"hi\"\"");
        // The quote toggle eats the inner quotes on the way back.
        assert_eq!(split(&join(&["say \"hi\""])), vec!["say hi"]);
    }

    #[test]
    fn appends() {
        let mut line = "prefix:".to_string();
        join_into(vec!["x".to_string()], &mut line);
        assert_eq!(line, "prefix:\"x\"");
    }

    #[test]
    fn split_inverts_join() {
        let fields = vec!["a", "", "b,c", "  d "];
        assert_eq!(split(&join(&fields)), fields);
    }

    #[test]
    fn terminators() {
        assert_eq!(Terminator::default().as_bytes(), b"\n");
        assert_eq!(Terminator::CRLF.as_bytes(), b"\r\n");
        assert_eq!(Terminator::Any(b';').as_bytes(), b";");
    }
}
