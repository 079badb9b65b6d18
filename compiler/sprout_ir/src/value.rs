//! Runtime value model.
//!
//! `Value` is the object stored in variable slots and built at parse time
//! for literals; `Primitive` is what an operand resolves to when an
//! operation actually needs the data. The two-layer split matters: a list
//! literal keeps its elements *unevaluated* (as [`Operand`]s), so the list
//! object built during parsing is a single long-lived value whose contents
//! are re-resolved every time the list is unwrapped.

use std::cmp::Ordering;
use std::fmt;

use crate::ast::Operand;
use crate::shared::Shared;

/// Shared handle to a runtime value.
pub type ValueRef = Shared<Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(StrValue),
    List(ListValue),
}

impl Value {
    pub fn str(text: impl Into<String>) -> Value {
        Value::Str(StrValue::new(text))
    }

    pub fn list(elems: Vec<Operand>) -> Value {
        Value::List(ListValue { elems })
    }

    pub fn into_ref(self) -> ValueRef {
        Shared::new(self)
    }

    /// The tag `what_is` reports.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }
}

/// A string value: the normalized text plus its exploded characters.
///
/// Index reads go through the character sequence; everything else (equality,
/// ordering, concatenation) uses the text.
#[derive(Debug, Clone)]
pub struct StrValue {
    text: String,
    chars: Vec<char>,
}

impl StrValue {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = text.chars().collect();
        StrValue { text, chars }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`; negative indices count back from the end,
    /// anything out of range is `None`.
    pub fn char_at(&self, index: i64) -> Option<char> {
        let len = self.chars.len() as i64;
        let index = if index < 0 { index + len } else { index };
        if index < 0 {
            return None;
        }
        self.chars.get(index as usize).copied()
    }
}

impl PartialEq for StrValue {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

/// An ordered sequence of unevaluated operands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue {
    pub elems: Vec<Operand>,
}

impl ListValue {
    pub fn new(elems: Vec<Operand>) -> Self {
        ListValue { elems }
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Largest valid index, -1 when empty.
    pub fn max_index(&self) -> i64 {
        self.elems.len() as i64 - 1
    }

    pub fn push(&mut self, elem: Operand) {
        self.elems.push(elem);
    }

    pub fn pop(&mut self) -> Option<Operand> {
        self.elems.pop()
    }

    pub fn clear(&mut self) {
        self.elems.clear();
    }

    /// Removes and returns the element at `index`; negative indices count
    /// back from the end, out-of-range removals are `None`.
    pub fn delete_at(&mut self, index: i64) -> Option<Operand> {
        let len = self.elems.len() as i64;
        let index = if index < 0 { index + len } else { index };
        if index < 0 || index >= len {
            return None;
        }
        Some(self.elems.remove(index as usize))
    }
}

/// A fully resolved value: what an operand "unwraps" to when an operation
/// needs actual data to work on.
#[derive(Debug, Clone)]
pub enum Primitive {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Primitive>),
}

impl Primitive {
    /// Native truthiness: only `Nil` and `false` are falsy. Integer zero is
    /// truthy here.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Primitive::Nil | Primitive::Bool(false))
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Primitive::Nil => "nil",
            Primitive::Bool(_) => "boolean",
            Primitive::Int(_) => "integer",
            Primitive::Float(_) => "float",
            Primitive::Str(_) => "string",
            Primitive::List(_) => "list",
        }
    }

    /// Ordering for relational operators and `sort`. Integers and floats
    /// compare numerically across kinds; strings compare by text. Everything
    /// else (and any mixed pair) is incomparable.
    pub fn compare(&self, other: &Primitive) -> Option<Ordering> {
        match (self, other) {
            (Primitive::Int(a), Primitive::Int(b)) => Some(a.cmp(b)),
            (Primitive::Float(a), Primitive::Float(b)) => a.partial_cmp(b),
            (Primitive::Int(a), Primitive::Float(b)) => (*a as f64).partial_cmp(b),
            (Primitive::Float(a), Primitive::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Primitive::Str(a), Primitive::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn fmt_quoted(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Str(s) => write!(f, "\"{s}\""),
            Primitive::Nil => write!(f, "nil"),
            other => write!(f, "{other}"),
        }
    }
}

/// Equality for `==`/`!=` and test assertions. Integers and floats compare
/// numerically across kinds; mismatched kinds are unequal, never an error.
impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Primitive::Nil, Primitive::Nil) => true,
            (Primitive::Bool(a), Primitive::Bool(b)) => a == b,
            (Primitive::Int(a), Primitive::Int(b)) => a == b,
            (Primitive::Float(a), Primitive::Float(b)) => a == b,
            (Primitive::Int(a), Primitive::Float(b)) => (*a as f64) == *b,
            (Primitive::Float(a), Primitive::Int(b)) => *a == (*b as f64),
            (Primitive::Str(a), Primitive::Str(b)) => a == b,
            (Primitive::List(a), Primitive::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Nil => Ok(()),
            Primitive::Bool(b) => write!(f, "{b}"),
            Primitive::Int(n) => write!(f, "{n}"),
            Primitive::Float(x) => {
                // Whole floats keep their decimal point: 5.0 prints "5.0".
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Primitive::Str(s) => write!(f, "{s}"),
            Primitive::List(elems) => {
                write!(f, "[")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    elem.fmt_quoted(f)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    mod strings {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn char_at_wraps_negative_indices() {
            let s = StrValue::new("sprout");
            assert_eq!(s.char_at(0), Some('s'));
            assert_eq!(s.char_at(-1), Some('t'));
            assert_eq!(s.char_at(-6), Some('s'));
        }

        #[test]
        fn char_at_out_of_range_is_none() {
            let s = StrValue::new("ab");
            assert_eq!(s.char_at(2), None);
            assert_eq!(s.char_at(-3), None);
        }
    }

    mod lists {
        use super::*;
        use pretty_assertions::assert_eq;
        use crate::ast::Operand;

        #[test]
        fn delete_at_wraps_and_bounds_checks() {
            let mut list = ListValue::new(vec![
                Operand::Value(Value::Int(1).into_ref()),
                Operand::Value(Value::Int(2).into_ref()),
            ]);
            assert!(list.delete_at(5).is_none());
            assert!(list.delete_at(-1).is_some());
            assert_eq!(list.len(), 1);
        }

        #[test]
        fn max_index_of_empty_list_is_negative_one() {
            assert_eq!(ListValue::default().max_index(), -1);
        }
    }

    mod primitives {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn ints_and_floats_compare_numerically() {
            assert_eq!(Primitive::Int(1), Primitive::Float(1.0));
            assert_eq!(
                Primitive::Int(2).compare(&Primitive::Float(2.5)),
                Some(Ordering::Less)
            );
        }

        #[test]
        fn mixed_kinds_are_unequal_not_an_error() {
            assert_ne!(Primitive::Str("1".into()), Primitive::Int(1));
            assert_ne!(Primitive::Bool(true), Primitive::Int(1));
        }

        #[test]
        fn bools_and_nil_are_incomparable() {
            assert_eq!(Primitive::Bool(true).compare(&Primitive::Bool(false)), None);
            assert_eq!(Primitive::Nil.compare(&Primitive::Int(0)), None);
        }

        #[test]
        fn zero_is_truthy_nil_and_false_are_not() {
            assert!(Primitive::Int(0).is_truthy());
            assert!(!Primitive::Nil.is_truthy());
            assert!(!Primitive::Bool(false).is_truthy());
        }

        #[test]
        fn display_matches_program_output() {
            assert_eq!(Primitive::Float(5.0).to_string(), "5.0");
            assert_eq!(Primitive::Float(5.25).to_string(), "5.25");
            assert_eq!(Primitive::Nil.to_string(), "");
            assert_eq!(
                Primitive::List(vec![
                    Primitive::Int(1),
                    Primitive::Str("a".into()),
                    Primitive::Nil,
                ])
                .to_string(),
                "[1, \"a\", nil]"
            );
        }
    }
}
