//! Built-in operations: program output, string/list helpers, input, type
//! introspection and test recording.

use std::cmp::Ordering;

use sprout_ir::{Frame, FrameRef, Operand, Primitive, SproutError, Value, ValueRef};

use crate::interpreter::Interpreter;

impl Interpreter {
    pub(crate) fn eval_print(
        &mut self,
        operand: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let prim = self.resolve_primitive(operand, frame)?;
        self.printer.writeln(&format!("==> {prim}"));
        Ok(Value::Nil.into_ref())
    }

    pub(crate) fn eval_length(
        &mut self,
        target: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let tv = self.resolve_value(target, frame)?;
        let len = match &*tv.borrow() {
            Value::Str(s) => s.len(),
            Value::List(l) => l.len(),
            _ => return Err(SproutError::BuiltinArityOrType { builtin: "length" }),
        };
        Ok(Value::Int(len as i64).into_ref())
    }

    pub(crate) fn eval_split(
        &mut self,
        target: &Operand,
        delimiter: &str,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let tv = self.resolve_value(target, frame)?;
        let text = match &*tv.borrow() {
            Value::Str(s) => s.text().to_string(),
            _ => return Err(SproutError::BuiltinArityOrType { builtin: "split" }),
        };

        // `' '` splits on whitespace runs; other delimiters split exactly,
        // with trailing empty fields dropped.
        let parts: Vec<String> = if delimiter == " " {
            text.split_whitespace().map(str::to_string).collect()
        } else if delimiter.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            let mut parts: Vec<String> = text.split(delimiter).map(str::to_string).collect();
            while parts.last().is_some_and(String::is_empty) {
                parts.pop();
            }
            parts
        };

        let elems = parts
            .into_iter()
            .map(|p| Operand::Value(Value::str(p).into_ref()))
            .collect();
        Ok(Value::list(elems).into_ref())
    }

    pub(crate) fn eval_append(
        &mut self,
        list: &Operand,
        item: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let list_ref = self.resolve_value(list, frame)?;
        let item_ref = self.resolve_value(item, frame)?;
        match &mut *list_ref.borrow_mut() {
            Value::List(l) => l.push(Operand::Value(item_ref)),
            _ => return Err(SproutError::BuiltinArityOrType { builtin: "append" }),
        }
        Ok(list_ref)
    }

    pub(crate) fn eval_pop(
        &mut self,
        list: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let list_ref = self.resolve_value(list, frame)?;
        let popped = match &mut *list_ref.borrow_mut() {
            Value::List(l) => l.pop(),
            _ => return Err(SproutError::BuiltinArityOrType { builtin: "pop" }),
        };
        match popped {
            Some(elem) => self.resolve_value(&elem, frame),
            None => Ok(Value::Nil.into_ref()),
        }
    }

    pub(crate) fn eval_clear(
        &mut self,
        list: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let list_ref = self.resolve_value(list, frame)?;
        match &mut *list_ref.borrow_mut() {
            Value::List(l) => l.clear(),
            _ => return Err(SproutError::BuiltinArityOrType { builtin: "clear" }),
        }
        Ok(list_ref)
    }

    pub(crate) fn eval_sort(
        &mut self,
        list: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let list_ref = self.resolve_value(list, frame)?;
        let elems = match &*list_ref.borrow() {
            Value::List(l) => l.elems.clone(),
            _ => return Err(SproutError::BuiltinArityOrType { builtin: "sort" }),
        };

        // Sort by each element's unwrapped primitive, ascending.
        let mut keyed = Vec::with_capacity(elems.len());
        for elem in elems {
            let key = self.resolve_primitive(&elem, frame)?;
            keyed.push((key, elem));
        }
        if let Some((first, _)) = keyed.first() {
            for (key, _) in &keyed[1..] {
                if key.compare(first).is_none() {
                    return Err(SproutError::DataTypeMismatch);
                }
            }
        }
        keyed.sort_by(|a, b| a.0.compare(&b.0).unwrap_or(Ordering::Equal));

        match &mut *list_ref.borrow_mut() {
            Value::List(l) => l.elems = keyed.into_iter().map(|(_, elem)| elem).collect(),
            _ => return Err(SproutError::BuiltinArityOrType { builtin: "sort" }),
        }
        Ok(list_ref)
    }

    pub(crate) fn eval_delete_at(
        &mut self,
        list: &Operand,
        index: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let idx = match self.resolve_primitive(index, frame)? {
            Primitive::Int(i) => i,
            _ => return Err(SproutError::DataTypeMismatch),
        };
        let list_ref = self.resolve_value(list, frame)?;
        let removed = match &mut *list_ref.borrow_mut() {
            Value::List(l) => l.delete_at(idx),
            _ => return Err(SproutError::BuiltinArityOrType { builtin: "delete_at" }),
        };
        match removed {
            Some(elem) => self.resolve_value(&elem, frame),
            None => Ok(Value::Nil.into_ref()),
        }
    }

    pub(crate) fn eval_input(
        &mut self,
        prompt: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let prim = self.resolve_primitive(prompt, frame)?;
        self.printer.write(&prim.to_string());
        let line = self.input.read_line();
        Ok(Value::str(line).into_ref())
    }

    pub(crate) fn eval_what_is(
        &mut self,
        target: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let tv = match target {
            Operand::Name(name) => {
                Frame::lookup(frame, name).ok_or_else(|| SproutError::VariableNotFound {
                    name: name.clone(),
                })?
            }
            Operand::Value(value) => value.clone(),
            Operand::Node(node) => self.eval(node)?,
        };
        let tag = tv.borrow().type_tag();
        Ok(Value::str(tag).into_ref())
    }

    pub(crate) fn eval_test(
        &mut self,
        lhs: &Operand,
        rhs: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let actual = self.resolve_primitive(lhs, frame)?;
        let expected = self.resolve_primitive(rhs, frame)?;
        tracing::debug!(%actual, %expected, "recording assertion");
        self.ledger.record(actual, expected);
        Ok(Value::Nil.into_ref())
    }
}

#[cfg(test)]
mod tests {
    use sprout_ir::{Primitive, SproutError};

    use crate::exec::testing::{global, run, run_captured, run_err, run_with_input};

    mod printing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn output_lines_carry_the_arrow_prefix() {
            let (_, _, output) = run_captured("print(2 + 3); print(\"hi\");");
            assert_eq!(&*output.borrow(), "==> 5\n==> hi\n");
        }

        #[test]
        fn floats_and_lists_render_like_program_values() {
            let (_, _, output) = run_captured("print(5.0); print([1, \"a\"]);");
            assert_eq!(&*output.borrow(), "==> 5.0\n==> [1, \"a\"]\n");
        }

        #[test]
        fn printing_an_unbound_name_is_fatal() {
            assert_eq!(
                run_err("print(ghost);"),
                SproutError::VariableNotFound {
                    name: "ghost".into()
                }
            );
        }
    }

    mod strings {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn length_counts_characters() {
            let (mut interp, program) = run("s = \"hello\"; n = length(s);");
            assert_eq!(global(&mut interp, &program, "n"), Primitive::Int(5));
        }

        #[test]
        fn split_on_whitespace_collapses_runs() {
            let (interp, _) =
                run("parts = split(\" a  b \", ' '); test(parts, [\"a\", \"b\"]);");
            assert!(interp.ledger().entries()[0].passed());
        }

        #[test]
        fn split_on_a_character_keeps_inner_empties_only() {
            let (interp, _) =
                run("parts = split(\"axxbx\", 'x'); test(parts, [\"a\", \"\", \"b\"]);");
            assert!(interp.ledger().entries()[0].passed());
        }

        #[test]
        fn split_of_a_non_string_variable_is_fatal() {
            assert_eq!(
                run_err("n = 5; parts = split(n, ' ');"),
                SproutError::BuiltinArityOrType { builtin: "split" }
            );
        }
    }

    mod lists {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn append_grows_and_returns_the_same_list() {
            let (mut interp, program) = run("nums = [1]; append(nums, 2); n = length(nums);");
            assert_eq!(global(&mut interp, &program, "n"), Primitive::Int(2));
        }

        #[test]
        fn pop_takes_from_the_tail_and_empties_to_nil() {
            let (mut interp, program) =
                run("nums = [1, 2]; a = pop(nums); b = pop(nums); c = pop(nums);");
            assert_eq!(global(&mut interp, &program, "a"), Primitive::Int(2));
            assert_eq!(global(&mut interp, &program, "b"), Primitive::Int(1));
            assert_eq!(global(&mut interp, &program, "c"), Primitive::Nil);
        }

        #[test]
        fn clear_leaves_an_empty_list() {
            let (mut interp, program) = run("nums = [1, 2, 3]; clear(nums); n = length(nums);");
            assert_eq!(global(&mut interp, &program, "n"), Primitive::Int(0));
        }

        #[test]
        fn sort_orders_ascending_across_numeric_kinds() {
            let (interp, _) =
                run("nums = [3, 1.5, 2]; sort(nums); test(nums, [1.5, 2, 3]);");
            assert!(interp.ledger().entries()[0].passed());
        }

        #[test]
        fn sort_of_mixed_kinds_is_fatal() {
            assert_eq!(
                run_err("nums = [1, \"a\"]; sort(nums);"),
                SproutError::DataTypeMismatch
            );
        }

        #[test]
        fn delete_at_removes_in_place_and_returns_the_element() {
            let (interp, _) = run(
                "nums = [1, 2, 3]; x = delete_at(nums, 1); \
                 test(x, 2); test(nums, [1, 3]);",
            );
            assert!(interp.ledger().entries().iter().all(|e| e.passed()));
        }

        #[test]
        fn delete_at_out_of_range_yields_nil() {
            let (mut interp, program) = run("nums = [1]; x = delete_at(nums, 5);");
            assert_eq!(global(&mut interp, &program, "x"), Primitive::Nil);
        }
    }

    mod input {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn input_prompts_without_newline_and_yields_the_line() {
            let (mut interp, program, output) =
                run_with_input("name = input(\"who? \");", &["sprout"]);
            assert_eq!(&*output.borrow(), "who? ");
            assert_eq!(
                global(&mut interp, &program, "name"),
                Primitive::Str("sprout".into())
            );
        }

        #[test]
        fn exhausted_input_reads_empty_strings() {
            let (mut interp, program, _) = run_with_input("line = input(\"\");", &[]);
            assert_eq!(
                global(&mut interp, &program, "line"),
                Primitive::Str(String::new())
            );
        }
    }

    mod introspection {
        use super::*;

        #[test]
        fn what_is_names_every_kind() {
            let (interp, _) = run(
                "a = what_is(1); test(a, \"integer\"); \
                 b = what_is(1.5); test(b, \"float\"); \
                 c = what_is(True); test(c, \"boolean\"); \
                 d = what_is(\"s\"); test(d, \"string\"); \
                 e = what_is([1]); test(e, \"list\");",
            );
            assert!(interp.ledger().entries().iter().all(|e| e.passed()));
        }

        #[test]
        fn what_is_resolves_variables_first() {
            let (interp, _) = run("x = 2.5; tag = what_is(x); test(tag, \"float\");");
            assert!(interp.ledger().entries()[0].passed());
        }
    }

    mod assertions {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn ledger_records_pairs_in_order() {
            let (interp, _) = run("test(2 + 2, 4); test(1, 2);");
            let entries = interp.ledger().entries();
            assert_eq!(entries.len(), 2);
            assert!(entries[0].passed());
            assert!(!entries[1].passed());
            assert_eq!(entries[1].actual, Primitive::Int(1));
            assert_eq!(entries[1].expected, Primitive::Int(2));
        }

        #[test]
        fn recording_never_prints() {
            let (_, _, output) = run_captured("test(1, 1);");
            assert_eq!(&*output.borrow(), "");
        }
    }
}
