use sprout_ir::{
    ArithOp, AssignTarget, Condition, Frame, Node, Operand, Program, SproutError, Value,
};
use sprout_lexer::tokenize;

use super::parse;

fn parse_src(source: &str) -> Program {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => panic!("lex failure: {e}"),
    };
    match parse(tokens) {
        Ok(program) => program,
        Err(e) => panic!("parse failure: {e}"),
    }
}

fn parse_err(source: &str) -> SproutError {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => panic!("lex failure: {e}"),
    };
    match parse(tokens) {
        Ok(_) => panic!("expected a parse error"),
        Err(e) => e,
    }
}

mod statements {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assignment_builds_one_node_in_the_root_tree() {
        let program = parse_src("x = 5;");
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(
            &*program.statements[0],
            Node::Assign {
                target: AssignTarget::Name(name),
                value: Operand::Value(_),
                ..
            } if name == "x"
        ));
    }

    #[test]
    fn capitalized_variable_name_is_rejected() {
        assert_eq!(
            parse_err("Total = 1;"),
            SproutError::VariableNameInvalid {
                name: "Total".into()
            }
        );
    }

    #[test]
    fn list_slot_assignment_targets_the_slot() {
        let program = parse_src("nums[0] = 2;");
        assert!(matches!(
            &*program.statements[0],
            Node::Assign {
                target: AssignTarget::Index { list, .. },
                ..
            } if list == "nums"
        ));
    }

    #[test]
    fn compound_assignment_desugars_to_addition() {
        let program = parse_src("x += 2;");
        let Node::Assign { value: Operand::Node(sum), .. } = &*program.statements[0] else {
            panic!("expected an assignment");
        };
        assert!(matches!(
            &**sum,
            Node::Arithmetic {
                lhs: Operand::Name(name),
                op: ArithOp::Add,
                ..
            } if name == "x"
        ));
    }

    #[test]
    fn bare_variable_rows_leave_no_statement() {
        let program = parse_src("x = 1; x;");
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn bare_call_rows_are_kept() {
        let program = parse_src("greet();");
        assert!(matches!(
            &*program.statements[0],
            Node::FunctionCall { name, args, .. } if name == "greet" && args.is_empty()
        ));
    }
}

mod expressions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let program = parse_src("x = 1 + 2 * 3;");
        let Node::Assign { value: Operand::Node(node), .. } = &*program.statements[0] else {
            panic!("expected an assignment");
        };
        let Node::Arithmetic { op: ArithOp::Add, rhs: Operand::Node(rhs), .. } = &**node else {
            panic!("expected the addition on top");
        };
        assert!(matches!(&**rhs, Node::Arithmetic { op: ArithOp::Mul, .. }));
    }

    #[test]
    fn caret_is_right_associative_exponentiation() {
        let program = parse_src("x = 2 ^ 3 ^ 2;");
        let Node::Assign { value: Operand::Node(node), .. } = &*program.statements[0] else {
            panic!("expected an assignment");
        };
        let Node::Arithmetic { op: ArithOp::Pow, rhs: Operand::Node(rhs), .. } = &**node else {
            panic!("expected exponentiation on top");
        };
        assert!(matches!(&**rhs, Node::Arithmetic { op: ArithOp::Pow, .. }));
    }

    #[test]
    fn negative_literals_fold_at_parse_time() {
        let program = parse_src("x = -4;");
        let Node::Assign { value: Operand::Value(v), .. } = &*program.statements[0] else {
            panic!("expected a literal assignment");
        };
        assert_eq!(*v.borrow(), Value::Int(-4));
    }

    #[test]
    fn negated_name_becomes_zero_minus_name() {
        let program = parse_src("x = -y;");
        let Node::Assign { value: Operand::Node(node), .. } = &*program.statements[0] else {
            panic!("expected an assignment");
        };
        assert!(matches!(
            &**node,
            Node::Arithmetic { op: ArithOp::Sub, rhs: Operand::Name(name), .. } if name == "y"
        ));
    }

    #[test]
    fn missing_expression_is_an_unexpected_token() {
        assert!(matches!(
            parse_err("x = ;"),
            SproutError::UnexpectedToken { .. }
        ));
    }
}

mod blocks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn while_body_owns_a_child_frame_of_globals() {
        let program = parse_src("while (True) { x = 1; }");
        let Node::While { frame, body, .. } = &*program.statements[0] else {
            panic!("expected a while node");
        };
        assert_eq!(body.len(), 1);
        let parent = frame.borrow().parent();
        assert!(parent.is_some_and(|p| p.ptr_eq(&program.globals)));
    }

    #[test]
    fn do_while_keeps_body_and_condition() {
        let program = parse_src("do { x = 1; } while (x < 3);");
        assert!(matches!(&*program.statements[0], Node::DoWhile { body, .. } if body.len() == 1));
    }

    #[test]
    fn for_header_tolerates_an_assignment_shaped_increment() {
        let program = parse_src("for (i = 0; i < 3; i = i + 1) { }");
        let Node::For { loop_var, increment, .. } = &*program.statements[0] else {
            panic!("expected a for node");
        };
        assert_eq!(loop_var, "i");
        assert!(matches!(increment, Operand::Node(_)));
    }

    #[test]
    fn else_if_and_else_attach_to_the_chain_tail() {
        let program = parse_src("if (x > 1) { } else if (x > 0) { } else { }");
        assert_eq!(program.statements.len(), 1);
        let Node::If(first) = &*program.statements[0] else {
            panic!("expected an if node");
        };
        let second = match first.else_arm() {
            Some(arm) => arm,
            None => panic!("else if arm missing"),
        };
        let third = match second.else_arm() {
            Some(arm) => arm,
            None => panic!("else arm missing"),
        };
        assert!(matches!(second.condition, Condition::Test(_)));
        assert!(matches!(third.condition, Condition::Always));
        assert!(third.else_arm().is_none());
    }

    #[test]
    fn dangling_else_is_rejected() {
        assert_eq!(parse_err("x = 1; else { }"), SproutError::DanglingElse);
        assert_eq!(
            parse_err("if (True) { } x = 1; else { }"),
            SproutError::DanglingElse
        );
    }

    #[test]
    fn unclosed_block_is_unexpected_eof() {
        assert_eq!(parse_err("while (True) { x = 1;"), SproutError::UnexpectedEof);
    }
}

mod functions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn definitions_land_in_the_global_table_not_the_tree() {
        let program = parse_src("function add(a, b) { return a + b; }");
        assert!(program.statements.is_empty());
        let table = program.globals.borrow().functions();
        let def = match table.borrow().get("add") {
            Some(def) => def.clone(),
            None => panic!("function not registered"),
        };
        assert_eq!(def.params, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(def.body.len(), 1);
        let parent = def.frame.borrow().parent();
        assert!(parent.is_some_and(|p| p.ptr_eq(&program.globals)));
    }

    #[test]
    fn return_outside_a_function_is_rejected() {
        assert_eq!(parse_err("return 1;"), SproutError::ReturnOutsideFunction);
    }

    #[test]
    fn nested_definitions_are_rejected() {
        assert_eq!(
            parse_err("function outer() { function inner() { } }"),
            SproutError::NestedFunction
        );
        assert_eq!(
            parse_err("while (True) { function inner() { } }"),
            SproutError::NestedFunction
        );
    }
}

mod builtins {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_requires_a_delimiter_literal() {
        assert_eq!(
            parse_err("split(words, nums);"),
            SproutError::BuiltinArityOrType { builtin: "split" }
        );
    }

    #[test]
    fn length_rejects_non_string_non_list_literals() {
        assert_eq!(
            parse_err("x = length(5);"),
            SproutError::BuiltinArityOrType { builtin: "length" }
        );
    }

    #[test]
    fn append_requires_a_list_position_argument() {
        assert_eq!(
            parse_err("append(5, 1);"),
            SproutError::BuiltinArityOrType { builtin: "append" }
        );
    }

    #[test]
    fn builtins_parse_in_assignment_position() {
        let program = parse_src("parts = split(\"a b\", ' ');");
        let Node::Assign { value: Operand::Node(node), .. } = &*program.statements[0] else {
            panic!("expected an assignment");
        };
        assert!(matches!(
            &**node,
            Node::Split { delimiter, .. } if delimiter == " "
        ));
    }

    #[test]
    fn loop_frames_carry_the_break_site() {
        let program = parse_src("while (True) { break; }");
        let Node::While { frame, body, .. } = &*program.statements[0] else {
            panic!("expected a while node");
        };
        let Node::Break { frame: break_frame } = &*body[0] else {
            panic!("expected a break node");
        };
        assert!(break_frame.ptr_eq(frame));
    }

    #[test]
    fn test_records_both_operands() {
        let program = parse_src("test(2 + 2, 4);");
        assert!(matches!(&*program.statements[0], Node::Test { .. }));
    }
}

#[test]
fn frames_nest_with_the_blocks_that_made_them() {
    let program = parse_src("while (True) { if (x > 0) { y = 1; } }");
    let Node::While { frame: while_frame, body, .. } = &*program.statements[0] else {
        panic!("expected a while node");
    };
    let Node::If(arm) = &*body[0] else {
        panic!("expected an if node");
    };
    let parent = arm.frame.borrow().parent();
    assert!(parent.is_some_and(|p| p.ptr_eq(while_frame)));
    assert!(Frame::lookup(&arm.frame, "missing").is_none());
}
