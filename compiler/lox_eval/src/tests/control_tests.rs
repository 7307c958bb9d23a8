//! Statement execution, printing, and error propagation.

use lox_ir::{BinaryOp, LogicalOp, StringInterner, UnaryOp};

use super::{output_of, runtime_error, test_interpreter};
use crate::errors::EvalErrorKind;
use crate::test_helpers::ProgramBuilder;
use crate::RunError;

mod printing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integral_sum_prints_without_fraction() {
        let out = output_of(|b| {
            let one = b.num(1.0);
            let two = b.num(2.0);
            let sum = b.binary(BinaryOp::Add, one, two);
            b.push_print(sum);
        });
        assert_eq!(out, "3\n");
    }

    #[test]
    fn fractions_print_in_default_form() {
        let out = output_of(|b| {
            let one = b.num(1.0);
            let two = b.num(2.0);
            let half = b.binary(BinaryOp::Div, one, two);
            b.push_print(half);
        });
        assert_eq!(out, "0.5\n");
    }

    #[test]
    fn literals_print_their_text_form() {
        let out = output_of(|b| {
            let nil = b.nil();
            b.push_print(nil);
            let t = b.bool(true);
            b.push_print(t);
            let text = b.str("hello");
            b.push_print(text);
            let neg = b.num(-7.0);
            b.push_print(neg);
        });
        assert_eq!(out, "nil\ntrue\nhello\n-7\n");
    }

    #[test]
    fn callables_print_placeholders() {
        let out = output_of(|b| {
            let clock = b.var("clock");
            b.push_print(clock);
            let decl = b.function("greet", &[], &[]);
            b.push(&[decl]);
            let greet = b.var("greet");
            b.push_print(greet);
        });
        assert_eq!(out, "<native fn>\n<fn greet>\n");
    }

    #[test]
    fn grouping_has_no_semantics_of_its_own() {
        let out = output_of(|b| {
            let two = b.num(2.0);
            let three = b.num(3.0);
            let sum = b.binary(BinaryOp::Add, two, three);
            let group = b.group(sum);
            let four = b.num(4.0);
            let product = b.binary(BinaryOp::Mul, group, four);
            b.push_print(product);
        });
        assert_eq!(out, "20\n");
    }

    #[test]
    fn clock_returns_a_number() {
        let out = output_of(|b| {
            let now = b.call_named("clock", &[]);
            let zero = b.num(0.0);
            let positive = b.binary(BinaryOp::Gt, now, zero);
            b.push_print(positive);
        });
        assert_eq!(out, "true\n");
    }
}

mod type_errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_plus_number_is_a_type_error() {
        let (out, err) = runtime_error(|b| {
            b.line(3);
            let a = b.str("a");
            let one = b.num(1.0);
            let sum = b.binary(BinaryOp::Add, a, one);
            b.push_print(sum);
        });
        assert_eq!(out, "");
        assert_eq!(err.kind, EvalErrorKind::OperandsMustBeNumbersOrStrings);
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn string_concatenation_and_no_coercion() {
        let out = output_of(|b| {
            let a = b.str("a");
            let bee = b.str("b");
            let joined = b.binary(BinaryOp::Add, a, bee);
            b.push_print(joined);

            let one = b.num(1.0);
            let one_str = b.str("1");
            let same = b.binary(BinaryOp::Eq, one, one_str);
            b.push_print(same);

            let nil_a = b.nil();
            let nil_b = b.nil();
            let nils = b.binary(BinaryOp::Eq, nil_a, nil_b);
            b.push_print(nils);

            let nil = b.nil();
            let f = b.bool(false);
            let nil_false = b.binary(BinaryOp::Eq, nil, f);
            b.push_print(nil_false);
        });
        assert_eq!(out, "ab\nfalse\ntrue\nfalse\n");
    }

    #[test]
    fn negating_a_string_fails() {
        let (_, err) = runtime_error(|b| {
            let x = b.str("x");
            let neg = b.unary(UnaryOp::Neg, x);
            b.push_print(neg);
        });
        assert_eq!(err.message(), "Operand must be a number.");
    }

    #[test]
    fn bang_works_on_any_value() {
        let out = output_of(|b| {
            let nil = b.nil();
            let not_nil = b.unary(UnaryOp::Not, nil);
            b.push_print(not_nil);
            let zero = b.num(0.0);
            let not_zero = b.unary(UnaryOp::Not, zero);
            b.push_print(not_zero);
        });
        assert_eq!(out, "true\nfalse\n");
    }
}

mod variables {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn block_shadowing_does_not_leak() {
        // var x = "outer"; { var x = "inner"; print x; } print x;
        let out = output_of(|b| {
            let outer = b.str("outer");
            let decl = b.var_decl("x", Some(outer));
            let inner = b.str("inner");
            let inner_decl = b.var_decl("x", Some(inner));
            let read_inner = b.var("x");
            let print_inner = b.print(read_inner);
            let block = b.block(&[inner_decl, print_inner]);
            b.push(&[decl, block]);
            let read_outer = b.var("x");
            b.push_print(read_outer);
        });
        assert_eq!(out, "inner\nouter\n");
    }

    #[test]
    fn block_assignment_reaches_enclosing_binding() {
        // var x = 1; { x = 2; } print x;
        let out = output_of(|b| {
            let one = b.num(1.0);
            let decl = b.var_decl("x", Some(one));
            let two = b.num(2.0);
            let assign = b.assign("x", two);
            let stmt = b.expr_stmt(assign);
            let block = b.block(&[stmt]);
            b.push(&[decl, block]);
            let read = b.var("x");
            b.push_print(read);
        });
        assert_eq!(out, "2\n");
    }

    #[test]
    fn uninitialized_var_is_nil() {
        let out = output_of(|b| {
            let decl = b.var_decl("a", None);
            b.push(&[decl]);
            let read = b.var("a");
            b.push_print(read);
        });
        assert_eq!(out, "nil\n");
    }

    #[test]
    fn assignment_is_an_expression() {
        // var a; print a = 3;
        let out = output_of(|b| {
            let decl = b.var_decl("a", None);
            b.push(&[decl]);
            let three = b.num(3.0);
            let assign = b.assign("a", three);
            b.push_print(assign);
        });
        assert_eq!(out, "3\n");
    }

    #[test]
    fn assigning_an_undeclared_name_fails() {
        let (_, err) = runtime_error(|b| {
            b.line(5);
            let one = b.num(1.0);
            let assign = b.assign("ghost", one);
            let stmt = b.expr_stmt(assign);
            b.push(&[stmt]);
        });
        assert_eq!(
            err.kind,
            EvalErrorKind::UndefinedVariable {
                name: "ghost".to_owned()
            }
        );
        assert_eq!(err.message(), "Undefined variable 'ghost'.");
        assert_eq!(err.line(), Some(5));
    }

    #[test]
    fn redeclaration_overwrites() {
        // var a = 1; var a = 2; print a; { var b = 1; var b = 2; print b; }
        let out = output_of(|b| {
            let one = b.num(1.0);
            let first = b.var_decl("a", Some(one));
            let two = b.num(2.0);
            let second = b.var_decl("a", Some(two));
            b.push(&[first, second]);
            let read = b.var("a");
            b.push_print(read);

            let one = b.num(1.0);
            let first = b.var_decl("b", Some(one));
            let two = b.num(2.0);
            let second = b.var_decl("b", Some(two));
            let read = b.var("b");
            let print = b.print(read);
            let block = b.block(&[first, second, print]);
            b.push(&[block]);
        });
        assert_eq!(out, "2\n2\n");
    }

    #[test]
    fn block_local_binding_resolves_past_later_globals() {
        // var a = "global"; { fun show() { print a; } show(); var a = "block"; show(); }
        let out = output_of(|b| {
            let global = b.str("global");
            let decl = b.var_decl("a", Some(global));
            let read = b.var("a");
            let print = b.print(read);
            let show = b.function("show", &[], &[print]);
            let call_first = b.call_named("show", &[]);
            let first = b.expr_stmt(call_first);
            let block_value = b.str("block");
            let shadow = b.var_decl("a", Some(block_value));
            let call_second = b.call_named("show", &[]);
            let second = b.expr_stmt(call_second);
            let block = b.block(&[show, first, shadow, second]);
            b.push(&[decl, block]);
        });
        assert_eq!(out, "global\nglobal\n");
    }
}

mod logical {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn or_returns_the_deciding_operand() {
        let out = output_of(|b| {
            let nil = b.nil();
            let five = b.num(5.0);
            let or = b.logical(LogicalOp::Or, nil, five);
            b.push_print(or);
        });
        assert_eq!(out, "5\n");
    }

    #[test]
    fn or_skips_right_when_left_is_truthy() {
        // Calling an undefined name would fail if the right side ran.
        let out = output_of(|b| {
            let five = b.num(5.0);
            let boom = b.call_named("boom", &[]);
            let or = b.logical(LogicalOp::Or, five, boom);
            b.push_print(or);
        });
        assert_eq!(out, "5\n");
    }

    #[test]
    fn and_returns_falsy_left_without_evaluating_right() {
        let out = output_of(|b| {
            let nil = b.nil();
            let boom = b.call_named("boom", &[]);
            let and = b.logical(LogicalOp::And, nil, boom);
            b.push_print(and);
        });
        assert_eq!(out, "nil\n");
    }

    #[test]
    fn operands_are_never_coerced_to_booleans() {
        let out = output_of(|b| {
            let one = b.num(1.0);
            let two = b.str("two");
            let and = b.logical(LogicalOp::And, one, two);
            b.push_print(and);
            let zero = b.num(0.0);
            let x = b.str("x");
            let or = b.logical(LogicalOp::Or, zero, x);
            b.push_print(or);
        });
        assert_eq!(out, "two\n0\n");
    }
}

mod control_flow {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn while_loop_counts() {
        // var i = 0; while (i < 3) { print i; i = i + 1; }
        let out = output_of(|b| {
            let zero = b.num(0.0);
            let decl = b.var_decl("i", Some(zero));
            let i = b.var("i");
            let three = b.num(3.0);
            let cond = b.binary(BinaryOp::Lt, i, three);
            let read = b.var("i");
            let print = b.print(read);
            let i = b.var("i");
            let one = b.num(1.0);
            let next = b.binary(BinaryOp::Add, i, one);
            let assign = b.assign("i", next);
            let step = b.expr_stmt(assign);
            let body = b.block(&[print, step]);
            let looped = b.while_stmt(cond, body);
            b.push(&[decl, looped]);
        });
        assert_eq!(out, "0\n1\n2\n");
    }

    #[test]
    fn if_uses_truthiness() {
        // if (0) print "zero"; if (nil) print "nil"; else print "else";
        let out = output_of(|b| {
            let zero = b.num(0.0);
            let text = b.str("zero");
            let then = b.print(text);
            let first = b.if_stmt(zero, then, None);
            let nil = b.nil();
            let text = b.str("nil");
            let then = b.print(text);
            let text = b.str("else");
            let otherwise = b.print(text);
            let second = b.if_stmt(nil, then, Some(otherwise));
            b.push(&[first, second]);
        });
        assert_eq!(out, "zero\nelse\n");
    }
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn calling_a_non_callable_fails() {
        let (_, err) = runtime_error(|b| {
            let callee = b.str("not a function");
            let call = b.call(callee, &[]);
            let stmt = b.expr_stmt(call);
            b.push(&[stmt]);
        });
        assert_eq!(err.message(), "Can only call functions and classes.");
    }

    #[test]
    fn arity_mismatch_reports_counts() {
        let (_, err) = runtime_error(|b| {
            let decl = b.function("pair", &["a", "b"], &[]);
            let one = b.num(1.0);
            let call = b.call_named("pair", &[one]);
            let stmt = b.expr_stmt(call);
            b.push(&[decl, stmt]);
        });
        assert_eq!(err.kind, EvalErrorKind::ArityMismatch { expected: 2, got: 1 });
        assert_eq!(err.message(), "Expected 2 arguments but got 1.");
    }

    #[test]
    fn arguments_evaluate_left_to_right() {
        // var log = ""; fun f(a, b) {} f(log = log + "a", log = log + "b"); print log;
        let out = output_of(|b| {
            let empty = b.str("");
            let decl = b.var_decl("log", Some(empty));
            let f = b.function("f", &["a", "b"], &[]);
            let log = b.var("log");
            let a = b.str("a");
            let first = b.binary(BinaryOp::Add, log, a);
            let first = b.assign("log", first);
            let log = b.var("log");
            let bee = b.str("b");
            let second = b.binary(BinaryOp::Add, log, bee);
            let second = b.assign("log", second);
            let call = b.call_named("f", &[first, second]);
            let stmt = b.expr_stmt(call);
            b.push(&[decl, f, stmt]);
            let read = b.var("log");
            b.push_print(read);
        });
        assert_eq!(out, "ab\n");
    }

    #[test]
    fn functions_without_return_yield_nil() {
        let out = output_of(|b| {
            let noop = b.function("noop", &[], &[]);
            let ret = b.ret(None);
            let bare = b.function("bare", &[], &[ret]);
            b.push(&[noop, bare]);
            let first = b.call_named("noop", &[]);
            b.push_print(first);
            let second = b.call_named("bare", &[]);
            b.push_print(second);
        });
        assert_eq!(out, "nil\nnil\n");
    }
}

mod batches {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn runtime_error_abandons_rest_of_batch() {
        let interner = StringInterner::new();
        let mut interpreter = test_interpreter(&interner);

        // var kept = "yes"; print "before"; print missing; var skipped = 1;
        let mut b = ProgramBuilder::new(&interner);
        let yes = b.str("yes");
        let kept = b.var_decl("kept", Some(yes));
        let before = b.str("before");
        let print_before = b.print(before);
        b.line(3);
        let missing = b.var("missing");
        let print_missing = b.print(missing);
        let one = b.num(1.0);
        let skipped = b.var_decl("skipped", Some(one));
        b.push(&[kept, print_before, print_missing, skipped]);

        let Err(RunError::Runtime(err)) = interpreter.run(&b.finish()) else {
            panic!("expected a runtime error");
        };
        assert_eq!(err.message(), "Undefined variable 'missing'.");
        assert_eq!(interpreter.get_print_output(), "before\n");
        assert!(interpreter.global("skipped").is_none());
        assert!(interpreter.env().is_at_globals());

        // print kept;
        let mut b = ProgramBuilder::new(&interner);
        let read = b.var("kept");
        b.push_print(read);
        interpreter.clear_print_output();
        interpreter.run(&b.finish()).unwrap();
        assert_eq!(interpreter.get_print_output(), "yes\n");
    }

    #[test]
    fn error_inside_block_restores_globals_frame() {
        let interner = StringInterner::new();
        let mut interpreter = test_interpreter(&interner);

        // { var inner = 1; { print missing; } }
        let mut b = ProgramBuilder::new(&interner);
        let one = b.num(1.0);
        let decl = b.var_decl("inner", Some(one));
        let missing = b.var("missing");
        let print = b.print(missing);
        let nested = b.block(&[print]);
        let block = b.block(&[decl, nested]);
        b.push(&[block]);
        assert!(interpreter.run(&b.finish()).is_err());
        assert!(interpreter.env().is_at_globals());

        // print inner;
        let mut b = ProgramBuilder::new(&interner);
        let read = b.var("inner");
        b.push_print(read);
        let Err(RunError::Runtime(err)) = interpreter.run(&b.finish()) else {
            panic!("block locals must not survive the block");
        };
        assert_eq!(err.message(), "Undefined variable 'inner'.");
    }

    #[test]
    fn every_runtime_error_is_reported_once() {
        let interner = StringInterner::new();
        let mut interpreter = test_interpreter(&interner);

        for line in 1..=2 {
            let mut b = ProgramBuilder::new(&interner);
            b.line(line);
            let missing = b.var("missing");
            b.push_print(missing);
            assert!(interpreter.run(&b.finish()).is_err());
        }

        let reported = interpreter.reporter().reported();
        assert_eq!(reported.len(), 2);
        assert_eq!(reported[1].line, Some(2));
    }
}
