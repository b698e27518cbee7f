//! Whole-program checking scenarios

use super::check;
use crate::frontend::Parser;
use pretty_assertions::assert_eq;

const PASSED: &str = "Static checking passed";

fn verdict(source: &str) -> String {
    let program = Parser::new(source).unwrap().parse().unwrap();
    match check(&program) {
        Ok(()) => PASSED.to_string(),
        Err(err) => err.to_string(),
    }
}

/// Wrap statements in `static void main()` of class `T`
fn in_main(body: &str) -> String {
    verdict(&format!("class T {{ static void main() {{ {} }} }}", body))
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn test_simple_program_passes() {
    assert_eq!(in_main("int x := 5; int y := x + 1;"), PASSED);
}

#[test]
fn test_redeclared_local() {
    assert_eq!(in_main("int x := 5; int x := 10;"), "Redeclared(Variable, x)");
}

#[test]
fn test_undeclared_identifier() {
    assert_eq!(in_main("int x := 5; x := y;"), "UndeclaredIdentifier(y)");
}

#[test]
fn test_upcast_without_entry_point() {
    let source = "class A {} class B extends A {} \
                  class C extends B { void foo() { A a; C c; a := new C(); } }";
    assert_eq!(verdict(source), "No Entry Point");
}

#[test]
fn test_illegal_array_literal() {
    assert_eq!(
        in_main("boolean[2] f := {true, 42};"),
        "IllegalArrayLiteral({true, 42})"
    );
}

#[test]
fn test_assign_to_final_local() {
    assert_eq!(
        in_main("final int x := 5; x := 10;"),
        "CannotAssignToConstant(x:=10)"
    );
}

// =============================================================================
// Priority order
// =============================================================================

#[test]
fn test_undeclared_outranks_type_mismatch() {
    assert_eq!(in_main("int x := \"s\"; y := 1;"), "UndeclaredIdentifier(y)");
    assert_eq!(in_main("y := 1; int x := \"s\";"), "UndeclaredIdentifier(y)");
}

#[test]
fn test_type_mismatch_outranks_must_in_loop() {
    assert_eq!(
        in_main("break; int x := 1.5;"),
        "TypeMismatchInStatement(int x:=1.5)"
    );
    assert_eq!(
        in_main("int x := 1.5; break;"),
        "TypeMismatchInStatement(int x:=1.5)"
    );
}

#[test]
fn test_member_access_outranks_constant_assignment() {
    assert_eq!(
        in_main("final int c := 1; c := 2; T t := this;"),
        "IllegalMemberAccess(this)"
    );
    assert_eq!(
        in_main("T t := this; final int c := 1; c := 2;"),
        "IllegalMemberAccess(this)"
    );
}

#[test]
fn test_must_in_loop_outranks_constant_assignment() {
    assert_eq!(
        in_main("final int c := 1; c := 2; continue;"),
        "MustInLoop(continue)"
    );
}

#[test]
fn test_constant_assignment_outranks_illegal_literal() {
    assert_eq!(
        in_main("int[2] a := {1, true}; final int c := 1; c := 2;"),
        "CannotAssignToConstant(c:=2)"
    );
    assert_eq!(
        in_main("final int c := 1; c := 2; int[2] a := {1, true};"),
        "CannotAssignToConstant(c:=2)"
    );
}

#[test]
fn test_any_violation_outranks_missing_entry_point() {
    assert_eq!(verdict("class A { void f() { break; } }"), "MustInLoop(break)");
}

#[test]
fn test_constant_type_outranks_constant_expression() {
    assert_eq!(
        in_main("int y := 1; final float z := y;"),
        "IllegalConstantExpression(y)"
    );
    assert_eq!(
        in_main("int y := 1; final int z := 1.5 * y;"),
        "TypeMismatchInConstant(final int z:=1.5 * y)"
    );
}

#[test]
fn test_earliest_violation_wins_within_priority() {
    assert_eq!(
        in_main("int a := \"x\"; float b := true;"),
        "TypeMismatchInStatement(int a:=\"x\")"
    );
    let source = "class A { void f() { break; } } \
                  class B { void g() { boolean b := 1; } } \
                  class C { void h() { int i := true; } }";
    assert_eq!(verdict(source), "TypeMismatchInStatement(boolean b:=1)");
}

#[test]
fn test_class_table_violation_ends_the_run() {
    let source = "class A { void f() { int x := \"s\"; } void f() {} }";
    assert_eq!(verdict(source), "Redeclared(Method, f)");
}

#[test]
fn test_verdict_is_deterministic() {
    let source = "class A { static int n; void f() { break; int x := 1.5; } } \
                  class B extends A { void g() { final int k := 1; k := 2; } }";
    let first = verdict(source);
    for _ in 0..5 {
        assert_eq!(verdict(source), first);
    }
    assert_eq!(first, "TypeMismatchInStatement(int x:=1.5)");
}

// =============================================================================
// Declarations and scopes
// =============================================================================

#[test]
fn test_block_scope_is_restored() {
    assert_eq!(in_main("{ int tmp := 1; } tmp := 2;"), "UndeclaredIdentifier(tmp)");
    assert_eq!(in_main("for i := 0 to 3 do {} i := 1;"), "UndeclaredIdentifier(i)");
}

#[test]
fn test_shadowing_is_legal() {
    assert_eq!(in_main("int x := 1; { float x := 2.0; { string x := \"s\"; } }"), PASSED);
}

#[test]
fn test_redeclared_constant_label() {
    assert_eq!(in_main("int x := 1; final int x := 2;"), "Redeclared(Constant, x)");
}

#[test]
fn test_parameters() {
    let params = "class T { void f(int a; float a) {} static void main() {} }";
    assert_eq!(verdict(params), "Redeclared(Parameter, a)");

    let local = "class T { void f(int a) { int a := 1; } static void main() {} }";
    assert_eq!(verdict(local), "Redeclared(Variable, a)");

    let assign = "class T { void f(int a) { a := 2; } static void main() {} }";
    assert_eq!(verdict(assign), "CannotAssignToConstant(a:=2)");

    let by_ref = "class T { void f(int& a) { a := 2; } static void main() {} }";
    assert_eq!(verdict(by_ref), PASSED);
}

#[test]
fn test_reference_bindings() {
    assert_eq!(in_main("int x := 10; int& r := x; r := 3;"), PASSED);
    assert_eq!(
        in_main("int x := 10; float& r := x;"),
        "TypeMismatchInStatement(float& r:=x)"
    );
    assert_eq!(in_main("float y := 1.0; float& r := y; r := 2;"), PASSED);

    let widened = "class T { void f(float& a) {} \
                   void g() { int n := 1; this.f(n); } static void main() {} }";
    assert_eq!(verdict(widened), "TypeMismatchInExpression(this.f(n))");
}

#[test]
fn test_read_before_assignment_is_fine() {
    assert_eq!(in_main("int x; int y := x + 1;"), PASSED);
}

#[test]
fn test_undeclared_class_in_types() {
    assert_eq!(in_main("Ghost g;"), "UndeclaredClass(Ghost)");
    assert_eq!(
        verdict("class T { void f(Ghost g) {} static void main() {} }"),
        "UndeclaredClass(Ghost)"
    );
    assert_eq!(
        verdict("class T { Ghost[2] gs; static void main() {} }"),
        "UndeclaredClass(Ghost)"
    );
    assert_eq!(in_main("T t := new Ghost();"), "UndeclaredClass(Ghost)");
}

#[test]
fn test_misnamed_constructor_and_destructor() {
    assert_eq!(
        verdict("class A { B() {} static void main() {} }"),
        "TypeMismatchInStatement(B() {})"
    );
    assert_eq!(
        verdict("class A { ~B() {} static void main() {} }"),
        "TypeMismatchInStatement(~B() {})"
    );
}

#[test]
fn test_attribute_initializers() {
    assert_eq!(
        verdict("class T { int a := \"s\"; static void main() {} }"),
        "TypeMismatchInStatement(int a:=\"s\")"
    );
    assert_eq!(
        verdict("class T { final int a := 1.2; static void main() {} }"),
        "TypeMismatchInConstant(final int a:=1.2)"
    );
    assert_eq!(
        verdict("class T { int a := 1; final int b := a; static void main() {} }"),
        "IllegalConstantExpression(a)"
    );
    assert_eq!(in_main("final T t := nil;"), "IllegalConstantExpression(nil)");
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn test_operator_mismatches() {
    assert_eq!(in_main("int x := 1 + \"s\";"), "TypeMismatchInExpression(1 + \"s\")");
    assert_eq!(in_main("boolean b := -true;"), "TypeMismatchInExpression(-true)");
    assert_eq!(in_main("string s := \"a\" ^ 1;"), "TypeMismatchInExpression(\"a\" ^ 1)");
    assert_eq!(
        in_main("int i := 1; boolean b := i == nil;"),
        "TypeMismatchInExpression(i == nil)"
    );
    assert_eq!(
        in_main("boolean b := 1 < 2 && 3;"),
        "TypeMismatchInExpression(1 < 2 && 3)"
    );
}

#[test]
fn test_numeric_results() {
    assert_eq!(in_main("float f := 1 + 2.5; int i := 7 \\ 2 % 3; boolean b := 1 < 2.0;"), PASSED);
    assert_eq!(in_main("int i := 1 + 2.5;"), "TypeMismatchInStatement(int i:=1 + 2.5)");
}

#[test]
fn test_array_access() {
    assert_eq!(
        in_main("int[3] a; int v := a[true];"),
        "TypeMismatchInExpression(a[true])"
    );
    assert_eq!(
        in_main("int a := 1; int v := a[0];"),
        "TypeMismatchInExpression(a[0])"
    );
    assert_eq!(in_main("float[2] a; float v := a[1] * 2;"), PASSED);
}

#[test]
fn test_array_literals() {
    assert_eq!(in_main("int[3] a := {1, 2.0, 3};"), "IllegalArrayLiteral({1, 2.0, 3})");
    assert_eq!(in_main("T[2] xs := {nil, nil};"), "IllegalArrayLiteral({nil, nil})");
    assert_eq!(in_main("T[2] xs := {new T(), nil};"), PASSED);
    assert_eq!(
        in_main("int[3] a := {1, 2};"),
        "TypeMismatchInStatement(int[3] a:={1, 2})"
    );
}

#[test]
fn test_void_call_in_value_position() {
    let source = "class A { void f() {} } \
                  class T { static void main() { A a := new A(); int x := a.f(); } }";
    assert_eq!(verdict(source), "TypeMismatchInExpression(a.f())");
}

#[test]
fn test_discarded_result_is_fine() {
    assert_eq!(in_main("io.readInt();"), PASSED);
}

#[test]
fn test_call_arguments() {
    assert_eq!(in_main("io.writeInt(1, 2);"), "TypeMismatchInExpression(io.writeInt(1, 2))");
    assert_eq!(in_main("io.writeInt(1.5);"), "TypeMismatchInExpression(io.writeInt(1.5))");
    assert_eq!(in_main("io.writeFloat(1);"), PASSED);
    assert_eq!(in_main("io.print(1);"), "UndeclaredMethod(print)");
}

#[test]
fn test_io_facility() {
    let body = "int n := io.readInt(); io.writeIntLn(n); \
                io.writeStrLn(\"x\" ^ io.readString()); io.writeFloatLn(io.readFloat());";
    assert_eq!(in_main(body), PASSED);
    assert_eq!(in_main("io := nil;"), "CannotAssignToConstant(io:=nil)");
}

#[test]
fn test_constructor_arguments() {
    let classes = "class P { P(int x) {} } class A {} ";
    let with = |body: &str| {
        verdict(&format!("{}class T {{ static void main() {{ {} }} }}", classes, body))
    };
    assert_eq!(with("P p := new P(1);"), PASSED);
    assert_eq!(with("P p := new P(1.5);"), "TypeMismatchInExpression(new P(1.5))");
    assert_eq!(with("P p := new P();"), "TypeMismatchInExpression(new P())");
    assert_eq!(with("A a := new A(1);"), "TypeMismatchInExpression(new A(1))");
}

#[test]
fn test_subtype_assignment() {
    let classes = "class A {} class B extends A {} class C extends B {} ";
    let with = |body: &str| {
        verdict(&format!("{}class T {{ static void main() {{ {} }} }}", classes, body))
    };
    assert_eq!(with("A a := new C(); B b := new C(); a := b;"), PASSED);
    assert_eq!(with("B b := new A();"), "TypeMismatchInStatement(B b:=new A())");
    assert_eq!(with("A[2] xs; B[2] ys; xs := ys;"), "TypeMismatchInStatement(xs:=ys)");
}

#[test]
fn test_class_name_is_not_a_value() {
    assert_eq!(in_main("T t := T;"), "TypeMismatchInStatement(T t:=T)");
}

// =============================================================================
// Member access
// =============================================================================

#[test]
fn test_static_and_instance_access() {
    let classes = "class A { static int count; int v; static int twice(int x) { return x * 2; } void bump() {} } ";
    let with = |body: &str| {
        verdict(&format!("{}class T {{ static void main() {{ {} }} }}", classes, body))
    };
    assert_eq!(with("int r := A.twice(3) + A.count; A a := new A(); a.bump();"), PASSED);
    assert_eq!(with("A a := new A(); int c := a.count;"), "IllegalMemberAccess(a.count)");
    assert_eq!(with("int c := A.v;"), "IllegalMemberAccess(A.v)");
    assert_eq!(with("A.bump();"), "IllegalMemberAccess(A.bump())");
    assert_eq!(with("A a := new A(); int r := a.twice(1);"), "IllegalMemberAccess(a.twice(1))");
    assert_eq!(with("A a := new A(); int v := a.missing;"), "UndeclaredAttribute(missing)");
}

#[test]
fn test_inherited_members() {
    let source = "class Base { int v; int get() { return this.v; } } \
                  class Derived extends Base { int twice() { return this.get() * 2 + v; } } \
                  class T { static void main() { Derived d := new Derived(); int x := d.v + d.twice(); } }";
    assert_eq!(verdict(source), PASSED);
}

#[test]
fn test_this_in_static_contexts() {
    assert_eq!(in_main("T t := this;"), "IllegalMemberAccess(this)");
    assert_eq!(
        verdict("class T { int v := 1; static int w := this.v; static void main() {} }"),
        "IllegalMemberAccess(this)"
    );
    assert_eq!(
        verdict("class T { static int PI; void f() { int x := this.PI; } static void main() {} }"),
        "IllegalMemberAccess(this.PI)"
    );
}

#[test]
fn test_access_on_non_object() {
    assert_eq!(in_main("int x := 1; int y := x.f;"), "TypeMismatchInExpression(x.f)");
}

#[test]
fn test_bare_attribute_in_static_method() {
    assert_eq!(verdict("class T { int count; static void main() { count := 1; } }"), PASSED);
}

#[test]
fn test_cyclic_inheritance_does_not_hang() {
    let source = "class A extends B {} class B extends A {} \
                  class T { static void main() { A a; int x := a.foo; } }";
    assert_eq!(verdict(source), "UndeclaredAttribute(foo)");
}

// =============================================================================
// Final attributes
// =============================================================================

#[test]
fn test_final_attribute_set_once_in_constructor() {
    let source = "class P { final int id; P(int v) { this.id := v; } static void main() {} }";
    assert_eq!(verdict(source), PASSED);
}

#[test]
fn test_final_attribute_violations() {
    let twice = "class P { final int id; P(int v) { this.id := v; this.id := 2; } static void main() {} }";
    assert_eq!(verdict(twice), "CannotAssignToConstant(this.id:=2)");

    let in_method = "class P { final int id; void reset() { this.id := 0; } static void main() {} }";
    assert_eq!(verdict(in_method), "CannotAssignToConstant(this.id:=0)");

    let initialized = "class P { final int id := 1; P() { this.id := 2; } static void main() {} }";
    assert_eq!(verdict(initialized), "CannotAssignToConstant(this.id:=2)");

    let bare = "class P { final int id; P(int v) { id := v; } static void main() {} }";
    assert_eq!(verdict(bare), "CannotAssignToConstant(id:=v)");

    let inherited = "class Base { final int id; } \
                     class Child extends Base { Child() { this.id := 1; } static void main() {} }";
    assert_eq!(verdict(inherited), "CannotAssignToConstant(this.id:=1)");
}

#[test]
fn test_final_array_elements_are_writable() {
    assert_eq!(in_main("final int[2] xs := {1, 2}; xs[0] := 5;"), PASSED);
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn test_if_condition() {
    assert_eq!(in_main("if 1 then return;"), "TypeMismatchInStatement(if 1 then return)");
    assert_eq!(in_main("if 1 < 2 then return; else { int x := 1; }"), PASSED);
}

#[test]
fn test_for_loops() {
    assert_eq!(
        in_main("for i := 10 downto 1 do { if i == 5 then break; else continue; }"),
        PASSED
    );
    assert_eq!(
        in_main("float f := 0.0; for f := 0 to 10 do io.writeFloat(f);"),
        "TypeMismatchInStatement(for f:=0 to 10 do io.writeFloat(f))"
    );
    assert_eq!(
        in_main("for i := 0 to \"end\" do break;"),
        "TypeMismatchInStatement(for i:=0 to \"end\" do break)"
    );
    assert_eq!(
        in_main("final int lim := 5; for lim := 0 to 3 do break;"),
        "CannotAssignToConstant(for lim:=0 to 3 do break)"
    );
    assert_eq!(in_main("for i := 0 to 3 do {} break;"), "MustInLoop(break)");
}

#[test]
fn test_for_over_final_attribute() {
    let source = "class T { final int limit := 3; \
                  void m() { for limit := 0 to 20 do io.writeInt(limit); } \
                  static void main() {} }";
    assert_eq!(
        verdict(source),
        "CannotAssignToConstant(for limit:=0 to 20 do io.writeInt(limit))"
    );
}

#[test]
fn test_returns() {
    let with = |member: &str| verdict(&format!("class T {{ {} static void main() {{}} }}", member));
    assert_eq!(with("int f() { return; }"), "TypeMismatchInStatement(return)");
    assert_eq!(with("void g() { return 1; }"), "TypeMismatchInStatement(return 1)");
    assert_eq!(with("T h() { return nil; }"), PASSED);
    assert_eq!(with("int k() { return nil; }"), "TypeMismatchInStatement(return nil)");
    assert_eq!(with("float w() { return 1; }"), PASSED);
    assert_eq!(with("T() { return 1; }"), "TypeMismatchInStatement(return 1)");
}

#[test]
fn test_assignment_types() {
    assert_eq!(in_main("int x := 1; x := 2.5;"), "TypeMismatchInStatement(x:=2.5)");
    assert_eq!(in_main("float x := 1; x := 2;"), PASSED);
    assert_eq!(
        in_main("int[2] a; a[1] := 4.5;"),
        "TypeMismatchInStatement(a[1]:=4.5)"
    );
}
