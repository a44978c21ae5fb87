//! Rule catalog: the built-in Checkstyle rules plus the validated, read-only
//! `Catalog` that decks, option sets and reference search draw from.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Category, CategoryFilter, RuleRecord};
use crate::error::CatalogError;
use crate::util::contains_ignore_case;

/// Ordered, immutable collection of rules with unique names.
#[derive(Debug)]
pub struct Catalog {
  rules: Vec<Arc<RuleRecord>>,
}

/// One entry of the category listing shown before a quiz starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
  pub id: String,
  pub label: String,
  pub count: usize,
}

impl Catalog {
  /// Validate and freeze a list of rules. Order is preserved.
  pub fn new(rules: Vec<RuleRecord>) -> Result<Self, CatalogError> {
    if rules.is_empty() {
      return Err(CatalogError::Empty);
    }
    let mut seen = HashSet::new();
    for r in &rules {
      if r.name.trim().is_empty() {
        return Err(CatalogError::BlankName);
      }
      if !seen.insert(r.name.as_str()) {
        return Err(CatalogError::DuplicateName(r.name.clone()));
      }
    }
    Ok(Self { rules: rules.into_iter().map(Arc::new).collect() })
  }

  /// Catalog made only of the built-in rules.
  #[allow(dead_code)]
  pub fn builtin() -> Result<Self, CatalogError> {
    Self::new(builtin_rules())
  }

  pub fn rules(&self) -> &[Arc<RuleRecord>] {
    &self.rules
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn get(&self, name: &str) -> Option<&Arc<RuleRecord>> {
    self.rules.iter().find(|r| r.name == name)
  }

  /// Rules matching the filter, in catalog order.
  pub fn filtered<'a>(&'a self, filter: &'a CategoryFilter) -> impl Iterator<Item = &'a Arc<RuleRecord>> + 'a {
    self.rules.iter().filter(move |r| filter.matches(r.category))
  }

  /// `all` first, then every category in declaration order with its rule count.
  pub fn categories(&self) -> Vec<CategoryCount> {
    let mut out = vec![CategoryCount {
      id: CategoryFilter::ALL_ID.into(),
      label: "All Rules".into(),
      count: self.rules.len(),
    }];
    for c in Category::ALL {
      out.push(CategoryCount {
        id: c.as_str().into(),
        label: c.as_str().into(),
        count: self.rules.iter().filter(|r| r.category == c).count(),
      });
    }
    out
  }

  /// Reference search: category filter, then a case-insensitive match of
  /// `term` against name, what-it-checks and where-used. Blank term keeps all.
  pub fn search(&self, filter: &CategoryFilter, term: &str) -> Vec<Arc<RuleRecord>> {
    let term = term.trim();
    self
      .filtered(filter)
      .filter(|r| {
        term.is_empty()
          || contains_ignore_case(&r.name, term)
          || contains_ignore_case(&r.what_it_checks, term)
          || contains_ignore_case(&r.where_used, term)
      })
      .cloned()
      .collect()
  }
}

fn rule(
  name: &str,
  category: Category,
  where_used: &str,
  what_it_checks: &str,
  why_it_matters: &str,
  common_violation: &str,
  correct_usage: &str,
) -> RuleRecord {
  RuleRecord {
    name: name.into(),
    category,
    where_used: where_used.into(),
    what_it_checks: what_it_checks.into(),
    why_it_matters: why_it_matters.into(),
    common_violation: common_violation.into(),
    correct_usage: correct_usage.into(),
  }
}

/// The course's Checkstyle rule set.
pub fn builtin_rules() -> Vec<RuleRecord> {
  vec![
    // Class-Level
    rule(
      "VisibilityModifier",
      Category::ClassLevel,
      "Class Members",
      "Ensures proper visibility of class members. By default, fields should be private. Only static final or truly immutable fields may be public.",
      "Enforces good encapsulation; hides implementation details; reduces external dependencies.",
      "int field1; // violation, must have a visibility modifier",
      "private int myPrivateField1;",
    ),
    rule(
      "FinalClass",
      Category::ClassLevel,
      "Class Declaration",
      "Ensures that classes that can be effectively final are marked as such (e.g., classes with only private constructors).",
      "Prevents unnecessary or unsafe subclassing; signals design intent.",
      "class B { private B() {} } // violation, should be final",
      "final class A { private A() {} }",
    ),
    rule(
      "HideUtilityClassConstructor",
      Category::ClassLevel,
      "Utility Classes",
      "Utility classes (those with only static members) should have a private constructor to prevent instantiation.",
      "Prevents meaningless instantiation; clarifies design intent.",
      "class Test { public Test() {} public static void fun() {} }",
      "class Foo { private Foo() {} static int n; }",
    ),
    rule(
      "DesignForExtension",
      Category::ClassLevel,
      "Class Methods",
      "Checks that overridable methods in non-final classes are either abstract or have an empty implementation (hook).",
      "Protects superclasses from being broken by subclasses and forces a clear extension contract.",
      "protected void validate() { if (roots == null) throw new ...; }",
      "private void validate() { validateEx(); } protected void validateEx() {}",
    ),
    rule(
      "AbstractClassName",
      Category::ClassLevel,
      "Abstract Class Declaration",
      "Ensures abstract class names conform to a pattern, typically starting with \"Abstract\".",
      "Improves readability by making abstract base classes easily identifiable.",
      "abstract class Second {} // violation",
      "abstract class AbstractFirst {}",
    ),
    rule(
      "InterfaceIsType",
      Category::ClassLevel,
      "Interface Declaration",
      "Ensures an interface defines a type by having methods, not just constants.",
      "Follows the principle that interfaces should define behavior (types), not just be constant holders.",
      "interface Test1 { int a = 3; } // no methods",
      "interface Test3 { int a = 3; void test(); }",
    ),
    rule(
      "ClassDataAbstractionCoupling",
      Category::ClassLevel,
      "Class Body",
      "Measures the number of other classes instantiated within a given class, indicating coupling.",
      "High coupling makes a class harder to maintain and test, as it depends on many other types.",
      "Too many different class instantiations in one class",
      "Limited number of class dependencies",
    ),
    rule(
      "ClassFanOutComplexity",
      Category::ClassLevel,
      "Class Dependencies",
      "Counts the number of other types a class relies on (imports, fields, etc.).",
      "High fan-out indicates high coupling, making the class brittle and hard to maintain.",
      "Class with too many imports and dependencies",
      "Class with focused, limited dependencies",
    ),
    rule(
      "AvoidStarImport",
      Category::ClassLevel,
      "Import Statements",
      "Checks that there are no import statements that use the * notation.",
      "Star imports can pull in unexpected classes, lead to naming conflicts, and obscure dependencies.",
      "import java.util.*; // violation",
      "import java.util.List; import java.util.ArrayList;",
    ),
    rule(
      "MissingCtor",
      Category::ClassLevel,
      "Class Declaration",
      "Checks that non-abstract classes define a constructor instead of relying on the default one.",
      "Ensures that object creation is an explicit, considered action.",
      "class InvalidExample { public void test() {} }",
      "class ExampleOk { ExampleOk(int a) { ... } }",
    ),
    rule(
      "InnerTypeLast",
      Category::ClassLevel,
      "Class Body",
      "Ensures nested classes/interfaces are declared at the bottom of the class.",
      "Improves readability by placing primary class members (fields, constructors, methods) first.",
      "Method declared after inner class",
      "Inner classes at the bottom of the class",
    ),

    // Method-Level
    rule(
      "MethodName",
      Category::MethodLevel,
      "Method Declarations",
      "Method names should follow camelCase convention, starting with a lowercase letter.",
      "Consistency in naming improves readability; follows Java conventions.",
      "public void Method3() {} // starts with uppercase",
      "public void method1() {}",
    ),
    rule(
      "MethodLength",
      Category::MethodLevel,
      "Method Body",
      "Methods should not exceed a maximum number of lines.",
      "Long methods are harder to understand, test, and maintain; encourages refactoring.",
      "Method with too many lines of code",
      "Concise, focused methods",
    ),
    rule(
      "FinalParameters",
      Category::MethodLevel,
      "Method Parameters",
      "Method, constructor, and catch block parameters should be declared final.",
      "Prevents accidental parameter modification and improves code clarity.",
      "public void methodTwo(int x) { } // x should be final",
      "public void methodOne(final int x) { }",
    ),
    rule(
      "ParameterNumber",
      Category::MethodLevel,
      "Method & Constructor Declaration",
      "Checks for a maximum number of parameters (default is 7).",
      "Methods with too many parameters can be a sign of poor cohesion and are hard to use.",
      "Method with more than 7 parameters",
      "Use parameter objects for numerous parameters",
    ),
    rule(
      "MethodTypeParameterName",
      Category::MethodLevel,
      "Generic Method Declaration",
      "Ensures generic type parameter names conform to a pattern (usually a single uppercase letter).",
      "Follows standard Java conventions for generics, improving readability.",
      "public <a> void method2() {} // should be uppercase",
      "public <T> void method1() {}",
    ),
    rule(
      "OverloadedMethodsDeclarationOrder",
      Category::MethodLevel,
      "Class Body",
      "Checks that overloaded methods are grouped together in the source file.",
      "Improves readability by keeping related methods physically close.",
      "Overloaded methods separated by other methods",
      "Overloaded methods grouped together",
    ),
    rule(
      "ReturnCount",
      Category::MethodLevel,
      "Method Body",
      "Restricts the number of return statements in a method.",
      "Promotes single-exit-point design, which can be easier to reason about and debug.",
      "Too many return statements in one method",
      "Limited return statements per method",
    ),
    rule(
      "RequireThis",
      Category::MethodLevel,
      "Method Body",
      "Checks that references to instance variables and methods use this. explicitly.",
      "Avoids ambiguity, especially when local variables or parameters shadow instance fields.",
      "c = c; // ambiguous assignment",
      "this.a = a; // this keyword used",
    ),

    // Variable-Level
    rule(
      "MemberName",
      Category::VariableLevel,
      "Instance Variables",
      "Instance variable names should follow camelCase, starting with a lowercase letter.",
      "Consistent naming improves code readability and maintainability.",
      "public int NUM1; // violation",
      "public int num1;",
    ),
    rule(
      "LocalVariableName",
      Category::VariableLevel,
      "Local Variables",
      "Local variable names should follow camelCase convention.",
      "Maintains consistency with Java naming conventions.",
      "for (int VAR = 1; VAR < 10; VAR++) { }",
      "for (int var = 1; var < 10; var++) {}",
    ),
    rule(
      "StaticVariableName",
      Category::VariableLevel,
      "Static Variables",
      "Static, non-final variable names should follow camelCase. Static final constants should be UPPER_SNAKE_CASE.",
      "Distinguishes between mutable static state and immutable constants.",
      "public static int ItStatic1 = 2; // should be camelCase",
      "public static int goodStatic = 2;",
    ),
    rule(
      "LocalFinalVariableName",
      Category::VariableLevel,
      "Local Final Variables",
      "Checks that local final variable names conform to a specified pattern (usually camelCase).",
      "Ensures consistent naming for all local variables, final or not.",
      "final int VAR1 = 5; // should be camelCase",
      "final int var1 = 10;",
    ),
    rule(
      "UnusedLocalVariable",
      Category::VariableLevel,
      "Method Body",
      "Finds local variables that are declared but never used.",
      "Removes dead code; improves readability; may indicate logic errors.",
      "int unusedVar = 10; // declared but never used",
      "Remove unused variables",
    ),
    rule(
      "MultipleVariableDeclarations",
      Category::VariableLevel,
      "Variable Declarations",
      "Checks that each variable is declared in its own statement.",
      "Improves readability and makes it easier to add comments for each variable.",
      "int lower, higher; // violation",
      "int lower; int higher;",
    ),
    rule(
      "ExplicitInitialization",
      Category::VariableLevel,
      "Variable Initialization",
      "Checks if variables are explicitly initialized to their type's default value.",
      "This is redundant as Java provides default initialization. Omitting it makes code cleaner.",
      "private int intField1 = 0; // violation",
      "private int intField3; // relies on default init",
    ),
    rule(
      "VariableDeclarationUsageDistance",
      Category::VariableLevel,
      "Method Body",
      "Checks the distance (in lines) between a variable's declaration and its first use.",
      "Minimizing scope makes code easier to understand and reduces the chance of bugs.",
      "Variable declared too far from its first use",
      "Declare variables close to where they are used",
    ),

    // Control-Flow
    rule(
      "ModifiedControlVariable",
      Category::ControlFlow,
      "for Loops",
      "Control variables in for loops should not be modified within the loop body.",
      "Prevents confusing loop behavior; makes loop bounds predictable and easy to understand.",
      "for (int i = 0; i < 10; i++) { i++; } // modifying control variable",
      "for (int i = 0; i < 10; i += 2) { } // modify in update clause",
    ),
    rule(
      "MissingSwitchDefault",
      Category::ControlFlow,
      "switch Statements",
      "All switch statements should have a default clause.",
      "Handles unexpected values; improves robustness; documents that all cases have been considered.",
      "switch statement without default clause",
      "switch (dayOfWeek) { case 1: return \"Monday\"; default: throw new ...; }",
    ),
    rule(
      "SimplifyBooleanExpression",
      Category::ControlFlow,
      "Boolean Expressions",
      "Finds boolean expressions that can be simplified.",
      "Improves readability; reduces complexity; eliminates redundancy.",
      "if (condition == true) { ... } // redundant == true",
      "if (condition) { ... } // simplified",
    ),
    rule(
      "SimplifyBooleanReturn",
      Category::ControlFlow,
      "Return Statements",
      "Finds if-else blocks that can be simplified to a single boolean return statement.",
      "Reduces code complexity and line count; improves readability.",
      "if (cond) { return true; } else { return false; }",
      "return cond;",
    ),
    rule(
      "DefaultComesLast",
      Category::ControlFlow,
      "switch Statements",
      "The default clause should be the last clause in switch statements.",
      "Follows conventional ordering; improves readability and predictability.",
      "default clause not at the end of switch",
      "default clause as the last case in switch",
    ),
    rule(
      "NeedBraces",
      Category::ControlFlow,
      "Control Flow Statements",
      "Ensures if, else, for, while, and do-while statements use curly braces {}.",
      "Prevents common bugs like the \"dangling else\" problem and improves code clarity.",
      "if (obj.equals(num)) return true; // violation",
      "if (obj.equals(num)) { return true; }",
    ),
    rule(
      "EmptyStatement",
      Category::ControlFlow,
      "Anywhere",
      "Detects empty statements (a standalone semicolon ;).",
      "Empty statements are often typos that create hard-to-find bugs.",
      "if(i > 3); // violation",
      "if(i > 3) { i++; }",
    ),
    rule(
      "EmptyBlock",
      Category::ControlFlow,
      "Any Block",
      "Checks for empty blocks {}.",
      "Empty blocks can indicate unfinished code or a logical error.",
      "if ( SomeTest ) { } // empty block",
      "if ( SomeTest ) { // do nothing, by design }",
    ),
    rule(
      "AvoidInlineConditionals",
      Category::ControlFlow,
      "Ternary Operator",
      "Detects inline conditional (ternary) operators.",
      "Complex ternaries can be very hard to read. A standard if-else is often clearer.",
      "b = (a != null && a.length() >= 1) ? a.substring(1) : null;",
      "Use if-else for better readability",
    ),
    rule(
      "BooleanExpressionComplexity",
      Category::ControlFlow,
      "Boolean Expressions",
      "Restricts the number of boolean operators in an expression.",
      "Overly complex conditions are hard to read, debug, and maintain.",
      "boolean d = (a & b) | (b ^ a) | (a ^ b); // too complex",
      "Break down complex boolean expressions",
    ),
    rule(
      "FallsThrough",
      Category::ControlFlow,
      "switch Statements",
      "Checks for fall-through in switch statements where a case lacks a break, return, etc.",
      "Accidental fall-through is a common source of bugs.",
      "case 1: i++; case 2: // fall through from case 1",
      "case 1: i++; // fall through (intentional comment)",
    ),
    rule(
      "NestedIfDepth",
      Category::ControlFlow,
      "if Statements",
      "Restricts the depth of nested if statements.",
      "Deeply nested logic is extremely difficult to follow and should be refactored.",
      "Too many nested if statements",
      "Refactor using helper methods or guard clauses",
    ),

    // Java-Specific
    rule(
      "MissingOverride",
      Category::JavaSpecific,
      "Method Declarations",
      "Verifies that the @Override annotation is present when a method overrides a superclass method.",
      "Prevents subtle bugs from typos in method signatures and clearly communicates intent.",
      "public void test2() { } // missing @Override",
      "@Override public void test1() { }",
    ),
    rule(
      "CovariantEquals",
      Category::JavaSpecific,
      "equals() Methods",
      "Classes that define a covariant equals(SomeType) should also override equals(Object).",
      "Ensures the equals contract is correctly implemented, preventing bugs when using collections.",
      "public boolean equals(Test i) { } // missing equals(Object)",
      "Override both equals(SomeType) and equals(Object)",
    ),
    rule(
      "EqualsHashCode",
      Category::JavaSpecific,
      "Class Definitions",
      "Classes that override equals() must also override hashCode().",
      "Maintains the equals-hashCode contract, essential for hash-based collections.",
      "Override equals() without overriding hashCode()",
      "Override both equals() and hashCode() together",
    ),
    rule(
      "SuperClone",
      Category::JavaSpecific,
      "clone() Method",
      "Checks that an overriding clone() method invokes super.clone().",
      "Ensures the cloning process is correctly chained up the inheritance hierarchy.",
      "clone() method not calling super.clone()",
      "public Object clone() { return super.clone(); }",
    ),
    rule(
      "SuperFinalize",
      Category::JavaSpecific,
      "finalize() Method",
      "Checks that an overriding finalize() method invokes super.finalize().",
      "Ensures that cleanup logic in all superclasses is executed correctly.",
      "finalize() method not calling super.finalize()",
      "protected void finalize() { super.finalize(); }",
    ),
  ]
}
