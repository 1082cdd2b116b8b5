use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Error, RuntimeError};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{Token, TokenKind};

/// Non-error control flow threaded through statement execution. `Return`
/// unwinds to the nearest enclosing call without ever setting an error flag;
/// `Error` carries an already-formed runtime error up to `interpret`.
pub enum Signal {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Self {
        Signal::Error(error)
    }
}

type EvalResult = Result<Object, Signal>;
type ExecResult = Result<(), Signal>;

/// Tree-walking evaluator. Owns the global scope and the current lexical
/// scope, and consults the resolver's depth table for every variable
/// reference instead of searching the environment chain.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    pub environment: Rc<RefCell<Environment>>,
    pub locals: HashMap<ExprId, usize>,
    pub output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::globals() {
            globals.borrow_mut().define(&native.name.clone(), Object::from(native));
        }

        Interpreter {
            globals: Rc::clone(&globals),
            environment: globals,
            locals: HashMap::new(),
            output,
        }
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {},
                Err(Signal::Error(error)) => {
                    error.throw();
                    return;
                },
                Err(Signal::Return(_)) => return,
            }
        }
    }

    /// Records that the expression occurrence `id` resolves `depth` scopes
    /// outward from wherever it is evaluated.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }

    fn lookup_variable(&mut self, id: ExprId, name: &Token) -> EvalResult {
        match self.locals.get(&id) {
            Some(&depth) => Ok(self.environment.borrow().get_at(depth, name)?),
            None => Ok(self.globals.borrow().get(name)?),
        }
    }

    fn is_equal(left: &Object, right: &Object) -> bool {
        left == right
    }

    fn check_number_operand(operator: &Token, operand: &Object) -> Result<f64, RuntimeError> {
        match operand {
            Object::Literal(Literal::Number(n)) => Ok(*n),
            _ => Err(RuntimeError {
                token: operator.clone(),
                message: format!("Operand must be a number, got {}", operand.type_str()),
            }),
        }
    }
}

impl ExprVisitor<EvalResult> for Interpreter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> EvalResult {
        Ok(Object::from(literal.clone()))
    }

    fn visit_logical_expr(&mut self, expr: &LogicalData) -> EvalResult {
        let left = self.evaluate(&expr.left)?;

        if expr.operator.kind == TokenKind::Or {
            if left.as_bool() {
                return Ok(left);
            }
        } else if !left.as_bool() {
            return Ok(left);
        }

        self.evaluate(&expr.right)
    }

    fn visit_unary_expr(&mut self, expr: &UnaryData) -> EvalResult {
        let right = self.evaluate(&expr.expr)?;

        match expr.operator.kind {
            TokenKind::Minus => {
                let n = Self::check_number_operand(&expr.operator, &right)?;
                Ok(Object::from(-n))
            },
            TokenKind::Bang => Ok(Object::from(!right.as_bool())),
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, expr: &BinaryData) -> EvalResult {
        let left = self.evaluate(&expr.left)?;
        let right = self.evaluate(&expr.right)?;

        match expr.operator.kind {
            TokenKind::EqualEqual => return Ok(Object::from(Self::is_equal(&left, &right))),
            TokenKind::BangEqual => return Ok(Object::from(!Self::is_equal(&left, &right))),
            _ => {},
        }

        match expr.operator.kind {
            TokenKind::Plus => match (&left, &right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => {
                    Ok(Object::from(l + r))
                },
                (Object::Literal(Literal::String(_)), _) | (_, Object::Literal(Literal::String(_))) => {
                    Ok(Object::from(format!("{left}{right}")))
                },
                _ => Err(RuntimeError {
                    token: expr.operator.clone(),
                    message: format!(
                        "Binary operation '+' is not supported between {} and {}",
                        left.type_str(), right.type_str()
                    ),
                }.into()),
            },
            TokenKind::Minus | TokenKind::Star | TokenKind::Slash
            | TokenKind::Greater | TokenKind::GreaterEqual
            | TokenKind::Less | TokenKind::LessEqual => {
                let (l, r) = match (Self::check_number_operand(&expr.operator, &left), Self::check_number_operand(&expr.operator, &right)) {
                    (Ok(l), Ok(r)) => (l, r),
                    _ => return Err(RuntimeError {
                        token: expr.operator.clone(),
                        message: format!(
                            "Binary operation '{}' is not supported between {} and {}",
                            expr.operator.lexeme, left.type_str(), right.type_str()
                        ),
                    }.into()),
                };

                match expr.operator.kind {
                    TokenKind::Minus => Ok(Object::from(l - r)),
                    TokenKind::Star => Ok(Object::from(l * r)),
                    TokenKind::Slash => {
                        if r == 0.0 {
                            Err(RuntimeError {
                                token: expr.operator.clone(),
                                message: "Division by zero".to_string(),
                            }.into())
                        } else {
                            Ok(Object::from(l / r))
                        }
                    },
                    TokenKind::Greater => Ok(Object::from(l > r)),
                    TokenKind::GreaterEqual => Ok(Object::from(l >= r)),
                    TokenKind::Less => Ok(Object::from(l < r)),
                    TokenKind::LessEqual => Ok(Object::from(l <= r)),
                    _ => unreachable!(),
                }
            },
            _ => unreachable!(),
        }
    }

    fn visit_grouping_expr(&mut self, expr: &GroupingData) -> EvalResult {
        self.evaluate(&expr.expr)
    }

    fn visit_variable_expr(&mut self, expr: &VariableData) -> EvalResult {
        self.lookup_variable(expr.id, &expr.name)
    }

    fn visit_assign_expr(&mut self, expr: &AssignData) -> EvalResult {
        let value = self.evaluate(&expr.value)?;

        match self.locals.get(&expr.id) {
            Some(&depth) => self.environment.borrow_mut().assign_at(depth, &expr.name, value.clone()),
            None => self.globals.borrow_mut().assign(&expr.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, expr: &CallData) -> EvalResult {
        let callee = self.evaluate(&expr.callee)?;

        let mut arguments = Vec::with_capacity(expr.arguments.len());
        for argument in &expr.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(function) => function.arity(),
            Object::Class(class) => class.borrow().arity(),
            _ => return Err(RuntimeError {
                token: expr.paren.clone(),
                message: format!("Can only call functions and classes, got {}", callee.type_str()),
            }.into()),
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: expr.paren.clone(),
                message: format!("Expected {arity} arguments but got {}", arguments.len()),
            }.into());
        }

        let result = match &callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(function) => function.call(self, arguments),
            Object::Class(class) => {
                let class = class.borrow();
                class.call(self, arguments)
            },
            _ => unreachable!(),
        };

        Ok(result?)
    }

    fn visit_get_expr(&mut self, expr: &GetData) -> EvalResult {
        let object = self.evaluate(&expr.object)?;

        if let Object::Instance(instance) = &object {
            Ok(instance.borrow().get(&expr.name, &object)?)
        } else {
            Err(RuntimeError {
                token: expr.name.clone(),
                message: "Only instances have properties".to_string(),
            }.into())
        }
    }

    fn visit_set_expr(&mut self, expr: &SetData) -> EvalResult {
        let object = self.evaluate(&expr.object)?;

        let Object::Instance(instance) = &object else {
            return Err(RuntimeError {
                token: expr.name.clone(),
                message: "Only instances have fields".to_string(),
            }.into());
        };

        let value = self.evaluate(&expr.value)?;
        instance.borrow_mut().set(&expr.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &ThisData) -> EvalResult {
        self.lookup_variable(expr.id, &expr.keyword)
    }

    fn visit_super_expr(&mut self, expr: &SuperData) -> EvalResult {
        let distance = *self.locals.get(&expr.id).expect("super to always be a resolved local");

        let superclass = self.environment.borrow().get_at(distance, &expr.keyword)?;
        let Object::Class(superclass) = superclass else { unreachable!("super always resolves to a class") };

        let this_token = Token::new(TokenKind::This, "this".to_string(), None, expr.keyword.line);
        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let method = superclass.borrow().find_method(&expr.method.lexeme).ok_or_else(|| RuntimeError {
            token: expr.method.clone(),
            message: format!("Undefined property '{}'", expr.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

impl StmtVisitor<ExecResult> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Print(data) = stmt else { unreachable!() };
        let value = self.evaluate(&data.expr)?;
        writeln!(self.output, "{value}").expect("output sink to accept writes");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Block(data) = stmt else { unreachable!() };
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, environment)
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.body)?;
        }

        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Function(data) = stmt else { unreachable!() };

        let function = Function::new(
            data.name.clone(),
            Rc::new(data.params.clone()),
            Rc::new(data.body.clone()),
            Rc::clone(&self.environment),
            false,
        );

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };

        Err(Signal::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let superclass = match &data.superclass {
            Some(expr) => {
                let evaluated = self.evaluate(expr)?;
                match evaluated {
                    Object::Class(class) => Some(class),
                    _ => {
                        let Expr::Variable(variable) = expr else { unreachable!() };
                        return Err(RuntimeError {
                            token: variable.name.clone(),
                            message: "Superclass must be a class".to_string(),
                        }.into());
                    },
                }
            },
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        if let Some(superclass) = &superclass {
            let mut environment = Environment::new(Some(Rc::clone(&self.environment)));
            environment.define("super", Object::from(Rc::clone(superclass)));
            self.environment = Rc::new(RefCell::new(environment));
        }

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(function_data) = method else { unreachable!() };
            let is_initializer = function_data.name.lexeme == "init";
            let function = Function::new(
                function_data.name.clone(),
                Rc::new(function_data.params.clone()),
                Rc::new(function_data.body.clone()),
                Rc::clone(&self.environment),
                is_initializer,
            );
            methods.insert(function_data.name.lexeme.clone(), function);
        }

        let class = Class::new(data.name.lexeme.clone(), superclass.clone(), methods);

        if superclass.is_some() {
            let enclosing = self.environment.borrow().enclosing.clone().expect("super scope to have a parent");
            self.environment = enclosing;
        }

        self.environment.borrow_mut().assign(&data.name, Object::from(Rc::new(RefCell::new(class))))?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(src: &str) -> String {
        let tokens = Scanner::new(src).scan_tokens();
        let statements = Parser::new(tokens).parse();

        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(Box::new(&mut output));
        {
            let mut resolver = Resolver::new(&mut interpreter);
            resolver.resolve(&statements);
        }
        interpreter.interpret(&statements);
        drop(interpreter);

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn arithmetic_and_print() {
        assert_eq!(run("print 1 + 2;"), "3\n");
    }

    #[test]
    fn string_concatenation_with_plus() {
        assert_eq!(run("print \"a\" + \"b\";"), "ab\n");
    }

    #[test]
    fn closures_capture_environment_by_reference() {
        let out = run("fun make() { var i = 0; fun c() { i = i + 1; return i; } return c; } var f = make(); print f(); print f();");
        assert_eq!(out, "1\n2\n");
    }

    #[test]
    fn recursion() {
        assert_eq!(run("fun fact(n) { if (n <= 1) return 1; return n * fact(n - 1); } print fact(5);"), "120\n");
    }

    #[test]
    fn class_init_and_method() {
        let out = run(r#"class Cake { init(f) { this.flavor = f; } taste() { return "Mmm, " + this.flavor + " cake!"; } } print Cake("chocolate").taste();"#);
        assert_eq!(out, "Mmm, chocolate cake!\n");
    }

    #[test]
    fn inheritance_with_super() {
        let out = run("class A { c() { print \"A\"; } } class B < A { c() { super.c(); print \"B\"; } } B().c();");
        assert_eq!(out, "A\nB\n");
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let out = run("print 1/0;");
        assert_eq!(out, "");
    }
}
