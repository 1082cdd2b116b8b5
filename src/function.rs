use std::cell::RefCell;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Signal};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::Stmt;
use crate::token::Token;

/// A user-defined function or method, carrying the environment it closed
/// over at definition time.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Token,
    pub params: Rc<Vec<Token>>,
    pub body: Rc<Vec<Stmt>>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(
        name: Token,
        params: Rc<Vec<Token>>,
        body: Rc<Vec<Stmt>>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Function { name, params, body, closure, is_initializer }
    }

    /// Returns a new function whose closure defines `this` over the
    /// instance. This is how `this` resolves inside method bodies.
    pub fn bind(&self, instance: Object) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);

        Function {
            name: self.name.clone(),
            params: Rc::clone(&self.params),
            body: Rc::clone(&self.body),
            closure: Rc::new(RefCell::new(environment)),
            is_initializer: self.is_initializer,
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        let environment = Rc::new(RefCell::new(environment));

        match interpreter.execute_block(&self.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &Token::new(
                        crate::token::TokenKind::This,
                        "this".to_string(),
                        None,
                        self.name.line,
                    ))
                } else {
                    Ok(Object::from(Literal::Nil))
                }
            }
            Err(Signal::Return(value)) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &Token::new(
                        crate::token::TokenKind::This,
                        "this".to_string(),
                        None,
                        self.name.line,
                    ))
                } else {
                    Ok(value)
                }
            }
            Err(Signal::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}

/// A builtin implemented in Rust rather than Lox, e.g. `clock`.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl NativeFunction {
    /// The builtins installed into every interpreter's global scope.
    pub fn globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: "clock".to_string(),
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock to be after the unix epoch")
                        .as_secs_f64();
                    Ok(Object::from(now))
                },
            },
        ]
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn>")
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
