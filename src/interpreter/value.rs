use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::error::RuntimeError;

pub type EvalResult = Result<Value, RuntimeError>;

/// Runtime value representation
#[derive(Clone)]
pub enum Value {
    String(Rc<str>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    None,
    Array(Sequence),
    Function(Rc<Function>),
}

impl Value {
    pub fn string(value: impl AsRef<str>) -> Self {
        Value::String(Rc::from(value.as_ref()))
    }

    pub fn function(
        name: impl Into<String>,
        arity: usize,
        implementation: impl Fn(Vec<LazyValue>) -> EvalResult + 'static,
    ) -> Self {
        Value::Function(Rc::new(Function::new(name, arity, implementation)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Boolean",
            Value::None => "None",
            Value::Array(_) => "Array",
            Value::Function(_) => "Function",
        }
    }

    /// Booleans as they are, numbers when non-zero.
    pub fn truthy(&self, operation: &str) -> Result<bool, RuntimeError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(i) => Ok(*i != 0),
            Value::Float(f) => Ok(*f != 0.0),
            other => Err(RuntimeError::invalid(
                operation,
                format!("expected Boolean, found {}", other.type_name()),
            )),
        }
    }

    pub fn as_f64(&self, operation: &str) -> Result<f64, RuntimeError> {
        match self {
            Value::Integer(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            other => Err(RuntimeError::invalid(
                operation,
                format!("expected a number, found {}", other.type_name()),
            )),
        }
    }

    pub fn as_i64(&self, operation: &str) -> Result<i64, RuntimeError> {
        match self {
            Value::Integer(i) => Ok(*i),
            other => Err(RuntimeError::invalid(
                operation,
                format!("expected Integer, found {}", other.type_name()),
            )),
        }
    }

    pub fn as_str(&self, operation: &str) -> Result<Rc<str>, RuntimeError> {
        match self {
            Value::String(s) => Ok(Rc::clone(s)),
            other => Err(RuntimeError::invalid(
                operation,
                format!("expected String, found {}", other.type_name()),
            )),
        }
    }

    pub fn as_sequence(&self, operation: &str) -> Result<Sequence, RuntimeError> {
        match self {
            Value::Array(sequence) => Ok(sequence.clone()),
            other => Err(RuntimeError::invalid(
                operation,
                format!("expected Array, found {}", other.type_name()),
            )),
        }
    }

    pub fn as_function(&self) -> Result<Rc<Function>, RuntimeError> {
        match self {
            Value::Function(function) => Ok(Rc::clone(function)),
            other => Err(RuntimeError::NotAFunction {
                found: other.type_name().to_string(),
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Integer(i) => write!(f, "Integer({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::None => write!(f, "None"),
            Value::Array(_) => write!(f, "Array(..)"),
            Value::Function(function) => write!(f, "Function({})", function.name),
        }
    }
}

// === Lazy values ===

type Thunk = Box<dyn FnOnce() -> EvalResult>;

enum LazyState {
    Pending(Thunk),
    Forcing,
    Done(EvalResult),
}

/// A deferred computation, run at most once.
///
/// Clones share the same cell, so forcing one clone forces all of them.
#[derive(Clone)]
pub struct LazyValue(Rc<RefCell<LazyState>>);

impl LazyValue {
    pub fn new(thunk: impl FnOnce() -> EvalResult + 'static) -> Self {
        LazyValue(Rc::new(RefCell::new(LazyState::Pending(Box::new(thunk)))))
    }

    pub fn from_value(value: Value) -> Self {
        LazyValue(Rc::new(RefCell::new(LazyState::Done(Ok(value)))))
    }

    pub fn failed(err: RuntimeError) -> Self {
        LazyValue(Rc::new(RefCell::new(LazyState::Done(Err(err)))))
    }

    pub fn is_forced(&self) -> bool {
        matches!(&*self.0.borrow(), LazyState::Done(_))
    }

    pub fn force(&self) -> EvalResult {
        match &*self.0.borrow() {
            LazyState::Done(result) => return result.clone(),
            LazyState::Forcing => return Err(RuntimeError::CyclicEvaluation),
            LazyState::Pending(_) => {}
        }

        let state = std::mem::replace(&mut *self.0.borrow_mut(), LazyState::Forcing);
        let LazyState::Pending(thunk) = state else {
            return Err(RuntimeError::CyclicEvaluation);
        };

        tracing::trace!("forcing lazy value");
        let result = thunk();
        *self.0.borrow_mut() = LazyState::Done(result.clone());
        result
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0.borrow() {
            LazyState::Done(Ok(value)) => write!(f, "Lazy({value:?})"),
            LazyState::Done(Err(err)) => write!(f, "Lazy(error: {err})"),
            LazyState::Pending(_) | LazyState::Forcing => write!(f, "Lazy(..)"),
        }
    }
}

// === Sequences ===

pub type Elements = Box<dyn Iterator<Item = Result<LazyValue, RuntimeError>>>;

/// The backing store of an array value.
///
/// A sequence is re-enterable: every call to [`Sequence::iter`] derives a
/// fresh iterator from the source, so an array can be traversed any number
/// of times. Sequences may be infinite; consumers stop pulling when they
/// have seen enough.
#[derive(Clone)]
pub struct Sequence(Rc<dyn Fn() -> Elements>);

impl Sequence {
    pub fn new(factory: impl Fn() -> Elements + 'static) -> Self {
        Sequence(Rc::new(factory))
    }

    pub fn empty() -> Self {
        Sequence::new(|| Box::new(std::iter::empty()))
    }

    pub fn from_values(values: Vec<LazyValue>) -> Self {
        let values: Rc<[LazyValue]> = values.into();
        Sequence::new(move || {
            let values = Rc::clone(&values);
            Box::new((0..values.len()).map(move |index| Ok(values[index].clone())))
        })
    }

    pub fn iter(&self) -> Elements {
        (self.0)()
    }

    /// Drain the whole sequence. Does not return for infinite sequences.
    pub fn to_vec(&self) -> Result<Vec<LazyValue>, RuntimeError> {
        self.iter().collect()
    }
}

// === Functions ===

pub type Implementation = Rc<dyn Fn(Vec<LazyValue>) -> EvalResult>;

/// A curried function value.
///
/// Each parameter is a slot. Applying arguments fills the open slots from
/// left to right (a `None` argument leaves its slot open). Once every slot
/// is filled the implementation runs; until then applying yields a new
/// function holding the arguments supplied so far.
pub struct Function {
    pub name: String,
    slots: Vec<Option<LazyValue>>,
    implementation: Implementation,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        implementation: impl Fn(Vec<LazyValue>) -> EvalResult + 'static,
    ) -> Self {
        Function {
            name: name.into(),
            slots: vec![None; arity],
            implementation: Rc::new(implementation),
        }
    }

    /// Number of slots still open.
    pub fn arity(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn apply(&self, args: Vec<Option<LazyValue>>) -> EvalResult {
        let open = self.arity();
        if args.len() > open {
            return Err(RuntimeError::TooManyArguments {
                name: self.name.clone(),
                expected: open,
                found: args.len(),
            });
        }

        let mut slots = self.slots.clone();
        let mut args = args.into_iter();
        for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
            match args.next() {
                Some(arg) => *slot = arg,
                None => break,
            }
        }

        if slots.iter().all(Option::is_some) {
            tracing::trace!(function = %self.name, "applying function");
            (self.implementation)(slots.into_iter().flatten().collect())
        } else {
            Ok(Value::Function(Rc::new(Function {
                name: self.name.clone(),
                slots,
                implementation: Rc::clone(&self.implementation),
            })))
        }
    }

    /// Apply fully evaluated arguments.
    pub fn call(&self, args: Vec<LazyValue>) -> EvalResult {
        self.apply(args.into_iter().map(Some).collect())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("open", &self.arity())
            .finish()
    }
}
