use std::rc::Rc;

use crate::interpreter::{Function, LazyValue, Value};

use super::{Library, fun, t, u, v};

/// `first` then `second`: the result applies `second` to `first(x)`.
fn pipeline(name: &str, first: Rc<Function>, second: Rc<Function>) -> Value {
    Value::function(name, 1, move |args| {
        let first = Rc::clone(&first);
        let input = args[0].clone();
        let intermediate = LazyValue::new(move || first.call(vec![input]));
        second.call(vec![intermediate])
    })
}

pub(super) fn register(library: &mut Library) {
    // (f . g)(x) == f(g(x))
    library.function(
        ".",
        fun(
            vec![fun(vec![u()], v()), fun(vec![t()], u())],
            fun(vec![t()], v()),
        ),
        |args| {
            let outer = args[0].force()?.as_function()?;
            let inner = args[1].force()?.as_function()?;
            Ok(pipeline(".", inner, outer))
        },
    );

    // (f & g)(x) == g(f(x))
    library.function(
        "&",
        fun(
            vec![fun(vec![t()], u()), fun(vec![u()], v())],
            fun(vec![t()], v()),
        ),
        |args| {
            let first = args[0].force()?.as_function()?;
            let second = args[1].force()?.as_function()?;
            Ok(pipeline("&", first, second))
        },
    );

    library.function("identity", fun(vec![t()], t()), |args| args[0].force());

    library.function("const", fun(vec![t(), u()], t()), |args| args[0].force());

    library.function(
        "flip",
        fun(
            vec![fun(vec![t(), u()], v())],
            fun(vec![u(), t()], v()),
        ),
        |args| {
            let function = args[0].force()?.as_function()?;
            Ok(Value::function("flip", 2, move |args| {
                function.call(vec![args[1].clone(), args[0].clone()])
            }))
        },
    );
}
