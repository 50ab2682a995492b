use std::cmp::Ordering;
use std::iter;
use std::rc::Rc;

use crate::interpreter::{Elements, EvalResult, LazyValue, RuntimeError, Sequence, Value};
use crate::types::{Type, make_union_type};

use super::arithmetic::{add, compare_numbers, multiply};
use super::{Library, array, fun, numeric, t, u, v, values_equal};

fn integers(values: impl Iterator<Item = i64> + 'static) -> Elements {
    Box::new(values.map(|i| Ok(LazyValue::from_value(Value::Integer(i)))))
}

fn failing(err: RuntimeError) -> Elements {
    Box::new(iter::once(Err(err)))
}

fn count_from(value: &Value, operation: &str) -> Result<usize, RuntimeError> {
    Ok(usize::try_from(value.as_i64(operation)?).unwrap_or(0))
}

fn optional_index(value: &Value, operation: &str) -> Result<Option<i64>, RuntimeError> {
    match value {
        Value::None => Ok(None),
        other => other.as_i64(operation).map(Some),
    }
}

fn element_or_none(element: Option<Result<LazyValue, RuntimeError>>) -> EvalResult {
    match element {
        Some(element) => element?.force(),
        None => Ok(Value::None),
    }
}

/// Element at `index`; negative indexes count from the end.
fn index(sequence: &Sequence, index: i64) -> EvalResult {
    match usize::try_from(index) {
        Ok(index) => element_or_none(sequence.iter().nth(index)),
        Err(_) => {
            let elements = sequence.to_vec()?;
            let from_end = index.unsigned_abs() as usize;
            match elements.len().checked_sub(from_end) {
                Some(position) => elements[position].force(),
                None => Ok(Value::None),
            }
        }
    }
}

/// Resolve slice bounds against a known length, clamping out-of-range
/// bounds. Returns the selected positions in order.
fn slice_positions(len: usize, start: Option<i64>, stop: Option<i64>, step: i64) -> Vec<usize> {
    let len = len as i64;
    let resolve = |bound: i64, low: i64, high: i64| {
        let bound = if bound < 0 { bound + len } else { bound };
        bound.clamp(low, high)
    };

    let mut positions = vec![];
    if step > 0 {
        let start = start.map_or(0, |s| resolve(s, 0, len));
        let stop = stop.map_or(len, |s| resolve(s, 0, len));
        let mut i = start;
        while i < stop {
            positions.push(i as usize);
            let Some(next) = i.checked_add(step) else {
                break;
            };
            i = next;
        }
    } else {
        let start = start.map_or(len - 1, |s| resolve(s, -1, len - 1));
        let stop = stop.map_or(-1, |s| resolve(s, -1, len - 1));
        let mut i = start;
        while i > stop {
            positions.push(i as usize);
            let Some(next) = i.checked_add(step) else {
                break;
            };
            i = next;
        }
    }
    positions
}

/// Slices with non-negative bounds and a positive step stay lazy, so they
/// also work on infinite arrays. Everything else drains the source first.
fn slice(source: Sequence, start: Option<i64>, stop: Option<i64>, step: i64) -> Sequence {
    let forward = step > 0 && start.is_none_or(|s| s >= 0) && stop.is_none_or(|s| s >= 0);
    if forward {
        let start = start.unwrap_or(0) as usize;
        let stop = stop.map(|s| s as usize);
        let step = step as usize;
        return Sequence::new(move || {
            let skipped = source.iter().skip(start);
            let bounded: Elements = match stop {
                Some(stop) => Box::new(skipped.take(stop.saturating_sub(start))),
                None => Box::new(skipped),
            };
            Box::new(bounded.step_by(step))
        });
    }

    Sequence::new(move || match source.to_vec() {
        Ok(elements) => {
            let selected: Vec<_> = slice_positions(elements.len(), start, stop, step)
                .into_iter()
                .map(|position| Ok(elements[position].clone()))
                .collect();
            Box::new(selected.into_iter())
        }
        Err(err) => failing(err),
    })
}

/// Reduce numbers with `op`, starting from `initial`.
fn reduce(sequence: &Sequence, initial: Value, op: fn(&Value, &Value) -> EvalResult) -> EvalResult {
    let mut accumulator = initial;
    for element in sequence.iter() {
        accumulator = op(&accumulator, &element?.force()?)?;
    }
    Ok(accumulator)
}

/// Smallest or largest element, depending on `wanted`.
fn extremum(name: &'static str, sequence: &Sequence, wanted: Ordering) -> EvalResult {
    let mut best: Option<Value> = None;
    for element in sequence.iter() {
        let value = element?.force()?;
        best = match best {
            Some(current) if compare_numbers(name, &value, &current)? != Some(wanted) => {
                Some(current)
            }
            _ => Some(value),
        };
    }
    best.ok_or_else(|| RuntimeError::empty_array(name))
}

fn register_generators(library: &mut Library) {
    library.function(
        "..",
        fun(vec![Type::Integer, Type::Integer], array(Type::Integer)),
        |args| {
            let start = args[0].force()?.as_i64("..")?;
            let end = args[1].force()?.as_i64("..")?;
            Ok(Value::Array(Sequence::new(move || integers(start..=end))))
        },
    );

    library.function(
        "range",
        fun(vec![Type::Integer, Type::Integer], array(Type::Integer)),
        |args| {
            let start = args[0].force()?.as_i64("range")?;
            let end = args[1].force()?.as_i64("range")?;
            Ok(Value::Array(Sequence::new(move || integers(start..end))))
        },
    );

    library.function("count", fun(vec![Type::Integer], array(Type::Integer)), |args| {
        let start = args[0].force()?.as_i64("count")?;
        Ok(Value::Array(Sequence::new(move || {
            integers(iter::successors(Some(start), |i| i.checked_add(1)))
        })))
    });

    library.function("repeat", fun(vec![t()], array(t())), |args| {
        let value = args[0].clone();
        Ok(Value::Array(Sequence::new(move || {
            Box::new(iter::repeat(value.clone()).map(Ok::<_, RuntimeError>))
        })))
    });

    library.function(
        "iterate",
        fun(vec![fun(vec![t()], t()), t()], array(t())),
        |args| {
            let function = args[0].force()?.as_function()?;
            let seed = args[1].clone();
            Ok(Value::Array(Sequence::new(move || {
                let function = Rc::clone(&function);
                // each element is forced before its successor is built, so
                // the thunk chain stays one level deep
                Box::new(iter::successors(
                    Some(Ok::<_, RuntimeError>(seed.clone())),
                    move |previous| {
                        let previous = previous.as_ref().ok()?;
                        if let Err(err) = previous.force() {
                            return Some(Err(err));
                        }
                        let function = Rc::clone(&function);
                        let previous = previous.clone();
                        Some(Ok(LazyValue::new(move || function.call(vec![previous]))))
                    },
                ))
            })))
        },
    );
}

fn register_access(library: &mut Library) {
    library.function("in", fun(vec![t(), array(t())], Type::Boolean), |args| {
        let needle = args[0].force()?;
        for element in args[1].force()?.as_sequence("in")?.iter() {
            if values_equal(&needle, &element?.force()?)? {
                return Ok(Value::Boolean(true));
            }
        }
        Ok(Value::Boolean(false))
    });

    library.function(
        "[]",
        fun(
            vec![array(t()), Type::Integer],
            make_union_type([t(), Type::None]),
        ),
        |args| {
            let sequence = args[0].force()?.as_sequence("[]")?;
            index(&sequence, args[1].force()?.as_i64("[]")?)
        },
    );

    let bound = make_union_type([Type::Integer, Type::None]);
    library.function(
        "[:]",
        fun(
            vec![array(t()), bound.clone(), bound.clone(), bound],
            array(t()),
        ),
        |args| {
            let source = args[0].force()?.as_sequence("[:]")?;
            let start = optional_index(&args[1].force()?, "[:]")?;
            let stop = optional_index(&args[2].force()?, "[:]")?;
            let step = optional_index(&args[3].force()?, "[:]")?.unwrap_or(1);
            if step == 0 {
                return Err(RuntimeError::invalid("[:]", "slice step cannot be zero"));
            }
            Ok(Value::Array(slice(source, start, stop, step)))
        },
    );

    library.function("length", fun(vec![array(t())], Type::Integer), |args| {
        let mut length = 0;
        for element in args[0].force()?.as_sequence("length")?.iter() {
            element?;
            length += 1;
        }
        Ok(Value::Integer(length))
    });

    library.function(
        "head",
        fun(vec![array(t())], make_union_type([t(), Type::None])),
        |args| {
            let sequence = args[0].force()?.as_sequence("head")?;
            element_or_none(sequence.iter().next())
        },
    );

    library.function("tail", fun(vec![array(t())], array(t())), |args| {
        let source = args[0].force()?.as_sequence("tail")?;
        Ok(Value::Array(Sequence::new(move || Box::new(source.iter().skip(1)))))
    });

    library.function(
        "take",
        fun(vec![Type::Integer, array(t())], array(t())),
        |args| {
            let n = count_from(&args[0].force()?, "take")?;
            let source = args[1].force()?.as_sequence("take")?;
            Ok(Value::Array(Sequence::new(move || Box::new(source.iter().take(n)))))
        },
    );

    library.function(
        "drop",
        fun(vec![Type::Integer, array(t())], array(t())),
        |args| {
            let n = count_from(&args[0].force()?, "drop")?;
            let source = args[1].force()?.as_sequence("drop")?;
            Ok(Value::Array(Sequence::new(move || Box::new(source.iter().skip(n)))))
        },
    );

    library.function("reverse", fun(vec![array(t())], array(t())), |args| {
        let source = args[0].force()?.as_sequence("reverse")?;
        Ok(Value::Array(Sequence::new(move || match source.to_vec() {
            Ok(mut elements) => {
                elements.reverse();
                Box::new(elements.into_iter().map(Ok::<_, RuntimeError>))
            }
            Err(err) => failing(err),
        })))
    });

    library.function(
        "concat",
        fun(vec![array(t()), array(t())], array(t())),
        |args| {
            let first = args[0].force()?.as_sequence("concat")?;
            let second = args[1].force()?.as_sequence("concat")?;
            Ok(Value::Array(Sequence::new(move || {
                Box::new(first.iter().chain(second.iter()))
            })))
        },
    );
}

fn register_combinators(library: &mut Library) {
    library.function(
        "map",
        fun(vec![fun(vec![t()], u()), array(t())], array(u())),
        |args| {
            let function = args[0].force()?.as_function()?;
            let source = args[1].force()?.as_sequence("map")?;
            Ok(Value::Array(Sequence::new(move || {
                let function = Rc::clone(&function);
                Box::new(source.iter().map(move |element| {
                    let function = Rc::clone(&function);
                    element.map(|element| LazyValue::new(move || function.call(vec![element])))
                }))
            })))
        },
    );

    library.function(
        "filter",
        fun(vec![fun(vec![t()], Type::Boolean), array(t())], array(t())),
        |args| {
            let predicate = args[0].force()?.as_function()?;
            let source = args[1].force()?.as_sequence("filter")?;
            Ok(Value::Array(Sequence::new(move || {
                let predicate = Rc::clone(&predicate);
                Box::new(source.iter().filter_map(move |element| {
                    element
                        .and_then(|element| {
                            let keep = predicate.call(vec![element.clone()])?.truthy("filter")?;
                            Ok(keep.then_some(element))
                        })
                        .transpose()
                }))
            })))
        },
    );

    // eager, left to right
    library.function(
        "fold",
        fun(vec![fun(vec![u(), t()], u()), u(), array(t())], u()),
        |args| {
            let function = args[0].force()?.as_function()?;
            let mut accumulator = args[1].clone();
            for element in args[2].force()?.as_sequence("fold")?.iter() {
                let next = function.call(vec![accumulator, element?])?;
                accumulator = LazyValue::from_value(next);
            }
            accumulator.force()
        },
    );

    library.function(
        "zip_with",
        fun(
            vec![fun(vec![t(), u()], v()), array(t()), array(u())],
            array(v()),
        ),
        |args| {
            let function = args[0].force()?.as_function()?;
            let left = args[1].force()?.as_sequence("zip_with")?;
            let right = args[2].force()?.as_sequence("zip_with")?;
            Ok(Value::Array(Sequence::new(move || {
                let function = Rc::clone(&function);
                Box::new(left.iter().zip(right.iter()).map(move |(a, b)| -> Result<LazyValue, RuntimeError> {
                    let (a, b) = (a?, b?);
                    let function = Rc::clone(&function);
                    Ok(LazyValue::new(move || function.call(vec![a, b])))
                }))
            })))
        },
    );
}

fn register_aggregates(library: &mut Library) {
    library.function("sum", fun(vec![array(numeric())], numeric()), |args| {
        reduce(&args[0].force()?.as_sequence("sum")?, Value::Integer(0), add)
    });

    library.function("product", fun(vec![array(numeric())], numeric()), |args| {
        reduce(&args[0].force()?.as_sequence("product")?, Value::Integer(1), multiply)
    });

    library.function("min", fun(vec![array(numeric())], numeric()), |args| {
        extremum("min", &args[0].force()?.as_sequence("min")?, Ordering::Less)
    });

    library.function("max", fun(vec![array(numeric())], numeric()), |args| {
        extremum("max", &args[0].force()?.as_sequence("max")?, Ordering::Greater)
    });
}

pub(super) fn register(library: &mut Library) {
    register_generators(library);
    register_access(library);
    register_combinators(library);
    register_aggregates(library);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[i64]) -> Sequence {
        Sequence::from_values(
            values
                .iter()
                .map(|i| LazyValue::from_value(Value::Integer(*i)))
                .collect(),
        )
    }

    fn collect(sequence: &Sequence) -> Vec<i64> {
        sequence
            .to_vec()
            .unwrap()
            .iter()
            .map(|element| element.force().unwrap().as_i64("test").unwrap())
            .collect()
    }

    #[test]
    fn test_slice_positions_forward() {
        assert_eq!(slice_positions(5, Some(1), Some(4), 1), vec![1, 2, 3]);
        assert_eq!(slice_positions(5, None, None, 2), vec![0, 2, 4]);
        assert_eq!(slice_positions(5, Some(-2), None, 1), vec![3, 4]);
        assert_eq!(slice_positions(5, Some(10), None, 1), Vec::<usize>::new());
    }

    #[test]
    fn test_slice_positions_extreme_steps() {
        assert_eq!(slice_positions(3, Some(-1), None, i64::MAX), vec![2]);
        assert_eq!(slice_positions(3, None, None, i64::MIN), vec![2]);
    }

    #[test]
    fn test_slice_positions_backward() {
        assert_eq!(slice_positions(5, None, None, -1), vec![4, 3, 2, 1, 0]);
        assert_eq!(slice_positions(5, Some(3), Some(0), -2), vec![3, 1]);
        assert_eq!(slice_positions(0, None, None, -1), Vec::<usize>::new());
    }

    #[test]
    fn test_lazy_slice_of_infinite_sequence() {
        let naturals = Sequence::new(|| integers(0..));
        let sliced = slice(naturals, Some(2), Some(8), 3);
        assert_eq!(collect(&sliced), vec![2, 5]);
    }

    #[test]
    fn test_drained_slice() {
        let sliced = slice(numbers(&[1, 2, 3, 4]), Some(-3), None, 1);
        assert_eq!(collect(&sliced), vec![2, 3, 4]);
        let reversed = slice(numbers(&[1, 2, 3]), None, None, -1);
        assert_eq!(collect(&reversed), vec![3, 2, 1]);
    }

    #[test]
    fn test_index() {
        let sequence = numbers(&[10, 20, 30]);
        assert!(matches!(index(&sequence, 1), Ok(Value::Integer(20))));
        assert!(matches!(index(&sequence, -1), Ok(Value::Integer(30))));
        assert!(matches!(index(&sequence, 3), Ok(Value::None)));
        assert!(matches!(index(&sequence, -4), Ok(Value::None)));
    }

    #[test]
    fn test_extremum() {
        let sequence = numbers(&[3, 1, 2]);
        assert!(matches!(
            extremum("min", &sequence, Ordering::Less),
            Ok(Value::Integer(1))
        ));
        assert!(matches!(
            extremum("max", &sequence, Ordering::Greater),
            Ok(Value::Integer(3))
        ));
        assert!(matches!(
            extremum("max", &Sequence::empty(), Ordering::Greater),
            Err(RuntimeError::EmptyArray { .. })
        ));
    }

    #[test]
    fn test_reduce_empty() {
        assert!(matches!(
            reduce(&Sequence::empty(), Value::Integer(0), add),
            Ok(Value::Integer(0))
        ));
    }
}
