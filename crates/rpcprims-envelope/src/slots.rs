//! Positional slot conversions for argument and result lists.
//!
//! Arguments are strict: the slot count must match the declared arity and
//! every slot must convert. Results are lenient: an absent or missing slot
//! becomes the declared type's default value, so a remote that answers with
//! an empty slot yields the zero value instead of an error.

use crate::convert::{FromValue, IntoValue};
use crate::error::ConvertError;
use crate::value::Value;

/// Flatten a static argument list into envelope slots.
pub trait IntoArgs {
    fn into_args(self) -> Vec<Value>;
}

/// Rebuild a static argument list from envelope slots.
pub trait FromArgs: Sized {
    /// Number of slots this argument list occupies.
    const ARITY: usize;

    fn from_args(args: Vec<Value>) -> Result<Self, ConvertError>;
}

/// Flatten a procedure's return into result slots.
///
/// `()` produces no slots, a single value produces one, a tuple produces one
/// per element, and `Result<T, E>` produces the pair `[value, error]` with
/// exactly one side absent.
pub trait IntoResults {
    fn into_results(self) -> Vec<Value>;
}

/// Rebuild a declared return shape from result slots.
pub trait FromResults: Sized {
    fn from_results(results: Vec<Value>) -> Result<Self, ConvertError>;
}

fn arg_slot<T: FromValue>(
    iter: &mut impl Iterator<Item = Value>,
    index: usize,
) -> Result<T, ConvertError> {
    let value = iter.next().unwrap_or_default();
    T::from_value(value).map_err(|e| e.at_slot(index))
}

fn result_slot<T: FromValue + Default>(
    value: Option<Value>,
    index: usize,
) -> Result<T, ConvertError> {
    match value {
        None | Some(Value::Absent) => Ok(T::default()),
        Some(value) => T::from_value(value).map_err(|e| e.at_slot(index)),
    }
}

fn check_result_count(declared: usize, found: usize) -> Result<(), ConvertError> {
    if found > declared {
        return Err(ConvertError::Arity {
            expected: declared,
            found,
        });
    }
    Ok(())
}

macro_rules! impl_slots {
    ($len:expr; $($T:ident $idx:tt),*) => {
        impl<$($T: IntoValue),*> IntoArgs for ($($T,)*) {
            fn into_args(self) -> Vec<Value> {
                vec![$(self.$idx.into_value()),*]
            }
        }

        impl<$($T: FromValue),*> FromArgs for ($($T,)*) {
            const ARITY: usize = $len;

            #[allow(unused_mut, unused_variables)]
            fn from_args(args: Vec<Value>) -> Result<Self, ConvertError> {
                if args.len() != $len {
                    return Err(ConvertError::Arity {
                        expected: $len,
                        found: args.len(),
                    });
                }
                let mut iter = args.into_iter();
                Ok(($(arg_slot::<$T>(&mut iter, $idx)?,)*))
            }
        }

        impl<$($T: IntoValue),*> IntoResults for ($($T,)*) {
            fn into_results(self) -> Vec<Value> {
                vec![$(self.$idx.into_value()),*]
            }
        }

        impl<$($T: FromValue + Default),*> FromResults for ($($T,)*) {
            #[allow(unused_mut, unused_variables)]
            fn from_results(results: Vec<Value>) -> Result<Self, ConvertError> {
                check_result_count($len, results.len())?;
                let mut iter = results.into_iter();
                Ok(($(result_slot::<$T>(iter.next(), $idx)?,)*))
            }
        }
    };
}

impl_slots!(0;);
impl_slots!(1; A 0);
impl_slots!(2; A 0, B 1);
impl_slots!(3; A 0, B 1, C 2);
impl_slots!(4; A 0, B 1, C 2, D 3);
impl_slots!(5; A 0, B 1, C 2, D 3, E 4);
impl_slots!(6; A 0, B 1, C 2, D 3, E 4, F 5);

impl<T: IntoValue> IntoResults for T {
    fn into_results(self) -> Vec<Value> {
        vec![self.into_value()]
    }
}

impl<T: FromValue + Default> FromResults for T {
    fn from_results(results: Vec<Value>) -> Result<Self, ConvertError> {
        check_result_count(1, results.len())?;
        result_slot(results.into_iter().next(), 0)
    }
}

impl<T: IntoValue, E: IntoValue> IntoResults for Result<T, E> {
    fn into_results(self) -> Vec<Value> {
        match self {
            Ok(value) => vec![value.into_value(), Value::Absent],
            Err(err) => vec![Value::Absent, err.into_value()],
        }
    }
}

/// A present error slot wins; otherwise the value slot is read leniently.
impl<T: FromValue + Default, E: FromValue> FromResults for Result<T, E> {
    fn from_results(results: Vec<Value>) -> Result<Self, ConvertError> {
        check_result_count(2, results.len())?;
        let mut iter = results.into_iter();
        let value = iter.next();
        match iter.next() {
            Some(err) if !err.is_absent() => {
                E::from_value(err).map(Err).map_err(|e| e.at_slot(1))
            }
            _ => result_slot(value, 0).map(Ok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_flatten_in_order() {
        assert_eq!(().into_args(), Vec::<Value>::new());
        assert_eq!(
            (1i64, "x", true).into_args(),
            vec![Value::Int(1), Value::Str("x".into()), Value::Bool(true)]
        );
    }

    #[test]
    fn args_arity_is_strict() {
        assert_eq!(<(i64, String)>::ARITY, 2);
        let err = <(i64,)>::from_args(vec![]).unwrap_err();
        assert_eq!(
            err,
            ConvertError::Arity {
                expected: 1,
                found: 0
            }
        );
        assert!(<()>::from_args(vec![Value::Int(1)]).is_err());
        assert!(<()>::from_args(vec![]).is_ok());
    }

    #[test]
    fn args_report_failing_slot() {
        let err = <(i64, i64)>::from_args(vec![Value::Int(1), Value::Str("2".into())])
            .unwrap_err();
        assert!(matches!(err, ConvertError::Slot { index: 1, .. }));
    }

    #[test]
    fn args_absent_only_fits_optional() {
        let (a,) = <(Option<i64>,)>::from_args(vec![Value::Absent]).unwrap();
        assert_eq!(a, None);
        assert!(<(i64,)>::from_args(vec![Value::Absent]).is_err());
    }

    #[test]
    fn results_shapes() {
        assert!(().into_results().is_empty());
        assert_eq!(7i64.into_results(), vec![Value::Int(7)]);
        assert_eq!(
            ("a", 2u8).into_results(),
            vec![Value::Str("a".into()), Value::Uint(2)]
        );
        assert_eq!(
            Ok::<i64, String>(3).into_results(),
            vec![Value::Int(3), Value::Absent]
        );
        assert_eq!(
            Err::<i64, String>("bad".into()).into_results(),
            vec![Value::Absent, Value::Str("bad".into())]
        );
    }

    #[test]
    fn absent_result_becomes_default() {
        assert_eq!(i64::from_results(vec![Value::Absent]).unwrap(), 0);
        assert_eq!(String::from_results(vec![]).unwrap(), "");
        let (a, b) = <(i64, Option<String>)>::from_results(vec![Value::Int(4)]).unwrap();
        assert_eq!((a, b), (4, None));
    }

    #[test]
    fn too_many_results_is_arity_error() {
        let err = i64::from_results(vec![Value::Int(1), Value::Int(2)]).unwrap_err();
        assert_eq!(
            err,
            ConvertError::Arity {
                expected: 1,
                found: 2
            }
        );
        assert!(<()>::from_results(vec![Value::Absent]).is_err());
    }

    #[test]
    fn result_prototype_reads_error_slot() {
        let ok = Result::<i64, String>::from_results(vec![Value::Int(9), Value::Absent]);
        assert_eq!(ok.unwrap(), Ok(9));

        let err = Result::<i64, String>::from_results(vec![
            Value::Absent,
            Value::Str("no such user".into()),
        ]);
        assert_eq!(err.unwrap(), Err("no such user".to_string()));

        let both_absent = Result::<i64, String>::from_results(vec![Value::Absent, Value::Absent]);
        assert_eq!(both_absent.unwrap(), Ok(0));
    }

    #[test]
    fn result_prototype_reports_bad_error_slot() {
        let err = Result::<i64, String>::from_results(vec![Value::Absent, Value::Int(1)])
            .unwrap_err();
        assert!(matches!(err, ConvertError::Slot { index: 1, .. }));
    }
}
