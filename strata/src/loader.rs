//! Producer descriptors for dynamic invocation.
//!
//! Callers whose producer signature is known at compile time should prefer
//! [`Cache::fetch_or_else`], which takes a plain typed closure. This module
//! covers the remaining case: call sites that dispatch over heterogeneous
//! producers assembled at runtime. A [`Producer`] pairs a name and a declared
//! parameter list with the callable; arguments travel as tagged
//! [`ArgValue`]s and are validated for arity and kind before the callable
//! runs, so a mismatch is a named, positioned error instead of a panic deep
//! inside the producer.
//!
//! [`Cache::fetch_or_else`]: crate::Cache::fetch_or_else

use std::fmt;

use futures::future::BoxFuture;
use smol_str::SmolStr;
use thiserror::Error;

use strata_core::BoxError;

/// What a producer yields: a value, "ran but found nothing" (`None`), or an
/// error.
///
/// `Ok(None)` is the negative outcome: the orchestrator stores a negative
/// marker through both tiers so the key short-circuits to absent until the
/// marker is evicted. An `Err` is propagated verbatim and nothing is cached.
pub type ProducerResult<T> = Result<Option<T>, BoxError>;

type ProducerFn<T> = Box<dyn Fn(Vec<ArgValue>) -> BoxFuture<'static, ProducerResult<T>> + Send + Sync>;

/// Declared parameter kind of a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean.
    Bool,
    /// String.
    Str,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Int => "integer",
            ArgKind::Float => "float",
            ArgKind::Bool => "boolean",
            ArgKind::Str => "string",
        };
        f.write_str(name)
    }
}

/// A positional producer argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// String.
    Str(String),
}

impl ArgValue {
    /// The kind tag of this argument.
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Int(_) => ArgKind::Int,
            ArgValue::Float(_) => ArgKind::Float,
            ArgValue::Bool(_) => ArgKind::Bool,
            ArgValue::Str(_) => ArgKind::Str,
        }
    }

    /// The integer payload, if this is an [`ArgValue::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The float payload, if this is an [`ArgValue::Float`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The boolean payload, if this is an [`ArgValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The string payload, if this is an [`ArgValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value.into())
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(value.into())
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

/// Producer arguments do not match the declared signature.
///
/// Reported before the producer runs and before any tier is touched; the
/// message names the producer and the offending position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Wrong number of arguments.
    #[error("expected {expected} argument(s), got {got} while calling producer `{producer}`")]
    Arity {
        /// Producer name as registered.
        producer: SmolStr,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// An argument's kind does not match the declared parameter kind.
    #[error(
        "argument {position} expected {expected}, got {got} while calling producer `{producer}`"
    )]
    ArgumentType {
        /// Producer name as registered.
        producer: SmolStr,
        /// Zero-based argument position.
        position: usize,
        /// Declared parameter kind.
        expected: ArgKind,
        /// Supplied argument kind.
        got: ArgKind,
    },
}

/// A named producer with a declared parameter list.
///
/// The descriptor exists only for the duration of a fetch; it is never
/// persisted. Construction takes the callable as a boxed-future closure over
/// the validated argument slice:
///
/// ```
/// use strata::{ArgKind, Producer};
///
/// let producer = Producer::new("load_user", [ArgKind::Int], |args| {
///     Box::pin(async move {
///         let id = args[0].as_i64().ok_or("id must be an integer")?;
///         Ok(Some(format!("user-{id}")))
///     })
/// });
/// assert_eq!(producer.name(), "load_user");
/// ```
pub struct Producer<T> {
    name: SmolStr,
    params: Vec<ArgKind>,
    call: ProducerFn<T>,
}

impl<T> Producer<T> {
    /// Creates a descriptor from a name, declared parameters, and the
    /// callable.
    pub fn new<P, F>(name: impl Into<SmolStr>, params: P, call: F) -> Self
    where
        P: IntoIterator<Item = ArgKind>,
        F: Fn(Vec<ArgValue>) -> BoxFuture<'static, ProducerResult<T>> + Send + Sync + 'static,
    {
        Producer {
            name: name.into(),
            params: params.into_iter().collect(),
            call: Box::new(call),
        }
    }

    /// The producer's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameter kinds.
    pub fn params(&self) -> &[ArgKind] {
        &self.params
    }

    /// Validates `args` against the declared parameter list.
    pub fn check_args(&self, args: &[ArgValue]) -> Result<(), SignatureError> {
        if args.len() != self.params.len() {
            return Err(SignatureError::Arity {
                producer: self.name.clone(),
                expected: self.params.len(),
                got: args.len(),
            });
        }
        for (position, (param, arg)) in self.params.iter().zip(args).enumerate() {
            if arg.kind() != *param {
                return Err(SignatureError::ArgumentType {
                    producer: self.name.clone(),
                    position,
                    expected: *param,
                    got: arg.kind(),
                });
            }
        }
        Ok(())
    }

    /// Runs the callable. Arguments must already be validated.
    pub(crate) fn call(&self, args: Vec<ArgValue>) -> BoxFuture<'static, ProducerResult<T>> {
        (self.call)(args)
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

/// Builds a producer argument list from plain Rust values.
///
/// ```
/// use strata::{ArgValue, args};
///
/// let args = args![42, "ada", true];
/// assert_eq!(args[0], ArgValue::Int(42));
/// assert_eq!(args[2], ArgValue::Bool(true));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::ArgValue>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::ArgValue::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_producer() -> Producer<String> {
        Producer::new("load_user", [ArgKind::Int], |args| {
            Box::pin(async move {
                let id = args[0].as_i64().ok_or("id must be an integer")?;
                Ok(Some(format!("user-{id}")))
            })
        })
    }

    #[test]
    fn arity_mismatch_names_producer() {
        let err = user_producer().check_args(&args![42, 7]).unwrap_err();
        assert_eq!(
            err,
            SignatureError::Arity {
                producer: "load_user".into(),
                expected: 1,
                got: 2,
            }
        );
        assert!(err.to_string().contains("`load_user`"));
    }

    #[test]
    fn kind_mismatch_names_position() {
        let err = user_producer().check_args(&args!["42"]).unwrap_err();
        assert_eq!(
            err,
            SignatureError::ArgumentType {
                producer: "load_user".into(),
                position: 0,
                expected: ArgKind::Int,
                got: ArgKind::Str,
            }
        );
        assert!(err.to_string().contains("argument 0 expected integer"));
    }

    #[test]
    fn matching_args_pass() {
        assert!(user_producer().check_args(&args![42]).is_ok());
    }

    #[tokio::test]
    async fn call_runs_producer() {
        let producer = user_producer();
        let value = producer.call(args![42]).await.unwrap();
        assert_eq!(value.as_deref(), Some("user-42"));
    }

    #[test]
    fn empty_args_macro() {
        let producer: Producer<String> =
            Producer::new("nullary", [], |_args| Box::pin(async { Ok(None) }));
        assert!(producer.check_args(&args![]).is_ok());
    }

    #[test]
    fn arg_value_kinds() {
        assert_eq!(ArgValue::from(1i64).kind(), ArgKind::Int);
        assert_eq!(ArgValue::from(1.5).kind(), ArgKind::Float);
        assert_eq!(ArgValue::from(true).kind(), ArgKind::Bool);
        assert_eq!(ArgValue::from("x").kind(), ArgKind::Str);
    }
}
