//! Producers: typed transformation rules
//!
//! A producer turns a fixed, ordered tuple of distinct input categories into
//! one output category, or fails. Producers are built from ordinary Rust
//! functions and closures:
//!
//! ```
//! use derivex_core::Producer;
//!
//! #[derive(Clone)]
//! struct Boulder { weight: u32 }
//! struct Stone { weight: u32 }
//!
//! let chisel = Producer::new("chisel", |b: Boulder| {
//!     Ok::<_, std::convert::Infallible>(Stone { weight: b.weight / 10 })
//! })
//! .unwrap();
//! assert_eq!(chisel.inputs().len(), 1);
//! ```

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::errors::{BoxError, ProducerDefect, ResolveError, Result};
use crate::model::category::{Category, Value};

/// Failure raised inside a type-erased invocation
pub(crate) enum InvokeFault {
    /// Slot `position` holds a value that does not downcast to the declared type
    Mismatch { position: usize, found: Category },
    /// Fewer values than declared inputs
    Missing,
    /// The transformation itself failed
    Failed(BoxError),
}

type Invoke = dyn Fn(&[Value]) -> std::result::Result<Value, InvokeFault> + Send + Sync;

/// Signature and type-erased body of a transformation
///
/// Only obtainable through [`IntoProducer`].
pub struct ProducerParts {
    inputs: Vec<Category>,
    output: Category,
    invoke: Arc<Invoke>,
}

/// Functions and closures that can back a [`Producer`]
///
/// Implemented for every `Fn(A1, .., An) -> Result<O, E>` with `n` up to six.
/// Arguments are cloned out of the supplied values, so they must be `Clone`.
pub trait IntoProducer<Args>: Send + Sync + 'static {
    fn into_parts(self) -> ProducerParts;
}

fn take<T: Any + Clone>(values: &[Value], position: usize) -> std::result::Result<T, InvokeFault> {
    let value = values
        .get(position)
        .ok_or(InvokeFault::Missing)?;
    value.cloned::<T>().ok_or(InvokeFault::Mismatch {
        position,
        found: value.category(),
    })
}

impl<F, O, E> IntoProducer<()> for F
where
    F: Fn() -> std::result::Result<O, E> + Send + Sync + 'static,
    O: Any + Send + Sync,
    E: Into<BoxError>,
{
    fn into_parts(self) -> ProducerParts {
        let invoke = move |_: &[Value]| -> std::result::Result<Value, InvokeFault> {
            (self)()
                .map(Value::new)
                .map_err(|e| InvokeFault::Failed(e.into()))
        };
        ProducerParts {
            inputs: Vec::new(),
            output: Category::of::<O>(),
            invoke: Arc::new(invoke),
        }
    }
}

macro_rules! impl_into_producer {
    ($($ty:ident $var:ident $idx:tt),+) => {
        impl<F, $($ty,)+ O, E> IntoProducer<($($ty,)+)> for F
        where
            F: Fn($($ty),+) -> std::result::Result<O, E> + Send + Sync + 'static,
            $($ty: Any + Clone + Send + Sync,)+
            O: Any + Send + Sync,
            E: Into<BoxError>,
        {
            fn into_parts(self) -> ProducerParts {
                let invoke = move |values: &[Value]| -> std::result::Result<Value, InvokeFault> {
                    $(let $var = take::<$ty>(values, $idx)?;)+
                    (self)($($var),+)
                        .map(Value::new)
                        .map_err(|e| InvokeFault::Failed(e.into()))
                };
                ProducerParts {
                    inputs: vec![$(Category::of::<$ty>()),+],
                    output: Category::of::<O>(),
                    invoke: Arc::new(invoke),
                }
            }
        }
    };
}

impl_into_producer!(A1 a1 0);
impl_into_producer!(A1 a1 0, A2 a2 1);
impl_into_producer!(A1 a1 0, A2 a2 1, A3 a3 2);
impl_into_producer!(A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3);
impl_into_producer!(A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4);
impl_into_producer!(A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4, A6 a6 5);

/// A single production rule
///
/// Immutable once built. Cloning shares the underlying transformation, and
/// clones keep the same [`identity`](Producer::identity).
#[derive(Clone)]
pub struct Producer {
    name: Arc<str>,
    identity: TypeId,
    inputs: Vec<Category>,
    output: Category,
    invoke: Arc<Invoke>,
}

impl Producer {
    /// Build a producer and validate it
    ///
    /// # Errors
    ///
    /// Returns `InvalidProducer` if the transformation takes no inputs or
    /// takes the same category twice.
    pub fn new<F, Args>(name: impl Into<Arc<str>>, f: F) -> Result<Self>
    where
        F: IntoProducer<Args>,
    {
        let producer = Self::from_fn(name, f);
        producer.validate()?;
        Ok(producer)
    }

    /// Build a producer without validating it
    ///
    /// Validation still happens when the producer is registered.
    pub fn from_fn<F, Args>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: IntoProducer<Args>,
    {
        let ProducerParts {
            inputs,
            output,
            invoke,
        } = f.into_parts();
        Self {
            name: name.into(),
            identity: TypeId::of::<F>(),
            inputs,
            output,
            invoke,
        }
    }

    /// Build a producer over type-erased values
    ///
    /// The declared output category is only checked when the producer is
    /// applied.
    pub fn from_dyn_fn<F>(
        name: impl Into<Arc<str>>,
        inputs: Vec<Category>,
        output: Category,
        f: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        let identity = TypeId::of::<F>();
        let invoke = move |values: &[Value]| f(values).map_err(InvokeFault::Failed);
        Self {
            name: name.into(),
            identity,
            inputs,
            output,
            invoke: Arc::new(invoke),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the underlying transformation
    ///
    /// Two producers built from the same function item or closure share an
    /// identity; distinct closures never do.
    pub fn identity(&self) -> TypeId {
        self.identity
    }

    /// Required input categories, in declared order
    pub fn inputs(&self) -> &[Category] {
        &self.inputs
    }

    pub fn output(&self) -> Category {
        self.output
    }

    /// Check the rule is well formed
    ///
    /// # Errors
    ///
    /// Returns `InvalidProducer` with `NoInputs` or `DuplicateInput`.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(self.invalid(ProducerDefect::NoInputs));
        }

        let mut seen = HashSet::with_capacity(self.inputs.len());
        for category in &self.inputs {
            if !seen.insert(*category) {
                return Err(self.invalid(ProducerDefect::DuplicateInput {
                    category: *category,
                }));
            }
        }

        Ok(())
    }

    /// Invoke the transformation on exactly one value per input, in order
    ///
    /// # Errors
    ///
    /// - `ArityMismatch` if `values.len()` differs from the input count
    /// - `TypeMismatch` if a value's category differs from its slot's
    /// - `OutputTypeMismatch` if the produced value has the wrong category
    /// - `ProducerFailure` carrying the transformation's own error
    pub fn apply(&self, values: &[Value]) -> Result<Value> {
        if values.len() != self.inputs.len() {
            return Err(ResolveError::ArityMismatch {
                producer: self.name.to_string(),
                expected: self.inputs.len(),
                found: values.len(),
            });
        }

        for (position, (expected, value)) in self.inputs.iter().zip(values).enumerate() {
            if value.category() != *expected {
                return Err(self.type_mismatch(position, value.category()));
            }
        }

        let produced = (self.invoke)(values).map_err(|fault| match fault {
            InvokeFault::Mismatch { position, found } => self.type_mismatch(position, found),
            InvokeFault::Missing => ResolveError::ArityMismatch {
                producer: self.name.to_string(),
                expected: self.inputs.len(),
                found: values.len(),
            },
            InvokeFault::Failed(source) => ResolveError::ProducerFailure {
                producer: self.name.to_string(),
                source: Arc::from(source),
            },
        })?;

        if produced.category() != self.output {
            return Err(ResolveError::OutputTypeMismatch {
                producer: self.name.to_string(),
                expected: self.output,
                found: produced.category(),
            });
        }

        Ok(produced)
    }

    /// Pick the input tuple out of an unordered pool
    ///
    /// Takes the first value of each required category, in declared order.
    /// The pool is left untouched, so one value can feed several producers.
    ///
    /// # Errors
    ///
    /// Returns `MissingInput` naming the first category with no value.
    pub fn fit_inputs(&self, pool: &[Value]) -> Result<Vec<Value>> {
        self.inputs
            .iter()
            .map(|wanted| {
                pool.iter()
                    .find(|value| value.category() == *wanted)
                    .cloned()
                    .ok_or_else(|| ResolveError::MissingInput {
                        producer: self.name.to_string(),
                        category: *wanted,
                    })
            })
            .collect()
    }

    /// Required categories absent from `available`, in declared order
    pub fn missing_inputs(&self, available: &[Category]) -> Vec<Category> {
        self.inputs
            .iter()
            .filter(|wanted| !available.contains(wanted))
            .copied()
            .collect()
    }

    /// Whether every input is in `available`
    pub fn is_satisfied_by(&self, available: &[Category]) -> bool {
        self.inputs.iter().all(|wanted| available.contains(wanted))
    }

    fn invalid(&self, defect: ProducerDefect) -> ResolveError {
        ResolveError::InvalidProducer {
            producer: self.name.to_string(),
            defect,
        }
    }

    fn type_mismatch(&self, position: usize, found: Category) -> ResolveError {
        ResolveError::TypeMismatch {
            producer: self.name.to_string(),
            position,
            expected: self.inputs.get(position).copied().unwrap_or(found),
            found,
        }
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("output", &self.output)
            .finish()
    }
}

impl fmt::Display for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: (", self.name)?;
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", input)?;
        }
        write!(f, ") -> {}", self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use std::convert::Infallible;

    #[derive(Debug, Clone, PartialEq)]
    struct Id(i64);
    #[derive(Debug, Clone, PartialEq)]
    struct Email(String);
    #[derive(Debug, Clone, PartialEq)]
    struct PasswordHash(String);

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        id: i64,
        email: String,
        password_hash: String,
    }

    fn strings_to_user(id: Id, email: Email, hash: PasswordHash) -> Result<User> {
        Ok(User {
            id: id.0,
            email: email.0,
            password_hash: hash.0,
        })
    }

    fn user_values() -> Vec<Value> {
        vec![
            Value::new(Id(1337)),
            Value::new(Email("fred@example.com".to_string())),
            Value::new(PasswordHash("0xdeadbeef".to_string())),
        ]
    }

    #[test]
    fn test_signature_from_fn() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        assert_eq!(
            p.inputs(),
            &[
                Category::of::<Id>(),
                Category::of::<Email>(),
                Category::of::<PasswordHash>()
            ]
        );
        assert_eq!(p.output(), Category::of::<User>());
        assert_eq!(p.to_string(), "strings_to_user: (Id, Email, PasswordHash) -> User");
    }

    #[test]
    fn test_apply_builds_user() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        let user = p.apply(&user_values()).unwrap();
        assert_eq!(
            user.cloned::<User>(),
            Some(User {
                id: 1337,
                email: "fred@example.com".to_string(),
                password_hash: "0xdeadbeef".to_string(),
            })
        );
    }

    #[test]
    fn test_apply_wrong_type_is_positional() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        let mut values = user_values();
        values[2] = Value::new(4444_i64);
        let err = p.apply(&values).unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch { position: 2, .. }));
    }

    #[test]
    fn test_apply_out_of_order_is_type_mismatch() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        let mut values = user_values();
        values.swap(0, 1);
        let err = p.apply(&values).unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch { position: 0, .. }));
    }

    #[test]
    fn test_apply_too_few_and_too_many() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        let too_few = p.apply(&user_values()[..1]).unwrap_err();
        assert!(matches!(
            too_few,
            ResolveError::ArityMismatch {
                expected: 3,
                found: 1,
                ..
            }
        ));

        let mut values = user_values();
        values.push(Value::new(Id(1)));
        let too_many = p.apply(&values).unwrap_err();
        assert_eq!(too_many.kind(), ExErrorKind::ArityMismatch);
    }

    #[test]
    fn test_invoke_short_slice_is_missing() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        assert!(matches!((p.invoke)(&user_values()[..2]), Err(InvokeFault::Missing)));
    }

    #[test]
    fn test_validate_rejects_no_inputs() {
        let p = Producer::from_fn("constant", || Ok::<_, Infallible>(Id(1)));
        let err = p.validate().unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidProducer {
                defect: ProducerDefect::NoInputs,
                ..
            }
        ));
        assert!(Producer::new("constant", || Ok::<_, Infallible>(Id(1))).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_inputs() {
        let p = Producer::from_fn("pair", |a: Id, b: Id| Ok::<_, Infallible>(a.0 + b.0));
        let err = p.validate().unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidProducer {
                defect: ProducerDefect::DuplicateInput { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_failure_is_surfaced_unchanged() {
        #[derive(Debug)]
        struct NoSession;
        impl fmt::Display for NoSession {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("no session")
            }
        }
        impl std::error::Error for NoSession {}

        let p = Producer::new("session", |_: Email| Err::<User, _>(NoSession)).unwrap();
        let err = p
            .apply(&[Value::new(Email("x".to_string()))])
            .unwrap_err();
        match err {
            ResolveError::ProducerFailure { producer, source } => {
                assert_eq!(producer, "session");
                assert!(source.downcast_ref::<NoSession>().is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dyn_output_is_checked() {
        let p = Producer::from_dyn_fn(
            "liar",
            vec![Category::of::<Id>()],
            Category::of::<User>(),
            |_| Ok(Value::new(Email("not a user".to_string()))),
        );
        p.validate().unwrap();
        let err = p.apply(&[Value::new(Id(1))]).unwrap_err();
        assert!(matches!(err, ResolveError::OutputTypeMismatch { .. }));
    }

    #[test]
    fn test_fit_inputs_orders_by_declaration() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        let mut pool = user_values();
        pool.reverse();
        pool.push(Value::new(42_u8));

        let fitted = p.fit_inputs(&pool).unwrap();
        assert_eq!(fitted.len(), 3);
        assert!(fitted[0].is::<Id>());
        assert!(fitted[1].is::<Email>());
        assert!(fitted[2].is::<PasswordHash>());
        assert_eq!(pool.len(), 4);
        assert!(p.apply(&fitted).is_ok());
    }

    #[test]
    fn test_fit_inputs_names_first_missing() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        let pool = vec![Value::new(Id(1))];
        let err = p.fit_inputs(&pool).unwrap_err();
        match err {
            ResolveError::MissingInput { category, .. } => {
                assert_eq!(category, Category::of::<Email>());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_inputs_preserves_order() {
        let p = Producer::new("strings_to_user", strings_to_user).unwrap();
        let missing = p.missing_inputs(&[Category::of::<Email>()]);
        assert_eq!(
            missing,
            vec![Category::of::<Id>(), Category::of::<PasswordHash>()]
        );
        assert!(!p.is_satisfied_by(&[Category::of::<Email>()]));
    }

    #[test]
    fn test_identity_follows_transformation() {
        let f = |b: Id| Ok::<_, Infallible>(Email(b.0.to_string()));
        let a = Producer::from_fn("a", f);
        let b = Producer::from_fn("b", f);
        let other = Producer::from_fn("c", |b: Id| Ok::<_, Infallible>(Email(b.0.to_string())));
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), other.identity());
    }
}
