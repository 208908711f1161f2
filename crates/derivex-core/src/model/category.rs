use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Semantic kind of a value
///
/// A category is a token for a Rust type. Two categories are equal exactly
/// when they were made from the same type; the type name is carried only
/// for display.
#[derive(Clone, Copy)]
pub struct Category {
    id: TypeId,
    type_name: &'static str,
}

impl Category {
    /// Category of values of type `T`
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The underlying type identity
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name with the leading module path removed
    ///
    /// `my_crate::tools::Stone` becomes `Stone`; generic arguments are kept
    /// as written (`Vec<alloc::string::String>` stays intact after `Vec`).
    pub fn short_name(&self) -> &'static str {
        let name = self.type_name;
        let head = match name.find('<') {
            Some(i) => &name[..i],
            None => name,
        };
        let start = head.rfind("::").map(|i| i + 2).unwrap_or(0);
        &name[start..]
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category({})", self.short_name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.short_name())
    }
}

/// Runtime instance tagged with exactly one category
///
/// The payload is shared and never mutated; cloning a `Value` is cheap.
#[derive(Clone)]
pub struct Value {
    category: Category,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Value {
    /// Wrap a concrete value; its category is the category of `T`
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            category: Category::of::<T>(),
            payload: Arc::new(value),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Whether this value holds a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.category == Category::of::<T>()
    }

    /// Borrow the payload as a `T`, if it is one
    pub fn get<T: Any>(&self) -> Option<&T> {
        (*self.payload).downcast_ref::<T>()
    }

    /// Clone the payload out as a `T`, if it is one
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.get::<T>().cloned()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.category)
    }
}

/// Distinct categories of `values`, in first-occurrence order
pub fn categories_of(values: &[Value]) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::with_capacity(values.len());
    for value in values {
        if !categories.contains(&value.category()) {
            categories.push(value.category());
        }
    }
    categories
}
