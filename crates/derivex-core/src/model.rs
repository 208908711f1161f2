pub mod category;
pub mod producer;

pub use category::{categories_of, Category, Value};
pub use producer::{IntoProducer, Producer};
