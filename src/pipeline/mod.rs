pub mod builder;
pub mod defaults;
pub mod runtime;
pub(crate) mod tools;
pub mod traits;
