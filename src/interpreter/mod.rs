mod environment;
mod errors;
mod interpreter;
mod value;

pub use environment::{Environment, ScopeId};
pub use errors::{EnvResult, RuntimeError, RuntimeErrorKind, RuntimeResult};
pub use interpreter::Interpreter;
pub use value::RuntimeVal;
