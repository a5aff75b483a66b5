pub mod access;
pub mod catalog;
pub mod error;
pub mod executor;
pub mod expression;
pub mod output;
pub mod session;
pub mod sql;

pub use error::{QueryError, QueryResult};
pub use executor::ResultTable;
pub use session::{Session, SessionConfig};
