use error::QueryError;

pub mod build_time;
pub mod command;
pub mod constants;
pub mod error;
pub mod params;
pub mod parser;
pub mod process;
pub mod revision;

pub type QueryResult<T> = std::result::Result<T, QueryError>;
