pub mod replay;
pub mod schema;
pub mod serve;
