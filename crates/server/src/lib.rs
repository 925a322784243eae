pub mod errors;
pub mod request_log;
pub mod routes;
pub mod startup;

pub use startup::run;
