pub(crate) mod board;
pub(crate) mod config;
pub(crate) mod model;
