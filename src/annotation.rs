pub(crate) mod cache;
pub(crate) mod fetch;
pub(crate) mod filter;
pub(crate) mod model;
pub(crate) mod store;
