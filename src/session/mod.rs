pub(crate) mod config;
pub(crate) mod layout;
pub(crate) mod mode;
pub(crate) mod runtime;
