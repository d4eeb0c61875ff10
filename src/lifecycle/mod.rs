pub(crate) mod presentation;
pub(crate) mod signaler;
