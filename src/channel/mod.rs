pub(crate) mod link;
pub(crate) mod message;
pub(crate) mod transport;
