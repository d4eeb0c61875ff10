pub(crate) mod locator;
pub(crate) mod params;
