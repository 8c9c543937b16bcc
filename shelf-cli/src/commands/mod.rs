pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod config;
pub(crate) mod merge;
pub(crate) mod scan;
pub(crate) mod scrape;
