//! CLI command implementations.

pub(crate) mod meta;
pub(crate) mod serve;

pub(crate) use meta::MetaCommand;
pub(crate) use serve::ServeArgs;
