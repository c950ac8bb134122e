pub(crate) mod directory;
pub(crate) mod message;
pub(crate) mod relation;
pub(crate) mod report;
pub(crate) mod user;
