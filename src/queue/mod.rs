pub(crate) mod job;
pub(crate) mod rules;
pub(crate) mod runner;
