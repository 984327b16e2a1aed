//! Generation-guarded loading of notifications and announcements.

pub(crate) mod notifications;
pub(crate) mod token;
