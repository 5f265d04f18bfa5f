pub(crate) mod contacts;
pub(crate) mod fetch;
pub(crate) mod watch;
