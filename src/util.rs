pub(crate) mod atomic_write;
pub(crate) mod naming;
