//! Client state and the intent driver that keeps it in step with the service.

pub mod store;
pub mod sync;

#[cfg(test)]
pub mod test_helpers;
