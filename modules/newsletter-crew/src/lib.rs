pub mod agents;
pub mod crew;
pub mod editor;
pub mod providers;
pub mod research;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod writer;
