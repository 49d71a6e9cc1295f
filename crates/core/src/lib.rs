pub mod detection;
pub mod display;
pub mod pipeline;
pub mod sampling;
pub mod shared;
pub mod sink;
pub mod stream;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_support;
