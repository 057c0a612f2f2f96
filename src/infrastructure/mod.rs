pub mod api;
pub mod camera;
#[cfg(test)]
pub mod fakes;
