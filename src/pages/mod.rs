pub mod home;
pub mod not_found;
pub(crate) mod sample;
