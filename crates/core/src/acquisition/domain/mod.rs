pub mod acquired_input;
pub mod acquisition_error;
pub mod resource_ref;
