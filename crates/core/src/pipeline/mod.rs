pub mod compare_faces_use_case;
pub mod comparison_request;
mod scratch;
