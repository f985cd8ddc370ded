pub mod comparison_result;
pub mod frame_verdict;
