pub mod frame_sampler;
pub mod sampled_frame;
