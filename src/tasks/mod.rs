pub mod sampler;
pub mod tempo;
