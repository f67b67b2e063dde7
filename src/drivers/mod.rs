pub mod bus;
pub mod mma8451;
