pub mod shared_buffer;

#[allow(unused_imports)]
pub use shared_buffer::SharedBuf;
