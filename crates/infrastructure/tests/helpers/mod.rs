pub mod txt_server_mock;

pub use txt_server_mock::*;
