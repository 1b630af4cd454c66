pub mod forwarding;
pub mod resolv_conf;
pub mod transport;
pub mod txt_resolver;

pub use forwarding::{MessageBuilder, ResponseParser};
pub use txt_resolver::UdpTxtResolver;
