pub mod cipher;
pub mod container;
pub mod decode;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod method;
pub mod password;
pub mod quest;
pub mod rng;
