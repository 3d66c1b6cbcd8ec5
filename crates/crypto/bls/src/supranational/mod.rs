mod backend;
mod private_key;
mod pubkey;
mod signature;

pub use backend::BlstBackend;
