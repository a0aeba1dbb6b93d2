pub mod entities;
pub mod pem;
pub mod ports;
pub mod services;
