//! Points program services.

pub mod admin;
pub mod banner;
pub mod lookup;
pub mod qr;
pub mod registration;
