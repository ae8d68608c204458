// ringer-mobile — Native mobile bindings for iOS and Android
// This crate exports the Ringer Core API via UniFFI

pub use ringer_core::*;
