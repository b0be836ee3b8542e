//! Forward error correction tests: field arithmetic, codec behaviour,
//! and property-based round trips.

mod fec {
    pub mod codec;
    pub mod galois;
    pub mod property;
}
