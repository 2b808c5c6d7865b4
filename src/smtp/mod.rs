mod dialer;

pub use dialer::*;
