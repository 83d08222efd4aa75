//! Domain types and ports for the checkout controller.
//!
//! Nothing in here performs I/O. The page, the navigator and the payment
//! gateway are reached only through the traits in [`ports`].

pub mod outcome;
pub mod payment;
pub mod phone;
pub mod ports;
pub mod surface;
