//! HTTP surface for the support desk: public ticket intake and the
//! password-gated staff portal.

pub mod api;
pub mod metrics;
pub mod state;
