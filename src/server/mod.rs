//! Connection dispatch: the TCP accept loop, the worker supervisor, and the
//! single-request stdio mode.

pub mod listener;
pub mod stdio;
pub mod supervisor;
