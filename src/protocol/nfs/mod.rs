//! Program dispatchers for the two ONC RPC programs of an NFSv3 service.
//!
//! - `mount`: the MOUNT version 3 program (RFC 1813 Appendix I), which hands out the
//!   initial file handle of an exported directory.
//!
//! - `v3`: the NFS version 3 program (RFC 1813) with every procedure except MKNOD.
//!
//! Both dispatchers translate raw argument bytes into typed calls on a callback
//! trait ([`MountV3`], [`NFSv3`]) and encode the returned result, using the shared
//! machinery in [`pipeline`]. They never touch sockets: the transport in
//! [`crate::server`] (or any other [`crate::protocol::rpc::RpcProgram`] host) feeds
//! them calls and delivers their replies.

pub mod mount;
pub mod pipeline;
pub mod v3;

pub use mount::{MountDispatcher, MountV3};
pub use pipeline::{DispatchError, ResultContract};
pub use v3::{NfsDispatcher, NFSv3};
