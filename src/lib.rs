//! nfsd3 - server-side MOUNT v3 and NFS v3 protocol handling in Rust
//!
//! This library translates ONC RPC calls of the MOUNT (RFC 1813 Appendix I) and
//! NFS version 3 (RFC 1813) programs into typed calls on application callbacks and
//! encodes their results back to the wire. The application decides what the
//! operations mean; the library owns the wire format and the error semantics.
//!
//! ## Main Components
//!
//! - `protocol::xdr`: XDR (External Data Representation) codec and every MOUNT v3
//!   and NFSv3 argument and result structure, including the discriminated unions
//!   and optional fields of the NFSv3 grammar.
//!
//! - `protocol::nfs`: the [`MountV3`](protocol::nfs::MountV3) and
//!   [`NFSv3`](protocol::nfs::NFSv3) callback traits and the dispatchers that run
//!   every procedure through one decode → callback → encode pipeline.
//!
//! - `protocol::rpc`: the RPC call envelope, reply categories, TCP record marking
//!   and a portmap client.
//!
//! - `server`: binds a TCP or UDP socket, serves one program on it and optionally
//!   publishes it with the portmapper, behind an explicit start/stop handle.
//!
//! ## Standards Compliance
//!
//! This implementation follows these RFCs:
//! - RFC 1813: NFS Version 3 Protocol Specification
//! - RFC 5531: RPC: Remote Procedure Call Protocol Specification Version 2
//! - RFC 4506: XDR: External Data Representation Standard
//! - RFC 1833: Binding Protocols for ONC RPC Version 2
//!
//! ## Usage
//!
//! Implement [`NFSv3`](protocol::nfs::NFSv3) and [`MountV3`](protocol::nfs::MountV3),
//! wrap them in [`NfsDispatcher`](protocol::nfs::NfsDispatcher) and
//! [`MountDispatcher`](protocol::nfs::MountDispatcher), and hand each dispatcher to
//! [`server::start`].

pub mod protocol;
pub mod server;

pub use protocol::xdr;
