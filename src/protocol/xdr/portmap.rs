//! Portmap (RFC 1833, version 2) data structures used to publish and withdraw
//! this server's program:version:port tuples.
//!
//! Only the registration side of the protocol is needed here: the server acts as a
//! portmap client that issues `PMAPPROC_SET` on start and `PMAPPROC_UNSET` on stop.

// Type names follow the RFC
#![allow(non_camel_case_types)]

use num_derive::{FromPrimitive, ToPrimitive};

use crate::{DeserializeStruct, SerializeStruct};

/// Represents a mapping between an RPC program and a network port.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct mapping {
    /// The RPC program number
    pub prog: u32,
    /// The RPC program version number
    pub vers: u32,
    /// The transport protocol (see IPPROTO_* constants)
    pub prot: u32,
    /// The port number where the service is listening, ignored by UNSET
    pub port: u32,
}
DeserializeStruct!(mapping, prog, vers, prot, port);
SerializeStruct!(mapping, prog, vers, prot, port);

/// Protocol number for TCP/IP
pub const IPPROTO_TCP: u32 = 6;
/// Protocol number for UDP/IP
pub const IPPROTO_UDP: u32 = 17;
/// Portmap RPC program number
pub const PROGRAM: u32 = 100000;
/// Portmap RPC version number
pub const VERSION: u32 = 2;
/// Well-known portmapper port
pub const PORT: u16 = 111;

/// Procedure numbers of the Portmap service issued by this crate.
#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum PortmapProgram {
    /// Register a new program-to-port mapping
    PMAPPROC_SET = 1,
    /// Remove a program-to-port mapping
    PMAPPROC_UNSET = 2,
}
