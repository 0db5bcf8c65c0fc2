//! Protocol module implements the MOUNT v3 and NFS v3 programs as specified in RFC 1813.
//!
//! This module contains three main components:
//!
//! - `xdr`: External Data Representation (XDR) for serialization and deserialization
//!   of data structures according to RFC 4506, plus the MOUNT, NFS, RPC and portmap
//!   wire types.
//!
//! - `nfs`: Dispatchers of the MOUNT and NFS version 3 programs and the callback
//!   traits they drive.
//!
//! - `rpc`: Remote Procedure Call (RPC) plumbing as defined in RFC 5531: call
//!   envelopes, reply categories and TCP record marking.
//!
//! NFS is stateless at this layer: every call is decoded, executed and answered
//! on its own, and calls may complete in any order.

pub mod nfs;
pub mod rpc;
pub mod xdr;
