//! RPC (Remote Procedure Call) plumbing as specified in RFC 5531.
//!
//! A program dispatcher never sees sockets. The transport decodes the call header,
//! answers RPC version and program/version mismatches itself, and hands the rest to
//! an [`RpcProgram`] as an [`RpcCall`]: transaction id, addressing triple, AUTH_UNIX
//! credentials and the raw procedure argument bytes. The program answers through a
//! [`ReplySink`], either with encoded results or with one of the [`AcceptError`]
//! categories of an accepted-but-failed reply.
//!
//! This module also carries the TCP Record Marking Standard and a small portmap
//! client used to publish program:version:port tuples.

use std::io;

use async_trait::async_trait;

use crate::protocol::xdr::rpc::{self, auth_unix, rpc_msg};

pub mod portmap_client;
mod wire;

pub use wire::{parse_call, read_fragment, read_record, write_fragment, ChannelReplySink, ParsedCall};

/// Largest RPC record accepted over TCP.
pub const MAX_RPC_RECORD_LENGTH: usize = 16 * 1024 * 1024;

/// Accepted-reply failure categories a program dispatcher can report.
///
/// These map onto the RFC 5531 `accept_stat` values that carry no body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AcceptError {
    /// PROC_UNAVAIL (3): the procedure number is not served by this program
    ProcUnavail,
    /// GARBAGE_ARGS (4): the arguments could not be decoded
    GarbageArgs,
    /// SYSTEM_ERR (5): the server could not produce a valid result
    SystemErr,
}

impl AcceptError {
    /// Builds the complete reply message for this category.
    pub fn reply_message(self, xid: u32) -> rpc_msg {
        match self {
            AcceptError::ProcUnavail => rpc::proc_unavail_reply_message(xid),
            AcceptError::GarbageArgs => rpc::garbage_args_reply_message(xid),
            AcceptError::SystemErr => rpc::system_err_reply_message(xid),
        }
    }
}

/// A single call, already routed to a program by the transport.
#[derive(Copy, Clone, Debug)]
pub struct RpcCall<'a> {
    pub xid: u32,
    pub prog: u32,
    pub vers: u32,
    pub proc: u32,
    pub auth: &'a auth_unix,
    /// XDR-encoded procedure arguments, everything after the call header
    pub args: &'a [u8],
}

/// Transport side of a reply.
///
/// Implementations wrap the payload in the matching reply envelope and frame it
/// for their transport. A returned error means the reply could not be handed to
/// the network; the call itself has already been processed.
pub trait ReplySink: Send + Sync {
    /// Sends an accepted SUCCESS reply whose body is `results`.
    fn send_success(&self, xid: u32, results: &[u8]) -> io::Result<()>;

    /// Sends an accepted reply with the given failure status.
    fn send_error(&self, xid: u32, err: AcceptError) -> io::Result<()>;
}

/// An ONC RPC program served by [`crate::server`].
#[async_trait]
pub trait RpcProgram: Send + Sync {
    /// Program number, e.g. 100003 for NFS
    fn program(&self) -> u32;

    /// The single version served
    fn version(&self) -> u32;

    /// Executes one call and answers it through `sink`.
    ///
    /// The transport only routes calls whose program and version match
    /// [`RpcProgram::program`] and [`RpcProgram::version`].
    async fn handle(&self, call: RpcCall<'_>, sink: &dyn ReplySink);
}
