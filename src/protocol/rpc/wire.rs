//! RPC message framing and call header handling as specified in RFC 5531.
//!
//! This module implements the Record Marking Standard for sending RPC messages
//! over TCP connections, decodes incoming call headers, and provides the
//! channel-backed [`ReplySink`] the server hands to program dispatchers.

use std::io;
use std::net::SocketAddr;

use anyhow::anyhow;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{trace, warn};

use super::{AcceptError, ReplySink, RpcCall, MAX_RPC_RECORD_LENGTH};
use crate::protocol::xdr::rpc::{self, auth_flavor, auth_stat, auth_unix, rpc_body, rpc_msg};
use crate::protocol::xdr;

/// Reads a single record-marked fragment from a stream
///
/// The record marking standard delimits records in a stream protocol like TCP
/// by prefixing each fragment with a 4-byte header: the lower 31 bits are the
/// fragment length and the highest bit marks the last fragment of the record.
///
/// The fragment is appended to `append_to`. Returns true if this was the last
/// fragment in the RPC record.
pub async fn read_fragment<R>(socket: &mut R, append_to: &mut Vec<u8>) -> anyhow::Result<bool>
where
    R: AsyncRead + Unpin,
{
    let mut header_buf = [0_u8; 4];
    socket.read_exact(&mut header_buf).await?;
    let fragment_header = u32::from_be_bytes(header_buf);
    let is_last = (fragment_header & (1 << 31)) > 0;
    let length = (fragment_header & ((1 << 31) - 1)) as usize;
    trace!("Reading fragment length:{}, last:{}", length, is_last);
    if append_to.len().saturating_add(length) > MAX_RPC_RECORD_LENGTH {
        return Err(anyhow!("RPC record length {} exceeds max {}", length, MAX_RPC_RECORD_LENGTH));
    }
    let start_offset = append_to.len();
    append_to.resize(start_offset + length, 0);
    socket.read_exact(&mut append_to[start_offset..]).await?;
    Ok(is_last)
}

/// Reads fragments until a whole RPC record has been reassembled.
pub async fn read_record<R>(socket: &mut R) -> anyhow::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut record = Vec::new();
    while !read_fragment(socket, &mut record).await? {}
    Ok(record)
}

/// Writes data as record-marked fragments to a stream
///
/// Large buffers are split into fragments of at most 2^31 - 1 bytes, the last
/// one carrying the last-fragment bit.
pub async fn write_fragment<W>(socket: &mut W, buf: &[u8]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    // Maximum fragment size is 2^31 - 1 bytes
    const MAX_FRAGMENT_SIZE: usize = (1 << 31) - 1;

    let mut offset = 0;
    loop {
        let remaining = buf.len() - offset;
        let fragment_size = std::cmp::min(remaining, MAX_FRAGMENT_SIZE);
        let is_last = offset + fragment_size >= buf.len();

        let fragment_header =
            if is_last { fragment_size as u32 | (1 << 31) } else { fragment_size as u32 };
        socket.write_all(&u32::to_be_bytes(fragment_header)).await?;

        trace!("Writing fragment length:{}, last:{}", fragment_size, is_last);
        socket.write_all(&buf[offset..offset + fragment_size]).await?;

        offset += fragment_size;
        if is_last {
            break;
        }
    }
    socket.flush().await?;

    Ok(())
}

/// Outcome of decoding a call header for a given program.
#[derive(Debug)]
pub enum ParsedCall<'a> {
    /// The header is valid; the call goes to the program dispatcher.
    Dispatch { xid: u32, prog: u32, vers: u32, proc: u32, auth: auth_unix, args: &'a [u8] },
    /// The header was refused and this reply must be sent back as is.
    Reject(rpc_msg),
}

impl ParsedCall<'_> {
    /// Borrows the dispatchable call, if any.
    pub fn call(&self) -> Option<RpcCall<'_>> {
        match self {
            ParsedCall::Dispatch { xid, prog, vers, proc, auth, args } => Some(RpcCall {
                xid: *xid,
                prog: *prog,
                vers: *vers,
                proc: *proc,
                auth,
                args: *args,
            }),
            ParsedCall::Reject(_) => None,
        }
    }
}

/// Decodes an RPC call header addressed to `program`/`version`.
///
/// RPC version, program and version mismatches are answered here, the way an
/// RPC transport is expected to. AUTH_UNIX credentials are decoded for the
/// callbacks; other flavors are dispatched with default credentials. A message
/// that is not a decodable call yields an error, since no reply can be addressed.
pub fn parse_call(message: &[u8], program: u32, version: u32) -> anyhow::Result<ParsedCall<'_>> {
    let (msg, consumed) = xdr::unpack::<rpc_msg>(message)?;
    let xid = msg.xid;
    let rpc_body::CALL(call) = msg.body else {
        return Err(anyhow!("Unexpectedly received a Reply instead of a Call, xid {xid}"));
    };

    if call.rpcvers != rpc::RPC_VERSION {
        warn!("Invalid RPC version {} != {}", call.rpcvers, rpc::RPC_VERSION);
        return Ok(ParsedCall::Reject(rpc::rpc_vers_mismatch(xid)));
    }
    if call.prog != program {
        warn!("Unknown RPC Program number {} != {}", call.prog, program);
        return Ok(ParsedCall::Reject(rpc::prog_unavail_reply_message(xid)));
    }
    if call.vers != version {
        warn!("Unsupported program {} version {} (supported {})", program, call.vers, version);
        return Ok(ParsedCall::Reject(rpc::prog_mismatch_reply_message(xid, version)));
    }

    let auth = match call.cred.flavor {
        auth_flavor::AUTH_UNIX => match xdr::unpack::<auth_unix>(&call.cred.body) {
            Ok((auth, _)) => auth,
            Err(e) => {
                warn!("Malformed AUTH_UNIX credentials, xid {}: {}", xid, e);
                return Ok(ParsedCall::Reject(rpc::auth_error_reply_message(
                    xid,
                    auth_stat::AUTH_BADCRED,
                )));
            }
        },
        _ => auth_unix::default(),
    };

    Ok(ParsedCall::Dispatch {
        xid,
        prog: call.prog,
        vers: call.vers,
        proc: call.proc,
        auth,
        args: &message[consumed..],
    })
}

/// [`ReplySink`] that encodes reply messages and queues them for a writer task.
///
/// Each queued item pairs the encoded message with the peer it is addressed to,
/// so the same sink serves TCP connections and UDP datagrams.
#[derive(Clone, Debug)]
pub struct ChannelReplySink {
    peer: SocketAddr,
    replies: mpsc::UnboundedSender<(SocketAddr, Vec<u8>)>,
}

impl ChannelReplySink {
    pub fn new(peer: SocketAddr, replies: mpsc::UnboundedSender<(SocketAddr, Vec<u8>)>) -> Self {
        Self { peer, replies }
    }

    /// Queues a complete reply message followed by an optional results body.
    pub fn send_message(&self, msg: &rpc_msg, results: &[u8]) -> io::Result<()> {
        let mut buf = xdr::pack(msg)?;
        buf.extend_from_slice(results);
        self.replies.send((self.peer, buf)).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, format!("reply channel to {} closed", self.peer))
        })
    }
}

impl ReplySink for ChannelReplySink {
    fn send_success(&self, xid: u32, results: &[u8]) -> io::Result<()> {
        self.send_message(&rpc::make_success_reply(xid), results)
    }

    fn send_error(&self, xid: u32, err: AcceptError) -> io::Result<()> {
        self.send_message(&err.reply_message(xid), &[])
    }
}
