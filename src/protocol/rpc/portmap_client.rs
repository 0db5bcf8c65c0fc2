//! Minimal portmap (RFC 1833 version 2) client.
//!
//! Servers started with publishing enabled register their program:version:port
//! tuple with `PMAPPROC_SET` and withdraw it with `PMAPPROC_UNSET`. Both calls go
//! over TCP with AUTH_NULL credentials and the portmapper answers with a single
//! boolean.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{anyhow, bail};
use tokio::net::TcpStream;
use tracing::debug;

use super::{read_record, write_fragment};
use crate::protocol::xdr::portmap::{self, mapping, PortmapProgram};
use crate::protocol::xdr::rpc::{self, accept_body, reply_body, rpc_body, rpc_msg};
use crate::protocol::xdr::{self, deserialize, Serialize};

/// Upper bound on a whole portmap exchange.
const PORTMAP_TIMEOUT: Duration = Duration::from_secs(5);

static NEXT_XID: AtomicU32 = AtomicU32::new(1);

/// Registers `entry` with the portmapper at `portmapper`.
///
/// Returns the portmapper's answer: false typically means the tuple is already
/// registered by someone else.
pub async fn set(portmapper: SocketAddr, entry: mapping) -> anyhow::Result<bool> {
    call(portmapper, PortmapProgram::PMAPPROC_SET, entry).await
}

/// Removes every registration of `entry.prog`/`entry.vers` from the portmapper.
pub async fn unset(portmapper: SocketAddr, entry: mapping) -> anyhow::Result<bool> {
    call(portmapper, PortmapProgram::PMAPPROC_UNSET, entry).await
}

async fn call(
    portmapper: SocketAddr,
    proc: PortmapProgram,
    entry: mapping,
) -> anyhow::Result<bool> {
    tokio::time::timeout(PORTMAP_TIMEOUT, exchange(portmapper, proc, entry))
        .await
        .map_err(|_| anyhow!("portmapper {portmapper} did not answer {proc:?} in time"))?
}

async fn exchange(
    portmapper: SocketAddr,
    proc: PortmapProgram,
    entry: mapping,
) -> anyhow::Result<bool> {
    let xid = NEXT_XID.fetch_add(1, Ordering::Relaxed);
    let mut request = xdr::pack(&rpc::make_call(
        xid,
        portmap::PROGRAM,
        portmap::VERSION,
        proc as u32,
    ))?;
    entry.serialize(&mut request)?;

    let mut stream = TcpStream::connect(portmapper).await?;
    write_fragment(&mut stream, &request).await?;
    let reply = read_record(&mut stream).await?;

    let mut cursor = Cursor::new(reply);
    let msg = deserialize::<rpc_msg>(&mut cursor)?;
    if msg.xid != xid {
        bail!("portmapper replied with xid {} to call {}", msg.xid, xid);
    }
    match msg.body {
        rpc_body::REPLY(reply_body::MSG_ACCEPTED(accepted))
            if accepted.reply_data == accept_body::SUCCESS => {}
        body => bail!("portmapper refused {proc:?}: {body:?}"),
    }

    let result = deserialize::<bool>(&mut cursor)?;
    debug!("{:?} {:?} via {} -> {}", proc, entry, portmapper, result);
    Ok(result)
}
