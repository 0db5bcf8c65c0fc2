//! The server module runs one RPC program on one transport.
//!
//! [`start`] binds a TCP listener or a UDP socket, spawns the serving loop on the
//! tokio runtime and returns a [`ServerHandle`]. Stopping consumes the handle;
//! dropping it stops the server as well, without touching the portmapper.
//!
//! Over TCP every connection runs in its own task and every call in its own task.
//! Replies are funnelled through a channel to a single writer per connection, which
//! applies record marking. Over UDP every datagram is handled in its own task and
//! the reply goes back to the datagram's source.
//!
//! When publishing is enabled the program:version:port tuple is registered with the
//! portmapper on start and may be withdrawn on stop.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::protocol::rpc::{
    self, parse_call, portmap_client, ChannelReplySink, ParsedCall, RpcProgram,
};
use crate::protocol::xdr::portmap::{self, mapping};

/// Largest datagram accepted over UDP
const MAX_UDP_DATAGRAM: usize = 65535;

type ReplyQueue = mpsc::UnboundedSender<(SocketAddr, Vec<u8>)>;

/// Transport protocol a server listens on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    #[default]
    Tcp,
    Udp,
}

impl Transport {
    /// Protocol number registered with the portmapper
    pub fn ipproto(self) -> u32 {
        match self {
            Transport::Tcp => portmap::IPPROTO_TCP,
            Transport::Udp => portmap::IPPROTO_UDP,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Tcp => f.write_str("tcp"),
            Transport::Udp => f.write_str("udp"),
        }
    }
}

/// Where and how a program is served.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub transport: Transport,
    pub bind_ip: IpAddr,
    /// 0 lets the operating system choose; see [`ServerHandle::local_addr`]
    pub port: u16,
    /// Register program:version:port with the portmapper on start
    pub publish: bool,
    pub portmapper: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Tcp,
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 0,
            publish: false,
            portmapper: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), portmap::PORT),
        }
    }
}

impl ServerConfig {
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_bind_ip(mut self, bind_ip: IpAddr) -> Self {
        self.bind_ip = bind_ip;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn with_portmapper(mut self, portmapper: SocketAddr) -> Self {
        self.portmapper = portmapper;
        self
    }
}

/// A running server, returned by [`start`].
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    transport: Transport,
    entry: mapping,
    published: bool,
    portmapper: SocketAddr,
    shutdown: oneshot::Sender<()>,
    serve: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Whether the portmapper accepted the registration made on start.
    pub fn published(&self) -> bool {
        self.published
    }

    /// Stops serving and waits for the serving loop to end.
    ///
    /// With `unpublish` the program:version tuple is first withdrawn from the
    /// portmapper, and the result tells whether the portmapper accepted that.
    /// Without it the result is always `false`. The server stops even when
    /// withdrawing fails; the failure is returned after shutdown.
    pub async fn stop(self, unpublish: bool) -> anyhow::Result<bool> {
        let unpublished = if unpublish {
            portmap_client::unset(self.portmapper, self.entry).await
        } else {
            Ok(false)
        };

        let _ = self.shutdown.send(());
        self.serve.await?;
        info!("Stopped serving on {} {}", self.transport, self.local_addr);
        unpublished
    }
}

/// Binds the configured socket and starts serving `program` on it.
///
/// Binding errors are returned. Publishing errors are only logged and reported
/// through [`ServerHandle::published`].
pub async fn start(config: ServerConfig, program: Arc<dyn RpcProgram>) -> io::Result<ServerHandle> {
    let bind_addr = SocketAddr::new(config.bind_ip, config.port);
    let (local_addr, serving): (SocketAddr, BoxFuture<'static, anyhow::Result<()>>) =
        match config.transport {
            Transport::Tcp => {
                let listener = TcpListener::bind(bind_addr).await?;
                (listener.local_addr()?, serve_tcp(listener, program.clone()).boxed())
            }
            Transport::Udp => {
                let socket = UdpSocket::bind(bind_addr).await?;
                (socket.local_addr()?, serve_udp(socket, program.clone()).boxed())
            }
        };
    info!(
        "Serving program {} version {} on {} {}",
        program.program(),
        program.version(),
        config.transport,
        local_addr
    );

    let entry = mapping {
        prog: program.program(),
        vers: program.version(),
        prot: config.transport.ipproto(),
        port: local_addr.port() as u32,
    };
    let published = config.publish && publish(config.portmapper, entry).await;

    let (shutdown, shutdown_rx) = oneshot::channel();
    let serve = tokio::spawn(async move {
        tokio::select! {
            result = serving => {
                if let Err(e) = result {
                    error!("Serving on {} stopped: {:?}", local_addr, e);
                }
            }
            _ = shutdown_rx => {}
        }
    });

    Ok(ServerHandle {
        local_addr,
        transport: config.transport,
        entry,
        published,
        portmapper: config.portmapper,
        shutdown,
        serve,
    })
}

async fn publish(portmapper: SocketAddr, entry: mapping) -> bool {
    match portmap_client::set(portmapper, entry).await {
        Ok(true) => {
            info!("Published {:?} with portmapper {}", entry, portmapper);
            true
        }
        Ok(false) => {
            warn!("Portmapper {} refused to publish {:?}", portmapper, entry);
            false
        }
        Err(e) => {
            warn!("Cannot publish {:?} with portmapper {}: {:?}", entry, portmapper, e);
            false
        }
    }
}

/// Decodes one RPC message and answers it.
async fn handle_message(message: Vec<u8>, program: Arc<dyn RpcProgram>, sink: ChannelReplySink) {
    let parsed = match parse_call(&message, program.program(), program.version()) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Dropping RPC message: {:?}", e);
            return;
        }
    };
    if let ParsedCall::Reject(reply) = &parsed {
        if let Err(e) = sink.send_message(reply, &[]) {
            warn!("Cannot send RPC rejection: {}", e);
        }
        return;
    }
    if let Some(call) = parsed.call() {
        program.handle(call, &sink).await;
    }
}

async fn serve_tcp(listener: TcpListener, program: Arc<dyn RpcProgram>) -> anyhow::Result<()> {
    // Aborted together with the serving loop
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                debug!("Accepted connection from {}", peer);
                connections.spawn(serve_connection(socket, peer, program.clone()));
            }
            Some(finished) = connections.join_next(), if !connections.is_empty() => {
                match finished {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => debug!("Connection closed: {:?}", e),
                    Err(e) => warn!("Connection task failed: {}", e),
                }
            }
        }
    }
}

async fn serve_connection(
    socket: TcpStream,
    peer: SocketAddr,
    program: Arc<dyn RpcProgram>,
) -> anyhow::Result<()> {
    let _ = socket.set_nodelay(true);
    let (reader, writer) = socket.into_split();
    let (replies, queued) = mpsc::unbounded_channel();
    future::try_join(read_calls(reader, peer, program, replies), write_replies(writer, queued))
        .await?;
    Ok(())
}

async fn read_calls(
    mut reader: OwnedReadHalf,
    peer: SocketAddr,
    program: Arc<dyn RpcProgram>,
    replies: ReplyQueue,
) -> anyhow::Result<()> {
    loop {
        let message = rpc::read_record(&mut reader).await?;
        let sink = ChannelReplySink::new(peer, replies.clone());
        tokio::spawn(handle_message(message, program.clone(), sink));
    }
}

async fn write_replies(
    mut writer: OwnedWriteHalf,
    mut queued: mpsc::UnboundedReceiver<(SocketAddr, Vec<u8>)>,
) -> anyhow::Result<()> {
    while let Some((_, reply)) = queued.recv().await {
        rpc::write_fragment(&mut writer, &reply).await?;
    }
    Ok(())
}

async fn serve_udp(socket: UdpSocket, program: Arc<dyn RpcProgram>) -> anyhow::Result<()> {
    let (replies, mut queued) = mpsc::unbounded_channel();
    let mut buf = vec![0_u8; MAX_UDP_DATAGRAM];
    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, peer)) => {
                    let sink = ChannelReplySink::new(peer, replies.clone());
                    tokio::spawn(handle_message(buf[..len].to_vec(), program.clone(), sink));
                }
                Err(e) => warn!("UDP receive failed: {}", e),
            },
            Some((peer, reply)) = queued.recv() => {
                if let Err(e) = socket.send_to(&reply, peer).await {
                    warn!("UDP reply to {} failed: {}", peer, e);
                }
            }
        }
    }
}
