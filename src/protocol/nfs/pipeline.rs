//! The decode → callback → encode pipeline shared by every MOUNT and NFS procedure.
//!
//! Each procedure handler is a single call to [`dispatch`] naming the procedure,
//! its argument type (inferred from the callback) and the callback itself. The
//! checks run in a fixed order and the first failure decides the reply:
//!
//! 1. the arguments must decode (`GARBAGE_ARGS`);
//! 2. decoding must consume every argument byte (`GARBAGE_ARGS`);
//! 3. the callback runs, and its result must satisfy [`ResultContract`] (`SYSTEM_ERR`);
//! 4. the result must encode (`SYSTEM_ERR`).
//!
//! Every failure is logged once through the program's error hook before the error
//! reply is attempted, and a failure to hand any reply to the transport is logged
//! once more.

use std::fmt::Debug;
use std::future::Future;
use std::io;

use thiserror::Error;
use tracing::debug;

use crate::protocol::rpc::{AcceptError, ReplySink, RpcCall};
use crate::protocol::xdr::{self, Deserialize, Serialize};

/// Error-logging hook of a callback implementation.
pub type ErrorLog<'a> = &'a (dyn Fn(&DispatchError) + Sync);

/// Every way a call can fail inside a program dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{program} procedure {proc} is not available")]
    ProcUnavail { program: &'static str, proc: u32 },

    #[error("{proc_name} called with {len} argument bytes, expected none")]
    NullArguments { proc_name: &'static str, len: usize },

    #[error("{proc_name} arguments could not be decoded: {source}")]
    Decode {
        proc_name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{proc_name} arguments decoded from {consumed} of {len} bytes")]
    TrailingBytes { proc_name: &'static str, consumed: usize, len: usize },

    #[error("{proc_name} result violates the protocol: {reason}")]
    Contract { proc_name: &'static str, reason: String },

    #[error("{proc_name} result could not be encoded: {source}")]
    Encode {
        proc_name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{proc_name} reply could not be sent: {source}")]
    Send {
        proc_name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error(
        "call for program {prog} version {vers} delivered to the dispatcher of \
         program {expected_prog} version {expected_vers}"
    )]
    Routing { prog: u32, vers: u32, expected_prog: u32, expected_vers: u32 },
}

impl DispatchError {
    /// Reply category sent back for this error, if any.
    ///
    /// `Send` failures get no further reply and `Routing` failures abort the call.
    pub fn reply(&self) -> Option<AcceptError> {
        match self {
            DispatchError::ProcUnavail { .. } => Some(AcceptError::ProcUnavail),
            DispatchError::NullArguments { .. }
            | DispatchError::Decode { .. }
            | DispatchError::TrailingBytes { .. } => Some(AcceptError::GarbageArgs),
            DispatchError::Contract { .. } | DispatchError::Encode { .. } => {
                Some(AcceptError::SystemErr)
            }
            DispatchError::Send { .. } | DispatchError::Routing { .. } => None,
        }
    }

    /// Name of the procedure (or program) the error belongs to.
    pub fn proc_name(&self) -> &'static str {
        match self {
            DispatchError::ProcUnavail { program, .. } => program,
            DispatchError::NullArguments { proc_name, .. }
            | DispatchError::Decode { proc_name, .. }
            | DispatchError::TrailingBytes { proc_name, .. }
            | DispatchError::Contract { proc_name, .. }
            | DispatchError::Encode { proc_name, .. }
            | DispatchError::Send { proc_name, .. } => proc_name,
            DispatchError::Routing { .. } => "routing",
        }
    }
}

/// Protocol rules a callback result must satisfy beyond being encodable.
pub trait ResultContract {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl ResultContract for () {}

impl<T, E> ResultContract for xdr::nfs3::Nfs3Result<T, E> {}

/// Aborts the process when the transport routed a foreign call to this program.
pub fn check_routing(call: &RpcCall<'_>, program: u32, version: u32, log: ErrorLog<'_>) {
    if call.prog != program || call.vers != version {
        let err = DispatchError::Routing {
            prog: call.prog,
            vers: call.vers,
            expected_prog: program,
            expected_vers: version,
        };
        log(&err);
        panic!("{err}");
    }
}

/// Logs `err` and answers the call with its reply category.
pub fn reject(xid: u32, err: DispatchError, sink: &dyn ReplySink, log: ErrorLog<'_>) {
    log(&err);
    let Some(reply) = err.reply() else {
        return;
    };
    if let Err(source) = sink.send_error(xid, reply) {
        log(&DispatchError::Send { proc_name: err.proc_name(), source });
    }
}

fn send_success(
    proc_name: &'static str,
    xid: u32,
    results: &[u8],
    sink: &dyn ReplySink,
    log: ErrorLog<'_>,
) {
    if let Err(source) = sink.send_success(xid, results) {
        log(&DispatchError::Send { proc_name, source });
    }
}

/// Runs a NULL procedure: no arguments, no results.
pub async fn dispatch_null<F, Fut>(
    proc_name: &'static str,
    call: RpcCall<'_>,
    sink: &dyn ReplySink,
    log: ErrorLog<'_>,
    invoke: F,
) where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    if !call.args.is_empty() {
        let err = DispatchError::NullArguments { proc_name, len: call.args.len() };
        reject(call.xid, err, sink, log);
        return;
    }
    debug!("{}({})", proc_name, call.xid);
    invoke().await;
    send_success(proc_name, call.xid, &[], sink, log);
}

/// Runs one procedure through decode, callback, contract check and encode.
pub async fn dispatch<A, R, F, Fut>(
    proc_name: &'static str,
    call: RpcCall<'_>,
    sink: &dyn ReplySink,
    log: ErrorLog<'_>,
    invoke: F,
) where
    A: Deserialize + Default + Debug,
    R: Serialize + ResultContract + Debug,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = R>,
{
    match run(proc_name, call, invoke).await {
        Ok(results) => send_success(proc_name, call.xid, &results, sink, log),
        Err(err) => reject(call.xid, err, sink, log),
    }
}

async fn run<A, R, F, Fut>(
    proc_name: &'static str,
    call: RpcCall<'_>,
    invoke: F,
) -> Result<Vec<u8>, DispatchError>
where
    A: Deserialize + Default + Debug,
    R: Serialize + ResultContract + Debug,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = R>,
{
    let (args, consumed) =
        xdr::unpack::<A>(call.args).map_err(|source| DispatchError::Decode { proc_name, source })?;
    if consumed != call.args.len() {
        return Err(DispatchError::TrailingBytes { proc_name, consumed, len: call.args.len() });
    }
    debug!("{}({}) {:?}", proc_name, call.xid, args);

    let result = invoke(args).await;
    debug!("{}({}) -> {:?}", proc_name, call.xid, result);

    result.check().map_err(|reason| DispatchError::Contract { proc_name, reason })?;
    xdr::pack(&result).map_err(|source| DispatchError::Encode { proc_name, source })
}
