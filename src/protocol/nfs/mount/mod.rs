//! MOUNT protocol dispatcher for version 3 as specified in RFC 1813 Appendix I.
//! https://datatracker.ietf.org/doc/html/rfc1813#appendix-I
//!
//! Only NULL, MNT and UMNT are served. DUMP, UMNTALL and EXPORT are answered with
//! PROC_UNAVAIL like any other unknown procedure.

use std::sync::Arc;

use async_trait::async_trait;
use num_traits::cast::FromPrimitive;
use tracing::error;

use super::pipeline::{self, DispatchError, ResultContract};
use crate::protocol::rpc::{ReplySink, RpcCall, RpcProgram};
use crate::protocol::xdr::mount::{self, mountres3, MountProgram, MNT3args, UMNT3args};
use crate::protocol::xdr::rpc::{auth_flavor, auth_unix};

/// Semantic side of the MOUNT program.
///
/// Implementations receive the caller's AUTH_UNIX credentials with every call.
/// Failures are reported through the returned status, never as a Rust error.
#[async_trait]
pub trait MountV3: Send + Sync {
    /// MOUNTPROC3_NULL
    async fn null(&self, _auth: &auth_unix) {}

    /// MOUNTPROC3_MNT: maps a server path to the file handle of its root.
    ///
    /// A successful result must list exactly one authentication flavor, AUTH_UNIX.
    async fn mnt(&self, auth: &auth_unix, args: MNT3args) -> mountres3;

    /// MOUNTPROC3_UMNT: forgets a previous mount of `args.dirpath` by this client.
    async fn umnt(&self, auth: &auth_unix, args: UMNT3args);

    /// Receives every diagnostic produced while dispatching a call.
    fn log_error(&self, err: &DispatchError) {
        error!("mount: {}", err);
    }
}

impl ResultContract for mountres3 {
    fn check(&self) -> Result<(), String> {
        match self {
            mountres3::Ok(ok) if ok.auth_flavors != [auth_flavor::AUTH_UNIX as u32] => Err(format!(
                "successful mount lists auth flavors {:?}, expected exactly [AUTH_UNIX]",
                ok.auth_flavors
            )),
            _ => Ok(()),
        }
    }
}

/// [`RpcProgram`] serving MOUNT version 3 on top of a [`MountV3`] implementation.
#[derive(Clone)]
pub struct MountDispatcher {
    callbacks: Arc<dyn MountV3>,
}

impl MountDispatcher {
    pub fn new(callbacks: Arc<dyn MountV3>) -> Self {
        Self { callbacks }
    }
}

#[async_trait]
impl RpcProgram for MountDispatcher {
    fn program(&self) -> u32 {
        mount::PROGRAM
    }

    fn version(&self) -> u32 {
        mount::VERSION
    }

    async fn handle(&self, call: RpcCall<'_>, sink: &dyn ReplySink) {
        let callbacks = self.callbacks.as_ref();
        let log = |err: &DispatchError| callbacks.log_error(err);
        pipeline::check_routing(&call, mount::PROGRAM, mount::VERSION, &log);

        let auth = call.auth;
        match MountProgram::from_u32(call.proc).unwrap_or(MountProgram::INVALID) {
            MountProgram::MOUNTPROC3_NULL => {
                pipeline::dispatch_null("MOUNTPROC3_NULL", call, sink, &log, || {
                    callbacks.null(auth)
                })
                .await
            }
            MountProgram::MOUNTPROC3_MNT => {
                pipeline::dispatch("MOUNTPROC3_MNT", call, sink, &log, |args| {
                    callbacks.mnt(auth, args)
                })
                .await
            }
            MountProgram::MOUNTPROC3_UMNT => {
                pipeline::dispatch("MOUNTPROC3_UMNT", call, sink, &log, |args| {
                    callbacks.umnt(auth, args)
                })
                .await
            }
            MountProgram::INVALID => {
                let err = DispatchError::ProcUnavail { program: "MOUNT", proc: call.proc };
                pipeline::reject(call.xid, err, sink, &log);
            }
        }
    }
}
