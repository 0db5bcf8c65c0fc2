//! NFSv3 (Network File System version 3) dispatcher as specified in RFC 1813.
//!
//! The program serves 21 of the 22 procedures of RFC 1813, all but MKNOD:
//!
//! 1. NULL - Do nothing (ping the server)
//! 2. GETATTR - Get file attributes
//! 3. SETATTR - Set file attributes
//! 4. LOOKUP - Look up file name
//! 5. ACCESS - Check access permission
//! 6. READLINK - Read from symbolic link
//! 7. READ - Read from file
//! 8. WRITE - Write to file
//! 9. CREATE - Create a file
//! 10. MKDIR - Create a directory
//! 11. SYMLINK - Create a symbolic link
//! 12. REMOVE - Remove a file
//! 13. RMDIR - Remove a directory
//! 14. RENAME - Rename a file or directory
//! 15. LINK - Create a hard link
//! 16. READDIR - Read from directory
//! 17. READDIRPLUS - Extended read from directory
//! 18. FSSTAT - Get file system statistics
//! 19. FSINFO - Get file system information
//! 20. PATHCONF - Get path configuration
//! 21. COMMIT - Commit cached data
//!
//! Every procedure is one row of the table in [`NfsDispatcher`]'s `handle`, which
//! routes the call through the shared pipeline to the matching [`NFSv3`] method.
//! MKNOD and unassigned procedure numbers are answered with PROC_UNAVAIL.

use std::sync::Arc;

use async_trait::async_trait;
use num_traits::cast::FromPrimitive;
use tracing::error;

use super::pipeline::{self, DispatchError};
use crate::protocol::rpc::{ReplySink, RpcCall, RpcProgram};
use crate::protocol::xdr::nfs3::*;
use crate::protocol::xdr::rpc::auth_unix;

/// Semantic side of the NFS version 3 program.
///
/// Each method receives the caller's AUTH_UNIX credentials and the decoded
/// arguments of one procedure, and returns its result. Filesystem failures travel
/// as the status of an `Nfs3Result::Err`, together with the procedure's reduced
/// failure body; there is no separate error channel.
///
/// The dispatcher may call any method concurrently from many tasks.
#[async_trait]
pub trait NFSv3: Send + Sync {
    /// NFSPROC3_NULL
    async fn null(&self, _auth: &auth_unix) {}

    async fn getattr(&self, auth: &auth_unix, args: GETATTR3args) -> GETATTR3res;

    async fn setattr(&self, auth: &auth_unix, args: SETATTR3args) -> SETATTR3res;

    async fn lookup(&self, auth: &auth_unix, args: LOOKUP3args) -> LOOKUP3res;

    async fn access(&self, auth: &auth_unix, args: ACCESS3args) -> ACCESS3res;

    async fn readlink(&self, auth: &auth_unix, args: READLINK3args) -> READLINK3res;

    async fn read(&self, auth: &auth_unix, args: READ3args) -> READ3res;

    async fn write(&self, auth: &auth_unix, args: WRITE3args) -> WRITE3res;

    /// The creation mode and its payload arrive as one [`createhow3`] value.
    async fn create(&self, auth: &auth_unix, args: CREATE3args) -> CREATE3res;

    async fn mkdir(&self, auth: &auth_unix, args: MKDIR3args) -> MKDIR3res;

    async fn symlink(&self, auth: &auth_unix, args: SYMLINK3args) -> SYMLINK3res;

    /// Both outcomes carry the directory's WCC data.
    async fn remove(&self, auth: &auth_unix, args: REMOVE3args) -> REMOVE3res;

    async fn rmdir(&self, auth: &auth_unix, args: RMDIR3args) -> RMDIR3res;

    async fn rename(&self, auth: &auth_unix, args: RENAME3args) -> RENAME3res;

    async fn link(&self, auth: &auth_unix, args: LINK3args) -> LINK3res;

    async fn readdir(&self, auth: &auth_unix, args: READDIR3args) -> READDIR3res;

    async fn readdirplus(&self, auth: &auth_unix, args: READDIRPLUS3args) -> READDIRPLUS3res;

    async fn fsstat(&self, auth: &auth_unix, args: FSSTAT3args) -> FSSTAT3res;

    async fn fsinfo(&self, auth: &auth_unix, args: FSINFO3args) -> FSINFO3res;

    async fn pathconf(&self, auth: &auth_unix, args: PATHCONF3args) -> PATHCONF3res;

    async fn commit(&self, auth: &auth_unix, args: COMMIT3args) -> COMMIT3res;

    /// Receives every diagnostic produced while dispatching a call.
    fn log_error(&self, err: &DispatchError) {
        error!("nfs: {}", err);
    }
}

/// [`RpcProgram`] serving NFS version 3 on top of an [`NFSv3`] implementation.
#[derive(Clone)]
pub struct NfsDispatcher {
    callbacks: Arc<dyn NFSv3>,
}

impl NfsDispatcher {
    pub fn new(callbacks: Arc<dyn NFSv3>) -> Self {
        Self { callbacks }
    }
}

#[async_trait]
impl RpcProgram for NfsDispatcher {
    fn program(&self) -> u32 {
        PROGRAM
    }

    fn version(&self) -> u32 {
        VERSION
    }

    async fn handle(&self, call: RpcCall<'_>, sink: &dyn ReplySink) {
        let fs = self.callbacks.as_ref();
        let log = |err: &DispatchError| fs.log_error(err);
        pipeline::check_routing(&call, PROGRAM, VERSION, &log);

        let auth = call.auth;
        let log = &log;
        match NFSProgram::from_u32(call.proc).unwrap_or(NFSProgram::INVALID) {
            NFSProgram::NFSPROC3_NULL => {
                pipeline::dispatch_null("NFSPROC3_NULL", call, sink, log, || fs.null(auth)).await
            }
            NFSProgram::NFSPROC3_GETATTR => {
                pipeline::dispatch("NFSPROC3_GETATTR", call, sink, log, |args| {
                    fs.getattr(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_SETATTR => {
                pipeline::dispatch("NFSPROC3_SETATTR", call, sink, log, |args| {
                    fs.setattr(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_LOOKUP => {
                pipeline::dispatch("NFSPROC3_LOOKUP", call, sink, log, |args| {
                    fs.lookup(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_ACCESS => {
                pipeline::dispatch("NFSPROC3_ACCESS", call, sink, log, |args| {
                    fs.access(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_READLINK => {
                pipeline::dispatch("NFSPROC3_READLINK", call, sink, log, |args| {
                    fs.readlink(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_READ => {
                pipeline::dispatch("NFSPROC3_READ", call, sink, log, |args| fs.read(auth, args))
                    .await
            }
            NFSProgram::NFSPROC3_WRITE => {
                pipeline::dispatch("NFSPROC3_WRITE", call, sink, log, |args| {
                    fs.write(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_CREATE => {
                pipeline::dispatch("NFSPROC3_CREATE", call, sink, log, |args| {
                    fs.create(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_MKDIR => {
                pipeline::dispatch("NFSPROC3_MKDIR", call, sink, log, |args| {
                    fs.mkdir(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_SYMLINK => {
                pipeline::dispatch("NFSPROC3_SYMLINK", call, sink, log, |args| {
                    fs.symlink(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_REMOVE => {
                pipeline::dispatch("NFSPROC3_REMOVE", call, sink, log, |args| {
                    fs.remove(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_RMDIR => {
                pipeline::dispatch("NFSPROC3_RMDIR", call, sink, log, |args| {
                    fs.rmdir(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_RENAME => {
                pipeline::dispatch("NFSPROC3_RENAME", call, sink, log, |args| {
                    fs.rename(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_LINK => {
                pipeline::dispatch("NFSPROC3_LINK", call, sink, log, |args| fs.link(auth, args))
                    .await
            }
            NFSProgram::NFSPROC3_READDIR => {
                pipeline::dispatch("NFSPROC3_READDIR", call, sink, log, |args| {
                    fs.readdir(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_READDIRPLUS => {
                pipeline::dispatch("NFSPROC3_READDIRPLUS", call, sink, log, |args| {
                    fs.readdirplus(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_FSSTAT => {
                pipeline::dispatch("NFSPROC3_FSSTAT", call, sink, log, |args| {
                    fs.fsstat(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_FSINFO => {
                pipeline::dispatch("NFSPROC3_FSINFO", call, sink, log, |args| {
                    fs.fsinfo(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_PATHCONF => {
                pipeline::dispatch("NFSPROC3_PATHCONF", call, sink, log, |args| {
                    fs.pathconf(auth, args)
                })
                .await
            }
            NFSProgram::NFSPROC3_COMMIT => {
                pipeline::dispatch("NFSPROC3_COMMIT", call, sink, log, |args| {
                    fs.commit(auth, args)
                })
                .await
            }
            NFSProgram::INVALID => {
                let err = DispatchError::ProcUnavail { program: "NFS", proc: call.proc };
                pipeline::reject(call.xid, err, sink, log);
            }
        }
    }
}
