use std::fmt::Debug;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use nfsd3::protocol::nfs::{DispatchError, MountV3, NFSv3};
use nfsd3::protocol::rpc::{AcceptError, ReplySink, RpcCall};
use nfsd3::xdr::mount::{fhandle3, mountres3, mountres3_ok, MNT3args, UMNT3args};
use nfsd3::xdr::nfs3::*;
use nfsd3::xdr::rpc::{auth_flavor, auth_unix};

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn call<'a>(prog: u32, vers: u32, proc: u32, auth: &'a auth_unix, args: &'a [u8]) -> RpcCall<'a> {
    RpcCall { xid: 77, prog, vers, proc, auth, args }
}

#[allow(dead_code)]
pub fn root_handle() -> nfs_fh3 {
    nfs_fh3::from(vec![0xfe, 0xed, 0, 1])
}

#[allow(dead_code)]
pub fn file_attributes() -> fattr3 {
    fattr3 {
        ftype: ftype3::NF3REG,
        mode: 0o644,
        nlink: 1,
        uid: 1000,
        gid: 1000,
        size: 1234,
        used: 4096,
        fileid: 42,
        ..Default::default()
    }
}

#[allow(dead_code)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Success { xid: u32, results: Vec<u8> },
    Error { xid: u32, err: AcceptError },
}

/// ReplySink that keeps every reply; with `failing` set it refuses them all.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingSink {
    pub failing: bool,
    replies: Mutex<Vec<Reply>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn failing() -> Self {
        Self { failing: true, ..Default::default() }
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }

    /// The single reply sent so far.
    pub fn only(&self) -> Reply {
        let replies = self.replies();
        assert_eq!(replies.len(), 1, "expected exactly one reply, got {replies:?}");
        replies[0].clone()
    }

    pub fn success(&self) -> Vec<u8> {
        match self.only() {
            Reply::Success { results, .. } => results,
            other => panic!("expected a successful reply, got {other:?}"),
        }
    }

    pub fn error(&self) -> AcceptError {
        match self.only() {
            Reply::Error { err, .. } => err,
            other => panic!("expected an error reply, got {other:?}"),
        }
    }

    fn push(&self, reply: Reply) -> io::Result<()> {
        if self.failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }
}

impl ReplySink for RecordingSink {
    fn send_success(&self, xid: u32, results: &[u8]) -> io::Result<()> {
        self.push(Reply::Success { xid, results: results.to_vec() })
    }

    fn send_error(&self, xid: u32, err: AcceptError) -> io::Result<()> {
        self.push(Reply::Error { xid, err })
    }
}

/// Log of the diagnostics handed to `log_error`.
#[derive(Default)]
pub struct ErrorLog(Mutex<Vec<String>>);

impl ErrorLog {
    pub fn push(&self, err: &DispatchError) {
        self.0.lock().unwrap().push(err.to_string());
    }

    #[allow(dead_code)]
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[allow(dead_code)]
pub struct RecordingMount {
    pub mnt_result: mountres3,
    pub calls: Mutex<Vec<String>>,
    pub errors: ErrorLog,
}

#[allow(dead_code)]
impl RecordingMount {
    pub fn new(mnt_result: mountres3) -> Self {
        Self { mnt_result, calls: Mutex::default(), errors: ErrorLog::default() }
    }

    pub fn mounting(fhandle: &[u8], auth_flavors: Vec<u32>) -> Self {
        Self::new(mountres3::Ok(mountres3_ok { fhandle: fhandle3::from(fhandle), auth_flavors }))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MountV3 for RecordingMount {
    async fn null(&self, _auth: &auth_unix) {
        self.calls.lock().unwrap().push("null".to_string());
    }

    async fn mnt(&self, auth: &auth_unix, args: MNT3args) -> mountres3 {
        self.calls.lock().unwrap().push(format!("mnt {} uid={}", args.dirpath, auth.uid));
        self.mnt_result.clone()
    }

    async fn umnt(&self, _auth: &auth_unix, args: UMNT3args) {
        self.calls.lock().unwrap().push(format!("umnt {}", args.dirpath));
    }

    fn log_error(&self, err: &DispatchError) {
        self.errors.push(err);
    }
}

/// AUTH_UNIX as the only flavor a successful mount may report.
#[allow(dead_code)]
pub fn unix_flavor() -> Vec<u32> {
    vec![auth_flavor::AUTH_UNIX as u32]
}

/// NFSv3 implementation answering every procedure with `status`.
///
/// With `NFS3_OK` each procedure returns its default success body, except
/// GETATTR and LOOKUP which return [`file_attributes`]. Failures carry default
/// reduced bodies, except REMOVE whose directory WCC data is filled in.
#[allow(dead_code)]
pub struct RecordingNfs {
    pub status: nfsstat3,
    /// Report failures with an `NFS3_OK` status, which cannot be encoded
    pub inconsistent: bool,
    pub calls: Mutex<Vec<String>>,
    /// Debug rendering of every decoded argument structure, in call order
    pub args: Mutex<Vec<String>>,
    pub errors: ErrorLog,
}

#[allow(dead_code)]
impl RecordingNfs {
    pub fn new(status: nfsstat3) -> Self {
        Self {
            status,
            inconsistent: false,
            calls: Mutex::default(),
            args: Mutex::default(),
            errors: ErrorLog::default(),
        }
    }

    pub fn inconsistent() -> Self {
        Self { inconsistent: true, ..Self::new(nfsstat3::NFS3_OK) }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn args(&self) -> Vec<String> {
        self.args.lock().unwrap().clone()
    }

    fn seen(&self, args: &impl Debug) {
        self.args.lock().unwrap().push(format!("{args:?}"));
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn result<T: Default, E: Default>(&self, proc: &str) -> Nfs3Result<T, E> {
        self.record(proc);
        if self.inconsistent {
            Nfs3Result::Err((nfsstat3::NFS3_OK, E::default()))
        } else if self.status == nfsstat3::NFS3_OK {
            Nfs3Result::Ok(T::default())
        } else {
            Nfs3Result::Err((self.status, E::default()))
        }
    }
}

#[allow(dead_code)]
pub fn directory_wcc() -> wcc_data {
    wcc_data {
        before: Some(wcc_attr { size: 512, ..Default::default() }),
        after: Some(fattr3 { ftype: ftype3::NF3DIR, fileid: 1, ..Default::default() }),
    }
}

#[async_trait]
impl NFSv3 for RecordingNfs {
    async fn null(&self, _auth: &auth_unix) {
        self.record("null");
    }

    async fn getattr(&self, _auth: &auth_unix, args: GETATTR3args) -> GETATTR3res {
        self.seen(&args);
        self.record("getattr");
        if self.status == nfsstat3::NFS3_OK {
            Nfs3Result::Ok(GETATTR3resok { obj_attributes: file_attributes() })
        } else {
            Nfs3Result::Err((self.status, ()))
        }
    }

    async fn setattr(&self, _auth: &auth_unix, args: SETATTR3args) -> SETATTR3res {
        self.seen(&args);
        self.result("setattr")
    }

    async fn lookup(&self, _auth: &auth_unix, args: LOOKUP3args) -> LOOKUP3res {
        self.seen(&args);
        self.record(format!("lookup {}", args.what.name));
        if self.status == nfsstat3::NFS3_OK {
            Nfs3Result::Ok(LOOKUP3resok {
                object: nfs_fh3::from(vec![7; 8]),
                obj_attributes: Some(file_attributes()),
                dir_attributes: None,
            })
        } else {
            Nfs3Result::Err((self.status, LOOKUP3resfail::default()))
        }
    }

    async fn access(&self, _auth: &auth_unix, args: ACCESS3args) -> ACCESS3res {
        self.seen(&args);
        self.result("access")
    }

    async fn readlink(&self, _auth: &auth_unix, args: READLINK3args) -> READLINK3res {
        self.seen(&args);
        self.result("readlink")
    }

    async fn read(&self, _auth: &auth_unix, args: READ3args) -> READ3res {
        self.seen(&args);
        self.result("read")
    }

    async fn write(&self, _auth: &auth_unix, args: WRITE3args) -> WRITE3res {
        self.seen(&args);
        self.record(format!("write {} bytes", args.data.len()));
        if self.status == nfsstat3::NFS3_OK {
            Nfs3Result::Ok(WRITE3resok {
                count: args.data.len() as u32,
                committed: args.stable,
                ..Default::default()
            })
        } else {
            Nfs3Result::Err((self.status, WRITE3resfail::default()))
        }
    }

    async fn create(&self, _auth: &auth_unix, args: CREATE3args) -> CREATE3res {
        self.seen(&args);
        self.result(&format!("create {} {:?}", args.dirops.name, args.how))
    }

    async fn mkdir(&self, _auth: &auth_unix, args: MKDIR3args) -> MKDIR3res {
        self.seen(&args);
        self.result("mkdir")
    }

    async fn symlink(&self, _auth: &auth_unix, args: SYMLINK3args) -> SYMLINK3res {
        self.seen(&args);
        self.result("symlink")
    }

    async fn remove(&self, _auth: &auth_unix, args: REMOVE3args) -> REMOVE3res {
        self.seen(&args);
        self.record(format!("remove {}", args.object.name));
        if self.status == nfsstat3::NFS3_OK {
            Nfs3Result::Ok(REMOVE3resok { dir_wcc: directory_wcc() })
        } else {
            Nfs3Result::Err((self.status, REMOVE3resfail { dir_wcc: directory_wcc() }))
        }
    }

    async fn rmdir(&self, _auth: &auth_unix, args: RMDIR3args) -> RMDIR3res {
        self.seen(&args);
        self.result("rmdir")
    }

    async fn rename(&self, _auth: &auth_unix, args: RENAME3args) -> RENAME3res {
        self.seen(&args);
        self.result("rename")
    }

    async fn link(&self, _auth: &auth_unix, args: LINK3args) -> LINK3res {
        self.seen(&args);
        self.result("link")
    }

    async fn readdir(&self, _auth: &auth_unix, args: READDIR3args) -> READDIR3res {
        self.seen(&args);
        self.result("readdir")
    }

    async fn readdirplus(&self, _auth: &auth_unix, args: READDIRPLUS3args) -> READDIRPLUS3res {
        self.seen(&args);
        self.result("readdirplus")
    }

    async fn fsstat(&self, _auth: &auth_unix, args: FSSTAT3args) -> FSSTAT3res {
        self.seen(&args);
        self.result("fsstat")
    }

    async fn fsinfo(&self, _auth: &auth_unix, args: FSINFO3args) -> FSINFO3res {
        self.seen(&args);
        self.result("fsinfo")
    }

    async fn pathconf(&self, _auth: &auth_unix, args: PATHCONF3args) -> PATHCONF3res {
        self.seen(&args);
        self.result("pathconf")
    }

    async fn commit(&self, _auth: &auth_unix, args: COMMIT3args) -> COMMIT3res {
        self.seen(&args);
        self.result("commit")
    }

    fn log_error(&self, err: &DispatchError) {
        self.errors.push(err);
    }
}
