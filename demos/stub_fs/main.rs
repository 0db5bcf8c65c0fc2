use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use async_trait::async_trait;
use nfsd3::protocol::nfs::{MountDispatcher, MountV3, NFSv3, NfsDispatcher};
use nfsd3::server::{self, ServerConfig};
use nfsd3::xdr::mount::{fhandle3, mountres3, mountres3_ok, mountstat3, MNT3args, UMNT3args};
use nfsd3::xdr::nfs3::*;
use nfsd3::xdr::rpc::{auth_flavor, auth_unix};
use tracing::info;

/// Port number on which the NFS program listens; MOUNT takes the next one
const HOSTPORT: u16 = 11111;

const ROOT_HANDLE: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

/// Exports an empty, read-only root directory and refuses everything else.
struct StubFS;

fn refuse<T, E: Default>() -> Nfs3Result<T, E> {
    Nfs3Result::Err((nfsstat3::NFS3ERR_NOTSUPP, E::default()))
}

fn root_attributes() -> fattr3 {
    fattr3 { ftype: ftype3::NF3DIR, mode: 0o555, nlink: 2, fileid: 1, ..Default::default() }
}

fn is_root(handle: &nfs_fh3) -> bool {
    handle.data == ROOT_HANDLE
}

#[async_trait]
impl MountV3 for StubFS {
    async fn mnt(&self, auth: &auth_unix, args: MNT3args) -> mountres3 {
        info!("mount {:?} by uid {}", args.dirpath, auth.uid);
        if &args.dirpath[..] != b"/" {
            return mountres3::Err(mountstat3::MNT3ERR_NOENT);
        }
        mountres3::Ok(mountres3_ok {
            fhandle: fhandle3::from(&ROOT_HANDLE[..]),
            auth_flavors: vec![auth_flavor::AUTH_UNIX as u32],
        })
    }

    async fn umnt(&self, _auth: &auth_unix, args: UMNT3args) {
        info!("unmount {:?}", args.dirpath);
    }
}

#[async_trait]
impl NFSv3 for StubFS {
    async fn getattr(&self, _auth: &auth_unix, args: GETATTR3args) -> GETATTR3res {
        if !is_root(&args.object) {
            return Nfs3Result::Err((nfsstat3::NFS3ERR_STALE, ()));
        }
        Nfs3Result::Ok(GETATTR3resok { obj_attributes: root_attributes() })
    }

    async fn setattr(&self, _auth: &auth_unix, _args: SETATTR3args) -> SETATTR3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, SETATTR3resfail::default()))
    }

    async fn lookup(&self, _auth: &auth_unix, args: LOOKUP3args) -> LOOKUP3res {
        let status =
            if is_root(&args.what.dir) { nfsstat3::NFS3ERR_NOENT } else { nfsstat3::NFS3ERR_STALE };
        Nfs3Result::Err((status, LOOKUP3resfail::default()))
    }

    async fn access(&self, _auth: &auth_unix, _args: ACCESS3args) -> ACCESS3res {
        refuse()
    }

    async fn readlink(&self, _auth: &auth_unix, _args: READLINK3args) -> READLINK3res {
        refuse()
    }

    async fn read(&self, _auth: &auth_unix, _args: READ3args) -> READ3res {
        refuse()
    }

    async fn write(&self, _auth: &auth_unix, _args: WRITE3args) -> WRITE3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, WRITE3resfail::default()))
    }

    async fn create(&self, _auth: &auth_unix, _args: CREATE3args) -> CREATE3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, CREATE3resfail::default()))
    }

    async fn mkdir(&self, _auth: &auth_unix, _args: MKDIR3args) -> MKDIR3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, MKDIR3resfail::default()))
    }

    async fn symlink(&self, _auth: &auth_unix, _args: SYMLINK3args) -> SYMLINK3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, SYMLINK3resfail::default()))
    }

    async fn remove(&self, _auth: &auth_unix, _args: REMOVE3args) -> REMOVE3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, REMOVE3resfail::default()))
    }

    async fn rmdir(&self, _auth: &auth_unix, _args: RMDIR3args) -> RMDIR3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, RMDIR3resfail::default()))
    }

    async fn rename(&self, _auth: &auth_unix, _args: RENAME3args) -> RENAME3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, RENAME3resfail::default()))
    }

    async fn link(&self, _auth: &auth_unix, _args: LINK3args) -> LINK3res {
        Nfs3Result::Err((nfsstat3::NFS3ERR_ROFS, LINK3resfail::default()))
    }

    async fn readdir(&self, _auth: &auth_unix, _args: READDIR3args) -> READDIR3res {
        refuse()
    }

    async fn readdirplus(&self, _auth: &auth_unix, _args: READDIRPLUS3args) -> READDIRPLUS3res {
        refuse()
    }

    async fn fsstat(&self, _auth: &auth_unix, _args: FSSTAT3args) -> FSSTAT3res {
        refuse()
    }

    async fn fsinfo(&self, _auth: &auth_unix, _args: FSINFO3args) -> FSINFO3res {
        refuse()
    }

    async fn pathconf(&self, _auth: &auth_unix, _args: PATHCONF3args) -> PATHCONF3res {
        refuse()
    }

    async fn commit(&self, _auth: &auth_unix, _args: COMMIT3args) -> COMMIT3res {
        refuse()
    }
}

/// Serves the stub export over TCP until interrupted.
///
/// Usage: stubfs [PORT] [--publish]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let mut port = HOSTPORT;
    let mut publish = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--publish" => publish = true,
            _ => port = arg.parse()?,
        }
    }

    let fs = Arc::new(StubFS);
    let config = ServerConfig::default()
        .with_bind_ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
        .with_publish(publish);
    let nfs = server::start(
        config.clone().with_port(port),
        Arc::new(NfsDispatcher::new(fs.clone() as Arc<dyn NFSv3>)),
    )
    .await?;
    let mount = server::start(
        config.with_port(port.saturating_add(1)),
        Arc::new(MountDispatcher::new(fs as Arc<dyn MountV3>)),
    )
    .await?;

    println!(
        "You can mount it with: sudo mount -o proto=tcp,port={},mountport={},nolock,addr=127.0.0.1 127.0.0.1:/ /mnt/nfs",
        nfs.local_addr().port(),
        mount.local_addr().port()
    );

    tokio::signal::ctrl_c().await?;
    mount.stop(publish).await?;
    nfs.stop(publish).await?;
    Ok(())
}
