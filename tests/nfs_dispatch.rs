use std::fmt::Debug;
use std::sync::Arc;

mod support;

use nfsd3::protocol::nfs::{NFSv3, NfsDispatcher};
use nfsd3::protocol::rpc::{AcceptError, RpcProgram};
use nfsd3::xdr::nfs3::*;
use nfsd3::xdr::rpc::auth_unix;
use nfsd3::xdr::{pack, unpack, Serialize};

use support::{call, directory_wcc, file_attributes, init_logging, root_handle, RecordingNfs, RecordingSink};

fn dispatcher(fs: &Arc<RecordingNfs>) -> NfsDispatcher {
    NfsDispatcher::new(fs.clone() as Arc<dyn NFSv3>)
}

async fn dispatch(fs: &Arc<RecordingNfs>, proc: NFSProgram, args: &[u8]) -> RecordingSink {
    dispatch_raw(fs, proc as u32, args).await
}

async fn dispatch_raw(fs: &Arc<RecordingNfs>, proc: u32, args: &[u8]) -> RecordingSink {
    let sink = RecordingSink::default();
    let auth = auth_unix { uid: 1000, gid: 1000, ..Default::default() };
    dispatcher(fs).handle(call(PROGRAM, VERSION, proc, &auth, args), &sink).await;
    sink
}

fn dirop(name: &str) -> diropargs3 {
    diropargs3 { dir: root_handle(), name: filename3::from(name) }
}

/// A well-formed argument body for every served procedure.
fn arguments(proc: NFSProgram) -> Vec<u8> {
    let fh = root_handle;
    match proc {
        NFSProgram::NFSPROC3_NULL | NFSProgram::INVALID => Ok(vec![]),
        NFSProgram::NFSPROC3_GETATTR => pack(&GETATTR3args { object: fh() }),
        NFSProgram::NFSPROC3_SETATTR => pack(&SETATTR3args { object: fh(), ..Default::default() }),
        NFSProgram::NFSPROC3_LOOKUP => pack(&LOOKUP3args { what: dirop("a") }),
        NFSProgram::NFSPROC3_ACCESS => {
            pack(&ACCESS3args { object: fh(), access: ACCESS3_READ | ACCESS3_LOOKUP })
        }
        NFSProgram::NFSPROC3_READLINK => pack(&READLINK3args { symlink: fh() }),
        NFSProgram::NFSPROC3_READ => pack(&READ3args { file: fh(), offset: 0, count: 4096 }),
        NFSProgram::NFSPROC3_WRITE => pack(&WRITE3args {
            file: fh(),
            offset: 10,
            count: 3,
            stable: stable_how::FILE_SYNC,
            data: b"abc".to_vec(),
        }),
        NFSProgram::NFSPROC3_CREATE => {
            pack(&CREATE3args { dirops: dirop("new"), how: createhow3::default() })
        }
        NFSProgram::NFSPROC3_MKDIR => {
            pack(&MKDIR3args { dirops: dirop("dir"), attributes: sattr3::default() })
        }
        NFSProgram::NFSPROC3_SYMLINK => pack(&SYMLINK3args {
            dirops: dirop("link"),
            symlink: symlinkdata3 { symlink_data: nfspath3::from("target"), ..Default::default() },
        }),
        NFSProgram::NFSPROC3_REMOVE => pack(&REMOVE3args { object: dirop("old") }),
        NFSProgram::NFSPROC3_RMDIR => pack(&RMDIR3args { object: dirop("dir") }),
        NFSProgram::NFSPROC3_RENAME => pack(&RENAME3args { from: dirop("a"), to: dirop("b") }),
        NFSProgram::NFSPROC3_LINK => pack(&LINK3args { file: fh(), link: dirop("hard") }),
        NFSProgram::NFSPROC3_READDIR => {
            pack(&READDIR3args { dir: fh(), cookie: 0, cookieverf: [0; 8], count: 4096 })
        }
        NFSProgram::NFSPROC3_READDIRPLUS => pack(&READDIRPLUS3args {
            dir: fh(),
            cookie: 0,
            cookieverf: [0; 8],
            dircount: 512,
            maxcount: 4096,
        }),
        NFSProgram::NFSPROC3_FSSTAT => pack(&FSSTAT3args { fsroot: fh() }),
        NFSProgram::NFSPROC3_FSINFO => pack(&FSINFO3args { fsroot: fh() }),
        NFSProgram::NFSPROC3_PATHCONF => pack(&PATHCONF3args { object: fh() }),
        NFSProgram::NFSPROC3_COMMIT => pack(&COMMIT3args { file: fh(), offset: 0, count: 0 }),
    }
    .unwrap()
}

fn encoded<T: Serialize + Debug>(args: T) -> (Vec<u8>, String) {
    (pack(&args).unwrap(), format!("{args:?}"))
}

fn time(seconds: u32) -> nfstime3 {
    nfstime3 { seconds, nseconds: seconds * 2 }
}

fn handle(tag: u8) -> nfs_fh3 {
    nfs_fh3::from(vec![tag; 16])
}

/// Arguments with every field set to a distinct value, with their expected rendering.
fn populated_arguments(proc: NFSProgram) -> (Vec<u8>, String) {
    let attrs = sattr3 {
        mode: Some(0o640),
        uid: Some(11),
        gid: Some(12),
        size: Some(13),
        atime: set_time::SET_TO_CLIENT_TIME(time(14)),
        mtime: set_time::SET_TO_SERVER_TIME,
    };
    let op = |tag: u8, name: &str| diropargs3 { dir: handle(tag), name: filename3::from(name) };
    match proc {
        NFSProgram::NFSPROC3_GETATTR => encoded(GETATTR3args { object: handle(1) }),
        NFSProgram::NFSPROC3_SETATTR => encoded(SETATTR3args {
            object: handle(2),
            new_attributes: attrs,
            guard: Some(time(15)),
        }),
        NFSProgram::NFSPROC3_LOOKUP => encoded(LOOKUP3args { what: op(3, "name") }),
        NFSProgram::NFSPROC3_ACCESS => {
            encoded(ACCESS3args { object: handle(4), access: ACCESS3_DELETE | ACCESS3_EXTEND })
        }
        NFSProgram::NFSPROC3_READLINK => encoded(READLINK3args { symlink: handle(5) }),
        NFSProgram::NFSPROC3_READ => encoded(READ3args { file: handle(6), offset: 1 << 35, count: 17 }),
        NFSProgram::NFSPROC3_WRITE => encoded(WRITE3args {
            file: handle(7),
            offset: 1 << 36,
            count: 4,
            stable: stable_how::DATA_SYNC,
            data: b"data".to_vec(),
        }),
        NFSProgram::NFSPROC3_CREATE => encoded(CREATE3args {
            dirops: op(8, "created"),
            how: createhow3::GUARDED(attrs),
        }),
        NFSProgram::NFSPROC3_MKDIR => encoded(MKDIR3args { dirops: op(9, "made"), attributes: attrs }),
        NFSProgram::NFSPROC3_SYMLINK => encoded(SYMLINK3args {
            dirops: op(10, "sym"),
            symlink: symlinkdata3 { symlink_attributes: attrs, symlink_data: nfspath3::from("../t") },
        }),
        NFSProgram::NFSPROC3_REMOVE => encoded(REMOVE3args { object: op(11, "removed") }),
        NFSProgram::NFSPROC3_RMDIR => encoded(RMDIR3args { object: op(12, "rmdir") }),
        NFSProgram::NFSPROC3_RENAME => encoded(RENAME3args { from: op(13, "from"), to: op(14, "to") }),
        NFSProgram::NFSPROC3_LINK => encoded(LINK3args { file: handle(15), link: op(16, "linked") }),
        NFSProgram::NFSPROC3_READDIR => encoded(READDIR3args {
            dir: handle(17),
            cookie: 18,
            cookieverf: [1, 2, 3, 4, 5, 6, 7, 8],
            count: 19,
        }),
        NFSProgram::NFSPROC3_READDIRPLUS => encoded(READDIRPLUS3args {
            dir: handle(20),
            cookie: 21,
            cookieverf: [8, 7, 6, 5, 4, 3, 2, 1],
            dircount: 22,
            maxcount: 23,
        }),
        NFSProgram::NFSPROC3_FSSTAT => encoded(FSSTAT3args { fsroot: handle(24) }),
        NFSProgram::NFSPROC3_FSINFO => encoded(FSINFO3args { fsroot: handle(25) }),
        NFSProgram::NFSPROC3_PATHCONF => encoded(PATHCONF3args { object: handle(26) }),
        NFSProgram::NFSPROC3_COMMIT => encoded(COMMIT3args { file: handle(27), offset: 28, count: 29 }),
        NFSProgram::NFSPROC3_NULL | NFSProgram::INVALID => (vec![], String::new()),
    }
}

const SERVED: [NFSProgram; 20] = [
    NFSProgram::NFSPROC3_GETATTR,
    NFSProgram::NFSPROC3_SETATTR,
    NFSProgram::NFSPROC3_LOOKUP,
    NFSProgram::NFSPROC3_ACCESS,
    NFSProgram::NFSPROC3_READLINK,
    NFSProgram::NFSPROC3_READ,
    NFSProgram::NFSPROC3_WRITE,
    NFSProgram::NFSPROC3_CREATE,
    NFSProgram::NFSPROC3_MKDIR,
    NFSProgram::NFSPROC3_SYMLINK,
    NFSProgram::NFSPROC3_REMOVE,
    NFSProgram::NFSPROC3_RMDIR,
    NFSProgram::NFSPROC3_RENAME,
    NFSProgram::NFSPROC3_LINK,
    NFSProgram::NFSPROC3_READDIR,
    NFSProgram::NFSPROC3_READDIRPLUS,
    NFSProgram::NFSPROC3_FSSTAT,
    NFSProgram::NFSPROC3_FSINFO,
    NFSProgram::NFSPROC3_PATHCONF,
    NFSProgram::NFSPROC3_COMMIT,
];

#[test]
fn serves_nfs_program_version_3() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    assert_eq!(dispatcher(&fs).program(), 100003);
    assert_eq!(dispatcher(&fs).version(), 3);
}

#[tokio::test]
async fn every_procedure_reaches_its_callback() {
    init_logging();
    for proc in SERVED {
        let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3ERR_IO));
        let sink = dispatch(&fs, proc, &arguments(proc)).await;

        let results = sink.success();
        assert_eq!(&results[..4], &[0, 0, 0, 5], "{proc:?}");
        assert_eq!(fs.calls().len(), 1, "{proc:?}");
        assert!(fs.errors.entries().is_empty(), "{proc:?}");
    }
}

#[tokio::test]
async fn every_procedure_receives_its_arguments() {
    for proc in SERVED {
        let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3ERR_IO));
        let (args, expected) = populated_arguments(proc);
        let sink = dispatch(&fs, proc, &args).await;

        assert_eq!(&sink.success()[..4], &[0, 0, 0, 5], "{proc:?}");
        assert_eq!(fs.args(), vec![expected], "{proc:?}");
    }
}

#[tokio::test]
async fn every_procedure_rejects_trailing_bytes() {
    for proc in SERVED {
        let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
        let mut args = arguments(proc);
        args.extend([0, 0, 0, 0]);
        let sink = dispatch(&fs, proc, &args).await;

        assert_eq!(sink.error(), AcceptError::GarbageArgs, "{proc:?}");
        assert!(fs.calls().is_empty(), "{proc:?}");
        assert_eq!(fs.errors.entries().len(), 1, "{proc:?}");
    }
}

#[tokio::test]
async fn every_procedure_rejects_truncated_arguments() {
    for proc in SERVED {
        let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
        let args = arguments(proc);
        let sink = dispatch(&fs, proc, &args[..args.len() - 1]).await;

        assert_eq!(sink.error(), AcceptError::GarbageArgs, "{proc:?}");
        assert!(fs.calls().is_empty(), "{proc:?}");
    }
}

#[tokio::test]
async fn every_procedure_encodes_its_success_body() {
    for proc in SERVED {
        let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
        let sink = dispatch(&fs, proc, &arguments(proc)).await;

        assert_eq!(&sink.success()[..4], &[0, 0, 0, 0], "{proc:?}");
    }
}

#[tokio::test]
async fn getattr_success_carries_attributes() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let sink =
        dispatch(&fs, NFSProgram::NFSPROC3_GETATTR, &arguments(NFSProgram::NFSPROC3_GETATTR))
            .await;

    let results = sink.success();
    assert_eq!(results.len(), 4 + 84);
    let (res, _) = unpack::<GETATTR3res>(&results).unwrap();
    assert_eq!(res, GETATTR3res::Ok(GETATTR3resok { obj_attributes: file_attributes() }));
}

#[tokio::test]
async fn getattr_failure_is_status_only() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3ERR_STALE));
    let sink =
        dispatch(&fs, NFSProgram::NFSPROC3_GETATTR, &arguments(NFSProgram::NFSPROC3_GETATTR))
            .await;

    assert_eq!(sink.success(), 70_u32.to_be_bytes().to_vec());
}

#[tokio::test]
async fn lookup_decodes_name_and_encodes_handle() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let args = pack(&LOOKUP3args { what: dirop("notes.txt") }).unwrap();
    let sink = dispatch(&fs, NFSProgram::NFSPROC3_LOOKUP, &args).await;

    let (res, consumed) = unpack::<LOOKUP3res>(&sink.success()).unwrap();
    assert_eq!(consumed, 4 + 4 + 8 + 4 + 84 + 4);
    match res {
        Nfs3Result::Ok(ok) => {
            assert_eq!(ok.object, nfs_fh3::from(vec![7; 8]));
            assert_eq!(ok.obj_attributes, Some(file_attributes()));
            assert_eq!(ok.dir_attributes, None);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(fs.calls(), vec!["lookup notes.txt"]);
}

#[tokio::test]
async fn lookup_name_of_256_bytes_is_garbage() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let mut args = pack(&root_handle()).unwrap();
    args.extend(256_u32.to_be_bytes());
    args.extend(vec![b'n'; 256]);
    let sink = dispatch(&fs, NFSProgram::NFSPROC3_LOOKUP, &args).await;

    assert_eq!(sink.error(), AcceptError::GarbageArgs);
    assert!(fs.calls().is_empty());
    assert_eq!(fs.errors.entries().len(), 1);
}

#[tokio::test]
async fn lookup_name_of_255_bytes_is_accepted() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3ERR_NOENT));
    let args = pack(&LOOKUP3args { what: dirop(&"n".repeat(255)) }).unwrap();
    let sink = dispatch(&fs, NFSProgram::NFSPROC3_LOOKUP, &args).await;

    assert_eq!(sink.success(), vec![0, 0, 0, 2, 0, 0, 0, 0]);
}

#[tokio::test]
async fn oversized_handle_is_garbage() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let mut args = 65_u32.to_be_bytes().to_vec();
    args.extend(vec![0; 68]);
    let sink = dispatch(&fs, NFSProgram::NFSPROC3_GETATTR, &args).await;

    assert_eq!(sink.error(), AcceptError::GarbageArgs);
}

#[tokio::test]
async fn remove_failure_keeps_directory_wcc() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3ERR_NOTEMPTY));
    let sink =
        dispatch(&fs, NFSProgram::NFSPROC3_REMOVE, &arguments(NFSProgram::NFSPROC3_REMOVE)).await;

    let results = sink.success();
    let mut expected = 66_u32.to_be_bytes().to_vec();
    expected.extend(pack(&directory_wcc()).unwrap());
    assert_eq!(results, expected);
    assert_eq!(fs.calls(), vec!["remove old"]);
}

#[tokio::test]
async fn create_passes_exclusive_verifier() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3ERR_EXIST));
    let args = pack(&CREATE3args {
        dirops: dirop("lock"),
        how: createhow3::EXCLUSIVE([9, 8, 7, 6, 5, 4, 3, 2]),
    })
    .unwrap();
    let sink = dispatch(&fs, NFSProgram::NFSPROC3_CREATE, &args).await;

    assert_eq!(sink.success(), vec![0, 0, 0, 17, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(fs.calls(), vec!["create lock EXCLUSIVE([9, 8, 7, 6, 5, 4, 3, 2])"]);
}

#[tokio::test]
async fn create_with_unknown_mode_is_garbage() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let mut args = pack(&dirop("x")).unwrap();
    args.extend(3_u32.to_be_bytes());
    args.extend([1, 2, 3, 4, 5, 6, 7, 8]);
    let sink = dispatch(&fs, NFSProgram::NFSPROC3_CREATE, &args).await;

    assert_eq!(sink.error(), AcceptError::GarbageArgs);
    assert!(fs.calls().is_empty());
}

#[tokio::test]
async fn write_passes_data_through() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let sink =
        dispatch(&fs, NFSProgram::NFSPROC3_WRITE, &arguments(NFSProgram::NFSPROC3_WRITE)).await;

    let (res, _) = unpack::<WRITE3res>(&sink.success()).unwrap();
    match res {
        Nfs3Result::Ok(ok) => {
            assert_eq!(ok.count, 3);
            assert_eq!(ok.committed, stable_how::FILE_SYNC);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(fs.calls(), vec!["write 3 bytes"]);
}

#[tokio::test]
async fn failure_with_ok_status_is_a_system_error() {
    let fs = Arc::new(RecordingNfs::inconsistent());
    let sink =
        dispatch(&fs, NFSProgram::NFSPROC3_FSINFO, &arguments(NFSProgram::NFSPROC3_FSINFO)).await;

    assert_eq!(sink.error(), AcceptError::SystemErr);
    assert_eq!(fs.calls(), vec!["fsinfo"]);
    assert_eq!(fs.errors.entries().len(), 1);
}

#[tokio::test]
async fn null_replies_with_empty_results() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let sink = dispatch(&fs, NFSProgram::NFSPROC3_NULL, &[]).await;

    assert_eq!(sink.success(), Vec::<u8>::new());
    assert_eq!(fs.calls(), vec!["null"]);
}

#[tokio::test]
async fn null_with_arguments_is_garbage() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let sink = dispatch(&fs, NFSProgram::NFSPROC3_NULL, &[1]).await;

    assert_eq!(sink.error(), AcceptError::GarbageArgs);
    assert!(fs.calls().is_empty());
    assert_eq!(fs.errors.entries().len(), 1);
}

#[tokio::test]
async fn unassigned_procedure_is_unavailable() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let sink = dispatch_raw(&fs, 255, &[]).await;

    assert_eq!(sink.error(), AcceptError::ProcUnavail);
    assert!(fs.calls().is_empty());
    assert_eq!(fs.errors.entries().len(), 1);
}

#[tokio::test]
async fn mknod_is_unavailable() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let sink = dispatch_raw(&fs, 11, &[0, 0, 0, 0]).await;

    assert_eq!(sink.error(), AcceptError::ProcUnavail);
    assert_eq!(fs.errors.entries().len(), 1);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let fs = Arc::new(RecordingNfs::new(nfsstat3::NFS3_OK));
    let dispatcher = Arc::new(dispatcher(&fs));

    let mut tasks = Vec::new();
    for i in 0..32 {
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            let sink = RecordingSink::default();
            let auth = auth_unix::default();
            let args = pack(&LOOKUP3args { what: dirop(&format!("f{i}")) }).unwrap();
            dispatcher.handle(call(PROGRAM, VERSION, 3, &auth, &args), &sink).await;
            sink.success().len()
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap() > 4);
    }
    assert_eq!(fs.calls().len(), 32);
}
