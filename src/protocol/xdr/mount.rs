//! This module implements the `MOUNT` protocol (RFC 1813 Appendix I) data structures
//! for XDR serialization and deserialization.
//!
//! The `MOUNT` protocol is used to establish the initial connection between an NFS client
//! and server. It provides functions for mounting and unmounting file systems, and
//! obtaining the initial file handle that serves as the root of the mounted file system.
//! Only NULL, MNT and UMNT are served; DUMP, UMNTALL and EXPORT are answered as
//! unavailable procedures.

// Type names follow the RFC
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use num_derive::{FromPrimitive, ToPrimitive};

use crate::{DeserializeEnum, DeserializeStruct, OpaqueString, SerializeEnum, SerializeStruct};

use super::{deserialize, deserialize_enum, utils, Deserialize, Serialize};

/// MOUNT program number for RPC
pub const PROGRAM: u32 = 100005;
/// MOUNT protocol version 3
pub const VERSION: u32 = 3;

/// Maximum bytes in a path name
pub const MNTPATHLEN: u32 = 1024;
/// Maximum bytes in a name
pub const MNTNAMLEN: u32 = 255;
/// Maximum bytes in a V3 file handle
pub const FHSIZE3: u32 = 64;

OpaqueString!(
    /// Server pathname of an exported directory, at most [`MNTPATHLEN`] bytes.
    dirpath,
    MNTPATHLEN as usize
);

OpaqueString!(
    /// File handle of a mounted directory, at most [`FHSIZE3`] bytes.
    /// It carries the same bytes as the NFS `nfs_fh3` of the export root.
    fhandle3,
    FHSIZE3 as usize
);

/// Status codes returned by `MOUNT` protocol operations
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum mountstat3 {
    MNT3_OK = 0,                 /* no error */
    MNT3ERR_PERM = 1,            /* Not owner */
    MNT3ERR_NOENT = 2,           /* No such file or directory */
    MNT3ERR_IO = 5,              /* I/O error */
    MNT3ERR_ACCES = 13,          /* Permission denied */
    MNT3ERR_NOTDIR = 20,         /* Not a directory */
    MNT3ERR_INVAL = 22,          /* Invalid argument */
    MNT3ERR_NAMETOOLONG = 63,    /* Filename too long */
    MNT3ERR_NOTSUPP = 10004,     /* Operation not supported */
    MNT3ERR_SERVERFAULT = 10006, /* A failure on the server */
}
SerializeEnum!(mountstat3);
DeserializeEnum!(mountstat3);

/// Arguments of MOUNTPROC3_MNT
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MNT3args {
    pub dirpath: dirpath,
}
DeserializeStruct!(MNT3args, dirpath);
SerializeStruct!(MNT3args, dirpath);

/// Arguments of MOUNTPROC3_UMNT
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UMNT3args {
    pub dirpath: dirpath,
}
DeserializeStruct!(UMNT3args, dirpath);
SerializeStruct!(UMNT3args, dirpath);

/// Successful response to a mount request
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct mountres3_ok {
    /// File handle for the mounted directory
    pub fhandle: fhandle3,
    /// Authentication flavors the client may use with this export
    pub auth_flavors: Vec<u32>,
}
DeserializeStruct!(mountres3_ok, fhandle, auth_flavors);
SerializeStruct!(mountres3_ok, fhandle, auth_flavors);

/// Result of MOUNTPROC3_MNT, discriminated on [`mountstat3`].
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum mountres3 {
    Ok(mountres3_ok),
    Err(mountstat3),
}

impl mountres3 {
    pub fn status(&self) -> mountstat3 {
        match self {
            mountres3::Ok(_) => mountstat3::MNT3_OK,
            mountres3::Err(status) => *status,
        }
    }
}

impl Default for mountres3 {
    fn default() -> Self {
        mountres3::Err(mountstat3::MNT3ERR_SERVERFAULT)
    }
}

impl Serialize for mountres3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            mountres3::Ok(resok) => {
                mountstat3::MNT3_OK.serialize(dest)?;
                resok.serialize(dest)
            }
            mountres3::Err(mountstat3::MNT3_OK) => {
                Err(utils::invalid_data("failure result carries MNT3_OK status"))
            }
            mountres3::Err(status) => status.serialize(dest),
        }
    }
}

impl Deserialize for mountres3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = match deserialize_enum::<mountstat3>(src)? {
            mountstat3::MNT3_OK => mountres3::Ok(deserialize(src)?),
            status => mountres3::Err(status),
        };
        Ok(())
    }
}

/// Procedure numbers for the `MOUNT` version 3 protocol
#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum MountProgram {
    /// Null procedure for service availability testing
    MOUNTPROC3_NULL = 0,
    /// Mount a file system
    MOUNTPROC3_MNT = 1,
    /// Unmount a file system
    MOUNTPROC3_UMNT = 3,
    /// Invalid procedure number
    INVALID = 6,
}
