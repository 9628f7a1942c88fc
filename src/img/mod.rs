//! # Disk Image Module
//!
//! Disk images are represented by objects implementing the `DiskImage` trait.
//! At present the only implementation is `d64::D64`, a sequential dump of the
//! sectors of a Commodore 1541 disk.
//!
//! ## Relation to File Systems
//!
//! The `DiskImage` trait object serves as the underlying storage for `fs` modules.
//! The `fs` modules work by reading blocks from, or writing blocks to, the disk image.
//! The `fs` module never computes a byte offset itself, the mapping from a `Block`
//! to the image buffer happens here, by way of `geometry::Geometry`.
//!
//! ## Disk Kinds
//!
//! The D64 format comes in a 35 track and a 40 track variety.  These are enumerated
//! by `DiskKind`, which is also the construction configuration of a blank disk.

pub mod geometry;
pub mod d64;

use std::str::FromStr;
use std::fmt;
use crate::fs;
use crate::{STDRESULT,DYNERR};
use geometry::Geometry;

/// Enumerates disk image errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("unknown kind of disk")]
    UnknownDiskKind,
	#[error("image size did not match the request")]
	ImageSizeMismatch,
    #[error("unable to access sector")]
    SectorAccess
}

/// The disk variants a D64 image can hold
#[derive(PartialEq,Eq,Clone,Copy,Debug,Default)]
pub enum DiskKind {
    #[default]
    D525Tracks35,
    D525Tracks40
}

impl DiskKind {
    pub fn track_count(&self) -> usize {
        match self {
            Self::D525Tracks35 => 35,
            Self::D525Tracks40 => 40
        }
    }
}

/// Allows the disk kind to be displayed to the console using `println!`.  This also
/// derives `to_string`, so the enum can be converted to `String`.
impl fmt::Display for DiskKind {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::D525Tracks35 => write!(f,"Commodore 5.25 inch 35 track"),
            Self::D525Tracks40 => write!(f,"Commodore 5.25 inch 40 track")
        }
    }
}

/// match command line argument to disk kind
impl FromStr for DiskKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "35" | "5.25in-cbm-35" => Ok(Self::D525Tracks35),
            "40" | "5.25in-cbm-40" => Ok(Self::D525Tracks40),
            _ => Err(Error::UnknownDiskKind)
        }
    }
}

/// The main trait for working with a disk image.
/// The corresponding trait object serves as storage for `DiskFS`.
pub trait DiskImage {
    fn track_count(&self) -> usize;
    fn byte_capacity(&self) -> usize;
    fn geometry(&self) -> Geometry;
    /// Create the image from a buffer, the buffer length has to match one of the disk kinds
    fn from_bytes(buf: &[u8]) -> Result<Self,Error> where Self: Sized;
    /// Get the image as a buffer that can be saved verbatim
    fn to_bytes(&mut self) -> Vec<u8>;
    /// Get a sector from the image
    fn read_block(&mut self,addr: fs::Block) -> Result<Vec<u8>,DYNERR>;
    /// Put a sector to the image, short data is padded with zeros
    fn write_block(&mut self,addr: fs::Block,dat: &[u8]) -> STDRESULT;
}

/// If a data source is smaller than `quantum` bytes, pad it with zeros.
/// If it is larger, do not include the extra bytes.
pub fn quantize_block(src: &[u8],quantum: usize) -> Vec<u8> {
	let mut padded: Vec<u8> = Vec::new();
	for i in 0..quantum {
		if i<src.len() {
			padded.push(src[i])
		} else {
			padded.push(0);
		}
	}
    return padded;
}
