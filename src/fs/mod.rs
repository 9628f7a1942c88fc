//! # File System Module
//!
//! File system modules handle interactions with directories and files.  There is a sub-module for
//! each supported file system, at present this is `cbm`, the file system of Commodore DOS 2.6
//! as found on 1541 disks.
//!
//! File systems are represented by the `DiskFS` trait.  The trait object takes ownership of
//! some disk image, which it uses as storage.
//!
//! This module also contains the `Block` enumeration, which specifies and locates allocation units.
//! Transformation of a `Block` to an offset in the disk image is handled within the `img` module.

pub mod cbm;

use std::fmt;
use std::path::{Path,PathBuf};
use crate::img;
use crate::{STDRESULT,DYNERR};

/// Encapsulates the disk address and addressing mode used by a file system.
/// The disk image layer has the final responsibility for locating the data.
#[derive(PartialEq,Eq,Clone,Copy,Hash,Debug)]
pub enum Block {
    /// value is [track,sector], tracks count from 1
    TS([usize;2]),
    /// value is the absolute sector number, counting from 0 at track 1 sector 0
    LBA(usize)
}

impl fmt::Display for Block {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TS([t,s]) => write!(f,"CBM track {} sector {}",t,s),
            Self::LBA(lba) => write!(f,"absolute sector {}",lba)
        }
    }
}

/// Abstract file system interface.  Presumed to own an underlying DiskImage.
/// Provides DOS-like high level commands, block operations, and maintenance operations.
pub trait DiskFS {
    /// List all the files on disk to standard output, mirrors `LOAD"$",8` followed by `LIST`
    fn catalog_to_stdout(&mut self) -> STDRESULT;
    /// Names of the live files in directory order
    fn file_names(&mut self) -> Result<Vec<String>,DYNERR>;
    /// Delete a file, mirrors `S:` (scratch)
    fn delete(&mut self,name: &str) -> STDRESULT;
    /// Rename a file, mirrors `R:`
    fn rename(&mut self,name: &str,new_name: &str) -> STDRESULT;
    /// write protect a file
    fn lock(&mut self,name: &str) -> STDRESULT;
    /// remove write protection from a file
    fn unlock(&mut self,name: &str) -> STDRESULT;
    /// Change the type of a file, string may be a number or mnemonic
    fn retype(&mut self,name: &str,new_type: &str) -> STDRESULT;
    /// Change the disk name that appears in the directory header
    fn rename_disk(&mut self,name: &str) -> STDRESULT;
    /// Read a program file from the disk.  Returns (load address,data).
    fn load(&mut self,name: &str) -> Result<(u16,Vec<u8>),DYNERR>;
    /// Write a program file to the disk, the load address is prepended to the data.
    fn save(&mut self,name: &str,dat: &[u8],load_addr: u16) -> Result<usize,DYNERR>;
    /// Read any file as a byte sequence.  Returns (record length,data), record length is 0 unless REL.
    fn read_raw(&mut self,name: &str) -> Result<(u16,Vec<u8>),DYNERR>;
    /// Write a sequential file of the given type (`seq`, `prg`, `usr`, or `del`).
    fn write_raw(&mut self,name: &str,typ: &str,dat: &[u8]) -> Result<usize,DYNERR>;
    /// Read a relative file.  Returns (record length,data), where data is the concatenated records.
    fn read_records(&mut self,name: &str) -> Result<(usize,Vec<u8>),DYNERR>;
    /// Write a relative file, data is split into records of the given length.
    fn write_records(&mut self,name: &str,record_length: usize,dat: &[u8]) -> Result<usize,DYNERR>;
    /// Get a sector, `num` is `track,sector` or an absolute sector number.
    fn read_block(&mut self,num: &str) -> Result<(u16,Vec<u8>),DYNERR>;
    /// Put a sector, `num` is `track,sector` or an absolute sector number.
    /// N.b. this simply zaps the sector and can break the file system.
    fn write_block(&mut self,num: &str,dat: &[u8]) -> Result<usize,DYNERR>;
    /// Write a file to a host directory with an extension derived from its type, returns the path written.
    fn extract(&mut self,name: &str,dir: &Path) -> Result<PathBuf,DYNERR>;
    /// Cross check the allocation map against the directory, optionally repairing it.
    /// Returns a description of each discrepancy, empty if the disk is consistent.
    fn check(&mut self,repair: bool) -> Result<Vec<String>,DYNERR>;
    /// Remove gaps from the directory and free unused directory sectors.  Returns false if nothing was done.
    fn compact(&mut self) -> Result<bool,DYNERR>;
    /// Put the named files at the top of the directory in the given order.  Returns false if nothing changed.
    fn sort(&mut self,order: &[String]) -> Result<bool,DYNERR>;
    /// Put the named file at the top of the directory.  Returns false if nothing changed.
    fn move_first(&mut self,name: &str) -> Result<bool,DYNERR>;
    /// Mutably borrow the underlying disk image
    fn get_img(&mut self) -> &mut Box<dyn img::DiskImage>;
}
