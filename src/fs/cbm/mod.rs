//! # CBM DOS file system module
//! This manipulates disk images containing a Commodore DOS 2.6 volume,
//! as written by the 1541 drive, in either the 35 or 40 track variety.
//!
//! * Analogues of DOS commands like SAVE, SCRATCH, RENAME are exposed through the `DiskFS` trait
//! * Allocation follows the drive's own policy, outward from the directory track with an interleave
//! * Maintenance operations (verify, compact, reorder) are methods of `Disk`
//!
//! The whole volume lives in the owned disk image, there is no other state except
//! the memory of the last sector used on each track, which only influences where
//! the next allocation lands.

pub mod types;
pub mod directory;
mod bam;
mod catalog;
mod seq;
mod rel;
mod verify;
mod display;

use std::str::FromStr;
use std::path::{Path,PathBuf};
use log::{debug,info,warn};

pub use bam::Bam;
pub use catalog::EntryLocation;
pub use verify::Discrepancy;
use types::*;
use directory::*;
use crate::img;
use crate::img::geometry::Geometry;
use crate::fs::Block;
use crate::{STDRESULT,DYNERR};

pub fn file_name_to_string(fname: [u8;NAME_LEN]) -> String {
    // fname is padded to the end with shifted spaces
    // non-ASCII will go as hex escapes
    let mut end = NAME_LEN;
    while end>0 && fname[end-1]==PAD {
        end -= 1;
    }
    crate::escaped_ascii_from_bytes(&fname[0..end],true)
}

pub fn string_to_file_name(s: &str) -> [u8;NAME_LEN] {
    let mut ans: [u8;NAME_LEN] = [PAD;NAME_LEN];
    let unescaped = crate::escaped_ascii_to_bytes(s);
    for i in 0..NAME_LEN {
        if i<unescaped.len() {
            ans[i] = unescaped[i];
        }
    }
    return ans;
}

/// The primary interface for disk operations.
pub struct Disk
{
    geometry: Geometry,
    /// last sector allocated on each track, index 0 is track 1
    last_sector_used: Vec<usize>,
    img: Box<dyn img::DiskImage>
}

impl Disk
{
    /// Create a disk file system using the given image as storage.
    /// The DiskFS takes ownership of the image.  Use `test_img` first if the image
    /// is not known to hold a CBM volume.
    pub fn from_img(img: Box<dyn img::DiskImage>) -> Self {
        let geometry = img.geometry();
        Self {
            geometry,
            last_sector_used: vec![0;geometry.tracks()],
            img
        }
    }
    /// Load a D64 buffer.  The length must match a 35 or 40 track disk.
    /// If the directory structure is not recognized the disk is reformatted.
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        let mut img: Box<dyn img::DiskImage> = Box::new(<img::d64::D64 as img::DiskImage>::from_bytes(dat)?);
        if Self::test_img(&mut img) {
            info!("identified CBM DOS file system");
            return Ok(Self::from_img(img));
        }
        warn!("CBM DOS structures not found, formatting a blank disk");
        let mut disk = Self::from_img(img);
        disk.format(DEFAULT_DISK_NAME,"")?;
        Ok(disk)
    }
    /// Test an image to see if it already contains a CBM DOS volume.
    /// The BAM has to point at the standard directory start, and the first
    /// directory sector has to either end the chain or link to a sector on the disk.
    pub fn test_img(img: &mut Box<dyn img::DiskImage>) -> bool {
        let geometry = img.geometry();
        let bam_dat = match img.read_block(Block::TS([DIR_TRACK as usize,BAM_SECTOR as usize])) {
            Ok(dat) => dat,
            Err(_) => return false
        };
        let bam = match Bam::from_bytes(&bam_dat,geometry) {
            Ok(bam) => bam,
            Err(_) => return false
        };
        if bam.dir_start() != [DIR_TRACK,DIR_SECTOR] {
            debug!("BAM points to directory at {:?}",bam.dir_start());
            return false;
        }
        let dir = match img.read_block(Block::TS([DIR_TRACK as usize,DIR_SECTOR as usize])) {
            Ok(dat) => dat,
            Err(_) => return false
        };
        match [dir[0],dir[1]] {
            [0,0xff] => true,
            [0,x] => {
                debug!("directory ends with sector byte {}",x);
                true
            },
            [t,s] if geometry.contains(t as usize,s as usize) => true,
            [t,s] => {
                debug!("directory links to track {} sector {}",t,s);
                false
            }
        }
    }
    /// Longest chain that can exist without revisiting a sector
    fn max_chain_len(&self) -> usize {
        self.geometry.total_sectors()
    }
    /// Error if the address is not on the disk
    fn check_ts(&self,ts: [u8;2]) -> STDRESULT {
        if !self.geometry.contains(ts[0] as usize,ts[1] as usize) {
            debug!("bad link to track {} sector {}",ts[0],ts[1]);
            return Err(Box::new(Error::IllegalTrackOrSector));
        }
        Ok(())
    }
    fn read_sector(&mut self,ts: [u8;2]) -> Result<Vec<u8>,DYNERR> {
        self.check_ts(ts)?;
        self.img.read_block(Block::TS([ts[0] as usize,ts[1] as usize]))
    }
    fn write_sector(&mut self,dat: &[u8],ts: [u8;2]) -> STDRESULT {
        self.check_ts(ts)?;
        self.img.write_block(Block::TS([ts[0] as usize,ts[1] as usize]),dat)
    }
    /// Create a blank volume.  The `id` can be empty, in which case the ID bytes are padding.
    pub fn format(&mut self,name: &str,id: &str) -> STDRESULT {
        let zeros = vec![0;directory::SECTOR_SIZE];
        for track in 1..=self.geometry.tracks() as u8 {
            for sector in 0..self.geometry.sectors(track as usize).unwrap_or(0) as u8 {
                self.write_sector(&zeros,[track,sector])?;
            }
        }
        self.last_sector_used = vec![0;self.geometry.tracks()];
        let mut id_bytes = [PAD,PAD];
        for (i,b) in crate::escaped_ascii_to_bytes(id).iter().take(2).enumerate() {
            id_bytes[i] = *b;
        }
        let mut bam = Bam::from_bytes(&zeros,self.geometry)?;
        bam.init_fields(&string_to_file_name(name),id_bytes);
        for track in 1..=self.geometry.tracks() as u8 {
            bam.reset_track(track)?;
        }
        bam.allocate(DIR_TRACK,BAM_SECTOR)?;
        bam.allocate(DIR_TRACK,DIR_SECTOR)?;
        self.store_bam(&bam)?;
        self.write_sector(&DirectorySector::new().to_bytes(),[DIR_TRACK,DIR_SECTOR])
    }
    pub fn kind(&self) -> img::DiskKind {
        self.geometry.kind()
    }
    pub fn disk_name(&mut self) -> Result<String,DYNERR> {
        Ok(file_name_to_string(self.load_bam()?.disk_name()))
    }
    pub fn disk_id(&mut self) -> Result<[u8;2],DYNERR> {
        Ok(self.load_bam()?.disk_id())
    }
    /// All the sectors belonging to a file, whatever its type
    pub fn file_sectors(&mut self,entry: &DirectoryEntry) -> Result<Vec<[u8;2]>,DYNERR> {
        match entry.typ() {
            Some(FileType::Rel) => {
                let (sides,data) = self.walk_side_sectors(entry)?;
                Ok([sides,data].concat())
            },
            _ => self.chain_sectors(entry.start)
        }
    }
    /// Sectors of a file as far as its links can be followed, for cleaning up damaged files
    pub fn reachable_sectors(&mut self,entry: &DirectoryEntry) -> Vec<[u8;2]> {
        match self.file_sectors(entry) {
            Ok(v) => v,
            Err(e) => {
                warn!("cannot follow {}: {}",entry.name(),e);
                match entry.typ() {
                    Some(FileType::Rel) => self.side_sectors_reached(entry),
                    _ => self.chain_sectors_reached(entry.start)
                }
            }
        }
    }
    /// Read any file by name, relative files give the concatenated records
    pub fn get_file(&mut self,name: &str) -> Result<Vec<u8>,DYNERR> {
        match self.find_file(name)? {
            Some(entry) if entry.typ()==Some(FileType::Rel) => self.read_rel_file(&entry),
            Some(entry) => self.read_file(&entry),
            None => Err(Box::new(Error::FileNotFound))
        }
    }
    /// Find a file that may be modified, error if missing or locked
    fn find_unlocked(&mut self,name: &str) -> Result<DirectoryEntry,DYNERR> {
        match self.find_file(name)? {
            Some(entry) if entry.is_locked() => Err(Box::new(Error::WriteProtect)),
            Some(entry) => Ok(entry),
            None => Err(Box::new(Error::FileNotFound))
        }
    }
    fn parse_block(&self,num: &str) -> Result<Block,DYNERR> {
        let fields: Vec<&str> = num.split(',').map(|x| x.trim()).collect();
        match fields.as_slice() {
            [t,s] => match (usize::from_str(t),usize::from_str(s)) {
                (Ok(t),Ok(s)) => Ok(Block::TS([t,s])),
                _ => Err(Box::new(Error::SyntaxError))
            },
            [lba] => match usize::from_str(lba) {
                Ok(lba) => Ok(Block::LBA(lba)),
                _ => Err(Box::new(Error::SyntaxError))
            },
            _ => Err(Box::new(Error::SyntaxError))
        }
    }
}

impl super::DiskFS for Disk {
    fn catalog_to_stdout(&mut self) -> STDRESULT {
        display::catalog_to_stdout(self)
    }
    fn file_names(&mut self) -> Result<Vec<String>,DYNERR> {
        Ok(self.directory()?.iter().map(|e| e.name()).collect())
    }
    fn delete(&mut self,name: &str) -> STDRESULT {
        self.find_unlocked(name)?;
        self.remove(name)
    }
    fn rename(&mut self,name: &str,new_name: &str) -> STDRESULT {
        self.find_unlocked(name)?;
        if self.find_file(new_name)?.is_some() {
            return Err(Box::new(Error::FileExists));
        }
        self.rename_file(name,new_name)
    }
    fn lock(&mut self,name: &str) -> STDRESULT {
        self.lock_file(name,true)
    }
    fn unlock(&mut self,name: &str) -> STDRESULT {
        self.lock_file(name,false)
    }
    fn retype(&mut self,name: &str,new_type: &str) -> STDRESULT {
        let typ = FileType::from_str(new_type)?;
        let entry = self.find_unlocked(name)?;
        if typ==FileType::Rel || entry.typ()==Some(FileType::Rel) {
            return Err(Box::new(Error::FileTypeMismatch));
        }
        self.modify(name,|e| e.set_typ(typ))
    }
    fn rename_disk(&mut self,name: &str) -> STDRESULT {
        let mut bam = self.load_bam()?;
        bam.set_disk_name(&string_to_file_name(name));
        self.store_bam(&bam)
    }
    fn load(&mut self,name: &str) -> Result<(u16,Vec<u8>),DYNERR> {
        match self.find_file(name)? {
            Some(entry) if entry.typ()==Some(FileType::Prg) => {
                let dat = self.read_file(&entry)?;
                if dat.len() < 2 {
                    return Err(Box::new(Error::FileTypeMismatch));
                }
                Ok((u16::from_le_bytes([dat[0],dat[1]]),dat[2..].to_vec()))
            },
            Some(_) => Err(Box::new(Error::FileTypeMismatch)),
            None => Err(Box::new(Error::FileNotFound))
        }
    }
    fn save(&mut self,name: &str,dat: &[u8],load_addr: u16) -> Result<usize,DYNERR> {
        let prg = [u16::to_le_bytes(load_addr).to_vec(),dat.to_vec()].concat();
        self.add_file(name,FileType::Prg,&prg)
    }
    fn read_raw(&mut self,name: &str) -> Result<(u16,Vec<u8>),DYNERR> {
        match self.find_file(name)? {
            Some(entry) if entry.typ()==Some(FileType::Rel) => Ok((entry.record_len as u16,self.read_rel_file(&entry)?)),
            Some(entry) => Ok((0,self.read_file(&entry)?)),
            None => Err(Box::new(Error::FileNotFound))
        }
    }
    fn write_raw(&mut self,name: &str,typ: &str,dat: &[u8]) -> Result<usize,DYNERR> {
        let typ = FileType::from_str(typ)?;
        self.add_file(name,typ,dat)
    }
    fn read_records(&mut self,name: &str) -> Result<(usize,Vec<u8>),DYNERR> {
        match self.find_file(name)? {
            Some(entry) => Ok((entry.record_len as usize,self.read_rel_file(&entry)?)),
            None => Err(Box::new(Error::FileNotFound))
        }
    }
    fn write_records(&mut self,name: &str,record_length: usize,dat: &[u8]) -> Result<usize,DYNERR> {
        self.add_rel_file(name,record_length,dat)
    }
    fn read_block(&mut self,num: &str) -> Result<(u16,Vec<u8>),DYNERR> {
        let addr = self.parse_block(num)?;
        Ok((0,self.img.read_block(addr)?))
    }
    fn write_block(&mut self,num: &str,dat: &[u8]) -> Result<usize,DYNERR> {
        let addr = self.parse_block(num)?;
        if dat.len() > directory::SECTOR_SIZE {
            return Err(Box::new(Error::OverflowInRecord));
        }
        self.img.write_block(addr,dat)?;
        Ok(dat.len())
    }
    fn extract(&mut self,name: &str,dir: &Path) -> Result<PathBuf,DYNERR> {
        let entry = match self.find_file(name)? {
            Some(entry) => entry,
            None => return Err(Box::new(Error::FileNotFound))
        };
        let (dat,ext) = match entry.typ() {
            Some(FileType::Rel) => (self.read_rel_file(&entry)?,FileType::Rel.extension()),
            Some(typ) => (self.read_file(&entry)?,typ.extension()),
            None => (self.read_file(&entry)?,"bin")
        };
        let path = dir.join([&entry.name(),".",ext].concat());
        std::fs::write(&path,&dat)?;
        info!("extracted {} bytes to {}",dat.len(),path.display());
        Ok(path)
    }
    fn check(&mut self,repair: bool) -> Result<Vec<String>,DYNERR> {
        Ok(self.verify(repair)?.iter().map(|d| d.to_string()).collect())
    }
    fn compact(&mut self) -> Result<bool,DYNERR> {
        self.compact_directory()
    }
    fn sort(&mut self,order: &[String]) -> Result<bool,DYNERR> {
        self.reorder_by_names(order)
    }
    fn move_first(&mut self,name: &str) -> Result<bool,DYNERR> {
        self.move_file_first(name)
    }
    fn get_img(&mut self) -> &mut Box<dyn img::DiskImage> {
        &mut self.img
    }
}
