//! ## Sequential files
//!
//! SEQ, PRG, USR, and DEL files are all stored as a forward linked chain of sectors.
//! Each sector begins with the address of the next one, the last sector has track 0,
//! and its sector byte gives the number of payload bytes used.

use log::{debug,trace,warn};
use super::types::*;
use super::directory::*;
use super::{Disk,string_to_file_name};
use crate::DYNERR;

impl Disk {
    /// Addresses of a forward linked chain of sectors
    pub(super) fn chain_sectors(&mut self,start: [u8;2]) -> Result<Vec<[u8;2]>,DYNERR> {
        let mut ans = Vec::new();
        let mut ts = start;
        for _try in 0..self.max_chain_len() {
            self.check_ts(ts)?;
            ans.push(ts);
            let buf = self.read_sector(ts)?;
            if buf[0]==0 {
                return Ok(ans);
            }
            ts = [buf[0],buf[1]];
        }
        debug!("chain starting at {:?} does not terminate",start);
        Err(Box::new(Error::IllegalTrackOrSector))
    }
    /// Addresses of a chain up to the first bad link or the first repeat
    pub(super) fn chain_sectors_reached(&mut self,start: [u8;2]) -> Vec<[u8;2]> {
        let mut ans: Vec<[u8;2]> = Vec::new();
        let mut ts = start;
        while !ans.contains(&ts) {
            let buf = match self.read_sector(ts) {
                Ok(buf) => buf,
                Err(_) => break
            };
            ans.push(ts);
            if buf[0]==0 {
                return ans;
            }
            ts = [buf[0],buf[1]];
        }
        warn!("chain starting at {:?} ends at track {} sector {}",start,ts[0],ts[1]);
        ans
    }
    /// Write the data as a new chain, returns (first sector,sector count).
    /// An empty buffer still takes one sector.
    fn write_chain(&mut self,dat: &[u8]) -> Result<([u8;2],usize),DYNERR> {
        let start = self.find_and_allocate_free()?;
        let mut ts = start;
        let mut count = 1;
        let mut offset = 0;
        loop {
            let remaining = dat.len() - offset;
            let mut buf = vec![0;SECTOR_SIZE];
            if remaining > DATA_BYTES {
                let next = self.find_and_allocate_free()?;
                buf[0] = next[0];
                buf[1] = next[1];
                buf[2..].copy_from_slice(&dat[offset..offset+DATA_BYTES]);
                self.write_sector(&buf,ts)?;
                trace!("track {} sector {} links to {:?}",ts[0],ts[1],next);
                ts = next;
                offset += DATA_BYTES;
                count += 1;
            } else {
                buf[1] = remaining as u8;
                buf[2..2+remaining].copy_from_slice(&dat[offset..]);
                self.write_sector(&buf,ts)?;
                return Ok((start,count));
            }
        }
    }
    /// Write a sequential file and create its directory entry, returns the number of sectors.
    /// Fails with `DiskFull` before anything is written if the space is not there.
    pub fn add_file(&mut self,name: &str,typ: FileType,dat: &[u8]) -> Result<usize,DYNERR> {
        if typ==FileType::Rel {
            return Err(Box::new(Error::FileTypeMismatch));
        }
        if self.find_file(name)?.is_some() {
            return Err(Box::new(Error::FileExists));
        }
        let data_sectors = usize::max(1,(dat.len() + DATA_BYTES - 1) / DATA_BYTES);
        let needed = data_sectors + match self.free_slot_exists()? {
            true => 0,
            false => 1
        };
        if needed > self.num_free_sectors()? {
            debug!("{} needs {} sectors",name,needed);
            return Err(Box::new(Error::DiskFull));
        }
        let (start,count) = self.write_chain(dat)?;
        let loc = self.find_empty_slot()?;
        let mut entry = DirectoryEntry::new();
        entry.file_type = CLOSED | typ as u8;
        entry.start = start;
        entry.replace = start;
        entry.name = string_to_file_name(name);
        entry.sectors = u16::to_le_bytes(count as u16);
        self.write_entry(&loc,&entry)?;
        Ok(count)
    }
    /// Follow the chain from the entry's start and collect the payload
    pub fn read_file(&mut self,entry: &DirectoryEntry) -> Result<Vec<u8>,DYNERR> {
        let mut ans = Vec::new();
        let mut ts = entry.start;
        for _try in 0..self.max_chain_len() {
            let buf = self.read_sector(ts)?;
            if buf[0]==0 {
                let used = usize::min(buf[1] as usize,DATA_BYTES);
                ans.extend_from_slice(&buf[2..2+used]);
                return Ok(ans);
            }
            ans.extend_from_slice(&buf[2..]);
            ts = [buf[0],buf[1]];
        }
        Err(Box::new(Error::IllegalTrackOrSector))
    }
}
