//! ## Relative files
//!
//! Each record gets its own data sector.  The data sectors are listed in order by up to
//! six side sectors of 120 pointers each, and the side sectors list each other.
//! The data sectors are also chained forward, so the last one says how much of
//! the final record is used.

use log::{debug,error,warn};
use super::types::*;
use super::directory::*;
use super::{Disk,string_to_file_name};
use crate::DYNERR;

/// side sector offset where the data pointers start
const CHAIN_OFFSET: usize = 16;

impl Disk {
    /// Write a relative file and its directory entry, returns the total number of sectors.
    /// There is one record per data sector, the last record may be short.
    pub fn add_rel_file(&mut self,name: &str,record_len: usize,dat: &[u8]) -> Result<usize,DYNERR> {
        if record_len==0 || record_len > DATA_BYTES {
            return Err(Box::new(Error::OverflowInRecord));
        }
        if self.find_file(name)?.is_some() {
            return Err(Box::new(Error::FileExists));
        }
        let records = (dat.len() + record_len - 1) / record_len;
        let side_count = usize::max(1,(records + SIDE_CHAIN_LEN - 1) / SIDE_CHAIN_LEN);
        if side_count > MAX_SIDE_SECTORS {
            debug!("{} records need {} side sectors",records,side_count);
            return Err(Box::new(Error::FileTooLarge));
        }
        let needed = records + side_count + match self.free_slot_exists()? {
            true => 0,
            false => 1
        };
        if needed > self.num_free_sectors()? {
            return Err(Box::new(Error::DiskFull));
        }

        // allocate everything, side sectors are created as the previous one fills
        let mut sides = vec![self.find_and_allocate_free()?];
        let mut side_secs = vec![SideSector::new(0,record_len as u8)];
        let mut data_ts = Vec::new();
        for _r in 0..records {
            if side_secs[side_secs.len()-1].chain.len()==SIDE_CHAIN_LEN {
                let ts = self.find_and_allocate_free()?;
                let n = side_secs.len();
                side_secs[n-1].next = ts;
                sides.push(ts);
                side_secs.push(SideSector::new(n as u8,record_len as u8));
            }
            let ts = self.find_and_allocate_free()?;
            let n = side_secs.len();
            side_secs[n-1].chain.push(ts);
            data_ts.push(ts);
        }

        // data sectors
        for (r,ts) in data_ts.iter().enumerate() {
            let mut buf = vec![0;SECTOR_SIZE];
            let beg = r*record_len;
            let end = usize::min(beg+record_len,dat.len());
            buf[2..2+end-beg].copy_from_slice(&dat[beg..end]);
            match data_ts.get(r+1) {
                Some(next) => {
                    buf[0] = next[0];
                    buf[1] = next[1];
                },
                None => buf[1] = (end-beg) as u8
            }
            self.write_sector(&buf,*ts)?;
        }

        // side sectors, every one lists all the siblings
        let n = side_secs.len();
        for (i,side) in side_secs.iter_mut().enumerate() {
            for (j,ts) in sides.iter().enumerate() {
                side.siblings[j] = *ts;
            }
            if i+1==n {
                side.next = [0,(CHAIN_OFFSET + 2*side.chain.len() - 1) as u8];
            }
            self.write_sector(&side.to_bytes(),sides[i])?;
        }

        let loc = self.find_empty_slot()?;
        let mut entry = DirectoryEntry::new();
        entry.file_type = CLOSED | FileType::Rel as u8;
        entry.start = sides[0];
        entry.side = sides[0];
        entry.record_len = record_len as u8;
        entry.name = string_to_file_name(name);
        let count = records + sides.len();
        entry.sectors = u16::to_le_bytes(count as u16);
        self.write_entry(&loc,&entry)?;
        Ok(count)
    }
    /// Returns (side sectors,data sectors) of a relative file
    pub(super) fn walk_side_sectors(&mut self,entry: &DirectoryEntry) -> Result<(Vec<[u8;2]>,Vec<[u8;2]>),DYNERR> {
        if entry.typ()!=Some(FileType::Rel) {
            return Err(Box::new(Error::FileTypeMismatch));
        }
        let mut sides = Vec::new();
        let mut data = Vec::new();
        let mut ts = entry.side;
        for _try in 0..MAX_SIDE_SECTORS {
            let side = SideSector::from_bytes(&self.read_sector(ts)?)?;
            sides.push(ts);
            for data_ts in &side.chain {
                self.check_ts(*data_ts)?;
            }
            data.extend(side.chain);
            if side.next[0]==0 {
                return Ok((sides,data));
            }
            ts = side.next;
        }
        error!("{} has too many side sectors",entry.name());
        Err(Box::new(Error::FileTooLarge))
    }
    /// Side and data sectors up to the first bad pointer, nothing is listed twice
    pub(super) fn side_sectors_reached(&mut self,entry: &DirectoryEntry) -> Vec<[u8;2]> {
        let mut ans: Vec<[u8;2]> = Vec::new();
        let mut ts = entry.side;
        for _try in 0..MAX_SIDE_SECTORS {
            if ts[0]==0 {
                return ans;
            }
            if ans.contains(&ts) {
                warn!("side sector chain of {} loops",entry.name());
                return ans;
            }
            let side = match self.read_sector(ts) {
                Ok(buf) => match SideSector::from_bytes(&buf) {
                    Ok(side) => side,
                    Err(_) => break
                },
                Err(_) => break
            };
            ans.push(ts);
            for data_ts in side.chain {
                if self.check_ts(data_ts).is_err() || ans.contains(&data_ts) {
                    warn!("side sector list of {} ends at a bad pointer",entry.name());
                    return ans;
                }
                ans.push(data_ts);
            }
            ts = side.next;
        }
        if ts[0]!=0 {
            warn!("side sector chain of {} ends at track {} sector {}",entry.name(),ts[0],ts[1]);
        }
        ans
    }
    /// Data sectors of a relative file in record order
    pub fn parse_side_sectors(&mut self,entry: &DirectoryEntry) -> Result<Vec<[u8;2]>,DYNERR> {
        Ok(self.walk_side_sectors(entry)?.1)
    }
    /// Concatenate the records of a relative file
    pub fn read_rel_file(&mut self,entry: &DirectoryEntry) -> Result<Vec<u8>,DYNERR> {
        if entry.typ()!=Some(FileType::Rel) {
            return Err(Box::new(Error::FileTypeMismatch));
        }
        if entry.record_len==0 || entry.record_len as usize > DATA_BYTES {
            return Err(Box::new(Error::RecordNotPresent));
        }
        let record_len = entry.record_len as usize;
        let mut ans = Vec::new();
        for ts in self.parse_side_sectors(entry)? {
            let buf = self.read_sector(ts)?;
            let used = match buf[0] {
                0 => usize::min(buf[1] as usize,record_len),
                _ => record_len
            };
            ans.extend_from_slice(&buf[2..2+used]);
        }
        Ok(ans)
    }
}
