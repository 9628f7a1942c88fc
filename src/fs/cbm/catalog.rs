//! ## Directory management
//!
//! The directory is a chain of sectors starting at track 18 sector 1.
//! Entries are located by (sector address,slot), slots that are not live can be reused.
//! Maintenance operations rewrite the entries in place, preserving the chain links,
//! except for `compact_directory`, which shortens the chain.

use std::cmp::Ordering;
use log::{debug,error,info,warn};
use super::types::*;
use super::directory::*;
use super::{Disk,string_to_file_name};
use crate::{DYNERR,STDRESULT};

/// Where a directory entry lives
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub struct EntryLocation {
    pub ts: [u8;2],
    pub idx: usize
}

impl Disk {
    /// Addresses of the directory sectors in chain order
    pub fn dir_chain(&mut self) -> Result<Vec<[u8;2]>,DYNERR> {
        let mut ans = Vec::new();
        let mut ts = [DIR_TRACK,DIR_SECTOR];
        for _try in 0..self.max_chain_len() {
            if self.check_ts(ts).is_err() {
                error!("directory links to track {} sector {}",ts[0],ts[1]);
                return Err(Box::new(Error::DirError));
            }
            ans.push(ts);
            let buf = self.read_sector(ts)?;
            if buf[0]==0 {
                return Ok(ans);
            }
            ts = [buf[0],buf[1]];
        }
        error!("directory chain does not terminate");
        Err(Box::new(Error::DirError))
    }
    fn read_dir_sector(&mut self,ts: [u8;2]) -> Result<DirectorySector,DYNERR> {
        DirectorySector::from_bytes(&self.read_sector(ts)?)
    }
    fn write_dir_sector(&mut self,dir: &DirectorySector,ts: [u8;2]) -> STDRESULT {
        self.write_sector(&dir.to_bytes(),ts)
    }
    pub(super) fn write_entry(&mut self,loc: &EntryLocation,entry: &DirectoryEntry) -> STDRESULT {
        let mut dir = self.read_dir_sector(loc.ts)?;
        dir.entries[loc.idx] = entry.clone();
        self.write_dir_sector(&dir,loc.ts)
    }
    /// Every slot in the directory, live or not, with its location
    fn slots(&mut self) -> Result<Vec<(EntryLocation,DirectoryEntry)>,DYNERR> {
        let mut ans = Vec::new();
        for ts in self.dir_chain()? {
            let dir = self.read_dir_sector(ts)?;
            for (idx,entry) in dir.entries.into_iter().enumerate() {
                ans.push((EntryLocation {ts,idx},entry));
            }
        }
        Ok(ans)
    }
    fn locate(&mut self,name: &str) -> Result<Option<(EntryLocation,DirectoryEntry)>,DYNERR> {
        let fname = string_to_file_name(name);
        Ok(self.slots()?.into_iter().find(|(_,entry)| entry.is_live() && entry.name==fname))
    }
    /// Live entries in directory order
    pub fn directory(&mut self) -> Result<Vec<DirectoryEntry>,DYNERR> {
        Ok(self.slots()?.into_iter().map(|(_,entry)| entry).filter(|e| e.is_live()).collect())
    }
    /// Find the first live entry with the given name.  Names are compared after padding.
    pub fn find_file(&mut self,name: &str) -> Result<Option<DirectoryEntry>,DYNERR> {
        Ok(self.locate(name)?.map(|(_,entry)| entry))
    }
    pub(super) fn free_slot_exists(&mut self) -> Result<bool,DYNERR> {
        Ok(self.slots()?.iter().any(|(_,entry)| !entry.is_live()))
    }
    /// Find a slot that is not live.  If there is none, a new directory sector is
    /// allocated, cleared, and linked to the end of the chain.
    pub fn find_empty_slot(&mut self) -> Result<EntryLocation,DYNERR> {
        if let Some((loc,_)) = self.slots()?.into_iter().find(|(_,entry)| !entry.is_live()) {
            return Ok(loc);
        }
        let chain = self.dir_chain()?;
        let last = chain[chain.len()-1];
        let new_ts = self.find_and_allocate_free()?;
        debug!("extending directory to track {} sector {}",new_ts[0],new_ts[1]);
        self.write_dir_sector(&DirectorySector::new(),new_ts)?;
        let mut dir = self.read_dir_sector(last)?;
        dir.next = new_ts;
        self.write_dir_sector(&dir,last)?;
        Ok(EntryLocation { ts: new_ts, idx: 0 })
    }
    /// Apply a change to the named entry
    pub(super) fn modify<F>(&mut self,name: &str,f: F) -> STDRESULT where F: FnOnce(&mut DirectoryEntry) {
        match self.locate(name)? {
            Some((loc,mut entry)) => {
                f(&mut entry);
                self.write_entry(&loc,&entry)
            },
            None => Err(Box::new(Error::FileNotFound))
        }
    }
    /// Free every sector of the file and zero its entry.  Does not check the lock.
    /// If the chain is damaged only the sectors before the bad link are freed.
    pub fn remove(&mut self,name: &str) -> STDRESULT {
        let (loc,entry) = match self.locate(name)? {
            Some(x) => x,
            None => return Err(Box::new(Error::FileNotFound))
        };
        let sectors = self.reachable_sectors(&entry);
        let mut bam = self.load_bam()?;
        for ts in &sectors {
            if !bam.free(ts[0],ts[1])? {
                warn!("track {} sector {} of {} was not allocated",ts[0],ts[1],name);
            }
        }
        self.store_bam(&bam)?;
        self.write_entry(&loc,&DirectoryEntry::new())?;
        info!("freed {} sectors of {}",sectors.len(),name);
        Ok(())
    }
    /// Change the name in the entry, no other checks.
    pub fn rename_file(&mut self,old_name: &str,new_name: &str) -> STDRESULT {
        let fname = string_to_file_name(new_name);
        self.modify(old_name,|entry| entry.name = fname)
    }
    pub fn lock_file(&mut self,name: &str,locked: bool) -> STDRESULT {
        self.modify(name,|entry| entry.set_locked(locked))
    }
    /// Rewrite the directory slots in the given order, keeping the chain.
    /// Slots past the last entry are zeroed.  Returns false, writing nothing, if the order is unchanged.
    pub fn reorder(&mut self,files: Vec<DirectoryEntry>) -> Result<bool,DYNERR> {
        if files==self.directory()? {
            debug!("directory order is unchanged");
            return Ok(false);
        }
        let chain = self.dir_chain()?;
        if files.len() > chain.len()*ENTRIES_PER_SECTOR {
            return Err(Box::new(Error::DirError));
        }
        let mut remaining = files.into_iter();
        for ts in chain {
            let mut dir = self.read_dir_sector(ts)?;
            for slot in dir.entries.iter_mut() {
                *slot = remaining.next().unwrap_or(DirectoryEntry::new());
            }
            self.write_dir_sector(&dir,ts)?;
        }
        Ok(true)
    }
    /// Stable sort of the live entries
    pub fn reorder_by<F>(&mut self,compare: F) -> Result<bool,DYNERR>
    where F: FnMut(&DirectoryEntry,&DirectoryEntry) -> Ordering {
        let mut files = self.directory()?;
        files.sort_by(compare);
        self.reorder(files)
    }
    /// Put the named files first in the given order, the rest follow in their prior order.
    /// Names that are not found are skipped with a warning.
    pub fn reorder_by_names<S: AsRef<str>>(&mut self,order: &[S]) -> Result<bool,DYNERR> {
        let mut rest: Vec<Option<DirectoryEntry>> = self.directory()?.into_iter().map(Some).collect();
        let mut files = Vec::new();
        for name in order {
            let fname = string_to_file_name(name.as_ref());
            match rest.iter_mut().find(|e| e.as_ref().is_some_and(|x| x.name==fname)) {
                Some(slot) => {
                    if let Some(entry) = slot.take() {
                        files.push(entry);
                    }
                },
                None => warn!("{} is not in the directory",name.as_ref())
            }
        }
        files.extend(rest.into_iter().flatten());
        self.reorder(files)
    }
    pub fn move_file_first(&mut self,name: &str) -> Result<bool,DYNERR> {
        if self.find_file(name)?.is_none() {
            return Err(Box::new(Error::FileNotFound));
        }
        self.reorder_by_names(&[name])
    }
    /// Swap the file with its neighbor, returns false if it is already at the end in that direction
    pub fn move_file(&mut self,name: &str,up: bool) -> Result<bool,DYNERR> {
        let fname = string_to_file_name(name);
        let mut files = self.directory()?;
        let idx = match files.iter().position(|e| e.name==fname) {
            Some(i) => i,
            None => return Err(Box::new(Error::FileNotFound))
        };
        match up {
            true if idx > 0 => files.swap(idx-1,idx),
            false if idx+1 < files.len() => files.swap(idx,idx+1),
            _ => return Ok(false)
        }
        self.reorder(files)
    }
    /// Pack live entries into the fewest directory sectors and free the rest.
    /// Returns false if there are no live entries.
    pub fn compact_directory(&mut self) -> Result<bool,DYNERR> {
        let chain = self.dir_chain()?;
        let files = self.directory()?;
        if files.len()==0 {
            return Ok(false);
        }
        let needed = usize::max(1,(files.len() + ENTRIES_PER_SECTOR - 1) / ENTRIES_PER_SECTOR);
        let mut remaining = files.into_iter();
        for k in 0..needed {
            let mut dir = DirectorySector::new();
            if k+1 < needed {
                dir.next = chain[k+1];
            }
            for slot in dir.entries.iter_mut() {
                *slot = remaining.next().unwrap_or(DirectoryEntry::new());
            }
            self.write_dir_sector(&dir,chain[k])?;
        }
        let zeros = vec![0;SECTOR_SIZE];
        let mut bam = self.load_bam()?;
        for ts in &chain[needed..] {
            self.write_sector(&zeros,*ts)?;
            bam.free(ts[0],ts[1])?;
        }
        self.store_bam(&bam)?;
        info!("directory uses {} of {} sectors",needed,chain.len());
        Ok(true)
    }
}
