//! ## On-disk structures
//!
//! Fixed layout structures that are copied out of, and back into, sector buffers.
//! Each `from_bytes` checks the length of the slice it is given, so a truncated
//! buffer produces an error rather than a panic.

use num_traits::FromPrimitive;
use super::types::*;
use crate::DYNERR;

pub const ENTRY_SIZE: usize = 30;
pub const ENTRY_STRIDE: usize = 32;
pub const ENTRIES_PER_SECTOR: usize = 8;
pub const SECTOR_SIZE: usize = 256;

/// One 30 byte directory entry.  The entry is live if and only if the closed flag is set.
#[derive(Clone,PartialEq,Eq,Debug)]
pub struct DirectoryEntry {
    pub file_type: u8,
    pub start: [u8;2],
    pub name: [u8;NAME_LEN],
    pub side: [u8;2],
    pub record_len: u8,
    pub unused: [u8;4],
    pub replace: [u8;2],
    pub sectors: [u8;2]
}

impl DirectoryEntry {
    pub fn new() -> Self {
        Self {
            file_type: 0,
            start: [0,0],
            name: [0;NAME_LEN],
            side: [0,0],
            record_len: 0,
            unused: [0;4],
            replace: [0,0],
            sectors: [0,0]
        }
    }
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        if dat.len() < ENTRY_SIZE {
            return Err(Box::new(Error::DirError));
        }
        let mut name = [0;NAME_LEN];
        name.copy_from_slice(&dat[3..19]);
        Ok(Self {
            file_type: dat[0],
            start: [dat[1],dat[2]],
            name,
            side: [dat[19],dat[20]],
            record_len: dat[21],
            unused: [dat[22],dat[23],dat[24],dat[25]],
            replace: [dat[26],dat[27]],
            sectors: [dat[28],dat[29]]
        })
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ans = Vec::with_capacity(ENTRY_SIZE);
        ans.push(self.file_type);
        ans.extend_from_slice(&self.start);
        ans.extend_from_slice(&self.name);
        ans.extend_from_slice(&self.side);
        ans.push(self.record_len);
        ans.extend_from_slice(&self.unused);
        ans.extend_from_slice(&self.replace);
        ans.extend_from_slice(&self.sectors);
        ans
    }
    pub fn is_live(&self) -> bool {
        self.file_type & CLOSED > 0
    }
    pub fn is_locked(&self) -> bool {
        self.file_type & LOCKED > 0
    }
    pub fn set_locked(&mut self,locked: bool) {
        match locked {
            true => self.file_type |= LOCKED,
            false => self.file_type &= !LOCKED
        }
    }
    /// None if the type nibble is not one of the five known types
    pub fn typ(&self) -> Option<FileType> {
        FileType::from_u8(self.file_type & TYPE_MASK)
    }
    pub fn set_typ(&mut self,typ: FileType) {
        self.file_type = (self.file_type & !TYPE_MASK) | typ as u8;
    }
    /// The name with padding removed, non-printing bytes are hex escaped
    pub fn name(&self) -> String {
        super::file_name_to_string(self.name)
    }
    pub fn block_count(&self) -> usize {
        u16::from_le_bytes(self.sectors) as usize
    }
}

/// A directory sector, link to the next sector followed by 8 entries at a stride of 32 bytes.
/// The two bytes preceding each entry after the first are not used.
pub struct DirectorySector {
    pub next: [u8;2],
    pub entries: Vec<DirectoryEntry>
}

impl DirectorySector {
    /// New sector that terminates the chain and has all entries zeroed
    pub fn new() -> Self {
        Self {
            next: [0,0xff],
            entries: vec![DirectoryEntry::new();ENTRIES_PER_SECTOR]
        }
    }
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        if dat.len() < SECTOR_SIZE {
            return Err(Box::new(Error::DirError));
        }
        let mut entries = Vec::new();
        for i in 0..ENTRIES_PER_SECTOR {
            let offset = 2 + i*ENTRY_STRIDE;
            entries.push(DirectoryEntry::from_bytes(&dat[offset..offset+ENTRY_SIZE])?);
        }
        Ok(Self {
            next: [dat[0],dat[1]],
            entries
        })
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ans = vec![0;SECTOR_SIZE];
        ans[0] = self.next[0];
        ans[1] = self.next[1];
        for (i,entry) in self.entries.iter().enumerate() {
            let offset = 2 + i*ENTRY_STRIDE;
            ans[offset..offset+ENTRY_SIZE].copy_from_slice(&entry.to_bytes());
        }
        ans
    }
}

/// Side sector of a relative file.
pub struct SideSector {
    pub next: [u8;2],
    /// position of this side sector in the file's set, counting from 0
    pub block: u8,
    pub record_len: u8,
    /// every side sector of the file, unused slots are [0,0]
    pub siblings: [[u8;2];MAX_SIDE_SECTORS],
    /// data sectors in record order, at most `SIDE_CHAIN_LEN`
    pub chain: Vec<[u8;2]>
}

impl SideSector {
    pub fn new(block: u8,record_len: u8) -> Self {
        Self {
            next: [0,0],
            block,
            record_len,
            siblings: [[0,0];MAX_SIDE_SECTORS],
            chain: Vec::new()
        }
    }
    /// Parse the sector, the chain ends at the first pointer with track 0.
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        if dat.len() < SECTOR_SIZE {
            return Err(Box::new(Error::IllegalTrackOrSector));
        }
        let mut siblings = [[0,0];MAX_SIDE_SECTORS];
        for i in 0..MAX_SIDE_SECTORS {
            siblings[i] = [dat[4+i*2],dat[5+i*2]];
        }
        let mut chain = Vec::new();
        for i in 0..SIDE_CHAIN_LEN {
            let ts = [dat[16+i*2],dat[17+i*2]];
            if ts[0]==0 {
                break;
            }
            chain.push(ts);
        }
        Ok(Self {
            next: [dat[0],dat[1]],
            block: dat[2],
            record_len: dat[3],
            siblings,
            chain
        })
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ans = vec![0;SECTOR_SIZE];
        ans[0] = self.next[0];
        ans[1] = self.next[1];
        ans[2] = self.block;
        ans[3] = self.record_len;
        for i in 0..MAX_SIDE_SECTORS {
            ans[4+i*2] = self.siblings[i][0];
            ans[5+i*2] = self.siblings[i][1];
        }
        for (i,ts) in self.chain.iter().take(SIDE_CHAIN_LEN).enumerate() {
            ans[16+i*2] = ts[0];
            ans[17+i*2] = ts[1];
        }
        ans
    }
}
