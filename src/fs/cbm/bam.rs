//! ## Block availability map
//!
//! The BAM lives in track 18 sector 0.  Each track has a 4 byte entry: the free sector
//! count followed by a 3 byte bitmap, least significant bit first, where a set bit means free.
//! Tracks 1-35 start at offset 4, tracks 36-40 follow the DolphinDOS convention and start at 0xAC.
//!
//! `Bam` is a view over a copy of the sector.  The `Disk` methods below load it, operate,
//! and store it back, so there is never a cached map that can go stale.

use log::{debug,trace};
use super::types::*;
use super::Disk;
use crate::img::geometry::Geometry;
use crate::{DYNERR,STDRESULT};

const ENTRY_SIZE: usize = 4;
const ENTRY_OFFSET: usize = 0x04;
const DOLPHIN_ENTRY_OFFSET: usize = 0xac;
const NAME_OFFSET: usize = 0x90;
const ID_OFFSET: usize = 0xa2;
const DOS_TYPE_OFFSET: usize = 0xa5;

pub struct Bam {
    buf: Vec<u8>,
    geometry: Geometry
}

impl Bam {
    pub fn from_bytes(dat: &[u8],geometry: Geometry) -> Result<Self,DYNERR> {
        if dat.len() < 256 {
            return Err(Box::new(Error::IllegalTrackOrSector));
        }
        Ok(Self {
            buf: dat[0..256].to_vec(),
            geometry
        })
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }
    /// Set up the header fields of a blank disk, the track entries are zeroed.
    pub fn init_fields(&mut self,name: &[u8;NAME_LEN],id: [u8;2]) {
        self.buf = vec![0;256];
        self.buf[0] = DIR_TRACK;
        self.buf[1] = DIR_SECTOR;
        self.buf[2] = DOS_VERSION;
        self.buf[NAME_OFFSET..NAME_OFFSET+NAME_LEN].copy_from_slice(name);
        self.buf[0xa0] = PAD;
        self.buf[0xa1] = PAD;
        self.buf[ID_OFFSET..ID_OFFSET+2].copy_from_slice(&id);
        self.buf[0xa4] = PAD;
        self.buf[DOS_TYPE_OFFSET..DOS_TYPE_OFFSET+2].copy_from_slice(&DOS_TYPE);
    }
    /// where the directory chain starts according to the header
    pub fn dir_start(&self) -> [u8;2] {
        [self.buf[0],self.buf[1]]
    }
    pub fn disk_name(&self) -> [u8;NAME_LEN] {
        let mut ans = [0;NAME_LEN];
        ans.copy_from_slice(&self.buf[NAME_OFFSET..NAME_OFFSET+NAME_LEN]);
        ans
    }
    pub fn set_disk_name(&mut self,name: &[u8;NAME_LEN]) {
        self.buf[NAME_OFFSET..NAME_OFFSET+NAME_LEN].copy_from_slice(name);
    }
    pub fn disk_id(&self) -> [u8;2] {
        [self.buf[ID_OFFSET],self.buf[ID_OFFSET+1]]
    }
    pub fn dos_type(&self) -> [u8;2] {
        [self.buf[DOS_TYPE_OFFSET],self.buf[DOS_TYPE_OFFSET+1]]
    }
    /// offset of the track's entry, checking the track is on the disk
    fn entry(&self,track: u8) -> Result<usize,Error> {
        match (track as usize,self.geometry.sectors(track as usize)) {
            (_,None) => Err(Error::IllegalTrackOrSector),
            (t,Some(_)) if t<=35 => Ok(ENTRY_OFFSET + (t-1)*ENTRY_SIZE),
            (t,Some(_)) => Ok(DOLPHIN_ENTRY_OFFSET + (t-36)*ENTRY_SIZE)
        }
    }
    /// returns (byte offset,mask) of the sector's bit, checking the sector is on the track
    fn bit(&self,track: u8,sector: u8) -> Result<(usize,u8),Error> {
        let entry = self.entry(track)?;
        if !self.geometry.contains(track as usize,sector as usize) {
            return Err(Error::IllegalTrackOrSector);
        }
        Ok((entry + 1 + sector as usize/8, 1 << (sector % 8)))
    }
    /// Is the sector free
    pub fn test(&self,track: u8,sector: u8) -> Result<bool,Error> {
        let (i,mask) = self.bit(track,sector)?;
        Ok(self.buf[i] & mask > 0)
    }
    /// Set the bit only, the free count is not touched
    pub fn mark_free(&mut self,track: u8,sector: u8) -> Result<(),Error> {
        let (i,mask) = self.bit(track,sector)?;
        self.buf[i] |= mask;
        Ok(())
    }
    /// Clear the bit only, the free count is not touched
    pub fn mark_used(&mut self,track: u8,sector: u8) -> Result<(),Error> {
        let (i,mask) = self.bit(track,sector)?;
        self.buf[i] &= !mask;
        Ok(())
    }
    pub fn free_count(&self,track: u8) -> Result<u8,Error> {
        Ok(self.buf[self.entry(track)?])
    }
    pub fn set_free_count(&mut self,track: u8,count: u8) -> Result<(),Error> {
        let i = self.entry(track)?;
        self.buf[i] = count;
        Ok(())
    }
    /// Mark every sector on the track free.  Bits beyond the last sector are set too,
    /// since unused bitmap bits read as set on the drive.
    pub fn reset_track(&mut self,track: u8) -> Result<(),Error> {
        let i = self.entry(track)?;
        self.buf[i] = self.geometry.sectors(track as usize).unwrap_or(0) as u8;
        self.buf[i+1..i+4].copy_from_slice(&[0xff;3]);
        Ok(())
    }
    /// Allocate the sector and decrement the free count.  Returns false if already allocated.
    pub fn allocate(&mut self,track: u8,sector: u8) -> Result<bool,Error> {
        if !self.test(track,sector)? {
            debug!("track {} sector {} is already allocated",track,sector);
            return Ok(false);
        }
        self.mark_used(track,sector)?;
        let count = self.free_count(track)?;
        self.set_free_count(track,count.saturating_sub(1))?;
        Ok(true)
    }
    /// Free the sector and increment the free count.  Returns false if already free,
    /// or if the sector is the BAM or first directory sector.
    pub fn free(&mut self,track: u8,sector: u8) -> Result<bool,Error> {
        if track==DIR_TRACK && (sector==BAM_SECTOR || sector==DIR_SECTOR) {
            debug!("refusing to free track {} sector {}",track,sector);
            return Ok(false);
        }
        if self.test(track,sector)? {
            debug!("track {} sector {} is already free",track,sector);
            return Ok(false);
        }
        self.mark_free(track,sector)?;
        let count = self.free_count(track)?;
        self.set_free_count(track,count.saturating_add(1))?;
        Ok(true)
    }
}

impl Disk {
    pub(super) fn load_bam(&mut self) -> Result<Bam,DYNERR> {
        let dat = self.read_sector([DIR_TRACK,BAM_SECTOR])?;
        Bam::from_bytes(&dat,self.geometry)
    }
    pub(super) fn store_bam(&mut self,bam: &Bam) -> STDRESULT {
        self.write_sector(&bam.to_bytes(),[DIR_TRACK,BAM_SECTOR])
    }
    /// Is the sector free according to the BAM
    pub fn is_sector_free(&mut self,ts: [u8;2]) -> Result<bool,DYNERR> {
        Ok(self.load_bam()?.test(ts[0],ts[1])?)
    }
    /// Allocate a specific sector.  Returns false if it was already allocated.
    pub fn allocate_sector(&mut self,ts: [u8;2]) -> Result<bool,DYNERR> {
        let mut bam = self.load_bam()?;
        let ans = bam.allocate(ts[0],ts[1])?;
        self.store_bam(&bam)?;
        Ok(ans)
    }
    /// Free a specific sector.  Returns false if it was already free or is protected.
    pub fn free_sector(&mut self,ts: [u8;2]) -> Result<bool,DYNERR> {
        let mut bam = self.load_bam()?;
        let ans = bam.free(ts[0],ts[1])?;
        self.store_bam(&bam)?;
        Ok(ans)
    }
    /// Flip the BAM bit to free without touching the count; for repair tools and testing.
    pub fn mark_free(&mut self,ts: [u8;2]) -> STDRESULT {
        let mut bam = self.load_bam()?;
        bam.mark_free(ts[0],ts[1])?;
        self.store_bam(&bam)
    }
    /// Flip the BAM bit to used without touching the count; for repair tools and testing.
    pub fn mark_used(&mut self,ts: [u8;2]) -> STDRESULT {
        let mut bam = self.load_bam()?;
        bam.mark_used(ts[0],ts[1])?;
        self.store_bam(&bam)
    }
    /// Free count recorded in the BAM for one track
    pub fn free_count(&mut self,track: u8) -> Result<usize,DYNERR> {
        Ok(self.load_bam()?.free_count(track)? as usize)
    }
    /// Sum of the recorded free counts over all tracks
    pub fn num_free_sectors(&mut self) -> Result<usize,DYNERR> {
        let bam = self.load_bam()?;
        let mut ans = 0;
        for track in 1..=self.geometry.tracks() as u8 {
            ans += bam.free_count(track)? as usize;
        }
        Ok(ans)
    }
    /// Free sectors as reported in a directory listing, the directory track is left out.
    pub fn blocks_free(&mut self) -> Result<usize,DYNERR> {
        let all = self.num_free_sectors()?;
        Ok(all - self.free_count(DIR_TRACK)?)
    }
    /// Find a free sector, allocate it, and return its address.
    /// Tracks are searched outward from the directory track, within a track the search
    /// starts `INTERLEAVE` sectors past the last one used and wraps around.
    pub fn find_and_allocate_free(&mut self) -> Result<[u8;2],DYNERR> {
        let mut bam = self.load_bam()?;
        let order: &[u8] = match self.geometry.tracks() {
            40 => &SEARCH_ORDER_40[..],
            _ => &SEARCH_ORDER_35[..]
        };
        for track in order {
            if bam.free_count(*track)? < 1 {
                continue;
            }
            let spt = self.geometry.sectors(*track as usize).unwrap_or(0);
            let start = (self.last_sector_used[*track as usize - 1] + INTERLEAVE) % spt;
            for i in 0..spt {
                let sector = ((start + i) % spt) as u8;
                if bam.test(*track,sector)? {
                    bam.allocate(*track,sector)?;
                    self.store_bam(&bam)?;
                    self.last_sector_used[*track as usize - 1] = sector as usize;
                    trace!("allocated track {} sector {}",track,sector);
                    return Ok([*track,sector]);
                }
            }
            debug!("track {} free count is {} but no free bits",track,bam.free_count(*track)?);
        }
        Err(Box::new(Error::DiskFull))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::img::DiskKind;

    fn fresh(kind: DiskKind) -> Bam {
        let geometry = Geometry::new(kind);
        let mut bam = Bam::from_bytes(&vec![0;256],geometry).unwrap();
        bam.init_fields(&[PAD;NAME_LEN],[PAD,PAD]);
        for t in 1..=geometry.tracks() as u8 {
            bam.reset_track(t).unwrap();
        }
        bam
    }

    #[test]
    fn reset_pattern() {
        let bam = fresh(DiskKind::D525Tracks35);
        let dat = bam.to_bytes();
        assert_eq!(&dat[4..8],&[21,0xff,0xff,0xff]);
        // track 18
        assert_eq!(&dat[72..76],&[19,0xff,0xff,0xff]);
        // track 35
        assert_eq!(&dat[140..144],&[17,0xff,0xff,0xff]);
        assert_eq!(bam.dos_type(),DOS_TYPE);
    }

    #[test]
    fn dolphin_tracks() {
        let mut bam = fresh(DiskKind::D525Tracks40);
        let dat = bam.to_bytes();
        assert_eq!(&dat[0xac..0xb0],&[17,0xff,0xff,0xff]);
        assert_eq!(&dat[0xbc..0xc0],&[17,0xff,0xff,0xff]);
        assert!(bam.allocate(40,16).unwrap());
        assert_eq!(bam.to_bytes()[0xbc..0xc0],[16,0xff,0xff,0xfe]);
        assert!(fresh(DiskKind::D525Tracks35).test(36,0).is_err());
    }

    #[test]
    fn allocate_and_free() {
        let mut bam = fresh(DiskKind::D525Tracks35);
        let before = bam.to_bytes();
        assert!(bam.allocate(1,20).unwrap());
        assert!(!bam.allocate(1,20).unwrap());
        assert_eq!(bam.free_count(1).unwrap(),20);
        assert!(bam.free(1,20).unwrap());
        assert!(!bam.free(1,20).unwrap());
        assert_eq!(bam.to_bytes(),before);
        assert!(bam.test(1,21).is_err());
        assert!(bam.test(0,0).is_err());
    }

    #[test]
    fn protected_sectors() {
        let mut bam = fresh(DiskKind::D525Tracks35);
        assert!(bam.allocate(DIR_TRACK,BAM_SECTOR).unwrap());
        assert!(bam.allocate(DIR_TRACK,DIR_SECTOR).unwrap());
        assert!(!bam.free(DIR_TRACK,BAM_SECTOR).unwrap());
        assert!(!bam.free(DIR_TRACK,DIR_SECTOR).unwrap());
        assert!(!bam.test(DIR_TRACK,DIR_SECTOR).unwrap());
    }
}
