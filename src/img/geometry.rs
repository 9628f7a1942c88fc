//! ## 1541 disk geometry
//!
//! The 1541 uses four speed zones, so the sector count depends on the track.
//! Tracks count from 1, sectors count from 0.  The tables are laid out for 40 tracks;
//! the 35 track disk simply stops early.  All translation from a track and sector to a
//! byte offset within a D64 buffer goes through `Geometry::offset`.

use log::error;
use super::{DiskKind,Error};

pub const SECTOR_SIZE: usize = 256;
pub const MAX_TRACKS: usize = 40;
pub const D64_35_SIZE: usize = 174848;
pub const D64_40_SIZE: usize = 196608;

/// Sectors on each track, index 0 is track 1
pub const SECTORS_PER_TRACK: [usize;MAX_TRACKS] = [
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, // 1-17
    19, 19, 19, 19, 19, 19, 19, // 18-24
    18, 18, 18, 18, 18, 18, // 25-30
    17, 17, 17, 17, 17, // 31-35
    17, 17, 17, 17, 17  // 36-40
];

/// Byte offset of sector 0 on each track, index 0 is track 1
pub const TRACK_OFFSETS: [usize;MAX_TRACKS] = [
    0x00000, 0x01500, 0x02a00, 0x03f00, 0x05400, 0x06900, 0x07e00, 0x09300,
    0x0a800, 0x0bd00, 0x0d200, 0x0e700, 0x0fc00, 0x11100, 0x12600, 0x13b00,
    0x15000, 0x16500, 0x17800, 0x18b00, 0x19e00, 0x1b100, 0x1c400, 0x1d700,
    0x1ea00, 0x1fc00, 0x20e00, 0x22000, 0x23200, 0x24400, 0x25600, 0x26700,
    0x27800, 0x28900, 0x29a00, 0x2ab00, 0x2bc00, 0x2cd00, 0x2de00, 0x2ef00
];

/// Immutable description of a D64 layout, cheap to copy into any component that needs it.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub struct Geometry {
    tracks: usize
}

impl Geometry {
    pub fn new(kind: DiskKind) -> Self {
        Self {
            tracks: kind.track_count()
        }
    }
    /// Infer the geometry from the length of a D64 buffer
    pub fn from_image_size(len: usize) -> Option<Self> {
        match len {
            D64_35_SIZE => Some(Self::new(DiskKind::D525Tracks35)),
            D64_40_SIZE => Some(Self::new(DiskKind::D525Tracks40)),
            _ => None
        }
    }
    pub fn kind(&self) -> DiskKind {
        match self.tracks {
            40 => DiskKind::D525Tracks40,
            _ => DiskKind::D525Tracks35
        }
    }
    pub fn tracks(&self) -> usize {
        self.tracks
    }
    /// Sector count on a track, or None if the track is not on this disk
    pub fn sectors(&self,track: usize) -> Option<usize> {
        match track {
            t if t>=1 && t<=self.tracks => Some(SECTORS_PER_TRACK[t-1]),
            _ => None
        }
    }
    pub fn total_sectors(&self) -> usize {
        SECTORS_PER_TRACK[0..self.tracks].iter().sum()
    }
    pub fn image_size(&self) -> usize {
        self.total_sectors() * SECTOR_SIZE
    }
    /// Is the address on the disk
    pub fn contains(&self,track: usize,sector: usize) -> bool {
        match self.sectors(track) {
            Some(n) => sector < n,
            None => false
        }
    }
    /// Byte offset of the start of the sector within the image buffer
    pub fn offset(&self,track: usize,sector: usize) -> Result<usize,Error> {
        if !self.contains(track,sector) {
            error!("exceeded bounds: track {} sector {} not on a {} track disk",track,sector,self.tracks);
            return Err(Error::SectorAccess);
        }
        Ok(TRACK_OFFSETS[track-1] + sector*SECTOR_SIZE)
    }
    /// Convert an absolute sector number (counting from 0) to [track,sector]
    pub fn lba_to_ts(&self,lba: usize) -> Result<[usize;2],Error> {
        let mut rem = lba;
        for track in 1..=self.tracks {
            let n = SECTORS_PER_TRACK[track-1];
            if rem < n {
                return Ok([track,rem]);
            }
            rem -= n;
        }
        error!("exceeded bounds: sector {} not on a {} track disk",lba,self.tracks);
        Err(Error::SectorAccess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_running_sums() {
        let mut acc = 0;
        for t in 0..MAX_TRACKS {
            assert_eq!(TRACK_OFFSETS[t],acc,"track {}",t+1);
            acc += SECTORS_PER_TRACK[t] * SECTOR_SIZE;
        }
        assert_eq!(acc,D64_40_SIZE);
    }

    #[test]
    fn sizes() {
        assert_eq!(Geometry::new(DiskKind::D525Tracks35).image_size(),D64_35_SIZE);
        assert_eq!(Geometry::new(DiskKind::D525Tracks40).image_size(),D64_40_SIZE);
        assert_eq!(Geometry::new(DiskKind::D525Tracks35).total_sectors(),683);
        assert!(Geometry::from_image_size(1000).is_none());
    }

    #[test]
    fn bounds() {
        let geo = Geometry::new(DiskKind::D525Tracks35);
        assert_eq!(geo.offset(18,0).unwrap(),0x16500);
        assert_eq!(geo.offset(35,16).unwrap(),D64_35_SIZE-SECTOR_SIZE);
        assert!(geo.offset(0,0).is_err());
        assert!(geo.offset(36,0).is_err());
        assert!(geo.offset(17,21).is_err());
        assert!(geo.offset(18,19).is_err());
        assert!(geo.offset(18,18).is_ok());
        assert_eq!(geo.lba_to_ts(357).unwrap(),[18,0]);
        assert!(geo.lba_to_ts(683).is_err());
    }
}
