//! ## Consistency check
//!
//! Rebuilds the set of sectors in use from the directory and compares it with the BAM.
//! A damaged chain is counted up to its first bad link.

use std::fmt;
use bit_vec::BitVec;
use log::{info,warn};
use super::types::*;
use super::Disk;
use crate::DYNERR;

/// A disagreement between the BAM and the sectors the directory actually uses
#[derive(Clone,Copy,PartialEq,Eq,Hash,Debug)]
pub enum Discrepancy {
    /// in use by the BAM, directory, or a file, but marked free
    UsedButFree([u8;2]),
    /// marked allocated but nothing uses it
    FreeButAllocated([u8;2]),
    /// recorded free count differs from the number of unused sectors
    FreeCount { track: u8, recorded: u8, actual: u8 }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsedButFree([t,s]) => write!(f,"track {} sector {} is in use but marked free",t,s),
            Self::FreeButAllocated([t,s]) => write!(f,"track {} sector {} is not in use but marked allocated",t,s),
            Self::FreeCount { track, recorded, actual } => write!(f,"track {} free count is {}, should be {}",track,recorded,actual)
        }
    }
}

impl Disk {
    /// One bit per sector for each track, set if the sector is in use
    fn live_sectors(&mut self) -> Result<Vec<BitVec>,DYNERR> {
        let mut ans = Vec::new();
        for track in 1..=self.geometry.tracks() {
            ans.push(BitVec::from_elem(self.geometry.sectors(track).unwrap_or(0),false));
        }
        let geometry = self.geometry;
        let mark = |ans: &mut Vec<BitVec>,ts: [u8;2]| {
            if geometry.contains(ts[0] as usize,ts[1] as usize) {
                ans[ts[0] as usize - 1].set(ts[1] as usize,true);
            }
        };
        mark(&mut ans,[DIR_TRACK,BAM_SECTOR]);
        for ts in self.dir_chain()? {
            mark(&mut ans,ts);
        }
        for entry in self.directory()? {
            for ts in self.reachable_sectors(&entry) {
                mark(&mut ans,ts);
            }
        }
        Ok(ans)
    }
    /// Compare the BAM with the sectors in use.  If `repair` is true the BAM is rewritten to agree.
    /// Returns every discrepancy found, an empty list means the disk is consistent.
    pub fn verify(&mut self,repair: bool) -> Result<Vec<Discrepancy>,DYNERR> {
        let live = self.live_sectors()?;
        let mut bam = self.load_bam()?;
        let mut ans = Vec::new();
        for track in 1..=self.geometry.tracks() as u8 {
            let used = &live[track as usize - 1];
            for sector in 0..used.len() as u8 {
                let in_use = used.get(sector as usize).unwrap_or(false);
                match (in_use,bam.test(track,sector)?) {
                    (true,true) => {
                        ans.push(Discrepancy::UsedButFree([track,sector]));
                        if repair {
                            bam.mark_used(track,sector)?;
                        }
                    },
                    (false,false) => {
                        ans.push(Discrepancy::FreeButAllocated([track,sector]));
                        if repair {
                            bam.mark_free(track,sector)?;
                        }
                    },
                    _ => {}
                }
            }
            let actual = used.iter().filter(|x| !x).count() as u8;
            let recorded = bam.free_count(track)?;
            if recorded!=actual {
                ans.push(Discrepancy::FreeCount { track, recorded, actual });
                if repair {
                    bam.set_free_count(track,actual)?;
                }
            }
        }
        for d in &ans {
            warn!("{}",d);
            if repair {
                info!("fixing: {}",d);
            }
        }
        if repair && ans.len()>0 {
            self.store_bam(&bam)?;
        }
        Ok(ans)
    }
}
