//! ## Support for D64 disk images
//!
//! D64 images are a simple sequential dump of the decoded sectors of a 1541 disk,
//! starting with track 1 sector 0.  There is no header and no error information;
//! the variant is identified by the buffer length alone.

use log::{trace,debug};
use crate::img;
use crate::img::geometry::{Geometry,SECTOR_SIZE};
use crate::fs::Block;
use crate::{STDRESULT,DYNERR};

/// Wrapper for D64 data.
pub struct D64 {
    geometry: Geometry,
    data: Vec<u8>
}

impl D64 {
    /// Create a blank image, every byte is zero.
    pub fn create(kind: img::DiskKind) -> Self {
        let geometry = Geometry::new(kind);
        Self {
            geometry,
            data: vec![0;geometry.image_size()]
        }
    }
    fn ts(&self,addr: Block) -> Result<[usize;2],img::Error> {
        match addr {
            Block::TS(ts) => Ok(ts),
            Block::LBA(lba) => self.geometry.lba_to_ts(lba)
        }
    }
}

impl img::DiskImage for D64 {
    fn track_count(&self) -> usize {
        self.geometry.tracks()
    }
    fn byte_capacity(&self) -> usize {
        self.data.len()
    }
    fn geometry(&self) -> Geometry {
        self.geometry
    }
    fn from_bytes(buf: &[u8]) -> Result<Self,img::Error> {
        match Geometry::from_image_size(buf.len()) {
            Some(geometry) => Ok(Self {
                geometry,
                data: buf.to_vec()
            }),
            None => {
                debug!("image size was {}",buf.len());
                Err(img::Error::ImageSizeMismatch)
            }
        }
    }
    fn to_bytes(&mut self) -> Vec<u8> {
        self.data.clone()
    }
    fn read_block(&mut self,addr: Block) -> Result<Vec<u8>,DYNERR> {
        trace!("read {}",addr);
        let [t,s] = self.ts(addr)?;
        let offset = self.geometry.offset(t,s)?;
        Ok(self.data[offset..offset+SECTOR_SIZE].to_vec())
    }
    fn write_block(&mut self,addr: Block,dat: &[u8]) -> STDRESULT {
        trace!("write {}",addr);
        let [t,s] = self.ts(addr)?;
        let offset = self.geometry.offset(t,s)?;
        let padded = img::quantize_block(dat,SECTOR_SIZE);
        self.data[offset..offset+SECTOR_SIZE].copy_from_slice(&padded);
        Ok(())
    }
}
