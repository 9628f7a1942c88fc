use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::str::FromStr;
use std::fmt;

pub const DIR_TRACK: u8 = 18;
pub const BAM_SECTOR: u8 = 0;
pub const DIR_SECTOR: u8 = 1;
/// step taken from the last sector used on a track when looking for the next one
pub const INTERLEAVE: usize = 10;
pub const PAD: u8 = 0xa0;
pub const NAME_LEN: usize = 16;
/// payload bytes in a data sector
pub const DATA_BYTES: usize = 254;
pub const MAX_SIDE_SECTORS: usize = 6;
/// data sector pointers in a side sector
pub const SIDE_CHAIN_LEN: usize = 120;
pub const DOS_VERSION: u8 = 0x41;
pub const DOS_TYPE: [u8;2] = [0x32,0x41];
pub const DEFAULT_DISK_NAME: &str = "NEW DISK";

pub const CLOSED: u8 = 0x80;
pub const LOCKED: u8 = 0x40;
pub const TYPE_MASK: u8 = 0x0f;

/// Track search order for the 35 track disk, outward from the directory track.
pub const SEARCH_ORDER_35: [u8;35] = [
    18, 17, 19, 16, 20, 15, 21, 14, 22, 13, 23, 12, 24, 11, 25, 10, 26, 9,
    27, 8, 28, 7, 29, 6, 30, 5, 31, 4, 32, 3, 33, 2, 34, 1, 35
];

/// Track search order for the 40 track disk, the extended tracks come last.
pub const SEARCH_ORDER_40: [u8;40] = [
    18, 17, 19, 16, 20, 15, 21, 14, 22, 13, 23, 12, 24, 11, 25, 10, 26, 9,
    27, 8, 28, 7, 29, 6, 30, 5, 31, 4, 32, 3, 33, 2, 34, 1, 35,
    36, 37, 38, 39, 40
];

/// Enumerates DOS errors.  The `Display` trait will print equivalent CBM DOS message such as `FILE NOT FOUND`.
/// Errors that only arise from the drive hardware (read errors, write protect tab) are omitted.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("SYNTAX ERROR")]
    SyntaxError,
    #[error("RECORD NOT PRESENT")]
    RecordNotPresent,
    #[error("OVERFLOW IN RECORD")]
    OverflowInRecord,
    #[error("FILE TOO LARGE")]
    FileTooLarge,
    #[error("WRITE PROTECT ON")]
    WriteProtect,
    #[error("FILE TYPE MISMATCH")]
    FileTypeMismatch,
    #[error("FILE NOT FOUND")]
    FileNotFound,
    #[error("FILE EXISTS")]
    FileExists,
    #[error("ILLEGAL TRACK OR SECTOR")]
    IllegalTrackOrSector,
    #[error("DIR ERROR")]
    DirError,
    #[error("DISK FULL")]
    DiskFull
}

/// Enumerates the file types, available conversions are:
/// * FileType to u8: `as u8`
/// * u8 to FileType: `FileType::from_u8`, (use FromPrimitive trait), mask the flags first
/// * &str to FileType: `FileType::from_str`, str can be a number or mnemonic
#[derive(FromPrimitive,PartialEq,Eq,Clone,Copy,Debug)]
pub enum FileType {
    Del = 0x00,
    Seq = 0x01,
    Prg = 0x02,
    Usr = 0x03,
    Rel = 0x04
}

impl FileType {
    /// host file extension used when extracting
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Del => "del",
            Self::Seq => "seq",
            Self::Prg => "prg",
            Self::Usr => "usr",
            Self::Rel => "rel"
        }
    }
}

impl FromStr for FileType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        // string can be the number itself
        if let Ok(num) = u8::from_str(s) {
            return match FileType::from_u8(num) {
                Some(typ) => Ok(typ),
                _ => Err(Error::FileTypeMismatch)
            };
        }
        // or a mnemonic
        match s.to_lowercase().as_str() {
            "del" => Ok(Self::Del),
            "seq" => Ok(Self::Seq),
            "prg" => Ok(Self::Prg),
            "usr" => Ok(Self::Usr),
            "rel" => Ok(Self::Rel),
            _ => Err(Error::FileTypeMismatch)
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}",self.extension().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_file_types() {
        assert_eq!(FileType::from_str("prg").unwrap(),FileType::Prg);
        assert_eq!(FileType::from_str("REL").unwrap(),FileType::Rel);
        assert_eq!(FileType::from_str("1").unwrap(),FileType::Seq);
        assert!(FileType::from_str("5").is_err());
        assert!(FileType::from_str("bas").is_err());
        assert_eq!(FileType::Usr.to_string(),"USR");
    }

    #[test]
    fn search_orders_cover_every_track_once() {
        let mut seen35 = SEARCH_ORDER_35.to_vec();
        seen35.sort();
        assert_eq!(seen35,(1..=35).collect::<Vec<u8>>());
        let mut seen40 = SEARCH_ORDER_40.to_vec();
        seen40.sort();
        assert_eq!(seen40,(1..=40).collect::<Vec<u8>>());
        assert_eq!(SEARCH_ORDER_35[..],SEARCH_ORDER_40[0..35]);
    }
}
