//! # `d64kit` main library
//!
//! This library manipulates Commodore 1541 disk images (D64) as used by emulators.
//! Manipulations can be done at a level as low as sectors, or as high as whole files.
//!
//! ## Architecture
//!
//! Disk image operations are built around two trait objects:
//! * `img::DiskImage` maps track and sector addresses to the image buffer, does not try to interpret a file system
//! * `fs::DiskFS` imposes the CBM DOS file system on the image
//!
//! When a `DiskFS` object is created it takes ownership of some `DiskImage`.
//! It then uses this owned image as storage.  Any changes are not permanent until the
//! image is saved to whatever file system is hosting d64kit.
//!
//! ## File Systems
//!
//! At present the only file system is CBM DOS 2.6, see `fs::cbm`.  This supports
//! sequential (SEQ, PRG, USR, DEL) and relative (REL) files.
//!
//! ## Disk Kinds
//!
//! The standard 35 track disk (174848 bytes) and the extended 40 track disk (196608 bytes) are
//! both supported.  The extra tracks of the 40 track disk are mapped in the BAM the way DolphinDOS does it.

pub mod fs;
pub mod img;
pub mod commands;

use img::DiskImage;
use fs::DiskFS;
use std::io::Read;
use std::fmt::Write;
use log::info;
use regex::Regex;
use hex;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Save the image file (make changes permanent)
pub fn save_img(disk: &mut Box<dyn DiskFS>,img_path: &str) -> STDRESULT {
    std::fs::write(img_path,disk.get_img().to_bytes())?;
    Ok(())
}

/// Given a bytestream return a DiskFS, or Err if the bytestream cannot be interpreted.
/// The size has to match one of the disk kinds.  If the CBM structures are not found
/// the disk is reformatted, so the result is always usable.
pub fn create_fs_from_bytestream(disk_img_data: &Vec<u8>) -> Result<Box<dyn DiskFS>,DYNERR> {
    let disk = fs::cbm::Disk::from_bytes(disk_img_data)?;
    info!("loaded {}",disk.kind());
    Ok(Box::new(disk))
}

/// Calls `create_fs_from_bytestream` getting the bytes from stdin.
pub fn create_fs_from_stdin() -> Result<Box<dyn DiskFS>,DYNERR> {
    let mut disk_img_data = Vec::new();
    match std::io::stdin().read_to_end(&mut disk_img_data) {
        Ok(_n) => create_fs_from_bytestream(&disk_img_data),
        Err(e) => Err(Box::new(e))
    }
}

/// Calls `create_fs_from_bytestream` getting the bytes from a file.
pub fn create_fs_from_file(img_path: &str) -> Result<Box<dyn DiskFS>,DYNERR> {
    match std::fs::read(img_path) {
        Ok(disk_img_data) => create_fs_from_bytestream(&disk_img_data),
        Err(e) => Err(Box::new(e))
    }
}

/// Create a blank, formatted disk image of the given kind
pub fn create_blank_fs(kind: img::DiskKind,name: &str,id: &str) -> Result<Box<dyn DiskFS>,DYNERR> {
    let img: Box<dyn DiskImage> = Box::new(img::d64::D64::create(kind));
    let mut disk = fs::cbm::Disk::from_img(img);
    disk.format(name,id)?;
    Ok(Box::new(disk))
}

/// Display binary to stdout in columns of hex and ascii
pub fn display_block(start_addr: u16,block: &Vec<u8>) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr as usize + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = block[slice_start..slice_end].to_vec();
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        print!("{:04X} : ",row_label);
        for byte in slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        println!("| {}",String::from_utf8_lossy(&txt));
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
}

/// This takes any bytes and makes an ascii friendly string
/// by using hex escapes, e.g., `\xFF`.
/// if `escape_cc` is true, ascii control characters are also escaped.
/// This is intended for directory strings.
pub fn escaped_ascii_from_bytes(bytes: &[u8],escape_cc: bool) -> String {
    let mut result = String::new();
    let (lb,ub) = match escape_cc {
        true => (0x20,0x7e),
        false => (0x00,0x7f)
    };
    for b in bytes {
        if *b>=lb && *b<=ub {
            result.push(*b as char);
        } else {
            write!(&mut result,"\\x{:02X}",b).expect("unreachable");
        }
    }
    return result;
}

/// Interpret a UTF8 string as pure ascii and put into bytes.
/// Non-ascii characters are omitted from the result, but arbitrary
/// bytes can be introduced using escapes, e.g., `\xFF`.
/// if `caps` is true the ascii is put in upper case.
pub fn parse_escaped_ascii(s: &str,caps: bool) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::new();
    let hex_patt = Regex::new(r"\\x[0-9A-Fa-f][0-9A-Fa-f]").expect("unreachable");
    let mut hexes = hex_patt.find_iter(s);
    let mut maybe_hex = hexes.next();
    let mut skip_to = 0;
    for (curs,c) in s.char_indices() {
        if curs < skip_to {
            continue;
        }
        if let Some(hex) = maybe_hex {
            if curs==hex.start() {
                ans.append(&mut hex::decode(&s[curs+2..curs+4]).expect("unreachable"));
                skip_to = hex.end();
                maybe_hex = hexes.next();
                continue;
            }
        }
        if c.is_ascii() {
            match caps {
                true => ans.push(c.to_ascii_uppercase() as u8),
                false => ans.push(c as u8)
            }
        }
    }
    return ans;
}

/// Calls `parse_escaped_ascii` with `caps=false`, CBM names keep their case
pub fn escaped_ascii_to_bytes(s: &str) -> Vec<u8> {
    parse_escaped_ascii(s,false)
}
