//! ## Directory listing
//!
//! Mimics what the C64 shows after `LOAD"$",8` and `LIST`.

use super::types::*;
use super::directory::DirectoryEntry;
use super::Disk;
use crate::STDRESULT;

/// header bytes are shown with the padding as spaces
fn header_string(dat: &[u8]) -> String {
    let unpadded: Vec<u8> = dat.iter().map(|b| if *b==PAD { 0x20 } else { *b }).collect();
    crate::escaped_ascii_from_bytes(&unpadded,true)
}

fn file_line(entry: &DirectoryEntry) -> String {
    let typ = match entry.typ() {
        Some(t) => t.to_string(),
        None => "???".to_string()
    };
    let lock = match entry.is_locked() {
        true => "<",
        false => ""
    };
    let quoted = ["\"",&entry.name(),"\""].concat();
    format!("{:<5}{:<18} {}{}",entry.block_count(),quoted,typ,lock)
}

pub fn catalog_to_stdout(disk: &mut Disk) -> STDRESULT {
    let bam = disk.load_bam()?;
    println!();
    println!("0 \"{:<16}\" {} {}",
        header_string(&bam.disk_name()),
        header_string(&bam.disk_id()),
        header_string(&bam.dos_type()));
    for entry in disk.directory()? {
        println!("{}",file_line(&entry));
    }
    println!("{} BLOCKS FREE.",disk.blocks_free()?);
    println!();
    Ok(())
}
