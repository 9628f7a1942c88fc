use clap;
use std::io::Read;
use std::str::FromStr;
use log::error;
use super::{ItemType,CommandError};
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

fn parse_num(s: &str) -> Result<usize,CommandError> {
    let ans = match s.strip_prefix('$').or(s.strip_prefix("0x")) {
        Some(hex) => usize::from_str_radix(hex,16),
        None => usize::from_str(s)
    };
    ans.map_err(|_| CommandError::OutOfRange)
}

pub fn put(cmd: &clap::ArgMatches) -> STDRESULT {
    if atty::is(atty::Stream::Stdin) {
        error!("cannot use `put` with console input, please pipe something in");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let dest_path = cmd.get_one::<String>("file").expect(RCH);
    let maybe_typ = cmd.get_one::<String>("type");
    let maybe_img = cmd.get_one::<String>("dimg");
    let mut file_data = Vec::new();
    std::io::stdin().read_to_end(&mut file_data)?;

    match (maybe_typ,maybe_img) {

        // we are writing to a disk image
        (Some(typ_str),Some(img_path)) => {
            let typ = ItemType::from_str(typ_str)?;
            let mut disk = crate::create_fs_from_file(img_path)?;
            match typ {
                ItemType::Program => {
                    let addr = parse_num(cmd.get_one::<String>("addr").expect(RCH))?;
                    if addr > u16::MAX as usize {
                        error!("load address must be 16 bits");
                        return Err(Box::new(CommandError::OutOfRange));
                    }
                    disk.save(dest_path,&file_data,addr as u16)?
                },
                ItemType::Relative => {
                    let len = match cmd.get_one::<String>("len") {
                        Some(s) => parse_num(s)?,
                        None => {
                            error!("relative file requires a record length");
                            return Err(Box::new(CommandError::InvalidCommand));
                        }
                    };
                    disk.write_records(dest_path,len,&file_data)?
                },
                ItemType::Sector => disk.write_block(dest_path,&file_data)?,
                ItemType::Raw => disk.write_raw(dest_path,"prg",&file_data)?,
                _ => disk.write_raw(dest_path,typ.mnemonic().expect(RCH),&file_data)?
            };
            crate::save_img(&mut disk,img_path)
        },

        // we are writing to a local file
        (None,None) => {
            std::fs::write(dest_path,&file_data)?;
            Ok(())
        },

        // arguments inconsistent
        _ => {
            error!("for `put` provide either `-f` alone, or all of `-f`, `-d`, and `-t`");
            Err(Box::new(CommandError::InvalidCommand))
        }
    }
}
