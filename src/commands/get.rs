use clap;
use std::io::Write;
use std::str::FromStr;
use log::error;
use super::{ItemType,CommandError};
use crate::{STDRESULT,DYNERR};

const RCH: &str = "unreachable was reached";

fn output_get(maybe_object: Result<(u16,Vec<u8>),DYNERR>) -> STDRESULT {
    let (start_addr,object) = maybe_object?;
    if atty::is(atty::Stream::Stdout) {
        crate::display_block(start_addr,&object);
    } else {
        std::io::stdout().write_all(&object)?;
    }
    Ok(())
}

pub fn get(cmd: &clap::ArgMatches) -> STDRESULT {
    let src_path = cmd.get_one::<String>("file").expect(RCH);
    let maybe_typ = cmd.get_one::<String>("type");
    let maybe_img = cmd.get_one::<String>("dimg");

    match (maybe_typ,maybe_img) {

        // we are getting from a disk image
        (Some(typ_str),Some(img_path)) => {
            let typ = ItemType::from_str(typ_str)?;
            let mut disk = crate::create_fs_from_file(img_path)?;
            let maybe_object = match typ {
                ItemType::Program => disk.load(src_path),
                ItemType::Relative => disk.read_records(src_path).map(|(_len,dat)| (0,dat)),
                ItemType::Sector => disk.read_block(src_path),
                ItemType::Raw | ItemType::Sequential | ItemType::User | ItemType::Deleted => disk.read_raw(src_path).map(|(_len,dat)| (0,dat))
            };
            output_get(maybe_object)
        },

        // we are getting a local file
        (None,None) => {
            let object = std::fs::read(src_path)?;
            std::io::stdout().write_all(&object)?;
            Ok(())
        },

        // arguments inconsistent
        _ => {
            error!("for `get` provide either `-f` alone, or all of `-f`, `-d`, and `-t`");
            Err(Box::new(CommandError::InvalidCommand))
        }
    }
}
