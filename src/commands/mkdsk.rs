use clap;
use std::str::FromStr;
use log::{error,info};
use crate::img::DiskKind;
use super::CommandError;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn mkdsk(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("name").expect(RCH);
    let id = match cmd.get_one::<String>("id") {
        Some(s) => s.as_str(),
        None => ""
    };
    let kind = DiskKind::from_str(cmd.get_one::<String>("kind").expect(RCH))?;
    if std::path::Path::new(path_to_img).exists() {
        error!("refusing to overwrite {}",path_to_img);
        return Err(Box::new(CommandError::FileExists));
    }
    if crate::escaped_ascii_to_bytes(id).len() > 2 {
        error!("disk id is limited to 2 bytes");
        return Err(Box::new(CommandError::OutOfRange));
    }
    let mut disk = crate::create_blank_fs(kind,name,id)?;
    info!("formatted {}",kind);
    crate::save_img(&mut disk,path_to_img)
}
