//! Maintenance subcommands, these map onto the maintenance methods of the file system.

use clap;
use std::io::Write;
use log::{error,info};
use super::CommandError;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn verify(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let repair = cmd.get_flag("repair");
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    let report = disk.check(repair)?;
    if let Some(log_path) = cmd.get_one::<String>("log") {
        let mut f = std::fs::File::create(log_path)?;
        for line in &report {
            writeln!(f,"{}",line)?;
        }
    }
    if report.len()==0 {
        println!("no discrepancies");
        return Ok(());
    }
    println!("{} discrepancies",report.len());
    if repair {
        return crate::save_img(&mut disk,path_to_img);
    }
    Ok(())
}

pub fn compact(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    if !disk.compact()? {
        info!("directory is empty, nothing to compact");
        return Ok(());
    }
    return crate::save_img(&mut disk,path_to_img);
}

pub fn sort(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let alpha = cmd.get_flag("alpha");
    let names: Vec<String> = match cmd.get_many::<String>("files") {
        Some(vals) => vals.cloned().collect(),
        None => Vec::new()
    };
    if alpha==(names.len()>0) {
        error!("provide either `--files` or `--alpha`");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    let order = match alpha {
        true => {
            let mut all = disk.file_names()?;
            all.sort();
            all
        },
        false => names
    };
    if !disk.sort(&order)? {
        info!("directory order is unchanged");
        return Ok(());
    }
    return crate::save_img(&mut disk,path_to_img);
}

pub fn move_first(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    if !disk.move_first(name)? {
        info!("{} is already first",name);
        return Ok(());
    }
    return crate::save_img(&mut disk,path_to_img);
}

pub fn extract(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let outdir = cmd.get_one::<String>("outdir").expect(RCH);
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    let path = disk.extract(name,std::path::Path::new(outdir))?;
    println!("{}",path.display());
    Ok(())
}
