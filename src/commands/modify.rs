use clap;
use crate::STDRESULT;
const RCH: &str = "unreachable was reached";

pub fn delete(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    disk.delete(name)?;
    return crate::save_img(&mut disk,path_to_img);
}

pub fn rename(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let new_name = cmd.get_one::<String>("name").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    disk.rename(name,new_name)?;
    return crate::save_img(&mut disk,path_to_img);
}

pub fn lock(cmd: &clap::ArgMatches,locked: bool) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    match locked {
        true => disk.lock(name)?,
        false => disk.unlock(name)?
    }
    return crate::save_img(&mut disk,path_to_img);
}

pub fn retype(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let typ = cmd.get_one::<String>("type").expect(RCH);
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    disk.retype(name,typ)?;
    return crate::save_img(&mut disk,path_to_img);
}

pub fn rename_disk(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("name").expect(RCH);
    let mut disk = crate::create_fs_from_file(path_to_img)?;
    disk.rename_disk(name)?;
    return crate::save_img(&mut disk,path_to_img);
}
