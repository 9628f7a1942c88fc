//! # Command Line Interface
//!
//! Simple subcommands are directly in `main.rs`.
//! More elaborate subcommands are in the `commands` module.

mod cli;

use env_logger;
use log::error;
use d64kit::commands;
use d64kit::commands::CommandError;

const RCH: &str = "unreachable was reached";

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let main_cmd = cli::build_cli();
    let matches = main_cmd.get_matches();

    // Create a disk image
    if let Some(cmd) = matches.subcommand_matches("mkdsk") {
        return commands::mkdsk::mkdsk(cmd);
    }

    // Catalog a disk image
    if let Some(cmd) = matches.subcommand_matches("catalog") {
        let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
        let mut disk = d64kit::create_fs_from_file(path_to_img)?;
        return disk.catalog_to_stdout();
    }

    // Get or put files and sectors
    if let Some(cmd) = matches.subcommand_matches("get") {
        return commands::get::get(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("put") {
        return commands::put::put(cmd);
    }

    // Directory entry changes
    if let Some(cmd) = matches.subcommand_matches("delete") {
        return commands::modify::delete(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("rename") {
        return commands::modify::rename(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("lock") {
        return commands::modify::lock(cmd,true);
    }
    if let Some(cmd) = matches.subcommand_matches("unlock") {
        return commands::modify::lock(cmd,false);
    }
    if let Some(cmd) = matches.subcommand_matches("retype") {
        return commands::modify::retype(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("rendsk") {
        return commands::modify::rename_disk(cmd);
    }

    // Maintenance
    if let Some(cmd) = matches.subcommand_matches("verify") {
        return commands::maint::verify(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("compact") {
        return commands::maint::compact(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("sort") {
        return commands::maint::sort(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("mvfirst") {
        return commands::maint::move_first(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("extract") {
        return commands::maint::extract(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(cli::build_cli(),cmd);
    }

    error!("No subcommand was found, try `d64kit --help`");
    return Err(Box::new(CommandError::InvalidCommand));
}
