use clap::{crate_version, Arg, ArgAction, Command, ValueHint};

const F_LONG_HELP: &str = "interpretation depends on type, for files this is the CBM file name,
for sectors it is a numerical address, either <track>,<sector> or an absolute sector number";
const T_LONG_HELP: &str = "File types `prg`, `seq`, `usr`, `del`, and `rel` are the CBM DOS types.
The `raw` type gets any file as it is stored, including the load address of a program.
The `sec` type gets or puts a single sector.";
const NAME_HELP: &str = "names longer than 16 characters are truncated,
arbitrary bytes can be given as hex escapes, e.g. `\\xA0`";

fn file_arg(help: &'static str) -> Arg {
    Arg::new("file").short('f').long("file").value_name("NAME").required(true).help(help)
        .long_help(NAME_HELP)
}

fn dimg_arg() -> Arg {
    Arg::new("dimg").short('d').long("dimg").help("path to disk image itself")
        .value_name("PATH")
        .value_hint(ValueHint::FilePath)
        .required(true)
}

pub fn build_cli() -> Command {
    let long_help = "d64kit is always invoked with exactly one of several subcommands.
The subcommands are generally designed to function as nodes in a pipeline.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
create image:          `d64kit mkdsk -n \"my disk\" -i 01 -d mydisk.d64`
list files:            `d64kit catalog -d mydisk.d64`
copy program in:       `d64kit get -f hello.prg | d64kit put -t prg -a 2049 -f hello -d mydisk.d64`
copy program out:      `d64kit extract -f hello -d mydisk.d64 -o .`
check and repair:      `d64kit verify --repair -d mydisk.d64`";

    let get_put_types = ["prg", "seq", "usr", "del", "rel", "raw", "sec"];
    let disk_kinds = ["35", "40"];

    let mut main_cmd = Command::new("d64kit")
        .about("Manipulates Commodore 1541 disk images.")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("mkdsk")
            .arg(Arg::new("name").short('n').long("name").value_name("NAME").help("disk name")
                .required(false)
                .default_value("NEW DISK")
                .long_help(NAME_HELP))
            .arg(Arg::new("id").short('i').long("id").value_name("ID").help("two character disk id")
                .required(false))
            .arg(Arg::new("kind").short('k').long("kind").value_name("TRACKS").help("number of tracks")
                .value_parser(disk_kinds)
                .required(false)
                .default_value("35"))
            .arg(dimg_arg().help("disk image path to create"))
            .about("write a blank disk image to the given path"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("catalog")
            .arg(dimg_arg())
            .visible_alias("cat")
            .visible_alias("dir")
            .visible_alias("ls")
            .about("write disk image catalog to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("get")
            .arg(Arg::new("file").short('f').long("file").value_name("NAME")
                .help("file name or sector address inside disk image, or local path")
                .required(true)
                .long_help(F_LONG_HELP))
            .arg(Arg::new("type").short('t').long("type").value_name("TYPE").help("type of the item")
                .value_parser(get_put_types)
                .required(false)
                .long_help(T_LONG_HELP))
            .arg(dimg_arg().required(false))
            .about("read from local or disk image, write to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("put")
            .arg(Arg::new("file").short('f').long("file").value_name("NAME")
                .help("file name or sector address inside disk image, or local path")
                .required(true)
                .long_help(F_LONG_HELP))
            .arg(Arg::new("type").short('t').long("type").value_name("TYPE").help("type of the item")
                .value_parser(get_put_types)
                .required(false)
                .long_help(T_LONG_HELP))
            .arg(dimg_arg().required(false))
            .arg(Arg::new("addr").short('a').long("addr").value_name("ADDRESS").help("load address of a program")
                .required(false)
                .default_value("2049"))
            .arg(Arg::new("len").short('l').long("len").value_name("LENGTH").help("record length of a relative file")
                .required(false))
            .about("read from stdin, write to local or disk image"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("delete")
            .arg(file_arg("name of file to delete"))
            .arg(dimg_arg())
            .visible_alias("del")
            .visible_alias("scratch")
            .about("delete a file inside a disk image"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("rename")
            .arg(file_arg("name of file to rename"))
            .arg(Arg::new("name").short('n').long("name").value_name("NAME").help("new name")
                .required(true))
            .arg(dimg_arg())
            .about("rename a file inside a disk image"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("lock")
            .arg(file_arg("name of file to lock"))
            .arg(dimg_arg())
            .about("write protect a file inside a disk image"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("unlock")
            .arg(file_arg("name of file to unlock"))
            .arg(dimg_arg())
            .about("remove write protection from a file inside a disk image"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("retype")
            .arg(file_arg("name of file to retype"))
            .arg(Arg::new("type").short('t').long("type").value_name("TYPE").help("file type, code or mnemonic")
                .required(true))
            .arg(dimg_arg())
            .about("change file type inside a disk image"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("rendsk")
            .arg(Arg::new("name").short('n').long("name").value_name("NAME").help("new disk name")
                .required(true)
                .long_help(NAME_HELP))
            .arg(dimg_arg())
            .about("change the disk name"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("verify")
            .arg(dimg_arg())
            .arg(Arg::new("repair").long("repair").help("rewrite the BAM to agree with the directory")
                .action(ArgAction::SetTrue))
            .arg(Arg::new("log").long("log").value_name("PATH").help("write discrepancies to a file")
                .value_hint(ValueHint::FilePath)
                .required(false))
            .about("cross check the BAM against the files on disk"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("compact")
            .arg(dimg_arg())
            .about("remove gaps from the directory and free unused directory sectors"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("sort")
            .arg(Arg::new("files").short('f').long("files").value_name("NAMES")
                .help("comma delimited list of names to put first")
                .value_delimiter(',')
                .required(false))
            .arg(Arg::new("alpha").long("alpha").help("sort all files by name")
                .action(ArgAction::SetTrue))
            .arg(dimg_arg())
            .about("reorder the directory"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("mvfirst")
            .arg(file_arg("name of file to move"))
            .arg(dimg_arg())
            .about("move a file to the top of the directory"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("extract")
            .arg(file_arg("name of file to extract"))
            .arg(dimg_arg())
            .arg(Arg::new("outdir").short('o').long("outdir").value_name("DIR").help("directory to write into")
                .value_hint(ValueHint::DirPath)
                .required(false)
                .default_value("."))
            .about("copy a file out of a disk image, extension is derived from the type"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(Arg::new("shell").short('s').long("shell").value_name("SHELL").help("shell type")
                .value_parser(["bash", "elv", "fish", "ps1", "zsh"])
                .required(true))
            .about("write shell completion script to stdout"),
    );
    main_cmd
}
