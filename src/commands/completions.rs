use clap_complete::shells;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn generate(mut main_cmd: clap::Command,cmd: &clap::ArgMatches) -> STDRESULT {
    let mut out = std::io::stdout();
    match cmd.get_one::<String>("shell").expect(RCH).as_str() {
        "bash" => clap_complete::generate(shells::Bash,&mut main_cmd,"d64kit",&mut out),
        "elv" => clap_complete::generate(shells::Elvish,&mut main_cmd,"d64kit",&mut out),
        "fish" => clap_complete::generate(shells::Fish,&mut main_cmd,"d64kit",&mut out),
        "ps1" => clap_complete::generate(shells::PowerShell,&mut main_cmd,"d64kit",&mut out),
        "zsh" => clap_complete::generate(shells::Zsh,&mut main_cmd,"d64kit",&mut out),
        _ => panic!("{}",RCH)
    }
    Ok(())
}
