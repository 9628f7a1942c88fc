//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.

pub mod mkdsk;
pub mod put;
pub mod get;
pub mod modify;
pub mod maint;
pub mod completions;

use std::str::FromStr;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Item type is unknown")]
    UnknownItemType,
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange,
    #[error("File exists")]
    FileExists
}

/// Types of items that can be moved in or out of a disk image.
/// The file types are mapped to `fs::cbm::types::FileType` by their mnemonic.
#[derive(PartialEq,Clone,Copy,Debug)]
pub enum ItemType {
    Program,
    Sequential,
    User,
    Deleted,
    Relative,
    Raw,
    Sector
}

impl ItemType {
    /// mnemonic accepted by the file system, None if not a file type
    pub fn mnemonic(&self) -> Option<&'static str> {
        match self {
            Self::Program => Some("prg"),
            Self::Sequential => Some("seq"),
            Self::User => Some("usr"),
            Self::Deleted => Some("del"),
            Self::Relative => Some("rel"),
            _ => None
        }
    }
}

impl FromStr for ItemType {
    type Err = CommandError;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "prg" => Ok(Self::Program),
            "seq" => Ok(Self::Sequential),
            "usr" => Ok(Self::User),
            "del" => Ok(Self::Deleted),
            "rel" => Ok(Self::Relative),
            "raw" => Ok(Self::Raw),
            "sec" => Ok(Self::Sector),
            _ => Err(CommandError::UnknownItemType)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_types() {
        assert_eq!(ItemType::from_str("prg").unwrap().mnemonic(),Some("prg"));
        assert_eq!(ItemType::from_str("sec").unwrap(),ItemType::Sector);
        assert_eq!(ItemType::Raw.mnemonic(),None);
        assert!(ItemType::from_str("atok").is_err());
    }
}
