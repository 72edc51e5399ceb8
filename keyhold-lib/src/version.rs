use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// On-disk format a new database is created in.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum KdbVersion {
    #[strum(to_string = "Version 1")]
    V1,
    #[default]
    #[strum(to_string = "Version 2")]
    V2,
}

impl KdbVersion {
    pub fn extension(self) -> &'static str {
        match self {
            KdbVersion::V1 => "kdb",
            KdbVersion::V2 => "kdbx",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            KdbVersion::V1 => "Version 1 databases are compatible with KeePass 1.x (.kdb)",
            KdbVersion::V2 => "Version 2 databases are compatible with KeePass 2.x (.kdbx)",
        }
    }

    /// File name a database called `name` is stored under.
    pub fn file_name(self, name: &str) -> String {
        format!("{name}.{}", self.extension())
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_labels() {
        let labels: Vec<String> = KdbVersion::iter().map(|v| v.to_string()).collect();

        assert_eq!(labels, ["Version 1", "Version 2"]);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(KdbVersion::V1.file_name("Vault"), "Vault.kdb");
        assert_eq!(KdbVersion::V2.file_name("Vault"), "Vault.kdbx");
    }

    #[test]
    fn test_default() {
        assert_eq!(KdbVersion::default(), KdbVersion::V2);
    }
}
