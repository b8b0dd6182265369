//! Command-line configuration shared by the binaries

use clap::Args;
use std::path::PathBuf;

use crate::acquisition::{DataLoader, DataSource, RemoteFetcher};

pub const DEFAULT_DATA_PATH: &str = "data/shipments.csv";
pub const DEFAULT_CACHE_FILE: &str = "data/remote_shipments.csv";
pub const DEFAULT_URL_TEMPLATE: &str = "https://drive.google.com/uc?export=download&id={id}";

/// Where to read shipments from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Local shipment CSV
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Remote dataset identifier; takes precedence over --data
    #[arg(long)]
    pub resource_id: Option<String>,

    /// Download URL template, `{id}` is replaced by the identifier
    #[arg(long, default_value = DEFAULT_URL_TEMPLATE)]
    pub url_template: String,

    /// File the remote dataset is downloaded into
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,
}

impl SourceArgs {
    pub fn source(&self) -> DataSource {
        match &self.resource_id {
            Some(id) => DataSource::Remote { id: id.clone() },
            None => DataSource::Local(self.data.clone()),
        }
    }

    pub fn loader(&self) -> DataLoader {
        DataLoader::new(RemoteFetcher::new(&self.url_template, self.cache_file.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        source: SourceArgs,
    }

    #[test]
    fn test_defaults_to_local_file() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.source.source(), DataSource::Local(PathBuf::from(DEFAULT_DATA_PATH)));
        assert_eq!(cli.source.url_template, DEFAULT_URL_TEMPLATE);
    }

    #[test]
    fn test_resource_id_selects_remote() {
        let cli = TestCli::parse_from(["test", "--resource-id", "1xYz", "--cache-file", "tmp/x.csv"]);
        assert_eq!(cli.source.source(), DataSource::Remote { id: "1xYz".to_string() });
        assert_eq!(cli.source.cache_file, PathBuf::from("tmp/x.csv"));
    }
}
