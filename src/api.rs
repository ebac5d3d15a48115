use crate::{config::Config, database::Database, network::Network};
use handlebars::Handlebars;

/// Collection of the APIs shared by the HTTP server and the background worker.
pub struct Api {
    pub db: Database,
    pub config: Config,
    pub network: Network,
    pub templates: Handlebars<'static>,
}

impl Api {
    /// Instantiates APIs collection with the specified config and datastore.
    pub fn new(
        config: Config,
        database: Database,
        network: Network,
        templates: Handlebars<'static>,
    ) -> Self {
        Self {
            config,
            db: database,
            network,
            templates,
        }
    }
}

impl AsRef<Api> for Api {
    fn as_ref(&self) -> &Self {
        self
    }
}
