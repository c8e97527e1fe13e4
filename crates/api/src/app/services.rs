//! Collaborator wiring shared by every request.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use backoffice_bus::BusError;
use backoffice_catalog::config::{IMG_BASE_URL, LANG_DEFAULT, MULTISHOP_FEATURE_ACTIVE, SHOP_DEFAULT};
use backoffice_catalog::{
    CatalogCommandBus, CatalogError, CatalogQueryBus, ConfigurationStore, ProductGridFactory,
};
use backoffice_core::ShopId;
use backoffice_infra::{
    InMemoryCatalog, InMemoryConfiguration, InMemoryProductGridFactory, catalog_buses,
    seed_demo_catalog,
};

use crate::app::flash::{FLASH_TTL, FlashStore};
use crate::app::forms::{CommandBusFormHandler, ProductFormHandler};
use crate::app::translation::{EnglishTranslator, Translator};
use crate::app::view::{HtmlRenderer, TemplateRenderer};
use crate::config::ServerConfig;

/// Shops the demo catalog knows about besides the configured default.
const DEMO_SHOPS: [u32; 2] = [1, 2];

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("bus wiring failed: {0}")]
    Bus(#[from] BusError),
    #[error("demo catalog could not be seeded: {0}")]
    Catalog(#[from] CatalogError),
}

/// Everything the admin actions depend on, built once at startup.
pub struct AppServices {
    pub commands: Arc<CatalogCommandBus>,
    pub queries: Arc<CatalogQueryBus>,
    pub grid: Arc<dyn ProductGridFactory>,
    pub forms: Arc<dyn ProductFormHandler>,
    pub configuration: Arc<dyn ConfigurationStore>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub translator: Arc<dyn Translator>,
    pub flashes: Arc<FlashStore>,
    /// Directory virtual product files are read from.
    pub download_dir: PathBuf,
}

/// Configuration store seeded from the server configuration.
pub fn configuration_from(config: &ServerConfig) -> InMemoryConfiguration {
    InMemoryConfiguration::from_pairs([
        (SHOP_DEFAULT, config.default_shop.to_string()),
        (LANG_DEFAULT, config.default_language.to_string()),
        (
            MULTISHOP_FEATURE_ACTIVE,
            if config.multishop_active { "1" } else { "0" }.to_string(),
        ),
        (IMG_BASE_URL, config.image_base_url.clone()),
    ])
}

/// In-memory collaborators over the demo catalog.
pub fn build_demo_services(config: &ServerConfig) -> Result<AppServices, BootstrapError> {
    let shops = DEMO_SHOPS
        .into_iter()
        .filter_map(|id| ShopId::new(id).ok())
        .chain([config.default_shop]);
    let catalog = Arc::new(InMemoryCatalog::new(shops, config.image_base_url.clone()));
    seed_demo_catalog(&catalog)?;

    let (commands, queries) = catalog_buses(catalog.clone())?;
    let commands = Arc::new(commands);

    tracing::info!(
        default_shop = %config.default_shop,
        multishop = config.multishop_active,
        download_dir = %config.download_dir.display(),
        "catalog services ready"
    );

    Ok(AppServices {
        forms: Arc::new(CommandBusFormHandler::new(commands.clone())),
        commands,
        queries: Arc::new(queries),
        grid: Arc::new(InMemoryProductGridFactory::new(catalog)),
        configuration: Arc::new(configuration_from(config)),
        renderer: Arc::new(HtmlRenderer),
        translator: Arc::new(EnglishTranslator),
        flashes: Arc::new(FlashStore::with_limits(config.flash_max_sessions, FLASH_TTL)),
        download_dir: config.download_dir.clone(),
    })
}
