use std::sync::Arc;

use crate::shared::config::Config;
use crate::shared::crm::CrmUrlResolver;
use crate::shared::uploads::UploadStore;

/// Состояние процесса, доступное обработчикам через `Extension`
pub struct AppContext {
    pub config: Config,
    pub uploads: UploadStore,
    pub crm: CrmUrlResolver,
}

pub type SharedContext = Arc<AppContext>;

impl AppContext {
    pub fn new(config: Config, uploads: UploadStore, crm: CrmUrlResolver) -> SharedContext {
        Arc::new(Self {
            config,
            uploads,
            crm,
        })
    }
}
