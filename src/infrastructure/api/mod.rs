pub mod http;

use std::sync::Arc;

use crate::domain::models::ChatApi;

pub type ApiBox = Arc<dyn ChatApi + Send + Sync>;

pub struct ApiManager {}

impl ApiManager {
    pub fn get() -> ApiBox {
        return Arc::<http::HttpApi>::default();
    }
}
