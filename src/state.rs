use std::sync::Arc;

use crate::{
    cart::CartStore,
    db::{DbPool, OrmConn},
    storage::BlobStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub carts: CartStore,
    pub images: Arc<dyn BlobStore>,
    pub jwt_secret: String,
}
