use crate::{
    db::{DbPool, OrmConn},
    uploads::UploadStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub uploads: UploadStore,
}
