mod kv_store;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "cardapio",
    "m0001",
    vec_box![],
    vec_box![kv_store::CreateTable]
);
