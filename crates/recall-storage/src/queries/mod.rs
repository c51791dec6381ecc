pub mod decay_ops;
pub mod embedding_ops;
pub mod record_crud;
pub mod validation_ops;
