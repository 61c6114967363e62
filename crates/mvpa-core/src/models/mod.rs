pub mod classifier_trait;
pub mod lda;
