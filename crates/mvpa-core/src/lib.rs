//! mvpa-core: classification and class-balancing primitives for
//! multivariate pattern analysis.
//!
//! This crate provides nearest-centroid inference for a trained multiclass
//! LDA model and random over/under-sampling of labeled datasets with
//! provenance tracking for every output row. Model fitting, fold management
//! and data loading are left to the caller.
pub mod balance;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod models;

pub use balance::{balance, balance_with_config, balance_with_rng, Balanced};
pub use config::{BalanceConfig, BalanceMethod};
pub use data_handling::{Dataset, RowOrigin};
pub use error::{MvpaError, Result};
pub use models::classifier_trait::Classifier;
pub use models::lda::LdaModel;
